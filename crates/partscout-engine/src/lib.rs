//! Incremental result aggregation and cart ledger for multi-supplier parts
//! search.
//!
//! Everything here is synchronous and single-writer: one [`StreamSession`]
//! applies stream events to its catalog in arrival order, and one
//! [`CartLedger`] owns the cart. Transport lives in `partscout-client`.

pub mod aggregator;
pub mod cart;
pub mod error;
pub mod images;
pub mod session;
pub mod suppliers;

pub use aggregator::{IngestOutcome, ProductAggregator, SkipReason};
pub use cart::{CartLedger, CartLine, DEFAULT_CURRENCY};
pub use error::{SessionError, SourceError};
pub use images::merge_images_by_article;
pub use session::{
    Disposition, Envelope, Generation, SearchSource, SessionStats, SessionStatus, StreamHandle,
    StreamSession,
};
pub use suppliers::SupplierRegistry;
