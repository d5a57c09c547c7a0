//! One cancellable search at a time, applied as a single-writer state machine.
//!
//! Every search gets a fresh [`Generation`]. The source tags each event it
//! produces with the generation it was opened for, and [`StreamSession::apply`]
//! drops any envelope whose generation is not the active one. Starting a new
//! search or calling [`StreamSession::abort`] retires the old generation before
//! returning, so nothing from an earlier stream can reach the catalog
//! afterwards, even if the transport still has events in flight.

use std::fmt;

use partscout_core::{ErrorEvent, StreamEvent};

use crate::aggregator::{IngestOutcome, ProductAggregator};
use crate::error::{SessionError, SourceError};
use crate::suppliers::SupplierRegistry;

/// Monotonic search counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stream event tagged with the generation of the search that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub generation: Generation,
    pub event: StreamEvent,
}

impl Envelope {
    #[must_use]
    pub fn new(generation: Generation, event: StreamEvent) -> Self {
        Self { generation, event }
    }
}

/// Cancellation capability of an open stream.
pub trait StreamHandle: Send {
    /// Stops the underlying request. Must not block.
    fn abort(&mut self);
}

/// The streaming search collaborator.
///
/// Implementations deliver events for `generation` back to whoever drives
/// the session, which passes them to [`StreamSession::apply`].
pub trait SearchSource {
    /// Opens a stream for `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be started at all. Failures after
    /// the stream is open are delivered as `error` events instead.
    fn open(
        &mut self,
        query: &str,
        generation: Generation,
    ) -> Result<Box<dyn StreamHandle>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Completed,
    Failed { message: String },
    Aborted,
}

/// Counters for the current search. Reset on every [`StreamSession::start`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub items_applied: u64,
    /// Items dropped for a missing brand or article, or undecodable data.
    pub items_skipped: u64,
    /// Image batches that matched at least one group.
    pub image_batches: u64,
    /// Envelopes from a retired generation.
    pub stale_dropped: u64,
}

/// What [`StreamSession::apply`] did with an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Applied,
    /// Belonged to the active search but was malformed, or an image batch
    /// that matched no group.
    Skipped,
    /// Belonged to a retired search; nothing changed.
    Stale,
}

pub struct StreamSession<S> {
    source: S,
    last_generation: Generation,
    active: Option<Generation>,
    handle: Option<Box<dyn StreamHandle>>,
    query: Option<String>,
    status: SessionStatus,
    catalog: ProductAggregator,
    suppliers: SupplierRegistry,
    stats: SessionStats,
}

impl<S: SearchSource> StreamSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last_generation: Generation::default(),
            active: None,
            handle: None,
            query: None,
            status: SessionStatus::Idle,
            catalog: ProductAggregator::new(),
            suppliers: SupplierRegistry::new(),
            stats: SessionStats::default(),
        }
    }

    /// Starts a search for `term`, cancelling the active one first.
    ///
    /// The catalog and supplier set are cleared. The previous generation is
    /// retired before this returns.
    ///
    /// # Errors
    ///
    /// - [`SessionError::EmptyQuery`] if `term` is blank; the active search is
    ///   left untouched.
    /// - [`SessionError::Open`] if the source cannot open a stream; the
    ///   session is left in [`SessionStatus::Failed`].
    pub fn start(&mut self, term: &str) -> Result<Generation, SessionError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        self.cancel_active();

        let generation = self.last_generation.next();
        self.last_generation = generation;
        self.catalog.clear();
        self.suppliers.reset();
        self.stats = SessionStats::default();
        self.query = Some(term.to_owned());

        match self.source.open(term, generation) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.active = Some(generation);
                self.status = SessionStatus::Loading;
                tracing::info!(%generation, query = %term, "search started");
                Ok(generation)
            }
            Err(e) => {
                tracing::warn!(%generation, query = %term, error = %e, "failed to open search stream");
                self.status = SessionStatus::Failed {
                    message: format!("search failed: {e}"),
                };
                Err(SessionError::Open(e))
            }
        }
    }

    /// Cancels the in-flight search. Later envelopes for it are dropped.
    pub fn abort(&mut self) {
        let was_active = self.active.is_some();
        self.cancel_active();
        if was_active && self.status == SessionStatus::Loading {
            self.status = SessionStatus::Aborted;
            tracing::info!(generation = %self.last_generation, "search aborted");
        }
    }

    /// Applies one envelope. This is the only path that mutates the catalog
    /// and supplier set.
    pub fn apply(&mut self, envelope: Envelope) -> Disposition {
        if self.active != Some(envelope.generation) {
            self.stats.stale_dropped += 1;
            tracing::debug!(
                generation = %envelope.generation,
                kind = envelope.event.kind(),
                "dropping event from retired search"
            );
            return Disposition::Stale;
        }

        match envelope.event {
            StreamEvent::Item(item) => {
                let supplier = item.supplier.clone();
                match self.catalog.ingest(item) {
                    IngestOutcome::Skipped(reason) => {
                        self.stats.items_skipped += 1;
                        tracing::warn!(
                            generation = %envelope.generation,
                            supplier = %supplier,
                            %reason,
                            skipped = self.stats.items_skipped,
                            "skipping malformed item"
                        );
                        Disposition::Skipped
                    }
                    IngestOutcome::Created(_) | IngestOutcome::Merged { .. } => {
                        self.suppliers.add(&supplier);
                        self.stats.items_applied += 1;
                        Disposition::Applied
                    }
                }
            }
            StreamEvent::SkippedItem { reason } => {
                self.stats.items_skipped += 1;
                tracing::warn!(
                    generation = %envelope.generation,
                    %reason,
                    skipped = self.stats.items_skipped,
                    "skipping undecodable item"
                );
                Disposition::Skipped
            }
            StreamEvent::Images(images) => {
                if self.catalog.backfill_images(&images) == 0 {
                    tracing::debug!(
                        generation = %envelope.generation,
                        article = %images.article,
                        "image batch matched no group"
                    );
                    return Disposition::Skipped;
                }
                self.stats.image_batches += 1;
                Disposition::Applied
            }
            StreamEvent::Error(ErrorEvent { error }) => {
                let error = if error.trim().is_empty() {
                    "unknown error".to_owned()
                } else {
                    error
                };
                tracing::warn!(generation = %envelope.generation, %error, "search stream failed");
                self.status = SessionStatus::Failed {
                    message: format!("search failed: {error}"),
                };
                self.retire();
                Disposition::Applied
            }
            StreamEvent::Done | StreamEvent::End => {
                if self.status == SessionStatus::Loading {
                    self.status = SessionStatus::Completed;
                }
                tracing::info!(
                    generation = %envelope.generation,
                    groups = self.catalog.len(),
                    suppliers = self.suppliers.len(),
                    skipped = self.stats.items_skipped,
                    "search finished"
                );
                self.retire();
                Disposition::Applied
            }
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ProductAggregator {
        &self.catalog
    }

    #[must_use]
    pub fn suppliers(&self) -> &SupplierRegistry {
        &self.suppliers
    }

    #[must_use]
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// User-facing failure message, if the search failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Generation whose events are currently accepted.
    #[must_use]
    pub fn active_generation(&self) -> Option<Generation> {
        self.active
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    fn cancel_active(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.abort();
        }
        self.active = None;
    }

    /// Stops accepting events without aborting the transport, which is
    /// already closing on its own.
    fn retire(&mut self) {
        self.active = None;
        self.handle = None;
    }
}

impl<S> Drop for StreamSession<S> {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
