//! Payload types for the parts search event stream.
//!
//! ## Observed shape
//!
//! ### `item`
//! One supplier's listing of one part. `brand` and `article` are the merge
//! identity; both are occasionally missing or `null` on bad records, so they
//! deserialize leniently to an empty string and the aggregator decides what to
//! do with them. `name`/`description` arrive as `""` as often as `null`; both
//! are normalized to `None`.
//!
//! ### `is_cross`
//! Usually a boolean. Some suppliers send `0`/`1`. Both are accepted.
//!
//! ### `warehouses[].id`
//! May be a string, a number, or absent entirely. Normalized to
//! `Option<String>`; the cart falls back to a composite identity when absent.
//!
//! ### `warehouses[].price`
//! A JSON number in practice, sometimes a decimal string. An offer whose price
//! is absent, `null` or not a number is dropped; its sibling offers are kept.
//!
//! ### `warehouses[].quantity`, `warehouses[].delivery_days`
//! Numbers, or numeric strings from some suppliers. Anything else (`"2-3"`,
//! `"many"`) reads as quantity `0` and unknown delivery time.

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::catalog::ReturnInfo;

/// One decoded event from the search stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Item(ItemEvent),
    Images(ImagesEvent),
    Error(ErrorEvent),
    /// The search finished successfully.
    Done,
    /// The stream closed, after success or failure.
    End,
    /// An `item` frame whose data could not be decoded at all.
    SkippedItem { reason: String },
}

impl StreamEvent {
    /// Wire name of the event kind, as used in the `event:` field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Item(_) | StreamEvent::SkippedItem { .. } => "item",
            StreamEvent::Images(_) => "images",
            StreamEvent::Error(_) => "error",
            StreamEvent::Done => "done",
            StreamEvent::End => "end",
        }
    }
}

/// A single supplier's listing of a part, with that supplier's offers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub article: String,

    #[serde(default, deserialize_with = "non_blank")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "non_blank")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub supplier: String,

    /// Supplier-reported analog flag (`true` for a cross-reference, not the
    /// original part).
    #[serde(default, alias = "isCross", deserialize_with = "flag")]
    pub is_cross: bool,

    #[serde(default)]
    pub images: Vec<String>,

    /// Offers scoped to `supplier`. Offers without a usable price are dropped.
    #[serde(default, deserialize_with = "priced_offers")]
    pub warehouses: Vec<OfferRecord>,
}

/// One sellable position as it appears on the wire, before supplier tagging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OfferRecord {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    pub price: Decimal,

    #[serde(default, deserialize_with = "non_blank")]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: i64,

    #[serde(default, alias = "deliveryDays", deserialize_with = "lenient_days")]
    pub delivery_days: Option<u32>,

    #[serde(default, alias = "returnInfo")]
    pub return_info: Option<ReturnInfo>,
}

/// Late-arriving image metadata, keyed by article only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImagesEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub article: String,

    #[serde(default)]
    pub images: Vec<String>,
}

/// Terminal failure reported by the search service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: String,
}

/// `null` and absent both become an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Empty or whitespace-only strings become `None`.
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(RawId::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Keeps every element that decodes as an [`OfferRecord`].
fn priced_offers<'de, D>(deserializer: D) -> Result<Vec<OfferRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slot {
        Offer(OfferRecord),
        Unusable(IgnoredAny),
    }

    Ok(Option::<Vec<Slot>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Offer(offer) => Some(offer),
            Slot::Unusable(_) => None,
        })
        .collect())
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawQuantity {
        Number(i64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<RawQuantity>::deserialize(deserializer)? {
        Some(RawQuantity::Number(n)) => n,
        Some(RawQuantity::Text(s)) => s.trim().parse().unwrap_or(0),
        Some(RawQuantity::Other(_)) | None => 0,
    })
}

fn lenient_days<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDays {
        Number(u32),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<RawDays>::deserialize(deserializer)? {
        Some(RawDays::Number(n)) => Some(n),
        Some(RawDays::Text(s)) => s.trim().parse().ok(),
        Some(RawDays::Other(_)) | None => None,
    })
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(i64),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Number(n)) => n != 0,
        None => false,
    })
}
