use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::events::OfferRecord;

/// Normalized `brand` + `article` identity of a [`ProductGroup`].
///
/// Both parts are lowercased and every whitespace character is removed, so
/// `"Bosch"`/`" w142 "` and `"bosch"`/`"W142"` produce the same key. No
/// accent or locale folding is applied: `"Febi"` and `"Fébi"` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    #[must_use]
    pub fn derive(brand: &str, article: &str) -> Self {
        Self(squash(&format!("{brand}-{article}")))
    }

    /// Re-normalizes an externally supplied key (e.g. from a command line).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(squash(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Return policy attached to an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnInfo {
    #[serde(default)]
    pub returnable: bool,
    /// Return window in days, when the supplier states one.
    #[serde(default)]
    pub days: Option<u32>,
}

/// One sellable position within a [`ProductGroup`], attributed to the
/// supplier that listed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseOffer {
    pub id: Option<String>,
    pub supplier: String,
    pub name: String,
    pub price: Decimal,
    pub currency: Option<String>,
    pub quantity: i64,
    pub delivery_days: Option<u32>,
    pub return_info: Option<ReturnInfo>,
}

impl WarehouseOffer {
    /// Tags a wire offer with the supplier of the item event it arrived in.
    #[must_use]
    pub fn from_record(record: OfferRecord, supplier: &str) -> Self {
        Self {
            id: record.id,
            supplier: supplier.to_owned(),
            name: record.name,
            price: record.price,
            currency: record.currency,
            quantity: record.quantity,
            delivery_days: record.delivery_days,
            return_info: record.return_info,
        }
    }

    /// Stable identity of this offer for cart purposes.
    ///
    /// The supplier id when present, otherwise `supplier|name|price`. Two
    /// distinct offers from one supplier with the same name and price collide
    /// on the fallback and are treated as the same cart line.
    #[must_use]
    pub fn resolved_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}|{}|{}", self.supplier, self.name, self.price),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// One part merged across every supplier that listed it in a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGroup {
    pub group_key: GroupKey,
    pub brand: String,
    pub article: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Supplier of the first listing. Not meaningful for display; each offer
    /// carries its own supplier.
    pub supplier: String,
    pub is_cross: bool,
    /// Insertion-ordered, deduplicated.
    pub images: Vec<String>,
    /// Append-only within a session.
    pub warehouses: Vec<WarehouseOffer>,
}

impl ProductGroup {
    /// Externally visible identifier; identical to the group key.
    #[must_use]
    pub fn internal_id(&self) -> &str {
        self.group_key.as_str()
    }

    /// Returns the lowest offer price, or `None` when the group has no offers.
    #[must_use]
    pub fn min_price(&self) -> Option<Decimal> {
        self.warehouses.iter().map(|w| w.price).min()
    }

    #[must_use]
    pub fn offer_count(&self) -> usize {
        self.warehouses.len()
    }

    /// Returns `true` if at least one offer has stock.
    #[must_use]
    pub fn has_available_offers(&self) -> bool {
        self.warehouses.iter().any(WarehouseOffer::is_available)
    }

    /// Cheapest offer that has stock.
    #[must_use]
    pub fn cheapest_available(&self) -> Option<&WarehouseOffer> {
        self.warehouses
            .iter()
            .filter(|w| w.is_available())
            .min_by(|a, b| a.price.cmp(&b.price))
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
    }

    /// Appends `incoming` to the image set, skipping blanks and duplicates.
    /// Returns how many images were added.
    pub fn merge_images<'a, I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut added = 0;
        for image in incoming {
            if image.trim().is_empty() || self.images.contains(image) {
                continue;
            }
            self.images.push(image.clone());
            added += 1;
        }
        added
    }
}
