//! Cart ledger keyed by `(group key, resolved warehouse id)`.
//!
//! Lines snapshot what the user saw when they added the offer. Nothing here
//! reads back from the live catalog, so a new search or a price change never
//! alters an existing line.

use rust_decimal::Decimal;
use serde::Serialize;

use partscout_core::{GroupKey, ProductGroup, WarehouseOffer};

/// Currency assumed for offers that do not state one.
pub const DEFAULT_CURRENCY: &str = "RUB";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: GroupKey,
    /// See [`WarehouseOffer::resolved_id`].
    pub warehouse_id: String,
    pub brand: String,
    pub article: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub quantity: u32,
    pub supplier: String,
    pub warehouse_name: String,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    fn matches(&self, product_id: &str, warehouse_id: &str) -> bool {
        self.product_id.as_str() == product_id && self.warehouse_id == warehouse_id
    }
}

#[derive(Debug, Clone)]
pub struct CartLedger {
    lines: Vec<CartLine>,
    default_currency: String,
}

impl Default for CartLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CartLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_currency(DEFAULT_CURRENCY)
    }

    #[must_use]
    pub fn with_default_currency(currency: impl Into<String>) -> Self {
        Self {
            lines: Vec::new(),
            default_currency: currency.into(),
        }
    }

    /// Adds one unit of `warehouse` from `group`.
    ///
    /// A repeat add of the same `(group, offer)` pair increments the existing
    /// line's quantity and leaves its snapshot (including price) untouched.
    pub fn add_line(&mut self, group: &ProductGroup, warehouse: &WarehouseOffer) -> &CartLine {
        let warehouse_id = warehouse.resolved_id();
        let existing = self
            .lines
            .iter()
            .position(|line| line.matches(group.internal_id(), &warehouse_id));

        let idx = if let Some(idx) = existing {
            let line = &mut self.lines[idx];
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(
                product_id = %line.product_id,
                warehouse_id = %line.warehouse_id,
                quantity = line.quantity,
                "incremented cart line"
            );
            idx
        } else {
            let line = CartLine {
                product_id: group.group_key.clone(),
                warehouse_id,
                brand: group.brand.clone(),
                article: group.article.clone(),
                name: group.name.clone(),
                image: group.primary_image().map(str::to_owned),
                price: warehouse.price,
                currency: warehouse
                    .currency
                    .clone()
                    .unwrap_or_else(|| self.default_currency.clone()),
                quantity: 1,
                supplier: warehouse.supplier.clone(),
                warehouse_name: warehouse.name.clone(),
            };
            tracing::debug!(
                product_id = %line.product_id,
                warehouse_id = %line.warehouse_id,
                price = %line.price,
                "added cart line"
            );
            self.lines.push(line);
            self.lines.len() - 1
        };
        &self.lines[idx]
    }

    /// Removes the line for `(product_id, warehouse_id)`. Absent lines are a
    /// no-op.
    pub fn remove_line(&mut self, product_id: &str, warehouse_id: &str) -> Option<CartLine> {
        let idx = self
            .lines
            .iter()
            .position(|line| line.matches(product_id, warehouse_id))?;
        Some(self.lines.remove(idx))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// No currency conversion is done; a cart that mixes currencies is summed
    /// as-is and a warning is logged.
    #[must_use]
    pub fn total(&self) -> Decimal {
        if !self.is_single_currency() {
            tracing::warn!(
                currencies = ?self.currencies(),
                "cart mixes currencies; total is not converted"
            );
        }
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn is_in_cart(&self, product_id: &str, warehouse_id: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.matches(product_id, warehouse_id))
    }

    /// Same check as [`CartLedger::is_in_cart`], resolving the offer's
    /// identity the way [`CartLedger::add_line`] does.
    #[must_use]
    pub fn is_offer_in_cart(&self, group: &ProductGroup, warehouse: &WarehouseOffer) -> bool {
        self.is_in_cart(group.internal_id(), &warehouse.resolved_id())
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct currencies in first-seen order.
    #[must_use]
    pub fn currencies(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.currency.as_str()) {
                seen.push(&line.currency);
            }
        }
        seen
    }

    fn is_single_currency(&self) -> bool {
        self.currencies().len() <= 1
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
