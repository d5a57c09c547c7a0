//! Folds per-supplier item events into merged [`ProductGroup`]s.

use std::collections::HashMap;

use partscout_core::{GroupKey, ImagesEvent, ItemEvent, ProductGroup, WarehouseOffer};

use crate::images::merge_images_by_article;

/// What [`ProductAggregator::ingest`] did with an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Created(GroupKey),
    Merged {
        group_key: GroupKey,
        offers_added: usize,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingBrand,
    MissingArticle,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingBrand => write!(f, "missing brand"),
            SkipReason::MissingArticle => write!(f, "missing article"),
        }
    }
}

/// Arrival-ordered collection of product groups with a key index.
///
/// A group key maps to exactly one group for the life of the aggregator;
/// offers are only ever appended.
#[derive(Debug, Default)]
pub struct ProductAggregator {
    groups: Vec<ProductGroup>,
    index: HashMap<GroupKey, usize>,
}

impl ProductAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one item event into the catalog.
    ///
    /// Items without a brand or article are skipped. An existing group gets
    /// the item's offers appended, each tagged with `item.supplier`; offers
    /// are never deduplicated, even when two suppliers list the same
    /// warehouse. `name` and `description` are filled only while empty.
    pub fn ingest(&mut self, item: ItemEvent) -> IngestOutcome {
        if item.brand.trim().is_empty() {
            return IngestOutcome::Skipped(SkipReason::MissingBrand);
        }
        if item.article.trim().is_empty() {
            return IngestOutcome::Skipped(SkipReason::MissingArticle);
        }

        let group_key = GroupKey::derive(&item.brand, &item.article);
        let supplier = item.supplier;
        let offers: Vec<WarehouseOffer> = item
            .warehouses
            .into_iter()
            .map(|record| WarehouseOffer::from_record(record, &supplier))
            .collect();

        if let Some(&idx) = self.index.get(&group_key) {
            let group = &mut self.groups[idx];
            let offers_added = offers.len();
            group.warehouses.extend(offers);
            if group.name.is_none() {
                group.name = item.name;
            }
            if group.description.is_none() {
                group.description = item.description;
            }
            group.merge_images(&item.images);

            tracing::debug!(
                group_key = %group_key,
                supplier = %supplier,
                offers_added,
                total_offers = group.warehouses.len(),
                "merged item into existing group"
            );
            return IngestOutcome::Merged {
                group_key,
                offers_added,
            };
        }

        let mut group = ProductGroup {
            group_key: group_key.clone(),
            brand: item.brand,
            article: item.article,
            name: item.name,
            description: item.description,
            supplier: supplier.clone(),
            is_cross: item.is_cross,
            images: Vec::new(),
            warehouses: offers,
        };
        group.merge_images(&item.images);

        tracing::debug!(
            group_key = %group_key,
            supplier = %supplier,
            offers = group.warehouses.len(),
            "created product group"
        );
        self.index.insert(group_key.clone(), self.groups.len());
        self.groups.push(group);
        IngestOutcome::Created(group_key)
    }

    /// Applies a late image batch to every group whose article matches.
    /// Returns the number of groups touched.
    pub fn backfill_images(&mut self, event: &ImagesEvent) -> usize {
        merge_images_by_article(&mut self.groups, &event.article, &event.images)
    }

    /// Groups in arrival order.
    #[must_use]
    pub fn groups(&self) -> &[ProductGroup] {
        &self.groups
    }

    #[must_use]
    pub fn get(&self, group_key: &GroupKey) -> Option<&ProductGroup> {
        self.index.get(group_key).map(|&idx| &self.groups[idx])
    }

    /// Originals first, then analogs; arrival order within each class.
    #[must_use]
    pub fn display_order(&self) -> Vec<&ProductGroup> {
        let mut ordered: Vec<&ProductGroup> = self.groups.iter().collect();
        ordered.sort_by_key(|g| g.is_cross);
        ordered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.index.clear();
    }
}
