//! Late image backfill.
//!
//! Image batches are keyed by article alone, not by the full group key, so a
//! batch lands on every group with a matching article regardless of brand.
//! Two brands sharing an article string both receive the images.

use partscout_core::ProductGroup;

/// Merges `images` into every group whose article equals `article`
/// case-insensitively (surrounding whitespace ignored), preserving first-seen
/// order and skipping duplicates.
///
/// Returns the number of groups whose article matched.
pub fn merge_images_by_article(
    groups: &mut [ProductGroup],
    article: &str,
    images: &[String],
) -> usize {
    let wanted = article.trim().to_lowercase();
    if wanted.is_empty() {
        return 0;
    }

    let mut matched = 0;
    for group in groups
        .iter_mut()
        .filter(|g| g.article.trim().to_lowercase() == wanted)
    {
        let added = group.merge_images(images);
        matched += 1;
        tracing::debug!(
            group_key = %group.group_key,
            added,
            total = group.images.len(),
            "backfilled images"
        );
    }
    matched
}
