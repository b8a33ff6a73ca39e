//! Tag-name normalization and ranking.

use std::collections::BTreeMap;

use crate::types::TagMinutes;

/// Normalize raw tag names for one write operation.
///
/// Trims whitespace, drops names that trim to empty, deduplicates exactly
/// (matching is case-sensitive: "Math" and "math" stay distinct) and sorts
/// for reproducible lookup order.
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    normalized.sort_unstable();
    normalized.dedup();
    normalized
}

/// Rank tags by summed minutes descending, truncated to `limit`.
///
/// Input is one `(tag name, session minutes)` pair per session-tag link.
/// Ties are broken by name ascending. Tags that sum to zero minutes are
/// dropped rather than reported.
pub fn rank_tags(pairs: &[(String, i64)], limit: usize) -> Vec<TagMinutes> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for (name, minutes) in pairs {
        *totals.entry(name.as_str()).or_insert(0) += minutes;
    }

    // BTreeMap iterates name-ascending; the stable sort preserves that order
    // within equal minute totals.
    let mut ranked: Vec<TagMinutes> = totals
        .into_iter()
        .filter(|&(_, minutes)| minutes > 0)
        .map(|(name, minutes)| TagMinutes {
            name: name.to_string(),
            minutes,
        })
        .collect();
    ranked.sort_by(|a, b| b.minutes.cmp(&a.minutes));
    ranked.truncate(limit);
    ranked
}
