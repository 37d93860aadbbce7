use std::collections::HashSet;

use crate::stock::StockListing;

/// Whether the observed listing differs from the previous one.
///
/// Comparison is per-category sequence equality, so a pure reordering of the
/// same items counts as a change. Existing deployments rely on
/// reorder-triggered updates.
pub fn changed(prev: &StockListing, curr: &StockListing) -> bool {
    prev != curr
}

/// Items present in `curr` but not in `prev`, in `curr` source order.
/// Membership is order-independent; duplicates are collapsed.
pub fn newly_stocked(prev: &[String], curr: &[String]) -> Vec<String> {
    let known: HashSet<&str> = prev.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    curr.iter()
        .filter(|item| !known.contains(item.as_str()))
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

/// Newly stocked items across both categories, normal first, each in source
/// order.
pub fn newly_stocked_all(prev: &StockListing, curr: &StockListing) -> Vec<String> {
    let mut fresh = newly_stocked(&prev.normal, &curr.normal);
    for item in newly_stocked(&prev.mirage, &curr.mirage) {
        if !fresh.contains(&item) {
            fresh.push(item);
        }
    }
    fresh
}
