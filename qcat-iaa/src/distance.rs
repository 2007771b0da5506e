//! Set distances between label sets
//!
//! Closed-class cells may hold several labels, so annotators are compared
//! with set distances. Both distances are 0 for identical sets and 1 for
//! disjoint ones.

use std::collections::BTreeSet;

/// Distance between two label sets
pub type Distance = fn(&BTreeSet<String>, &BTreeSet<String>) -> f64;

/// Jaccard distance: `(|A ∪ B| - |A ∩ B|) / |A ∪ B|`
///
/// Two empty sets are identical (distance 0).
pub fn jaccard_distance(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    (union - intersection) as f64 / union as f64
}

/// MASI distance (Passonneau 2006)
///
/// Jaccard similarity weighted by monotonicity: 1 for equal sets, 0.67 when
/// one set contains the other, 0.33 for other overlapping sets, 0 otherwise.
pub fn masi_distance(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();

    let monotonicity = if a == b {
        1.0
    } else if intersection == a.len().min(b.len()) {
        0.67
    } else if intersection > 0 {
        0.33
    } else {
        0.0
    };

    1.0 - (intersection as f64 / union as f64) * monotonicity
}
