//! Set algebra over ascending, deduplicated document-id lists.
//!
//! Postings and the document registry are already sorted by id, so every
//! operation is a linear merge rather than a hash-set round trip.

use crate::DocId;
use std::cmp::Ordering;

/// Intersection of all `sets`. An empty list of sets yields the empty set.
pub fn intersect(sets: &[Vec<DocId>]) -> Vec<DocId> {
    let mut order: Vec<&Vec<DocId>> = sets.iter().collect();
    order.sort_by_key(|s| s.len());
    let Some((first, rest)) = order.split_first() else {
        return Vec::new();
    };
    let mut acc: Vec<DocId> = (*first).clone();
    for set in rest {
        if acc.is_empty() {
            break;
        }
        acc = intersect_pair(&acc, set);
    }
    acc
}

/// Union of all `sets`.
pub fn union(sets: &[Vec<DocId>]) -> Vec<DocId> {
    sets.iter().fold(Vec::new(), |acc, set| union_pair(&acc, set))
}

/// `universe` minus the union of `sets`.
pub fn subtract(universe: &[DocId], sets: &[Vec<DocId>]) -> Vec<DocId> {
    let removed = union(sets);
    let mut out = Vec::with_capacity(universe.len().saturating_sub(removed.len()));
    let mut j = 0;
    for &doc in universe {
        while j < removed.len() && removed[j] < doc {
            j += 1;
        }
        if j < removed.len() && removed[j] == doc {
            continue;
        }
        out.push(doc);
    }
    out
}

fn intersect_pair(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn union_pair(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len() + b.len());
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}
