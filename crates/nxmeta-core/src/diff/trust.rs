//! Trust bundle diff

use super::builder::match_by_key;
use super::model::{Change, ListDiff, TrustBundleDiff, TrustEntryUpdate};
use crate::trust::TrustBundle;

/// Match entries by id; a matched entry is updated when its status or its
/// payload bytes changed.
pub fn diff_trust_bundle(prev: &TrustBundle, cur: &TrustBundle) -> TrustBundleDiff {
    let m = match_by_key(&prev.entries, &cur.entries, |e| e.id);
    ListDiff {
        added: m.added.into_iter().cloned().collect(),
        removed: m.removed.into_iter().cloned().collect(),
        updated: m
            .matched
            .into_iter()
            .filter(|(p, c)| p.status != c.status || p.data != c.data)
            .map(|(p, c)| TrustEntryUpdate {
                id: c.id,
                status: (p.status != c.status).then(|| Change {
                    old: p.status,
                    new: c.status,
                }),
                data_changed: p.data != c.data,
                entry: c.clone(),
            })
            .collect(),
    }
}
