//! Set-if-changed helpers for building sparse diff trees

use super::model::{Change, EntryChange, FieldChange, FieldChanges};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A diff sub-tree that can be dropped when nothing changed
pub trait Sparse: Sized {
    fn is_empty(&self) -> bool;

    /// `Some(self)` if anything changed, otherwise `None`
    fn non_empty(self) -> Option<Self> {
        if Sparse::is_empty(&self) {
            None
        } else {
            Some(self)
        }
    }
}

impl<K, V> Sparse for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

impl<T> Sparse for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

/// Serialize for comparison and output. Diffing never fails, so a value that
/// cannot be represented becomes `null`.
pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Accumulates `FieldChange`s, recording a field only when it differs
#[derive(Debug, Default)]
pub struct FieldDiffBuilder {
    changes: FieldChanges,
}

impl FieldDiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` if `old != new`
    pub fn field<T>(&mut self, name: &str, old: &T, new: &T) -> &mut Self
    where
        T: Serialize + PartialEq + ?Sized,
    {
        if old != new {
            self.changes.insert(
                name.to_owned(),
                FieldChange {
                    old: to_value(old),
                    new: to_value(new),
                },
            );
        }
        self
    }

    /// Compare every top-level field of two records of the same type.
    ///
    /// Names listed in `skip` are left out (e.g. a matching key).
    pub fn fields_of<T>(&mut self, old: &T, new: &T, skip: &[&str]) -> &mut Self
    where
        T: Serialize + ?Sized,
    {
        match (to_value(old), to_value(new)) {
            (Value::Object(old), Value::Object(new)) => {
                for (name, new_value) in &new {
                    if skip.contains(&name.as_str()) {
                        continue;
                    }
                    let old_value = old.get(name).unwrap_or(&Value::Null);
                    self.field(name, old_value, new_value);
                }
                for (name, old_value) in &old {
                    if !new.contains_key(name) && !skip.contains(&name.as_str()) {
                        self.field(name, old_value, &Value::Null);
                    }
                }
            }
            (old, new) => {
                self.field("value", &old, &new);
            }
        }
        self
    }

    pub fn finish(self) -> FieldChanges {
        self.changes
    }
}

/// Keyed matching of two record lists.
///
/// Records sharing a key are paired in order of appearance: the n-th `prev`
/// record with a key matches the n-th `cur` record with the same key.
/// Surplus `cur` records are added, surplus `prev` records removed, so every
/// record of either side lands in exactly one output. All three outputs are
/// ordered by key, then by position within the key.
pub struct KeyedMatch<'a, T> {
    pub added: Vec<&'a T>,
    pub removed: Vec<&'a T>,
    pub matched: Vec<(&'a T, &'a T)>,
}

pub fn match_by_key<'a, T, K, P, C, F>(prev: P, cur: C, key: F) -> KeyedMatch<'a, T>
where
    T: 'a,
    K: Ord,
    P: IntoIterator<Item = &'a T>,
    C: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, (Vec<&'a T>, Vec<&'a T>)> = BTreeMap::new();
    for item in prev {
        groups.entry(key(item)).or_default().0.push(item);
    }
    for item in cur {
        groups.entry(key(item)).or_default().1.push(item);
    }

    let mut out = KeyedMatch {
        added: Vec::new(),
        removed: Vec::new(),
        matched: Vec::new(),
    };
    for (prev_group, cur_group) in groups.into_values() {
        let paired = prev_group.len().min(cur_group.len());
        out.matched
            .extend(prev_group.iter().copied().zip(cur_group.iter().copied()));
        out.removed.extend_from_slice(&prev_group[paired..]);
        out.added.extend_from_slice(&cur_group[paired..]);
    }
    out
}

/// Name-keyed map diff: Added, Removed or Updated(old, new) per key
pub fn diff_maps<K, V>(prev: &BTreeMap<K, V>, cur: &BTreeMap<K, V>) -> BTreeMap<K, EntryChange<V>>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    let mut out = BTreeMap::new();
    for (name, new) in cur {
        match prev.get(name) {
            None => {
                out.insert(name.clone(), EntryChange::Added(new.clone()));
            }
            Some(old) if old != new => {
                out.insert(
                    name.clone(),
                    EntryChange::Updated(Change {
                        old: old.clone(),
                        new: new.clone(),
                    }),
                );
            }
            Some(_) => {}
        }
    }
    for (name, old) in prev {
        if !cur.contains_key(name) {
            out.insert(name.clone(), EntryChange::Removed(old.clone()));
        }
    }
    out
}
