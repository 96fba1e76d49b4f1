//! Kernel capability diff

use super::builder::{match_by_key, to_value, FieldDiffBuilder, Sparse};
use super::model::{KcDiff, ListDiff, MemoryMapUpdate, PresenceDiff, SingletonChange};
use crate::caps::{CapabilityDescriptor, KernelCapabilities};
use serde_json::Value;
use std::collections::BTreeSet;

/// Kinds compared as "latest instance on each side"
pub const SINGLETON_KINDS: &[&str] = &[
    "ThreadInfo",
    "MemoryRegionMap",
    "MiscParams",
    "KernelVersion",
    "HandleTableSize",
    "MiscFlags",
];

/// Compare two decoded KC blocks.
///
/// System calls and interrupts are compared through their aggregates, map
/// descriptors by begin address, unknown descriptors by raw value and
/// singleton kinds field by field.
pub fn diff_kernel_caps(prev: &KernelCapabilities, cur: &KernelCapabilities) -> KcDiff {
    if prev == cur {
        return KcDiff::default();
    }

    let prev_mask = &prev.system_calls.mask;
    let cur_mask = &cur.system_calls.mask;
    let system_calls = PresenceDiff {
        added: cur_mask.difference(prev_mask).bits(),
        removed: prev_mask.difference(cur_mask).bits(),
    };

    KcDiff {
        system_calls: system_calls.non_empty(),
        interrupts: set_delta(&prev.interrupts.interrupts, &cur.interrupts.interrupts).non_empty(),
        memory_maps: diff_memory_maps(prev, cur).non_empty(),
        io_memory_maps: {
            let m = match_by_key(prev.io_memory_maps(), cur.io_memory_maps(), |m| {
                m.begin_address
            });
            PresenceDiff {
                added: m.added.into_iter().cloned().collect(),
                removed: m.removed.into_iter().cloned().collect(),
            }
            .non_empty()
        },
        unknown: {
            let m = match_by_key(prev.unknown(), cur.unknown(), |d| d.value);
            PresenceDiff {
                added: m.added.into_iter().cloned().collect(),
                removed: m.removed.into_iter().cloned().collect(),
            }
            .non_empty()
        },
        singletons: SINGLETON_KINDS
            .iter()
            .filter_map(|kind| {
                diff_singleton(prev.latest(kind), cur.latest(kind))
                    .map(|change| (kind.to_string(), change))
            })
            .collect(),
    }
}

/// Ascending (added, removed) between two ordered sets
fn set_delta<T: Ord + Copy>(prev: &BTreeSet<T>, cur: &BTreeSet<T>) -> PresenceDiff<T> {
    PresenceDiff {
        added: cur.difference(prev).copied().collect(),
        removed: prev.difference(cur).copied().collect(),
    }
}

fn diff_memory_maps(
    prev: &KernelCapabilities,
    cur: &KernelCapabilities,
) -> ListDiff<crate::caps::MemoryMap, MemoryMapUpdate> {
    let m = match_by_key(prev.memory_maps(), cur.memory_maps(), |m| m.begin_address);
    let updated = m
        .matched
        .into_iter()
        .filter(|(p, c)| p != c)
        .filter_map(|(p, c)| {
            let mut fields = FieldDiffBuilder::new();
            fields.fields_of(p, c, &["begin_address"]);
            fields.finish().non_empty().map(|changes| MemoryMapUpdate {
                begin_address: c.begin_address,
                changes,
            })
        })
        .collect();
    ListDiff {
        added: m.added.into_iter().cloned().collect(),
        removed: m.removed.into_iter().cloned().collect(),
        updated,
    }
}

fn diff_singleton(
    prev: Option<&CapabilityDescriptor>,
    cur: Option<&CapabilityDescriptor>,
) -> Option<SingletonChange> {
    match (prev, cur) {
        (None, None) => None,
        (None, Some(c)) => Some(SingletonChange::Added(descriptor_fields(c))),
        (Some(p), None) => Some(SingletonChange::Removed(descriptor_fields(p))),
        (Some(p), Some(c)) if p == c => None,
        (Some(p), Some(c)) => {
            let mut fields = FieldDiffBuilder::new();
            fields.fields_of(&descriptor_fields(p), &descriptor_fields(c), &[]);
            fields.finish().non_empty().map(SingletonChange::Updated)
        }
    }
}

/// The variant's own fields, without the enum tag
fn descriptor_fields(descriptor: &CapabilityDescriptor) -> Value {
    match to_value(descriptor) {
        Value::Object(map) => map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null),
        other => other,
    }
}
