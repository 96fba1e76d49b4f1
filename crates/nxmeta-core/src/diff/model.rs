//! Change-set output types.
//!
//! Every diff tree is sparse: unchanged fields are absent, empty sub-trees are
//! `None` and skipped on serialization. Collections are `BTreeMap` or `Vec`s
//! sorted by their matching key so output is deterministic.

use super::builder::Sparse;
use crate::caps::{IoMemoryMap, MemoryMap, UnknownDescriptor};
use crate::container::fac::{ContentOwnerInfo, SaveDataOwnerInfo};
use crate::container::InitialProcess;
use crate::trust::TrustBundleEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// An (old, new) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Change<T> {
    pub old: T,
    pub new: T,
}

/// A changed scalar field, values carried as JSON
pub type FieldChange = Change<Value>;

/// Changed fields by name
pub type FieldChanges = BTreeMap<String, FieldChange>;

/// Change to one entry of a keyed map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EntryChange<T> {
    Added(T),
    Removed(T),
    Updated(Change<T>),
}

/// Change to a singleton capability kind (latest instance on each side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SingletonChange {
    Added(Value),
    Removed(Value),
    Updated(FieldChanges),
}

/// Records present on only one side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresenceDiff<T> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<T>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<T>,
}

impl<T> Default for PresenceDiff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<T> Sparse for PresenceDiff<T> {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Keyed records: added, removed and matched-but-changed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListDiff<T, U> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<T>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<T>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<U>,
}

impl<T, U> Default for ListDiff<T, U> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<T, U> Sparse for ListDiff<T, U> {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

// ----- Kernel capabilities -----

/// A MemoryMap matched by begin address whose other fields changed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryMapUpdate {
    pub begin_address: u64,
    pub changes: FieldChanges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KcDiff {
    /// Bit indices over the 192-bit system call mask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_calls: Option<PresenceDiff<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupts: Option<PresenceDiff<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_maps: Option<ListDiff<MemoryMap, MemoryMapUpdate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_memory_maps: Option<PresenceDiff<IoMemoryMap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<PresenceDiff<UnknownDescriptor>>,
    /// Keyed by kind name (e.g. "ThreadInfo")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub singletons: BTreeMap<String, SingletonChange>,
}

impl Sparse for KcDiff {
    fn is_empty(&self) -> bool {
        self.system_calls.is_none()
            && self.interrupts.is_none()
            && self.memory_maps.is_none()
            && self.io_memory_maps.is_none()
            && self.unknown.is_none()
            && self.singletons.is_empty()
    }
}

// ----- META -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveDataOwnerUpdate {
    pub id: u64,
    pub access: Change<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FacDiff {
    /// version, padding, fs_access_flags
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_owners: Option<PresenceDiff<ContentOwnerInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_data_owners: Option<ListDiff<SaveDataOwnerInfo, SaveDataOwnerUpdate>>,
}

impl Sparse for FacDiff {
    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.content_owners.is_none() && self.save_data_owners.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SacDiff {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub server: BTreeMap<String, EntryChange<u8>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub client: BTreeMap<String, EntryChange<u8>>,
}

impl Sparse for SacDiff {
    fn is_empty(&self) -> bool {
        self.server.is_empty() && self.client.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AciDiff {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fac: Option<FacDiff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sac: Option<SacDiff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kc: Option<KcDiff>,
}

impl Sparse for AciDiff {
    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.fac.is_none() && self.sac.is_none() && self.kc.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaDiff {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: FieldChanges,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub acid: FieldChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aci: Option<AciDiff>,
}

impl Sparse for MetaDiff {
    fn is_empty(&self) -> bool {
        self.header.is_empty() && self.acid.is_empty() && self.aci.is_none()
    }
}

// ----- INI1 -----

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialProcessUpdate {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kc: Option<KcDiff>,
}

impl Sparse for InitialProcessUpdate {
    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.kc.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialProcessDiff {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: FieldChanges,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<InitialProcess>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<InitialProcess>,
    /// Keyed by `{program_id:016X}_{name}` of the current record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub updated: BTreeMap<String, InitialProcessUpdate>,
}

impl Sparse for InitialProcessDiff {
    fn is_empty(&self) -> bool {
        self.header.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
    }
}

// ----- Trust bundle -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustEntryUpdate {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Change<u32>>,
    pub data_changed: bool,
    /// The current entry
    pub entry: TrustBundleEntry,
}

pub type TrustBundleDiff = ListDiff<TrustBundleEntry, TrustEntryUpdate>;

// ----- Top level -----

/// Result of diffing two inputs of the same format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ChangeSet {
    Meta(MetaDiff),
    InitialProcess(InitialProcessDiff),
    TrustBundle(TrustBundleDiff),
}

impl ChangeSet {
    /// True iff nothing changed
    pub fn is_empty(&self) -> bool {
        match self {
            ChangeSet::Meta(d) => Sparse::is_empty(d),
            ChangeSet::InitialProcess(d) => Sparse::is_empty(d),
            ChangeSet::TrustBundle(d) => Sparse::is_empty(d),
        }
    }
}
