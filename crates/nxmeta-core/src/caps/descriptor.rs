//! Typed kernel capability descriptors.
//!
//! Every variant keeps the raw word(s) it was decoded from next to the
//! extracted fields. Addresses and sizes are already scaled to bytes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of 24-bit groups in the system call mask
pub const SYSCALL_GROUPS: usize = 8;
/// Width of one system call group
pub const SYSCALL_GROUP_BITS: u32 = 24;
/// Interrupt slot value meaning "unused"
pub const INTERRUPT_UNUSED: u16 = 0x3FF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionType {
    #[serde(rename = "RW")]
    ReadWrite,
    #[serde(rename = "R-")]
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingType {
    Io,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub value: u32,
    pub lowest_priority: u8,
    pub highest_priority: u8,
    pub min_core_number: u8,
    pub max_core_number: u8,
}

/// One EnableSystemCalls descriptor: a 24-bit mask for group `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCall {
    pub value: u32,
    pub system_call_id: u32,
    pub index: u8,
}

/// Paired descriptor; `value0`/`value1` are the two raw words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMap {
    pub value0: u32,
    pub value1: u32,
    pub begin_address: u64,
    pub permission: PermissionType,
    pub size: u64,
    pub reserved: u8,
    pub mapping: MappingType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoMemoryMap {
    pub value: u32,
    pub begin_address: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegionMap {
    pub value: u32,
    pub region_types: [u8; 3],
    pub region_is_read_only: [bool; 3],
}

/// One EnableInterrupts descriptor carrying up to two interrupt numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrupt {
    pub value: u32,
    pub interrupt_number0: u16,
    pub interrupt_number1: u16,
}

impl Interrupt {
    /// Interrupt numbers actually in use (0x3FF slots omitted)
    pub fn used(&self) -> impl Iterator<Item = u16> {
        [self.interrupt_number0, self.interrupt_number1]
            .into_iter()
            .filter(|n| *n != INTERRUPT_UNUSED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscParams {
    pub value: u32,
    pub program_type: u8,
    pub reserved: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelVersion {
    pub value: u32,
    pub major: u16,
    pub minor: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleTableSize {
    pub value: u32,
    pub size: u16,
    pub reserved: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscFlags {
    pub value: u32,
    pub enable_debug: bool,
    pub force_debug: bool,
    pub reserved: u16,
}

/// A descriptor with a bitcount no decoder is registered for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownDescriptor {
    pub value: u32,
}

/// A decoded kernel capability descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityDescriptor {
    ThreadInfo(ThreadInfo),
    SystemCall(SystemCall),
    MemoryMap(MemoryMap),
    IoMemoryMap(IoMemoryMap),
    MemoryRegionMap(MemoryRegionMap),
    Interrupt(Interrupt),
    MiscParams(MiscParams),
    KernelVersion(KernelVersion),
    HandleTableSize(HandleTableSize),
    MiscFlags(MiscFlags),
    Unknown(UnknownDescriptor),
}

impl CapabilityDescriptor {
    /// Stable variant name, used as the key in diff output
    pub fn kind_name(&self) -> &'static str {
        match self {
            CapabilityDescriptor::ThreadInfo(_) => "ThreadInfo",
            CapabilityDescriptor::SystemCall(_) => "EnableSystemCalls",
            CapabilityDescriptor::MemoryMap(_) => "MemoryMap",
            CapabilityDescriptor::IoMemoryMap(_) => "IoMemoryMap",
            CapabilityDescriptor::MemoryRegionMap(_) => "MemoryRegionMap",
            CapabilityDescriptor::Interrupt(_) => "EnableInterrupts",
            CapabilityDescriptor::MiscParams(_) => "MiscParams",
            CapabilityDescriptor::KernelVersion(_) => "KernelVersion",
            CapabilityDescriptor::HandleTableSize(_) => "HandleTableSize",
            CapabilityDescriptor::MiscFlags(_) => "MiscFlags",
            CapabilityDescriptor::Unknown(_) => "Descriptor",
        }
    }
}

/// The 192-bit system call mask, stored as eight 24-bit groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyscallMask {
    groups: [u32; SYSCALL_GROUPS],
}

impl SyscallMask {
    /// OR a descriptor's 24-bit group mask into group `index`
    pub fn enable(&mut self, index: u8, group_mask: u32) {
        if let Some(group) = self.groups.get_mut(usize::from(index)) {
            *group |= group_mask & 0x00FF_FFFF;
        }
    }

    pub fn from_groups(groups: [u32; SYSCALL_GROUPS]) -> Self {
        let mut mask = Self::default();
        for (index, group) in groups.iter().enumerate() {
            mask.enable(index as u8, *group);
        }
        mask
    }

    pub fn groups(&self) -> &[u32; SYSCALL_GROUPS] {
        &self.groups
    }

    /// Whether bit `index` (0-based over the full mask) is set
    pub fn is_set(&self, index: u32) -> bool {
        let group = (index / SYSCALL_GROUP_BITS) as usize;
        let bit = index % SYSCALL_GROUP_BITS;
        self.groups
            .get(group)
            .map(|g| (g >> bit) & 1 == 1)
            .unwrap_or(false)
    }

    /// Set bit indices, ascending
    pub fn bits(&self) -> Vec<u32> {
        (0..SYSCALL_GROUPS as u32 * SYSCALL_GROUP_BITS)
            .filter(|index| self.is_set(*index))
            .collect()
    }

    /// Bits set in `self` but not in `other`
    pub fn difference(&self, other: &SyscallMask) -> SyscallMask {
        let mut groups = self.groups;
        for (g, o) in groups.iter_mut().zip(other.groups.iter()) {
            *g &= !o;
        }
        SyscallMask { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| *g == 0)
    }
}

/// Aggregate of every EnableSystemCalls descriptor in a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableSystemCalls {
    pub mask: SyscallMask,
}

/// Aggregate of every EnableInterrupts descriptor in a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableInterrupts {
    pub interrupts: BTreeSet<u16>,
}

/// A decoded kernel capability block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelCapabilities {
    /// Every decoded descriptor in block order
    pub descriptors: Vec<CapabilityDescriptor>,
    pub system_calls: EnableSystemCalls,
    pub interrupts: EnableInterrupts,
}

impl KernelCapabilities {
    /// Append a descriptor, folding syscall and interrupt entries into the aggregates
    pub fn push(&mut self, descriptor: CapabilityDescriptor) {
        match &descriptor {
            CapabilityDescriptor::SystemCall(sc) => {
                self.system_calls.mask.enable(sc.index, sc.system_call_id);
            }
            CapabilityDescriptor::Interrupt(irq) => {
                self.interrupts.interrupts.extend(irq.used());
            }
            _ => {}
        }
        self.descriptors.push(descriptor);
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn memory_maps(&self) -> impl Iterator<Item = &MemoryMap> {
        self.descriptors.iter().filter_map(|d| match d {
            CapabilityDescriptor::MemoryMap(m) => Some(m),
            _ => None,
        })
    }

    pub fn io_memory_maps(&self) -> impl Iterator<Item = &IoMemoryMap> {
        self.descriptors.iter().filter_map(|d| match d {
            CapabilityDescriptor::IoMemoryMap(m) => Some(m),
            _ => None,
        })
    }

    pub fn unknown(&self) -> impl Iterator<Item = &UnknownDescriptor> {
        self.descriptors.iter().filter_map(|d| match d {
            CapabilityDescriptor::Unknown(u) => Some(u),
            _ => None,
        })
    }

    /// Last descriptor of the given kind, if any
    pub fn latest(&self, kind_name: &str) -> Option<&CapabilityDescriptor> {
        self.descriptors
            .iter()
            .rev()
            .find(|d| d.kind_name() == kind_name)
    }
}
