//! Container diff: META and INI1 trees.
//!
//! The entry point is [`diff`], which pairs two containers of the same format.

use super::builder::{diff_maps, match_by_key, FieldDiffBuilder, Sparse};
use super::kc::diff_kernel_caps;
use super::model::{
    AciDiff, ChangeSet, Change, FacDiff, InitialProcessDiff, InitialProcessUpdate, ListDiff,
    MetaDiff, PresenceDiff, SacDiff, SaveDataOwnerUpdate,
};
use crate::container::meta::{Aci, FileAccessControl, ServiceAccessControl};
use crate::container::{Container, InitialProcess, InitialProcessContainer, MetaContainer};
use std::collections::BTreeMap;

/// Diff two containers. `None` when their formats differ.
pub fn diff(prev: &Container, cur: &Container) -> Option<ChangeSet> {
    match (prev, cur) {
        (Container::Meta(p), Container::Meta(c)) => Some(ChangeSet::Meta(diff_meta(p, c))),
        (Container::InitialProcess(p), Container::InitialProcess(c)) => {
            Some(ChangeSet::InitialProcess(diff_initial_process(p, c)))
        }
        _ => None,
    }
}

pub fn diff_meta(prev: &MetaContainer, cur: &MetaContainer) -> MetaDiff {
    let mut header = FieldDiffBuilder::new();
    header.fields_of(&prev.header, &cur.header, &[]);

    let mut acid = FieldDiffBuilder::new();
    acid.fields_of(&prev.acid, &cur.acid, &[]);

    MetaDiff {
        header: header.finish(),
        acid: acid.finish(),
        aci: diff_aci(&prev.aci, &cur.aci).non_empty(),
    }
}

fn diff_aci(prev: &Aci, cur: &Aci) -> AciDiff {
    let mut fields = FieldDiffBuilder::new();
    fields.fields_of(&prev.header, &cur.header, &[]);

    AciDiff {
        fields: fields.finish(),
        fac: diff_fac(&prev.fac, &cur.fac).non_empty(),
        sac: diff_sac(&prev.sac, &cur.sac).non_empty(),
        kc: diff_kernel_caps(&prev.kc, &cur.kc).non_empty(),
    }
}

fn diff_fac(prev: &FileAccessControl, cur: &FileAccessControl) -> FacDiff {
    let mut fields = FieldDiffBuilder::new();
    fields
        .field("version", &prev.version, &cur.version)
        .field("padding", &prev.padding, &cur.padding)
        .field("fs_access_flags", &prev.fs_access_flags, &cur.fs_access_flags);

    let content = match_by_key(&prev.content_owners, &cur.content_owners, |o| o.id);
    let content_owners = PresenceDiff {
        added: content.added.into_iter().cloned().collect(),
        removed: content.removed.into_iter().cloned().collect(),
    };

    let save_data = match_by_key(&prev.save_data_owners, &cur.save_data_owners, |o| o.id);
    let save_data_owners = ListDiff {
        added: save_data.added.into_iter().cloned().collect(),
        removed: save_data.removed.into_iter().cloned().collect(),
        updated: save_data
            .matched
            .into_iter()
            .filter(|(p, c)| p.access != c.access)
            .map(|(p, c)| SaveDataOwnerUpdate {
                id: c.id,
                access: Change {
                    old: p.access,
                    new: c.access,
                },
            })
            .collect(),
    };

    FacDiff {
        fields: fields.finish(),
        content_owners: content_owners.non_empty(),
        save_data_owners: save_data_owners.non_empty(),
    }
}

fn diff_sac(prev: &ServiceAccessControl, cur: &ServiceAccessControl) -> SacDiff {
    SacDiff {
        server: diff_maps(&prev.server, &cur.server),
        client: diff_maps(&prev.client, &cur.client),
    }
}

/// Diff two INI1 containers.
///
/// Records match when they share a program id OR a name; the first match in
/// `prev` wins. Two records colliding under different keys are not
/// disambiguated.
pub fn diff_initial_process(
    prev: &InitialProcessContainer,
    cur: &InitialProcessContainer,
) -> InitialProcessDiff {
    let mut header = FieldDiffBuilder::new();
    header.fields_of(&prev.header, &cur.header, &[]);

    let mut added = Vec::new();
    let mut updated = BTreeMap::new();
    for process in &cur.processes {
        match prev.processes.iter().find(|p| p.matches(process)) {
            None => added.push(process.clone()),
            Some(prev_process) => {
                if let Some(update) = diff_process(prev_process, process).non_empty() {
                    updated.insert(process.key(), update);
                }
            }
        }
    }

    let mut removed: Vec<InitialProcess> = prev
        .processes
        .iter()
        .filter(|p| !cur.processes.iter().any(|c| c.matches(p)))
        .cloned()
        .collect();

    added.sort_by_key(InitialProcess::key);
    removed.sort_by_key(InitialProcess::key);

    InitialProcessDiff {
        header: header.finish(),
        added,
        removed,
        updated,
    }
}

fn diff_process(prev: &InitialProcess, cur: &InitialProcess) -> InitialProcessUpdate {
    let mut fields = FieldDiffBuilder::new();
    fields.fields_of(&prev.header, &cur.header, &[]);
    InitialProcessUpdate {
        fields: fields.finish(),
        kc: diff_kernel_caps(&prev.kc, &cur.kc).non_empty(),
    }
}
