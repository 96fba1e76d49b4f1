//! Structural diff engine.
//!
//! Compares two parsed trees and produces a sparse change-set. Entries are
//! matched by identity (ids, names, begin addresses, bit indices), never by
//! array position.
//!
//! ## Entry point
//!
//! ```ignore
//! use nxmeta_core::{container, diff};
//!
//! let prev = container::parse(&prev_bytes, &mut sink)?;
//! let cur = container::parse(&cur_bytes, &mut sink)?;
//! let changes = diff::diff(&prev, &cur);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical serialized output.
//! - **Identity**: `diff(x, x)` is always empty.
//! - **Infallible**: diffing never fails; only a format mismatch yields `None`.

pub mod builder;
pub mod engine;
pub mod kc;
pub mod model;
pub mod trust;

pub use builder::{FieldDiffBuilder, Sparse};
pub use engine::{diff, diff_initial_process, diff_meta};
pub use kc::diff_kernel_caps;
pub use model::ChangeSet;
pub use trust::diff_trust_bundle;
