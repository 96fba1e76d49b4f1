//! Canonical logging macros
//!
//! Every event carries `component`, `op` and `event`; failures add
//! `err.kind` and `err.code` from the error facility.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use nxmeta_core::log_op_start;
/// log_op_start!("parse");
/// log_op_start!("parse", path = "main.npdm");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use nxmeta_core::log_op_end;
/// log_op_end!("parse", duration_ms = 42);
/// log_op_end!("load_document", duration_ms = 3, format = "META");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log an operation failure. `$err` is anything convertible into `ExError`.
///
/// # Example
///
/// ```
/// # use nxmeta_core::log_op_error;
/// # use nxmeta_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::NotFound).with_path("missing.npdm");
/// log_op_error!("load", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        );
    }};
}
