use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// Input path does not exist
    NotFound,
    /// Reading the input failed for another reason
    Io,
    /// Batch manifest could not be parsed or validated
    InvalidManifest,

    // Structural (fatal for one parse)
    /// Top-level magic is neither META, INI1 nor a trust bundle
    UnrecognizedFormat,
    /// A nested block (ACID, ACI0, KIP1) carries the wrong magic
    InvalidMagic,
    /// A nested offset/size pair points outside its parent block
    OffsetOutOfRange,
    /// Kernel capability block size is not a multiple of 4
    MisalignedCapabilityBlock,
    /// A fixed-layout read ran past the end of its buffer
    Truncated,
    /// A name field is not valid UTF-8
    InvalidText,

    // Non-fatal
    /// A paired capability descriptor lacks a valid successor (diagnostic only)
    MalformedCapability,

    // Diff
    /// Previous and current inputs are of different formats
    FormatMismatch,

    // Internal
    Serialization,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::InvalidManifest => "ERR_INVALID_MANIFEST",
            ExErrorKind::UnrecognizedFormat => "ERR_UNRECOGNIZED_FORMAT",
            ExErrorKind::InvalidMagic => "ERR_INVALID_MAGIC",
            ExErrorKind::OffsetOutOfRange => "ERR_OFFSET_OUT_OF_RANGE",
            ExErrorKind::MisalignedCapabilityBlock => "ERR_MISALIGNED_CAPABILITY_BLOCK",
            ExErrorKind::Truncated => "ERR_TRUNCATED",
            ExErrorKind::InvalidText => "ERR_INVALID_TEXT",
            ExErrorKind::MalformedCapability => "ERR_MALFORMED_CAPABILITY",
            ExErrorKind::FormatMismatch => "ERR_FORMAT_MISMATCH",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the context
/// needed to find the failing input: operation, file path and block name.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    block: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            block: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add input path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add block context (e.g. "ACID", "FAC")
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the input path, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the block name, if any
    pub fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(block) = &self.block {
            write!(f, " (block: {})", block)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Structural parse failures
///
/// Every variant is fatal for the parse that raised it; the partially built
/// tree is discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Top-level magic did not match any supported format
    #[error("Unrecognized format magic 0x{magic:08X}")]
    UnrecognizedFormat { magic: u32 },

    /// Input shorter than the 4-byte magic
    #[error("Input too short to hold a magic ({len} bytes)")]
    MissingMagic { len: usize },

    /// Nested block magic mismatch
    #[error("Bad {block} magic 0x{found:08X} (expected 0x{expected:08X})")]
    InvalidMagic {
        block: &'static str,
        expected: u32,
        found: u32,
    },

    /// Nested offset/size outside the parent block
    #[error("{block} offset 0x{offset:X} size 0x{size:X} exceeds parent size 0x{parent_size:X}")]
    OffsetOutOfRange {
        block: &'static str,
        offset: u64,
        size: u64,
        parent_size: u64,
    },

    /// Owner-info table declares more records than its size can hold
    #[error("{block} count 0x{count:X} is too large for table size 0x{table_size:X}")]
    TableOverflow {
        block: &'static str,
        count: u32,
        table_size: u32,
    },

    /// Kernel capability block size not a multiple of 4
    #[error("Kernel capability block size 0x{size:X} is not a multiple of 4")]
    MisalignedCapabilityBlock { size: usize },

    /// Fixed-layout read beyond the end of a buffer
    #[error("{block} read of {needed} bytes at 0x{offset:X} exceeds length 0x{len:X}")]
    Truncated {
        block: &'static str,
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// Name bytes are not valid UTF-8
    #[error("{block} contains a name that is not valid UTF-8")]
    InvalidText { block: &'static str },
}

impl ParseError {
    /// Canonical kind for this failure
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ParseError::UnrecognizedFormat { .. } | ParseError::MissingMagic { .. } => {
                ExErrorKind::UnrecognizedFormat
            }
            ParseError::InvalidMagic { .. } => ExErrorKind::InvalidMagic,
            ParseError::OffsetOutOfRange { .. } | ParseError::TableOverflow { .. } => {
                ExErrorKind::OffsetOutOfRange
            }
            ParseError::MisalignedCapabilityBlock { .. } => ExErrorKind::MisalignedCapabilityBlock,
            ParseError::Truncated { .. } => ExErrorKind::Truncated,
            ParseError::InvalidText { .. } => ExErrorKind::InvalidText,
        }
    }

    fn block(&self) -> Option<&'static str> {
        match self {
            ParseError::UnrecognizedFormat { .. }
            | ParseError::MissingMagic { .. }
            | ParseError::MisalignedCapabilityBlock { .. } => None,
            ParseError::InvalidMagic { block, .. }
            | ParseError::OffsetOutOfRange { block, .. }
            | ParseError::TableOverflow { block, .. }
            | ParseError::Truncated { block, .. }
            | ParseError::InvalidText { block } => Some(block),
        }
    }
}

/// Conversion from ParseError to ExError
impl From<ParseError> for ExError {
    fn from(err: ParseError) -> Self {
        let mut ex = ExError::new(err.kind())
            .with_op("parse")
            .with_message(err.to_string());
        if let Some(block) = err.block() {
            ex = ex.with_block(block);
        }
        ex
    }
}
