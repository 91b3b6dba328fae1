//! Canonical error facility for specgate
//!
//! This taxonomy provides a stable, structured classification of all errors
//! in the contract gate. Each kind maps to a stable error code that can be
//! used for programmatic handling, testing, and exit-status mapping.

/// Result type alias using GateError
pub type Result<T> = std::result::Result<T, GateError>;

/// Canonical error kind taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateErrorKind {
    // Schema model boundary
    /// Input document violates the schema-description format
    MalformedSchema,
    /// A named-schema reference does not resolve within its model
    ReferenceResolution,
    /// Document declares a kind other than the one requested
    WrongDocumentKind,

    // Snapshot store
    /// Snapshot artifact bytes fail digest verification or deserialization
    SnapshotCorrupt,
    /// No committed snapshot exists for the requested kind
    SnapshotMissing,

    // Policy
    /// Override token was supplied but is structurally invalid
    InvalidOverride,
    /// Gate configuration document is malformed or incomplete
    InvalidConfig,

    // Diff
    /// The computed diff failed its internal round-trip sanity check
    DeterminismViolation,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl GateErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            GateErrorKind::MalformedSchema => "ERR_MALFORMED_SCHEMA",
            GateErrorKind::ReferenceResolution => "ERR_REFERENCE_RESOLUTION",
            GateErrorKind::WrongDocumentKind => "ERR_WRONG_DOCUMENT_KIND",
            GateErrorKind::SnapshotCorrupt => "ERR_SNAPSHOT_CORRUPT",
            GateErrorKind::SnapshotMissing => "ERR_SNAPSHOT_MISSING",
            GateErrorKind::InvalidOverride => "ERR_INVALID_OVERRIDE",
            GateErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            GateErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            GateErrorKind::Io => "ERR_IO",
            GateErrorKind::Serialization => "ERR_SERIALIZATION",
            GateErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Provides a structured representation of errors with classification fields
/// for programmatic handling and rich context for debugging. Context is
/// attached builder-style; none of the context fields ever carry secret
/// values (override tokens stay behind `Sensitive<T>` and are never copied
/// into errors).
#[derive(Debug, Clone)]
pub struct GateError {
    kind: GateErrorKind,
    op: Option<String>,
    location: Option<String>,
    message: String,
    source: Option<Box<GateError>>,
}

impl GateError {
    /// Create a new error with the specified kind
    pub fn new(kind: GateErrorKind) -> Self {
        Self {
            kind,
            op: None,
            location: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context (the internal op that failed, e.g. `parse_document`)
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add location context (operation key and/or field path within a model)
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: GateError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> GateErrorKind {
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

    /// Get the location context, if any
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&GateError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(location) = &self.location {
            write!(f, " (location: {})", location)?;
        }
        Ok(())
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

/// Create a malformed-schema error with a parse-path location
pub fn malformed(op: &str, location: impl Into<String>, reason: impl Into<String>) -> GateError {
    GateError::new(GateErrorKind::MalformedSchema)
        .with_op(op)
        .with_location(location)
        .with_message(reason)
}

/// Create a dangling-reference error
pub fn dangling_reference(op: &str, name: &str, location: impl Into<String>) -> GateError {
    GateError::new(GateErrorKind::ReferenceResolution)
        .with_op(op)
        .with_location(location)
        .with_message(format!(
            "reference `{}` does not resolve to a named schema",
            name
        ))
}
