//! Violation and structural error types.
//!
//! Two channels, never conflated: [`Violation`]s are expected, data-driven
//! conformance failures accumulated during a run; [`Error`] and its component
//! kinds ([`RegistryError`], [`ResolverError`]) signal a broken setup
//! (unsupported version, bad reference graph) and abort the run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recorded conformance failure: which keyword was violated, where in the
/// instance, and a human-readable message with the offending schema value
/// interpolated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub keyword: String,
    /// JSON-Pointer-style path into the instance (`""` for the root).
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{} at {}: {}", self.keyword, path, self.message)
    }
}

impl std::error::Error for Violation {}

/// Result of a validation run: the full ordered list of violations found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Produced by the registry for unusable version identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryError {
    pub version: String,
    pub message: String,
}

impl RegistryError {
    pub fn unsupported_version(version: &str) -> RegistryError {
        RegistryError {
            version: version.to_string(),
            message: format!("schema version '{}' not supported", version),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegistryError {}

/// Error kind for reference-resolution failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverErrorKind {
    AlreadyRegisteredUri,
    EmptySchemaStack,
    UnsupportedReference,
    UnresolvedProperty,
    InvalidIndex,
    UnresolvedIndex,
    InvalidSegmentType,
    InvalidTarget,
    CycleDetected,
}

/// Produced by the resolver when a reference cannot be turned into a schema
/// node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverError {
    pub kind: ResolverErrorKind,
    pub message: String,
}

impl ResolverError {
    pub(crate) fn new(kind: ResolverErrorKind, message: String) -> ResolverError {
        ResolverError { kind, message }
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ResolverError {}

/// Combined structural error type for a validation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Registry(RegistryError),
    Resolver(ResolverError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Registry(e) => write!(f, "registry error: {}", e),
            Error::Resolver(e) => write!(f, "resolver error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Error {
        Error::Registry(e)
    }
}

impl From<ResolverError> for Error {
    fn from(e: ResolverError) -> Error {
        Error::Resolver(e)
    }
}
