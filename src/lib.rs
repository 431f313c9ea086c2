//! JSON Schema validation (draft-06) over [`serde_json`] values.
//!
//! Schemas and instances arrive already parsed as [`serde_json::Value`]
//! trees; this crate checks conformance and reports every violation found,
//! with a JSON-Pointer path into the instance for each:
//!
//! ```text
//! validate(schema, instance, version) → ValidationResult { violations }
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string", "minLength": 1 },
//!         "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
//!     }
//! });
//! let instance = json!({ "name": "gateway", "port": 70000 });
//!
//! let result = jsv::validate(&schema, &instance, jsv::VERSION_DRAFT_6)
//!     .expect("well-formed setup");
//! assert!(!result.is_valid());
//! assert_eq!(result.violations[0].path, "/port");
//! ```
//!
//! Validation failures (the instance does not conform, or a schema keyword
//! value is itself malformed) accumulate as [`Violation`]s. A broken setup —
//! unsupported version identifier, unresolvable `$ref`, cyclic reference
//! graph — is a structural [`Error`] instead, so callers can always tell
//! "your data doesn't conform" apart from "your schema graph is broken".
//!
//! For validating many instances against schemas under one long-lived
//! constraint [`Registry`], build a [`Walker`] per run:
//!
//! ```rust
//! use serde_json::json;
//!
//! let registry = jsv::Registry::new();
//! let schema = json!({ "type": "boolean" });
//!
//! let mut walker = jsv::Walker::new(&registry, jsv::VERSION_CURRENT).unwrap();
//! let mut ctx = jsv::Context::new();
//! walker
//!     .walk_document(&schema, "urn:example:root", &json!(true), &mut ctx)
//!     .unwrap();
//! assert!(!ctx.has_violations());
//! ```

pub mod constraint;
pub mod context;
pub mod error;
pub mod primitives;
pub mod registry;
pub mod resolver;
pub mod walker;

pub use constraint::Constraint;
pub use context::Context;
pub use error::*;
pub use primitives::{PrimitiveType, matches_type, primitive_type_of};
pub use registry::{Registry, VERSION_CURRENT, VERSION_DRAFT_6};
pub use resolver::Resolver;
pub use walker::Walker;

/// URI under which [`validate`] registers the root schema document.
const ROOT_URI: &str = "urn:jsv:root";

/// Convenience entry point composing registry, walker, resolver, and context
/// for a single validation run.
///
/// # Errors
///
/// Returns [`Error`] for structural failures only (unsupported `version`,
/// broken reference graph). Conformance failures are reported through the
/// returned [`ValidationResult`].
pub fn validate(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
    version: &str,
) -> Result<ValidationResult, Error> {
    let registry = Registry::new();
    let mut walker = Walker::new(&registry, version)?;
    let mut ctx = Context::new();
    walker.walk_document(schema, ROOT_URI, instance, &mut ctx)?;

    Ok(ValidationResult {
        violations: ctx.into_violations(),
    })
}
