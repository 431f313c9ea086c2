//! Same-document `$ref` resolution against a stack of active schemas.
//!
//! A resolver is scoped to one validation run. Documents are pushed as the
//! walker enters them and popped as it leaves; pointer references resolve
//! against the most recently pushed, not-yet-popped document. Remote
//! references are out of scope and rejected outright.

use crate::error::{ResolverError, ResolverErrorKind};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static INDEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Registers schema documents per URI and resolves JSON-Pointer references
/// (`#/a/b/...`) against the current active document.
#[derive(Debug, Default)]
pub struct Resolver {
    schemas: HashMap<String, Arc<Value>>,
    stack: Vec<Arc<Value>>,
    active_refs: Vec<(usize, String, String)>,
}

impl Resolver {
    pub fn new() -> Resolver {
        Resolver::default()
    }

    /// Register `schema` under `uri` and push it onto the active stack.
    ///
    /// # Errors
    ///
    /// Fails with [`ResolverErrorKind::AlreadyRegisteredUri`] if a document
    /// is already registered for `uri`, regardless of whether its content
    /// differs.
    pub fn push_schema(&mut self, schema: Value, uri: &str) -> Result<(), ResolverError> {
        if self.schemas.contains_key(uri) {
            return Err(ResolverError::new(
                ResolverErrorKind::AlreadyRegisteredUri,
                format!("a schema is already registered for uri '{}'", uri),
            ));
        }

        let schema = Arc::new(schema);
        self.schemas.insert(uri.to_string(), schema.clone());
        self.stack.push(schema);
        Ok(())
    }

    /// Pop and return the active document.
    pub fn pop_schema(&mut self) -> Result<Arc<Value>, ResolverError> {
        self.stack.pop().ok_or_else(Self::empty_stack)
    }

    /// The active document (top of the stack), without popping it.
    pub fn current_schema(&self) -> Result<Arc<Value>, ResolverError> {
        self.stack.last().cloned().ok_or_else(Self::empty_stack)
    }

    /// Resolve a reference against the active document and return the schema
    /// node it designates.
    ///
    /// Only same-document pointers (`#`, `#/a/b`, ...) are supported; any
    /// other form fails with [`ResolverErrorKind::UnsupportedReference`].
    pub fn resolve(&self, pointer_uri: &str) -> Result<Value, ResolverError> {
        if let Some(pointer) = pointer_uri.strip_prefix('#') {
            let current = self.current_schema()?;
            return self.resolve_pointer(&current, pointer);
        }

        Err(ResolverError::new(
            ResolverErrorKind::UnsupportedReference,
            format!(
                "only same-document references are supported, got '{}'",
                pointer_uri
            ),
        ))
    }

    /// Mark a reference as being walked at a given instance location.
    ///
    /// Re-entering a pointer that is still active *at the same instance
    /// path* means no instance progress was made between the two entries:
    /// the reference graph is cyclic and would otherwise recurse without
    /// bound. Re-entry after descending into a child instance node is
    /// bounded by the instance's depth and is allowed, so self-referential
    /// schemas (the recursive-tree idiom) validate finite instances.
    pub fn enter_ref(
        &mut self,
        pointer_uri: &str,
        instance_path: &str,
    ) -> Result<(), ResolverError> {
        let key = (
            self.stack.len(),
            instance_path.to_string(),
            pointer_uri.to_string(),
        );
        if self.active_refs.contains(&key) {
            return Err(ResolverError::new(
                ResolverErrorKind::CycleDetected,
                format!("reference cycle detected at '{}'", pointer_uri),
            ));
        }
        self.active_refs.push(key);
        Ok(())
    }

    /// Unmark the most recently entered reference. Must mirror
    /// [`enter_ref`](Resolver::enter_ref) even across error paths.
    pub fn leave_ref(&mut self) {
        self.active_refs.pop();
    }

    fn resolve_pointer(&self, schema: &Value, pointer: &str) -> Result<Value, ResolverError> {
        let mut current = schema;
        let mut position = 0;

        for segment in pointer.split('/') {
            if segment.is_empty() {
                continue;
            }

            match current {
                Value::Object(map) => {
                    current = map.get(segment).ok_or_else(|| {
                        ResolverError::new(
                            ResolverErrorKind::UnresolvedProperty,
                            format!(
                                "cannot resolve property '{}' at position {} in pointer '{}'",
                                segment, position, pointer
                            ),
                        )
                    })?;
                }
                Value::Array(items) => {
                    if !INDEX_RE.is_match(segment) {
                        return Err(ResolverError::new(
                            ResolverErrorKind::InvalidIndex,
                            format!(
                                "invalid index '{}' at position {} in pointer '{}'",
                                segment, position, pointer
                            ),
                        ));
                    }

                    // Historical off-by-one: index tokens are treated as
                    // 1-based, so `1` addresses the first element. Kept for
                    // compatibility with existing pointer producers.
                    let index = segment.parse::<i64>().map(|n| n - 1).unwrap_or(-1);
                    current = usize::try_from(index)
                        .ok()
                        .and_then(|i| items.get(i))
                        .ok_or_else(|| {
                            ResolverError::new(
                                ResolverErrorKind::UnresolvedIndex,
                                format!(
                                    "cannot resolve index '{}' at position {} in pointer '{}'",
                                    segment, position, pointer
                                ),
                            )
                        })?;
                }
                _ => {
                    return Err(ResolverError::new(
                        ResolverErrorKind::InvalidSegmentType,
                        format!(
                            "invalid segment type at position {} in pointer '{}'",
                            position, pointer
                        ),
                    ));
                }
            }

            position += 1;
        }

        if !current.is_object() {
            return Err(ResolverError::new(
                ResolverErrorKind::InvalidTarget,
                format!("target of pointer '{}' is not a valid schema", pointer),
            ));
        }

        Ok(current.clone())
    }

    fn empty_stack() -> ResolverError {
        ResolverError::new(
            ResolverErrorKind::EmptySchemaStack,
            "the schema stack is empty".to_string(),
        )
    }
}
