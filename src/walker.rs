//! The schema traversal engine.

use crate::constraint::Constraint;
use crate::context::Context;
use crate::error::Error;
use crate::primitives::primitive_type_of;
use crate::registry::Registry;
use crate::resolver::Resolver;
use serde_json::Value;

/// Recursively visits schema/instance pairs, dispatching the constraints the
/// registry declares for the instance's primitive type at each node.
///
/// A walker is scoped to a single validation run: it owns the run's
/// [`Resolver`] (and therefore its active-document stack), while the
/// [`Registry`] it borrows may be shared across concurrent runs.
#[derive(Debug)]
pub struct Walker<'r> {
    registry: &'r Registry,
    resolver: Resolver,
    version: String,
}

impl<'r> Walker<'r> {
    /// Create a walker for one validation run under `version`.
    ///
    /// # Errors
    ///
    /// Fails if `version` is not a recognized specification identifier.
    pub fn new(registry: &'r Registry, version: &str) -> Result<Walker<'r>, Error> {
        // Reject unusable versions up front rather than mid-traversal.
        registry.constraints(version)?;
        Ok(Walker {
            registry,
            resolver: Resolver::new(),
            version: version.to_string(),
        })
    }

    /// Register `schema` as the active document under `uri`, walk `instance`
    /// against it, and release the document again. Violations accumulate
    /// into `ctx`; the returned error covers only structural failures.
    pub fn walk_document(
        &mut self,
        schema: &Value,
        uri: &str,
        instance: &Value,
        ctx: &mut Context,
    ) -> Result<(), Error> {
        self.resolver.push_schema(schema.clone(), uri)?;
        let result = self.walk(schema, instance, ctx);
        self.resolver.pop_schema()?;
        result
    }

    /// Walk one schema/instance pair. Composition constraints re-enter here
    /// for their sub-schemas, extending the context path as they descend.
    pub fn walk(
        &mut self,
        schema: &Value,
        instance: &Value,
        ctx: &mut Context,
    ) -> Result<(), Error> {
        let Some(map) = schema.as_object() else {
            // Nothing to dispatch on a non-object schema node; the resolver
            // guarantees reference targets are objects, so this only occurs
            // for malformed inline sub-schemas already flagged upstream.
            return Ok(());
        };

        // A reference node stands for its target; resolve and walk that
        // instead. The guard keys on (pointer, instance path): re-entering
        // the same pointer without having descended in the instance is a
        // cycle, while recursive schemas over finite instances progress and
        // pass.
        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            self.resolver.enter_ref(reference, &ctx.pointer())?;
            let result = self
                .resolver
                .resolve(reference)
                .map_err(Error::from)
                .and_then(|target| self.walk(&target, instance, ctx));
            self.resolver.leave_ref();
            return result;
        }

        let ty = primitive_type_of(instance);
        let constraints = self.registry.constraints_for_type(&self.version, ty)?;

        for constraint in constraints.iter() {
            if !self.schema_triggers(constraint, map) {
                continue;
            }
            if constraint.normalize(map, ctx, self)? {
                constraint.apply(instance, map, ctx, self)?;
            }
        }

        Ok(())
    }

    fn schema_triggers(
        &self,
        constraint: &Constraint,
        map: &serde_json::Map<String, Value>,
    ) -> bool {
        constraint.keywords().iter().any(|k| map.contains_key(*k))
    }
}
