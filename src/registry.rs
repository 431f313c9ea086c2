//! Version-keyed constraint catalog with lazy, idempotent caches.
//!
//! Both recognized version identifiers currently resolve to the same built-in
//! catalog, but they are cached under independent keys so behavior may
//! diverge per version later without an interface change. Schemas mixing
//! several versions within one document tree are unsupported.

use crate::constraint::Constraint;
use crate::error::RegistryError;
use crate::primitives::PrimitiveType;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// The unversioned "current" specification identifier.
pub const VERSION_CURRENT: &str = "http://json-schema.org/schema#";

/// The draft-06 specification identifier.
pub const VERSION_DRAFT_6: &str = "http://json-schema.org/draft-06/schema#";

/// The built-in constraint catalog, in registration order. The order is
/// stable across calls; application order has no observable effect since
/// violations accumulate rather than short-circuit.
const BUILT_IN: &[Constraint] = &[
    Constraint::Maximum,
    Constraint::Minimum,
    Constraint::ExclusiveMaximum,
    Constraint::ExclusiveMinimum,
    Constraint::MaxLength,
    Constraint::MinLength,
    Constraint::Pattern,
    Constraint::Items,
    Constraint::MaxItems,
    Constraint::MinItems,
    Constraint::UniqueItems,
    Constraint::Required,
    Constraint::Properties,
    Constraint::Dependencies,
    Constraint::Enum,
    Constraint::Type,
    Constraint::Format,
    Constraint::MultipleOf,
    Constraint::MinProperties,
    Constraint::MaxProperties,
    Constraint::AllOf,
    Constraint::AnyOf,
    Constraint::OneOf,
    Constraint::Not,
];

/// Stores and exposes validation constraints per specification version.
///
/// All caches are pure derivations of the static catalog, filled lazily on
/// first use. Concurrent first use may recompute the same entry; the result
/// is identical either way, so no stronger synchronization is needed.
#[derive(Debug, Default)]
pub struct Registry {
    constraints: RwLock<HashMap<String, Arc<[Constraint]>>>,
    for_type: RwLock<HashMap<(String, PrimitiveType), Arc<[Constraint]>>>,
    keywords: RwLock<HashMap<String, HashSet<&'static str>>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// The constraints associated with a given specification version.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if `version` is not a recognized identifier.
    pub fn constraints(&self, version: &str) -> Result<Arc<[Constraint]>, RegistryError> {
        if let Some(list) = self.constraints.read().unwrap().get(version) {
            return Ok(list.clone());
        }

        let list = Self::create_constraints(version)?;
        let mut cache = self.constraints.write().unwrap();
        Ok(cache
            .entry(version.to_string())
            .or_insert_with(|| list)
            .clone())
    }

    /// The constraints for `version` supporting instances of primitive
    /// `ty`, memoized per (version, type).
    pub fn constraints_for_type(
        &self,
        version: &str,
        ty: PrimitiveType,
    ) -> Result<Arc<[Constraint]>, RegistryError> {
        let key = (version.to_string(), ty);
        if let Some(list) = self.for_type.read().unwrap().get(&key) {
            return Ok(list.clone());
        }

        let filtered: Arc<[Constraint]> = self
            .constraints(version)?
            .iter()
            .copied()
            .filter(|c| c.supports(ty))
            .collect();
        let mut cache = self.for_type.write().unwrap();
        Ok(cache.entry(key).or_insert_with(|| filtered).clone())
    }

    /// Whether some constraint under `version` owns `keyword`.
    pub fn has_keyword(&self, version: &str, keyword: &str) -> Result<bool, RegistryError> {
        if let Some(set) = self.keywords.read().unwrap().get(version) {
            return Ok(set.contains(keyword));
        }

        let set: HashSet<&'static str> = self
            .constraints(version)?
            .iter()
            .flat_map(|c| c.keywords().iter().copied())
            .collect();
        let found = set.contains(keyword);
        self.keywords
            .write()
            .unwrap()
            .entry(version.to_string())
            .or_insert(set);
        Ok(found)
    }

    fn create_constraints(version: &str) -> Result<Arc<[Constraint]>, RegistryError> {
        match version {
            VERSION_CURRENT | VERSION_DRAFT_6 => Ok(BUILT_IN.into()),
            _ => Err(RegistryError::unsupported_version(version)),
        }
    }
}
