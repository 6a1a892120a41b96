//! Closed symbol table of scanned types.
//!
//! Records live in an arena indexed by [`TypeId`]. The table is built in
//! full before resolution starts; the resolver only appends synthesized
//! generic instantiations.

use crate::annotate::Annotated;
use crate::ir::{ConstRecord, TypeExpr, TypeRecord};
use std::collections::HashMap;
use tracing::debug;

/// Index of a record in the [`Registry`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

#[derive(Debug, Default)]
pub struct Registry {
    types: Vec<TypeRecord>,
    by_key: HashMap<(String, String), TypeId>,
    by_name: HashMap<String, Vec<TypeId>>,
    consts: Vec<ConstRecord>,
}

impl Registry {
    /// Build the table; a name declared twice in one package keeps the first
    pub fn build(annotated: Annotated) -> Self {
        let mut registry = Registry {
            consts: annotated.consts,
            ..Default::default()
        };

        for record in annotated.types {
            let key = (record.package.identity().to_string(), record.name.clone());
            if let Some(existing) = registry.by_key.get(&key) {
                debug!(
                    name = %record.name,
                    package = %key.0,
                    kept = %registry.types[existing.0].path.display(),
                    ignored = %record.path.display(),
                    "duplicate type declaration ignored"
                );
                continue;
            }
            registry.insert(key, record);
        }

        registry
    }

    fn insert(&mut self, key: (String, String), record: TypeRecord) -> TypeId {
        let id = TypeId(self.types.len());
        self.by_name.entry(record.name.clone()).or_default().push(id);
        self.by_key.insert(key, id);
        self.types.push(record);
        id
    }

    /// Append a resolver-made record, or return the one already under its key
    pub fn push_synthetic(&mut self, record: TypeRecord) -> TypeId {
        let key = (record.package.identity().to_string(), record.name.clone());
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        self.insert(key, record)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn get(&self, id: TypeId) -> &TypeRecord {
        &self.types[id.0]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeRecord {
        &mut self.types[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + use<> {
        (0..self.types.len()).map(TypeId)
    }

    pub fn records(&self) -> &[TypeRecord] {
        &self.types
    }

    pub fn consts(&self) -> &[ConstRecord] {
        &self.consts
    }

    /// Find `name` in `package`.
    ///
    /// Falls back to a record whose package name equals the last segment of
    /// `package`, for packages scanned without a `go.mod`.
    pub fn lookup(&self, package: &str, name: &str) -> Option<TypeId> {
        if let Some(&id) = self.by_key.get(&(package.to_string(), name.to_string())) {
            return Some(id);
        }
        let last_segment = package.rsplit('/').next().unwrap_or(package);
        self.by_name.get(name)?.iter().copied().find(|id| {
            let record_package = &self.types[id.0].package;
            record_package.import_path.is_none() && record_package.name == last_segment
        })
    }

    /// Record a named type expression refers to (pointers stripped)
    pub fn resolve(&self, ty: &TypeExpr) -> Option<TypeId> {
        match ty.pointee() {
            TypeExpr::Named {
                package: Some(package),
                name,
                ..
            } => self.lookup(package, name),
            _ => None,
        }
    }
}
