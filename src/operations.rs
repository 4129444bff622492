use std::collections::{BTreeSet, HashMap};

use crate::routes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Authenticated,
}

/// OperationDescriptor
///
/// Static admission metadata for one named operation. A non-empty
/// `required_roles` always comes with `Visibility::Authenticated`; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    name: &'static str,
    visibility: Visibility,
    required_roles: BTreeSet<String>,
}

impl OperationDescriptor {
    pub fn public(name: &'static str) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            required_roles: BTreeSet::new(),
        }
    }

    /// Any verified identity is admitted.
    pub fn authenticated(name: &'static str) -> Self {
        Self {
            name,
            visibility: Visibility::Authenticated,
            required_roles: BTreeSet::new(),
        }
    }

    /// A verified identity holding one of `roles` is admitted.
    pub fn restricted<I, R>(name: &'static str, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            name,
            visibility: Visibility::Authenticated,
            required_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn required_roles(&self) -> &BTreeSet<String> {
        &self.required_roles
    }
}

/// OperationRegistry
///
/// The operation table, built once at startup and consulted before dispatch.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    descriptors: HashMap<&'static str, OperationDescriptor>,
}

impl OperationRegistry {
    pub fn new(descriptors: impl IntoIterator<Item = OperationDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().map(|d| (d.name, d)).collect(),
        }
    }

    /// The full API surface, assembled from the public, authenticated and
    /// admin tiers.
    pub fn standard() -> Self {
        Self::new(routes::operation_table())
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.descriptors.get(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
