use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///
/// Declaration-time failures. These are programmer errors: an enum type that
/// fails to register never becomes usable.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("enum '{path}' already declares variant '{name}'")]
    DuplicateVariant {
        path: &'static str,
        name: &'static str,
    },

    #[error("enum '{path}' is frozen; cannot register variant '{name}'")]
    RegistryFrozen {
        path: &'static str,
        name: &'static str,
    },

    #[error("enum '{path}' variant '{name}' has ordinal {ordinal}, not above {previous}")]
    OrdinalOutOfOrder {
        path: &'static str,
        name: &'static str,
        ordinal: u32,
        previous: u32,
    },

    #[error("enum '{path}' cannot register a variant with an empty name")]
    EmptyName { path: &'static str },

    #[error("enum '{path}' binds variant '{name}' to the behavior already used by '{existing}'")]
    DuplicateBehavior {
        path: &'static str,
        name: &'static str,
        existing: &'static str,
    },
}

///
/// VariantDef
///
/// One registered variant: stored name, declaration ordinal, and the enum
/// case that implements its behavior.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantDef<E> {
    name: &'static str,
    ordinal: u32,
    behavior: E,
}

impl<E: Copy> VariantDef<E> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }

    #[must_use]
    pub const fn behavior(&self) -> E {
        self.behavior
    }
}

///
/// VariantRegistry
///
/// Ordered variant definitions for a single enum type plus a name index.
/// Append-only until `freeze`, immutable afterwards.
///

#[derive(Debug)]
pub struct VariantRegistry<E> {
    path: &'static str,
    variants: Vec<VariantDef<E>>,
    index: HashMap<&'static str, usize>,
    frozen: bool,
}

impl<E> VariantRegistry<E>
where
    E: Copy + Eq,
{
    #[must_use]
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            variants: Vec::new(),
            index: HashMap::new(),
            frozen: false,
        }
    }

    /// Register, freeze, and return a registry in declaration order.
    ///
    /// Ordinals are assigned from zero.
    pub fn build(
        path: &'static str,
        variants: impl IntoIterator<Item = (&'static str, E)>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(path);
        for (name, behavior) in variants {
            registry.push(name, behavior)?;
        }

        Ok(registry.freeze())
    }

    /// Register a variant with an explicit ordinal.
    pub fn register(
        &mut self,
        name: &'static str,
        ordinal: u32,
        behavior: E,
    ) -> Result<(), RegistryError> {
        let path = self.path;

        if self.frozen {
            return Err(RegistryError::RegistryFrozen { path, name });
        }
        if name.is_empty() {
            return Err(RegistryError::EmptyName { path });
        }
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateVariant { path, name });
        }
        if let Some(existing) = self.lookup_by_behavior(behavior) {
            return Err(RegistryError::DuplicateBehavior {
                path,
                name,
                existing: existing.name,
            });
        }
        if let Some(last) = self.variants.last()
            && ordinal <= last.ordinal
        {
            return Err(RegistryError::OrdinalOutOfOrder {
                path,
                name,
                ordinal,
                previous: last.ordinal,
            });
        }

        self.index.insert(name, self.variants.len());
        self.variants.push(VariantDef {
            name,
            ordinal,
            behavior,
        });

        Ok(())
    }

    /// Register a variant with the next ordinal in sequence.
    pub fn push(&mut self, name: &'static str, behavior: E) -> Result<(), RegistryError> {
        let ordinal = match self.variants.last() {
            None => 0,
            Some(last) => {
                let Some(next) = last.ordinal.checked_add(1) else {
                    return Err(RegistryError::OrdinalOutOfOrder {
                        path: self.path,
                        name,
                        ordinal: last.ordinal,
                        previous: last.ordinal,
                    });
                };

                next
            }
        };

        self.register(name, ordinal, behavior)
    }

    #[must_use]
    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&VariantDef<E>> {
        self.index.get(name).map(|&i| &self.variants[i])
    }

    #[must_use]
    pub fn lookup_by_behavior(&self, behavior: E) -> Option<&VariantDef<E>> {
        self.variants.iter().find(|def| def.behavior == behavior)
    }

    #[must_use]
    pub fn ordinal_of(&self, name: &str) -> Option<u32> {
        self.lookup_by_name(name).map(VariantDef::ordinal)
    }

    /// Position of `name` in declaration order.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All variants in declaration order.
    pub fn all(&self) -> std::slice::Iter<'_, VariantDef<E>> {
        self.variants.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().map(|def| def.name)
    }

    #[must_use]
    pub fn first(&self) -> Option<&VariantDef<E>> {
        self.variants.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&VariantDef<E>> {
        self.variants.last()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

///
/// TESTS
///
