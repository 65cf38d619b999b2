use crate::{coerce::AttributePolicy, instance::EnumInstance, traits::ClassyEnum};
use std::{any::Any, collections::HashMap, rc::Rc};

///
/// EnumCache
///
/// Per-record cache of resolved enum attributes, keyed by field.
///
/// Each entry remembers the raw value and the policy it was resolved under.
/// A lookup with a different raw value or policy misses, so a slot changed
/// behind the adapter's back is never served stale and two bindings of one
/// field never see each other's instances.
///

#[derive(Debug, Default)]
pub struct EnumCache {
    entries: HashMap<&'static str, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    raw: Option<String>,
    policy: AttributePolicy,
    instance: Rc<dyn Any>,
}

impl EnumCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get<E: ClassyEnum>(
        &self,
        field: &str,
        raw: Option<&str>,
        policy: &AttributePolicy,
    ) -> Option<Rc<EnumInstance<E>>> {
        let entry = self.entries.get(field)?;
        if entry.raw.as_deref() != raw || entry.policy != *policy {
            return None;
        }

        Rc::clone(&entry.instance).downcast::<EnumInstance<E>>().ok()
    }

    pub fn insert<E: ClassyEnum>(
        &mut self,
        field: &'static str,
        raw: Option<String>,
        policy: AttributePolicy,
        instance: Rc<EnumInstance<E>>,
    ) {
        self.entries.insert(
            field,
            CacheEntry {
                raw,
                policy,
                instance,
            },
        );
    }

    pub fn invalidate(&mut self, field: &str) {
        self.entries.remove(field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

///
/// TESTS
///
