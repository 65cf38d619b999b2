//! Binding between a host record's raw storage slot and a typed enum value.
//!
//! The host owns persistence. This module only needs to read and write a raw
//! string slot and, for owner-aware reads, a per-record `EnumCache`.

mod cache;

pub use cache::EnumCache;

use crate::{
    coerce::{AttributePolicy, CoercionError, Input, coerce},
    config::{AttributeOptions, ConfigError},
    instance::EnumInstance,
    obs::sink::{self, MetricsEvent},
    traits::ClassyEnum,
    validate::{FieldError, FieldRule},
};
use std::{any::Any, cell::RefCell, fmt, marker::PhantomData, rc::Rc};

///
/// RawAttributes
///
/// The host's raw storage slots. Values are plain strings; `None` is absent.
///

pub trait RawAttributes {
    fn raw_attribute(&self, field: &str) -> Option<&str>;
    fn set_raw_attribute(&mut self, field: &str, value: Option<String>);
}

///
/// HostRecord
///
/// A record that can own enum instances: raw slots plus a resolved-value cache.
/// Owner-aware reads go through `Rc<RefCell<Self>>`.
///

pub trait HostRecord: RawAttributes + Any {
    fn enum_cache(&mut self) -> &mut EnumCache;
}

///
/// EnumAttr
///
/// Declares that `field` of a host record holds a value of enum type `E`.
/// Declared once per host type and field, usually as an associated const.
///

pub struct EnumAttr<E: ClassyEnum> {
    field: &'static str,
    policy: AttributePolicy,
    _marker: PhantomData<fn() -> E>,
}

impl<E: ClassyEnum> EnumAttr<E> {
    #[must_use]
    pub const fn new(field: &'static str) -> Self {
        Self::with_policy(field, AttributePolicy::STRICT)
    }

    #[must_use]
    pub const fn with_policy(field: &'static str, policy: AttributePolicy) -> Self {
        Self {
            field,
            policy,
            _marker: PhantomData,
        }
    }

    /// Bind from configured options, checking that any configured enum path
    /// names `E`.
    pub fn from_options(
        field: &'static str,
        options: &AttributeOptions,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = &options.enum_path
            && path != E::PATH
        {
            return Err(ConfigError::EnumMismatch {
                field: field.to_string(),
                expected: E::PATH,
                found: path.clone(),
            });
        }

        Ok(Self::with_policy(field, options.policy()))
    }

    #[must_use]
    pub const fn allow_blank(self) -> Self {
        Self::with_policy(self.field, self.policy.allow_blank())
    }

    #[must_use]
    pub const fn allow_nil(self) -> Self {
        Self::with_policy(self.field, self.policy.allow_nil())
    }

    #[must_use]
    pub const fn serialize_as_json(self) -> Self {
        Self::with_policy(self.field, self.policy.serialize_as_json())
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub const fn policy(&self) -> &AttributePolicy {
        &self.policy
    }

    /// The raw stored value, exactly as the host holds it.
    #[must_use]
    pub fn raw<'a, H: RawAttributes>(&self, host: &'a H) -> Option<&'a str> {
        host.raw_attribute(self.field)
    }

    // resolve
    // decode the raw slot and coerce it under this attribute's policy
    fn resolve(&self, raw: Option<&str>) -> Result<Option<EnumInstance<E>>, CoercionError> {
        let input = self.policy.strategy().decode::<E>(raw)?;

        coerce(input, &self.policy)
    }

    ///
    /// read
    ///
    /// Resolve the field on a shared record, attach the record as owner, and
    /// cache the result. Repeated reads through this binding return the same
    /// `Rc` until the raw slot changes.
    ///
    /// Panics if `host` is borrowed elsewhere, shared or mutably.
    ///
    pub fn read<H: HostRecord>(
        &self,
        host: &Rc<RefCell<H>>,
    ) -> Result<Option<Rc<EnumInstance<E>>>, CoercionError> {
        let mut record = host.borrow_mut();
        let raw = record.raw_attribute(self.field).map(str::to_string);

        if let Some(hit) = record
            .enum_cache()
            .get::<E>(self.field, raw.as_deref(), &self.policy)
        {
            tracing::trace!(field = self.field, enum_path = E::PATH, "enum cache hit");
            sink::record(MetricsEvent::CacheHit { enum_path: E::PATH });

            return Ok(Some(hit));
        }
        sink::record(MetricsEvent::CacheMiss { enum_path: E::PATH });

        let Some(mut instance) = self.resolve(raw.as_deref())? else {
            record.enum_cache().invalidate(self.field);
            return Ok(None);
        };

        instance.attach_owner(host);
        let instance = Rc::new(instance);
        record
            .enum_cache()
            .insert(self.field, raw, self.policy, Rc::clone(&instance));

        Ok(Some(instance))
    }

    /// Resolve the field without attaching an owner or touching the cache.
    pub fn read_detached<H: RawAttributes>(
        &self,
        host: &H,
    ) -> Result<Option<EnumInstance<E>>, CoercionError> {
        self.resolve(host.raw_attribute(self.field))
    }

    ///
    /// write
    ///
    /// Assign `input` to the field. Never fails: a value that does not coerce
    /// is stored exactly as given and reported by the validation pass.
    ///
    pub fn write<H: HostRecord>(&self, host: &mut H, input: impl Into<Input<E>>) {
        let input = input.into();
        let original = input.raw_text();

        let (raw, accepted) = match coerce(input, &self.policy) {
            Ok(Some(instance)) => (Some(self.policy.strategy().encode(&instance)), true),
            Ok(None) => (None, true),
            Err(err) => {
                tracing::debug!(
                    field = self.field,
                    enum_path = E::PATH,
                    error = %err,
                    "enum assignment rejected; deferred to validation"
                );
                (original, false)
            }
        };

        host.set_raw_attribute(self.field, raw);
        host.enum_cache().invalidate(self.field);

        sink::record(MetricsEvent::Write {
            enum_path: E::PATH,
            field: self.field,
            accepted,
        });
    }

    /// `write` through a shared record handle.
    pub fn assign<H: HostRecord>(&self, host: &Rc<RefCell<H>>, input: impl Into<Input<E>>) {
        self.write(&mut *host.borrow_mut(), input);
    }

    /// Re-run coercion on the current raw value; at most one error per field.
    pub fn validate<H: RawAttributes>(&self, host: &H) -> Option<FieldError> {
        self.read_detached(host)
            .err()
            .map(|err| FieldError::new(self.field, &err))
    }
}

impl<E: ClassyEnum> Clone for EnumAttr<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: ClassyEnum> Copy for EnumAttr<E> {}

impl<E: ClassyEnum> fmt::Debug for EnumAttr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumAttr")
            .field("field", &self.field)
            .field("enum_path", &E::PATH)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<E, H> FieldRule<H> for EnumAttr<E>
where
    E: ClassyEnum,
    H: RawAttributes,
{
    fn field(&self) -> &'static str {
        self.field
    }

    fn check(&self, host: &H) -> Option<FieldError> {
        self.validate(host)
    }
}

///
/// TESTS
///
