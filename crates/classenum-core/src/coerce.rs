use crate::{
    instance::EnumInstance,
    obs::sink::{self, MetricsEvent},
    serialize::SerializationStrategy,
    traits::ClassyEnum,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// CoercionError
///
/// Recoverable failures turning raw input into a variant. These are never
/// raised from attribute assignment; they surface through reads and the
/// validation pass.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CoercionError {
    #[error("'{input}' is not a valid {path}")]
    UnknownVariant { path: &'static str, input: String },

    #[error("{path} can't be blank")]
    BlankNotAllowed { path: &'static str, input: String },

    #[error("{path} can't be nil")]
    NilNotAllowed { path: &'static str },

    /// A structured slot that is not a tagged value of the expected enum.
    /// `found` is the raw slot text.
    #[error("'{found}' is not a valid {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
}

impl CoercionError {
    #[must_use]
    pub const fn kind(&self) -> CoercionErrorKind {
        match self {
            Self::UnknownVariant { .. } => CoercionErrorKind::UnknownVariant,
            Self::BlankNotAllowed { .. } => CoercionErrorKind::BlankNotAllowed,
            Self::NilNotAllowed { .. } => CoercionErrorKind::NilNotAllowed,
            Self::TypeMismatch { .. } => CoercionErrorKind::TypeMismatch,
        }
    }

    /// The offending raw text, when there was one.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::UnknownVariant { input, .. } | Self::BlankNotAllowed { input, .. } => {
                Some(input)
            }
            Self::TypeMismatch { found, .. } => Some(found),
            Self::NilNotAllowed { .. } => None,
        }
    }
}

///
/// CoercionErrorKind
///
/// Stable error-kind taxonomy for coercion failures.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CoercionErrorKind {
    UnknownVariant,
    BlankNotAllowed,
    NilNotAllowed,
    TypeMismatch,
}

impl CoercionErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownVariant => "unknown_variant",
            Self::BlankNotAllowed => "blank_not_allowed",
            Self::NilNotAllowed => "nil_not_allowed",
            Self::TypeMismatch => "type_mismatch",
        }
    }
}

impl fmt::Display for CoercionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// AttributePolicy
///
/// Blank/nil tolerance and storage form of one enum attribute.
///
/// `allow_nil` lets an absent value stay absent. `allow_blank` lets an empty
/// string resolve to no variant, and since nil is blank it tolerates nil too.
/// With neither set, nil and blank are both failures.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default)]
pub struct AttributePolicy {
    pub allow_blank: bool,
    pub allow_nil: bool,
    pub serialize_as_json: bool,
}

impl AttributePolicy {
    pub const STRICT: Self = Self::new();

    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_blank: false,
            allow_nil: false,
            serialize_as_json: false,
        }
    }

    #[must_use]
    pub const fn allow_blank(self) -> Self {
        Self {
            allow_blank: true,
            ..self
        }
    }

    #[must_use]
    pub const fn allow_nil(self) -> Self {
        Self {
            allow_nil: true,
            ..self
        }
    }

    #[must_use]
    pub const fn serialize_as_json(self) -> Self {
        Self {
            serialize_as_json: true,
            ..self
        }
    }

    #[must_use]
    pub const fn tolerates_nil(&self) -> bool {
        self.allow_nil || self.allow_blank
    }

    /// Blank flag stamped onto instances resolved under this policy.
    #[must_use]
    pub const fn instance_allow_blank(&self) -> bool {
        self.allow_blank || self.allow_nil
    }

    #[must_use]
    pub const fn strategy(&self) -> SerializationStrategy {
        if self.serialize_as_json {
            SerializationStrategy::Structured
        } else {
            SerializationStrategy::Plain
        }
    }
}

///
/// Input
///
/// Anything that may be assigned to an enum attribute.
/// `Variant` is the symbolic form; `Text` covers stored names and form input.
///

#[derive(Clone, Debug)]
pub enum Input<E: ClassyEnum> {
    Nil,
    Text(String),
    Variant(E),
    Instance(EnumInstance<E>),
}

impl<E: ClassyEnum> Input<E> {
    /// The raw text preserved in the slot when this input fails to coerce.
    #[must_use]
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Self::Nil => None,
            Self::Text(text) => Some(text.clone()),
            Self::Variant(variant) => E::registry()
                .lookup_by_behavior(*variant)
                .map(|def| def.name().to_string()),
            Self::Instance(instance) => Some(instance.canonical_name().to_string()),
        }
    }
}

impl<E: ClassyEnum> From<&str> for Input<E> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<E: ClassyEnum> From<String> for Input<E> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<E: ClassyEnum> From<Option<&str>> for Input<E> {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Self::Nil, Into::into)
    }
}

impl<E: ClassyEnum> From<Option<String>> for Input<E> {
    fn from(text: Option<String>) -> Self {
        text.map_or(Self::Nil, Self::Text)
    }
}

impl<E: ClassyEnum> From<E> for Input<E> {
    fn from(variant: E) -> Self {
        Self::Variant(variant)
    }
}

impl<E: ClassyEnum> From<Option<E>> for Input<E> {
    fn from(variant: Option<E>) -> Self {
        variant.map_or(Self::Nil, Self::Variant)
    }
}

impl<E: ClassyEnum> From<EnumInstance<E>> for Input<E> {
    fn from(instance: EnumInstance<E>) -> Self {
        Self::Instance(instance)
    }
}

impl<E: ClassyEnum> From<&EnumInstance<E>> for Input<E> {
    fn from(instance: &EnumInstance<E>) -> Self {
        Self::Instance(instance.clone())
    }
}

///
/// coerce
///
/// Resolve `input` into a variant of `E` under `policy`.
///
/// `Ok(None)` is a tolerated absence (nil or blank); an existing instance is
/// returned untouched, owner included.
///
pub fn coerce<E: ClassyEnum>(
    input: impl Into<Input<E>>,
    policy: &AttributePolicy,
) -> Result<Option<EnumInstance<E>>, CoercionError> {
    let allow_blank = policy.instance_allow_blank();
    let result = match input.into() {
        Input::Instance(instance) => Ok(Some(instance)),
        Input::Variant(variant) => EnumInstance::from_variant(variant)
            .map(|instance| Some(instance.with_allow_blank(allow_blank)))
            .ok_or_else(|| CoercionError::UnknownVariant {
                path: E::PATH,
                input: format!("{variant:?}"),
            }),
        Input::Text(text) => coerce_text(text, policy),
        Input::Nil if policy.tolerates_nil() => Ok(None),
        Input::Nil => Err(CoercionError::NilNotAllowed { path: E::PATH }),
    };

    match &result {
        Ok(_) => sink::record(MetricsEvent::Coerced { enum_path: E::PATH }),
        Err(err) => sink::record(MetricsEvent::Rejected {
            enum_path: E::PATH,
            kind: err.kind(),
        }),
    }

    result
}

// coerce_text
fn coerce_text<E: ClassyEnum>(
    text: String,
    policy: &AttributePolicy,
) -> Result<Option<EnumInstance<E>>, CoercionError> {
    if text.trim().is_empty() {
        return if policy.allow_blank {
            Ok(None)
        } else {
            Err(CoercionError::BlankNotAllowed {
                path: E::PATH,
                input: text,
            })
        };
    }

    let allow_blank = policy.instance_allow_blank();
    match EnumInstance::of(&text) {
        Some(instance) => Ok(Some(instance.with_allow_blank(allow_blank))),
        None => Err(CoercionError::UnknownVariant {
            path: E::PATH,
            input: text,
        }),
    }
}

///
/// TESTS
///
