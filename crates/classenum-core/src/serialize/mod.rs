mod json;

use crate::{
    coerce::{CoercionError, Input},
    instance::EnumInstance,
    traits::ClassyEnum,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;

/// Upper bound on a structured slot accepted for decoding.
pub const MAX_TAGGED_BYTES: usize = 1024;

///
/// SerializeError
///
/// Why a structured slot could not be read back as a `TaggedVariant`.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SerializeError {
    #[error("malformed tagged value: {0}")]
    Malformed(String),

    #[error("tagged value is {len} bytes, limit is {max_bytes}")]
    SizeLimitExceeded { len: usize, max_bytes: usize },
}

///
/// TaggedVariant
///
/// Structured storage form: the variant name plus the path of the enum type
/// it belongs to, so a slot decodes to the exact variant regardless of the
/// field it lives in.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedVariant {
    pub path: String,
    pub variant: String,
}

impl TaggedVariant {
    #[must_use]
    pub fn new(path: &str, variant: &str) -> Self {
        Self {
            path: path.to_string(),
            variant: variant.to_string(),
        }
    }

    /// Parse a structured slot.
    pub fn parse(text: &str) -> Result<Self, SerializeError> {
        json::deserialize(text, MAX_TAGGED_BYTES)
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        json!({ "path": self.path, "variant": self.variant }).to_string()
    }
}

///
/// SerializationStrategy
///
/// How a resolved variant is written into its raw slot.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializationStrategy {
    /// Bare canonical name, e.g. `golden_retriever`.
    #[default]
    #[display("plain")]
    Plain,

    /// JSON object tagged with the enum path,
    /// e.g. `{"path":"Breed","variant":"golden_retriever"}`.
    #[display("structured")]
    Structured,
}

impl SerializationStrategy {
    /// Raw slot form of `instance`.
    #[must_use]
    pub fn encode<E: ClassyEnum>(self, instance: &EnumInstance<E>) -> String {
        match self {
            Self::Plain => instance.canonical_name().to_string(),
            Self::Structured => instance.to_tagged().to_json(),
        }
    }

    ///
    /// decode
    ///
    /// Turn a raw slot back into coercible input.
    ///
    /// Nil and blank slots pass through untouched so that blank/nil policy
    /// applies identically under both strategies. A structured slot that is
    /// not a tagged value of `E` (including a bare legacy name) is a
    /// `TypeMismatch` carrying the raw slot text; there is no silent fallback
    /// to plain decoding.
    ///
    pub fn decode<E: ClassyEnum>(self, raw: Option<&str>) -> Result<Input<E>, CoercionError> {
        let Some(raw) = raw else {
            return Ok(Input::Nil);
        };

        if raw.trim().is_empty() {
            return Ok(Input::Text(raw.to_string()));
        }

        match self {
            Self::Plain => Ok(Input::Text(raw.to_string())),
            Self::Structured => {
                let mismatch = || CoercionError::TypeMismatch {
                    expected: E::PATH,
                    found: raw.to_string(),
                };

                let tagged = TaggedVariant::parse(raw).map_err(|err| {
                    tracing::debug!(enum_path = E::PATH, error = %err, "structured slot rejected");
                    mismatch()
                })?;

                if tagged.path != E::PATH {
                    tracing::debug!(
                        enum_path = E::PATH,
                        found = %tagged.path,
                        "structured slot tagged with another enum"
                    );
                    return Err(mismatch());
                }

                Ok(Input::Text(tagged.variant))
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coerce::{AttributePolicy, CoercionErrorKind, coerce},
        test_fixtures::{Breed, CatBreed},
    };

    const STRATEGIES: [SerializationStrategy; 2] =
        [SerializationStrategy::Plain, SerializationStrategy::Structured];

    fn resolve<E: ClassyEnum>(
        strategy: SerializationStrategy,
        raw: Option<&str>,
        policy: &AttributePolicy,
    ) -> Result<Option<EnumInstance<E>>, CoercionError> {
        coerce(strategy.decode::<E>(raw)?, policy)
    }

    #[test]
    fn plain_stores_bare_name() {
        let golden = EnumInstance::<Breed>::of("golden_retriever").unwrap();

        assert_eq!(
            SerializationStrategy::Plain.encode(&golden),
            "golden_retriever"
        );
    }

    #[test]
    fn structured_stores_tagged_json() {
        let persian = EnumInstance::<CatBreed>::of("persian").unwrap();
        let raw = SerializationStrategy::Structured.encode(&persian);

        assert_eq!(raw, r#"{"path":"CatBreed","variant":"persian"}"#);
    }

    #[test]
    fn every_variant_round_trips_under_both_strategies() {
        for strategy in STRATEGIES {
            for variant in EnumInstance::<CatBreed>::all() {
                let raw = strategy.encode(&variant);
                let back =
                    resolve::<CatBreed>(strategy, Some(&raw), &AttributePolicy::STRICT).unwrap();

                assert_eq!(back, Some(variant), "{strategy} round trip");
            }
        }
    }

    #[test]
    fn blank_and_nil_pass_through_both_strategies() {
        let nil_only = AttributePolicy::new().allow_nil();

        for strategy in STRATEGIES {
            assert!(matches!(
                resolve::<Breed>(strategy, None, &nil_only),
                Ok(None)
            ));

            let blank = resolve::<Breed>(strategy, Some(""), &nil_only).unwrap_err();
            assert_eq!(blank.kind(), CoercionErrorKind::BlankNotAllowed);

            let nil = resolve::<Breed>(strategy, None, &AttributePolicy::STRICT).unwrap_err();
            assert_eq!(nil.kind(), CoercionErrorKind::NilNotAllowed);
        }
    }

    #[test]
    fn structured_rejects_foreign_path() {
        let raw = r#"{"path":"Breed","variant":"persian"}"#;
        let err = SerializationStrategy::Structured
            .decode::<CatBreed>(Some(raw))
            .unwrap_err();

        assert_eq!(
            err,
            CoercionError::TypeMismatch {
                expected: "CatBreed",
                found: raw.to_string(),
            }
        );
    }

    #[test]
    fn structured_rejects_legacy_plain_name() {
        let err = SerializationStrategy::Structured
            .decode::<CatBreed>(Some("persian"))
            .unwrap_err();

        assert_eq!(err.kind(), CoercionErrorKind::TypeMismatch);
        assert_eq!(err.input(), Some("persian"));
        assert_eq!(err.to_string(), "'persian' is not a valid CatBreed");
        assert!(matches!(
            TaggedVariant::parse("persian"),
            Err(SerializeError::Malformed(_))
        ));
    }

    #[test]
    fn structured_unknown_variant_is_reported_as_unknown() {
        let raw = r#"{"path":"CatBreed","variant":"sphynx"}"#;
        let err = resolve::<CatBreed>(
            SerializationStrategy::Structured,
            Some(raw),
            &AttributePolicy::STRICT,
        )
        .unwrap_err();

        assert_eq!(err.kind(), CoercionErrorKind::UnknownVariant);
    }

    #[test]
    fn oversized_slot_is_rejected_before_parsing() {
        let raw = format!(
            r#"{{"path":"CatBreed","variant":"{}"}}"#,
            "x".repeat(MAX_TAGGED_BYTES)
        );
        let err = TaggedVariant::parse(&raw).unwrap_err();

        assert_eq!(
            err,
            SerializeError::SizeLimitExceeded {
                len: raw.len(),
                max_bytes: MAX_TAGGED_BYTES,
            }
        );
    }

    #[test]
    fn strategy_names() {
        assert_eq!(SerializationStrategy::Plain.to_string(), "plain");
        assert_eq!(SerializationStrategy::Structured.to_string(), "structured");
        assert_eq!(
            SerializationStrategy::default(),
            SerializationStrategy::Plain
        );
    }
}
