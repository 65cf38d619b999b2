//! Attribute declarations loaded from TOML.
//!
//! ```toml
//! [dog.breed]
//! enum = "Breed"
//! allow_blank = true
//!
//! [cat.breed]
//! enum = "CatBreed"
//! serialize_as_json = true
//! ```

use crate::{attribute::EnumAttr, coerce::AttributePolicy, traits::ClassyEnum};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read enum config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse enum config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("field '{field}' is declared as {found}, not {expected}")]
    EnumMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("no enum attribute '{field}' declared for '{host}'")]
    MissingAttribute { host: String, field: String },
}

///
/// AttributeOptions
///
/// One `[host.field]` table.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributeOptions {
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_path: Option<String>,
    pub allow_blank: bool,
    pub allow_nil: bool,
    pub serialize_as_json: bool,
}

impl AttributeOptions {
    #[must_use]
    pub const fn policy(&self) -> AttributePolicy {
        AttributePolicy {
            allow_blank: self.allow_blank,
            allow_nil: self.allow_nil,
            serialize_as_json: self.serialize_as_json,
        }
    }
}

///
/// EnumConfig
///
/// Host name to field name to options.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnumConfig {
    hosts: BTreeMap<String, BTreeMap<String, AttributeOptions>>,
}

impl EnumConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        tracing::debug!(hosts = config.hosts.len(), "loaded enum config");

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("loading enum config from {}", path.display());

        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    #[must_use]
    pub fn options(&self, host: &str, field: &str) -> Option<&AttributeOptions> {
        self.hosts.get(host)?.get(field)
    }

    /// Bind `field` of `host` as an attribute of `E`.
    pub fn attribute<E: ClassyEnum>(
        &self,
        host: &str,
        field: &'static str,
    ) -> Result<EnumAttr<E>, ConfigError> {
        let options = self
            .options(host, field)
            .ok_or_else(|| ConfigError::MissingAttribute {
                host: host.to_string(),
                field: field.to_string(),
            })?;

        EnumAttr::from_options(field, options)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }
}

///
/// TESTS
///
