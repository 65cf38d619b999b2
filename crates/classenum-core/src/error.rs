use crate::{
    coerce::CoercionError, config::ConfigError, registry::RegistryError,
    serialize::SerializeError, validate::ValidateError,
};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level umbrella over the per-module errors.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Registry(_) => ErrorOrigin::Registry,
            Self::Coercion(_) => ErrorOrigin::Coercion,
            Self::Serialize(_) => ErrorOrigin::Serialize,
            Self::Validate(_) => ErrorOrigin::Validate,
            Self::Config(_) => ErrorOrigin::Config,
        }
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    #[display("registry")]
    Registry,
    #[display("coercion")]
    Coercion,
    #[display("serialize")]
    Serialize,
    #[display("validate")]
    Validate,
    #[display("config")]
    Config,
}

///
/// TESTS
///
