//! Core runtime for classenum: variant registries, enum instances, coercion,
//! the attribute adapter, storage strategies, and the validation pass.
#![warn(unreachable_pub)]

#[macro_use]
mod macros;

// public exports are one module level down
pub mod attribute;
pub mod coerce;
pub mod config;
pub mod error;
pub mod instance;
pub mod obs;
pub mod registry;
pub mod serialize;
pub mod traits;
pub mod validate;

pub use error::Error;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Domain vocabulary for declaring enums and binding them to host records.
/// Errors and metrics stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        attribute::{EnumAttr, EnumCache, HostRecord, RawAttributes},
        coerce::{AttributePolicy, Input},
        instance::EnumInstance,
        traits::{ClassyEnum, Path as _},
        validate::{Errors, FieldRule, ValidationSink},
    };
}
