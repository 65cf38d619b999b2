//! ## Crate layout
//! - `core`: registries, instances, coercion, attribute adapter, storage
//!   strategies, validation pass, configuration, and observability.
//!
//! Enum types are declared with `classy_enum!` and bound to host record
//! fields with `EnumAttr`. The `prelude` carries everything a host needs.

pub use classenum_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use classenum_core::{Error, classy_enum};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        classy_enum,
        core::{
            attribute::{EnumAttr, EnumCache, HostRecord, RawAttributes},
            coerce::{AttributePolicy, Input},
            config::EnumConfig,
            instance::EnumInstance,
            serialize::SerializationStrategy,
            traits::{ClassyEnum, Path as _},
            validate::{Errors, FieldRule, ValidationSink, validate_into, validate_record},
        },
    };
    pub use serde::{Deserialize, Serialize};
}
