use crate::registry::VariantRegistry;
use std::{fmt::Debug, hash::Hash};

///
/// Path
/// Stable enum type identifier.
///
/// Used to tag structured values and to key metrics, so it SHOULD remain
/// unchanged across Rust-level renames when persisted data must stay readable.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// ClassyEnum
///
/// A closed, ordered set of variants where each Rust enum case is the
/// behavior unit of one variant.
///
/// ## Contract
/// - `registry()` returns the same frozen registry on every call
/// - every case of `Self` is registered exactly once
///
/// Implementations are normally generated by `classy_enum!`.
///

pub trait ClassyEnum: Path + Copy + Debug + Eq + Hash + Send + Sync + 'static {
    fn registry() -> &'static VariantRegistry<Self>;
}
