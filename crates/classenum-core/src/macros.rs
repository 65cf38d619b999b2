// classy_enum
/// Declare a class-style enum: one Rust enum case per variant, the stored
/// name of each case, and a frozen registry published on first use.
///
/// ```ignore
/// classy_enum! {
///     pub enum Breed {
///         GoldenRetriever => "golden_retriever",
///         Snoop => "snoop",
///         Husky => "husky",
///     }
/// }
/// ```
///
/// The type path defaults to the enum ident; `enum Breed as "pets::Breed"`
/// overrides it. A malformed declaration panics on first registry access.
#[macro_export]
macro_rules! classy_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident $(as $path:literal)? {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $stored:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::traits::Path for $name {
            const PATH: &'static str = $crate::__classy_enum_path!($name $(, $path)?);
        }

        impl $crate::traits::ClassyEnum for $name {
            fn registry() -> &'static $crate::registry::VariantRegistry<Self> {
                static REGISTRY: ::std::sync::LazyLock<$crate::registry::VariantRegistry<$name>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::registry::VariantRegistry::build(
                            <$name as $crate::traits::Path>::PATH,
                            [$(($stored, $name::$variant)),+],
                        )
                        .unwrap_or_else(|err| panic!("invalid enum declaration: {err}"))
                    });

                &REGISTRY
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __classy_enum_path {
    ($name:ident) => {
        stringify!($name)
    };
    ($name:ident, $path:literal) => {
        $path
    };
}
