use crate::{registry::VariantDef, serialize::TaggedVariant, traits::ClassyEnum};
use convert_case::{Case, Casing};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    any::Any,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    rc::{Rc, Weak},
};

///
/// EnumInstance
///
/// A live value of one variant of `E`.
///
/// The variant always comes from `E::registry()`, so an instance can never
/// point at a foreign variant. Equality, ordering and hashing consider only
/// the variant; the owner back-reference and the blank flag are ignored.
///

#[derive(Clone)]
pub struct EnumInstance<E: ClassyEnum> {
    def: &'static VariantDef<E>,
    owner: Option<Weak<dyn Any>>,
    allow_blank: bool,
}

impl<E: ClassyEnum> EnumInstance<E> {
    const fn from_def(def: &'static VariantDef<E>) -> Self {
        Self {
            def,
            owner: None,
            allow_blank: false,
        }
    }

    /// Look up a variant by its stored name.
    #[must_use]
    pub fn of(name: &str) -> Option<Self> {
        E::registry().lookup_by_name(name).map(Self::from_def)
    }

    #[must_use]
    pub fn from_variant(variant: E) -> Option<Self> {
        E::registry().lookup_by_behavior(variant).map(Self::from_def)
    }

    /// Every variant of `E`, in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        E::registry().all().map(Self::from_def)
    }

    #[must_use]
    pub(crate) fn with_allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    /// Stored name of the variant, used for persistence.
    #[must_use]
    pub const fn canonical_name(&self) -> &'static str {
        self.def.name()
    }

    /// Human-readable label, e.g. "Golden retriever".
    #[must_use]
    pub fn text(&self) -> String {
        self.def.name().to_case(Case::Sentence)
    }

    /// The enum case implementing this variant.
    #[must_use]
    pub const fn behavior(&self) -> E {
        self.def.behavior()
    }

    #[must_use]
    pub fn is(&self, variant: E) -> bool {
        self.def.behavior() == variant
    }

    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.def.ordinal()
    }

    /// Zero-based position in declaration order.
    #[must_use]
    pub fn index(&self) -> usize {
        E::registry()
            .position_of(self.def.name())
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        E::PATH
    }

    #[must_use]
    pub const fn allow_blank(&self) -> bool {
        self.allow_blank
    }

    ///
    /// attach_owner
    ///
    /// Point this instance back at the record it belongs to. The link is
    /// weak and never keeps the owner alive; attaching again replaces it.
    ///
    pub fn attach_owner<T: Any>(&mut self, owner: &Rc<T>) {
        let weak = Rc::downgrade(owner) as Weak<dyn Any>;
        self.owner = Some(weak);
    }

    /// Resolve the owner as `T`, if one is attached, alive, and of that type.
    #[must_use]
    pub fn owner<T: Any>(&self) -> Option<Rc<T>> {
        self.owner.as_ref()?.upgrade()?.downcast::<T>().ok()
    }

    #[must_use]
    pub fn has_owner(&self) -> bool {
        self.owner
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Label/value pairs for a picker, led by a blank entry when blanks are
    /// allowed.
    #[must_use]
    pub fn select_options(&self) -> Vec<(String, &'static str)> {
        let blank = self.allow_blank.then(|| (String::new(), ""));
        let labels = Self::all().map(|option| option.select_option());

        blank.into_iter().chain(labels).collect()
    }

    fn select_option(&self) -> (String, &'static str) {
        (self.text(), self.canonical_name())
    }

    #[must_use]
    pub fn to_tagged(&self) -> TaggedVariant {
        TaggedVariant::new(E::PATH, self.def.name())
    }
}

impl<E: ClassyEnum> fmt::Display for EnumInstance<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.def.name().to_case(Case::Pascal))
    }
}

impl<E: ClassyEnum> fmt::Debug for EnumInstance<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInstance")
            .field("path", &E::PATH)
            .field("variant", &self.def.name())
            .field("has_owner", &self.has_owner())
            .field("allow_blank", &self.allow_blank)
            .finish()
    }
}

impl<E: ClassyEnum> PartialEq for EnumInstance<E> {
    fn eq(&self, other: &Self) -> bool {
        self.def.behavior() == other.def.behavior()
    }
}

impl<E: ClassyEnum> Eq for EnumInstance<E> {}

impl<E: ClassyEnum> PartialEq<E> for EnumInstance<E> {
    fn eq(&self, other: &E) -> bool {
        self.def.behavior() == *other
    }
}

impl<E: ClassyEnum> PartialOrd for EnumInstance<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: ClassyEnum> Ord for EnumInstance<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.def.ordinal().cmp(&other.def.ordinal())
    }
}

impl<E: ClassyEnum> Hash for EnumInstance<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        E::PATH.hash(state);
        self.def.name().hash(state);
    }
}

impl<E: ClassyEnum> Serialize for EnumInstance<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.def.name())
    }
}

impl<'de, E: ClassyEnum> Deserialize<'de> for EnumInstance<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;

        Self::of(&name).ok_or_else(|| {
            de::Error::custom(format!("'{name}' is not a valid {}", E::PATH))
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{Breed, Cat, CatBreed};
    use std::{cell::RefCell, collections::HashSet};

    fn breed(name: &str) -> EnumInstance<Breed> {
        EnumInstance::of(name).expect("breed should exist")
    }

    #[test]
    fn of_resolves_registered_names_only() {
        assert_eq!(breed("snoop").behavior(), Breed::Snoop);
        assert!(EnumInstance::<Breed>::of("fake_breed").is_none());
        assert!(EnumInstance::<Breed>::of("").is_none());
    }

    #[test]
    fn names_and_labels() {
        let golden = breed("golden_retriever");

        assert_eq!(golden.canonical_name(), "golden_retriever");
        assert_eq!(golden.to_string(), "GoldenRetriever");
        assert_eq!(golden.text(), "Golden retriever");
        assert_eq!(golden.path(), "Breed");
        assert_eq!(golden.ordinal(), 0);
        assert_eq!(breed("husky").index(), 2);
    }

    #[test]
    fn equality_ignores_owner_and_blank_flag() {
        let cat = Rc::new(RefCell::new(Cat::new("black")));
        let mut owned = breed("husky").with_allow_blank(true);
        owned.attach_owner(&cat);

        assert_eq!(owned, breed("husky"));
        assert_eq!(owned, Breed::Husky);
        assert_ne!(owned, breed("snoop"));

        let set: HashSet<_> = [owned, breed("husky")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ordering_follows_declaration() {
        let mut all: Vec<_> = EnumInstance::<Breed>::all().collect();
        all.reverse();
        all.sort();

        assert_eq!(
            all.iter().map(EnumInstance::canonical_name).collect::<Vec<_>>(),
            vec!["golden_retriever", "snoop", "husky"]
        );
        assert!(breed("golden_retriever") < breed("husky"));
    }

    #[test]
    fn owner_is_weak_and_last_write_wins() {
        let first = Rc::new(RefCell::new(Cat::new("black")));
        let second = Rc::new(RefCell::new(Cat::new("white")));

        let mut persian = EnumInstance::<CatBreed>::of("persian").unwrap();
        assert!(!persian.has_owner());

        persian.attach_owner(&first);
        persian.attach_owner(&second);

        let owner = persian.owner::<RefCell<Cat>>().expect("owner attached");
        assert!(Rc::ptr_eq(&owner, &second));
        assert_eq!(Rc::strong_count(&second), 2);
        drop(owner);

        // wrong type yields nothing
        assert!(persian.owner::<String>().is_none());

        drop(second);
        assert!(!persian.has_owner());
        assert!(persian.owner::<RefCell<Cat>>().is_none());
    }

    #[test]
    fn select_options_include_blank_only_when_allowed() {
        let strict = breed("snoop");
        let lenient = breed("snoop").with_allow_blank(true);

        assert_eq!(strict.select_options().len(), 3);
        assert_eq!(
            lenient.select_options(),
            vec![
                (String::new(), ""),
                ("Golden retriever".to_string(), "golden_retriever"),
                ("Snoop".to_string(), "snoop"),
                ("Husky".to_string(), "husky"),
            ]
        );
    }

    #[test]
    fn serde_uses_canonical_name() {
        let json = serde_json::to_string(&breed("golden_retriever")).unwrap();
        assert_eq!(json, "\"golden_retriever\"");

        let back: EnumInstance<Breed> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Breed::GoldenRetriever);

        let err = serde_json::from_str::<EnumInstance<Breed>>("\"poodle\"").unwrap_err();
        assert!(err.to_string().contains("'poodle' is not a valid Breed"));
    }

    #[test]
    fn tagged_form_carries_path() {
        let tagged = breed("snoop").to_tagged();

        assert_eq!(tagged.path, "Breed");
        assert_eq!(tagged.variant, "snoop");
    }
}
