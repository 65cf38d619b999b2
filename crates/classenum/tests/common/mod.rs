#![allow(dead_code)]

use classenum::prelude::*;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

classy_enum! {
    pub enum Breed {
        GoldenRetriever => "golden_retriever",
        Snoop => "snoop",
        Husky => "husky",
    }
}

classy_enum! {
    pub enum CatBreed {
        Abyssian => "abyssian",
        Bengal => "bengal",
        Birman => "birman",
        Persian => "persian",
    }
}

///
/// CatBreedExt
///

pub trait CatBreedExt {
    fn breed_color(&self) -> Option<String>;
    fn is_long_haired(&self) -> bool;
}

impl CatBreedExt for EnumInstance<CatBreed> {
    fn breed_color(&self) -> Option<String> {
        let cat = self.owner::<RefCell<Cat>>()?;
        let color = cat.borrow().color.clone();

        Some(format!("{color} {self}"))
    }

    fn is_long_haired(&self) -> bool {
        match self.behavior() {
            CatBreed::Birman | CatBreed::Persian => true,
            CatBreed::Abyssian | CatBreed::Bengal => false,
        }
    }
}

///
/// Dog
///
/// Host record with free-form raw slots and an error sink.
///

#[derive(Debug, Default)]
pub struct Dog {
    slots: HashMap<String, String>,
    cache: EnumCache,
    pub errors: Errors,
}

impl Dog {
    pub const BREED: EnumAttr<Breed> = EnumAttr::new("breed");
    pub const ALLOW_BLANK_BREED: EnumAttr<Breed> = EnumAttr::new("breed").allow_blank();
    pub const ALLOW_NIL_BREED: EnumAttr<Breed> = EnumAttr::new("breed").allow_nil();
    pub const OTHER_BREED: EnumAttr<Breed> = EnumAttr::new("other_breed");

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Run `rules` and report whether the record is valid.
    pub fn is_valid(&mut self, rules: &[&dyn FieldRule<Self>]) -> bool {
        let mut errors = Errors::new();
        validate_into(&*self, rules, &mut errors);
        self.errors = errors;

        self.errors.is_empty()
    }
}

impl RawAttributes for Dog {
    fn raw_attribute(&self, field: &str) -> Option<&str> {
        self.slots.get(field).map(String::as_str)
    }

    fn set_raw_attribute(&mut self, field: &str, value: Option<String>) {
        match value {
            Some(value) => self.slots.insert(field.to_string(), value),
            None => self.slots.remove(field),
        };
    }
}

impl HostRecord for Dog {
    fn enum_cache(&mut self) -> &mut EnumCache {
        &mut self.cache
    }
}

impl ValidationSink for Dog {
    fn add_validation_error(&mut self, field: &str, message: String) {
        self.errors.add_validation_error(field, message);
    }
}

///
/// Cat
///

#[derive(Debug, Default)]
pub struct Cat {
    pub color: String,
    breed: Option<String>,
    cache: EnumCache,
}

impl Cat {
    pub const BREED: EnumAttr<CatBreed> = EnumAttr::new("breed");
    pub const JSON_BREED: EnumAttr<CatBreed> = EnumAttr::new("breed").serialize_as_json();

    pub fn shared(color: &str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            color: color.to_string(),
            ..Self::default()
        }))
    }
}

impl RawAttributes for Cat {
    fn raw_attribute(&self, field: &str) -> Option<&str> {
        (field == "breed").then_some(self.breed.as_deref()).flatten()
    }

    fn set_raw_attribute(&mut self, field: &str, value: Option<String>) {
        if field == "breed" {
            self.breed = value;
        }
    }
}

impl HostRecord for Cat {
    fn enum_cache(&mut self) -> &mut EnumCache {
        &mut self.cache
    }
}
