//! Enum types and host records shared by unit tests.

use crate::{
    attribute::{EnumCache, HostRecord, RawAttributes},
    instance::EnumInstance,
    validate::{Errors, ValidationSink},
};
use std::{cell::RefCell, collections::HashMap};

crate::classy_enum! {
    pub(crate) enum Breed {
        GoldenRetriever => "golden_retriever",
        Snoop => "snoop",
        Husky => "husky",
    }
}

crate::classy_enum! {
    pub(crate) enum Color {
        White => "white",
        Black => "black",
    }
}

crate::classy_enum! {
    pub(crate) enum CatBreed {
        Abyssian => "abyssian",
        Bengal => "bengal",
        Birman => "birman",
        Persian => "persian",
    }
}

///
/// CatBreedExt
/// Owner-aware behavior of cat breeds.
///

pub(crate) trait CatBreedExt {
    fn breed_color(&self) -> Option<String>;
}

impl CatBreedExt for EnumInstance<CatBreed> {
    fn breed_color(&self) -> Option<String> {
        let cat = self.owner::<RefCell<Cat>>()?;
        let color = cat.borrow().color.clone();

        Some(format!("{color} {self}"))
    }
}

///
/// Dog
///

#[derive(Debug, Default)]
pub(crate) struct Dog {
    slots: HashMap<String, String>,
    cache: EnumCache,
    pub errors: Errors,
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
pub(crate) struct Cat {
    pub color: String,
    breed: Option<String>,
    cache: EnumCache,
}

impl Cat {
    pub(crate) fn new(color: &str) -> Self {
        Self {
            color: color.to_string(),
            ..Self::default()
        }
    }
}

impl RawAttributes for Cat {
    fn raw_attribute(&self, field: &str) -> Option<&str> {
        match field {
            "breed" => self.breed.as_deref(),
            _ => None,
        }
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
