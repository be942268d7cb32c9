//! Owners, pets and visits

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A pet owner. `id` is `None` until the owner is first saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    pub pets: Vec<Pet>,
}

impl Owner {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            city: city.into(),
            telephone: telephone.into(),
            pets: Vec::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Builder method to add a pet.
    pub fn with_pet(mut self, pet: Pet) -> Self {
        self.pets.push(pet);
        self
    }

    /// Find a pet by name, ignoring case.
    pub fn pet(&self, name: &str) -> Option<&Pet> {
        self.pets
            .iter()
            .find(|pet| pet.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Option<u32>,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    /// Species, e.g. "cat" or "dog"
    pub kind: String,
    /// Filled in when the owner is displayed
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Pet {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, birth_date: Option<NaiveDate>) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            kind: kind.into(),
            visits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Option<u32>,
    pub pet_id: u32,
    pub date: NaiveDate,
    pub description: String,
}

impl Visit {
    pub fn new(pet_id: u32, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: None,
            pet_id,
            date,
            description: description.into(),
        }
    }
}
