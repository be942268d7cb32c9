//! Owner and visit repositories

use crate::error::{ClinicError, ClinicResult};
use crate::model::{Owner, Visit};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Storage for owners and their pets.
pub trait OwnerRepository: Send + Sync {
    /// Owners whose last name starts with `last_name`.
    fn find_by_last_name(&self, last_name: &str) -> ClinicResult<Vec<Owner>>;

    /// Owners whose first name contains `first_name`. An empty string
    /// matches everyone.
    fn find_by_first_name(&self, first_name: &str) -> ClinicResult<Vec<Owner>>;

    fn find_by_id(&self, id: u32) -> ClinicResult<Option<Owner>>;

    /// Insert (when `owner.id` is `None`) or update an owner and return its id.
    fn save(&self, owner: Owner) -> ClinicResult<u32>;
}

/// Storage for visits.
pub trait VisitRepository: Send + Sync {
    fn find_by_pet_id(&self, pet_id: u32) -> ClinicResult<Vec<Visit>>;

    /// Insert a visit and return its id.
    fn save(&self, visit: Visit) -> ClinicResult<u32>;
}

#[derive(Debug)]
struct OwnerTable {
    owners: BTreeMap<u32, Owner>,
    next_owner_id: u32,
    next_pet_id: u32,
}

/// In-memory owner repository.
#[derive(Debug)]
pub struct InMemoryOwnerRepository {
    table: RwLock<OwnerTable>,
}

impl InMemoryOwnerRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(OwnerTable {
                owners: BTreeMap::new(),
                next_owner_id: 1,
                next_pet_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().map(|t| t.owners.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filter(&self, predicate: impl Fn(&Owner) -> bool) -> ClinicResult<Vec<Owner>> {
        let table = self.table.read().map_err(|_| poisoned("owner"))?;
        Ok(table
            .owners
            .values()
            .filter(|&owner| predicate(owner))
            .cloned()
            .collect())
    }
}

impl Default for InMemoryOwnerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerRepository for InMemoryOwnerRepository {
    fn find_by_last_name(&self, last_name: &str) -> ClinicResult<Vec<Owner>> {
        self.filter(|owner| owner.last_name.starts_with(last_name))
    }

    fn find_by_first_name(&self, first_name: &str) -> ClinicResult<Vec<Owner>> {
        self.filter(|owner| owner.first_name.contains(first_name))
    }

    fn find_by_id(&self, id: u32) -> ClinicResult<Option<Owner>> {
        let table = self.table.read().map_err(|_| poisoned("owner"))?;
        Ok(table.owners.get(&id).cloned())
    }

    fn save(&self, mut owner: Owner) -> ClinicResult<u32> {
        let mut table = self.table.write().map_err(|_| poisoned("owner"))?;

        let id = match owner.id {
            Some(id) => id,
            None => table.next_owner_id,
        };
        // The id after `u32::MAX` does not exist, so that owner could never
        // be followed by another insert.
        let following = id
            .checked_add(1)
            .ok_or_else(|| ClinicError::Storage("owner id space exhausted".to_string()))?;
        table.next_owner_id = table.next_owner_id.max(following);
        owner.id = Some(id);

        for pet in owner.pets.iter_mut().filter(|pet| pet.id.is_none()) {
            pet.id = Some(table.next_pet_id);
            table.next_pet_id += 1;
        }

        table.owners.insert(id, owner);
        tracing::debug!(target: "clinic::repository", owner_id = id, "owner saved");
        Ok(id)
    }
}

#[derive(Debug)]
struct VisitTable {
    visits: Vec<Visit>,
    next_id: u32,
}

/// In-memory visit repository.
#[derive(Debug)]
pub struct InMemoryVisitRepository {
    table: RwLock<VisitTable>,
}

impl InMemoryVisitRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(VisitTable {
                visits: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryVisitRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitRepository for InMemoryVisitRepository {
    fn find_by_pet_id(&self, pet_id: u32) -> ClinicResult<Vec<Visit>> {
        let table = self.table.read().map_err(|_| poisoned("visit"))?;
        Ok(table
            .visits
            .iter()
            .filter(|visit| visit.pet_id == pet_id)
            .cloned()
            .collect())
    }

    fn save(&self, mut visit: Visit) -> ClinicResult<u32> {
        let mut table = self.table.write().map_err(|_| poisoned("visit"))?;
        let id = table.next_id;
        table.next_id += 1;
        visit.id = Some(id);
        table.visits.push(visit);
        Ok(id)
    }
}

fn poisoned(table: &str) -> ClinicError {
    ClinicError::Storage(format!("{table} table lock poisoned"))
}
