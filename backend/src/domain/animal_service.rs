//! Animal registration, administrative edits and breeding events.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use shared::PregnancyCheck;

use crate::domain::clock::Clock;
use crate::domain::commands::animals::{
    BreedingCommand, CreateAnimalCommand, ListAnimalsQuery, UpdateAnimalDetailsCommand,
};
use crate::domain::errors::AnimalError;
use crate::domain::models::{ensure_not_future, validate_name, validate_tag, Animal, AnimalValidationError};
use crate::storage::AnimalStorage;

/// Service for managing the animal records of the herd
#[derive(Clone)]
pub struct AnimalService {
    storage: Arc<dyn AnimalStorage>,
    clock: Arc<dyn Clock>,
}

impl AnimalService {
    pub fn new(storage: Arc<dyn AnimalStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Register a new heifer (no calving date) or cow
    pub async fn create_animal(&self, command: CreateAnimalCommand) -> Result<Animal> {
        info!("Creating animal: name={}, tag={}", command.name, command.tag_number);

        let today = self.clock.today();
        self.validate_create_command(&command, today)?;

        let name = command.name.trim().to_string();
        let tag_number = command.tag_number.trim().to_string();
        self.ensure_tag_available(&tag_number, None).await?;

        let mut animal = Animal::new(name, tag_number, self.clock.now());
        animal.birth_date = command.birth_date;
        animal.calving_date = command.calving_date;
        animal.notes = normalize_notes(command.notes);
        if let Some(inseminated) = command.insemination_date {
            animal.insemination_date = Some(inseminated);
            animal.last_heat = Some(inseminated);
            animal.insemination_attempts = 1;
            if command.pregnant {
                animal.pregnancy_check = PregnancyCheck::Positive;
            }
        }

        animal.id = self.storage.insert_animal(&animal).await?;

        info!(
            "Created {} {} with ID: {}",
            if animal.is_heifer() { "heifer" } else { "cow" },
            animal.name,
            animal.id
        );
        Ok(animal)
    }

    pub async fn get_animal(&self, id: i64) -> Result<Animal> {
        match self.storage.get_animal(id).await? {
            Some(animal) => Ok(animal),
            None => {
                warn!("Animal not found: {}", id);
                Err(AnimalError::NotFound(id).into())
            }
        }
    }

    /// List animals ordered by name
    pub async fn list_animals(&self, query: ListAnimalsQuery) -> Result<Vec<Animal>> {
        info!("Listing animals (active_only={})", query.active_only);

        let animals = self.storage.list_animals(query.active_only).await?;

        info!("Found {} animals", animals.len());
        Ok(animals)
    }

    /// Correct identity fields without touching the breeding state
    pub async fn update_details(&self, id: i64, command: UpdateAnimalDetailsCommand) -> Result<Animal> {
        info!("Updating details of animal: {}", id);

        let mut animal = self.get_animal(id).await?;
        let today = self.clock.today();

        if let Some(name) = command.name {
            validate_name(&name).map_err(AnimalError::from)?;
            animal.name = name.trim().to_string();
        }
        if let Some(tag_number) = command.tag_number {
            validate_tag(&tag_number).map_err(AnimalError::from)?;
            let tag_number = tag_number.trim().to_string();
            if animal.active && tag_number != animal.tag_number {
                self.ensure_tag_available(&tag_number, Some(animal.id)).await?;
            }
            animal.tag_number = tag_number;
        }
        match command.birth_date {
            Some(Some(birth_date)) => {
                ensure_not_future("birth", birth_date, today).map_err(AnimalError::from)?;
                animal.birth_date = Some(birth_date);
            }
            Some(None) => animal.birth_date = None,
            None => {}
        }
        if command.notes.is_some() {
            animal.notes = normalize_notes(command.notes);
        }

        animal.updated_at = self.clock.now();
        self.storage.update_animal(&animal).await?;

        info!("Updated animal: {} with ID: {}", animal.name, animal.id);
        Ok(animal)
    }

    /// Record a breeding or lifecycle event
    pub async fn apply_command(&self, id: i64, command: BreedingCommand) -> Result<Animal> {
        info!("Recording {} for animal: {}", command.name(), id);

        let mut animal = self.get_animal(id).await?;

        if let Err(e) = animal.apply(command, self.clock.today()) {
            warn!("Rejected {} for animal {}: {}", command.name(), id, e);
            return Err(AnimalError::Validation(e).into());
        }

        animal.updated_at = self.clock.now();
        self.storage.update_animal(&animal).await?;

        info!("Recorded {} for {} (ID: {})", command.name(), animal.name, animal.id);
        Ok(animal)
    }

    pub async fn delete_animal(&self, id: i64) -> Result<()> {
        info!("Deleting animal: {}", id);

        if !self.storage.delete_animal(id).await? {
            warn!("Animal not found: {}", id);
            return Err(AnimalError::NotFound(id).into());
        }

        info!("Deleted animal with ID: {}", id);
        Ok(())
    }

    fn validate_create_command(
        &self,
        command: &CreateAnimalCommand,
        today: chrono::NaiveDate,
    ) -> Result<(), AnimalError> {
        validate_name(&command.name)?;
        validate_tag(&command.tag_number)?;

        if let Some(date) = command.birth_date {
            ensure_not_future("birth", date, today)?;
        }
        if let Some(date) = command.calving_date {
            ensure_not_future("calving", date, today)?;
        }
        if let Some(date) = command.insemination_date {
            ensure_not_future("insemination", date, today)?;
        }
        if command.pregnant && command.insemination_date.is_none() {
            return Err(AnimalValidationError::NoInsemination.into());
        }

        Ok(())
    }

    async fn ensure_tag_available(&self, tag_number: &str, own_id: Option<i64>) -> Result<()> {
        if let Some(existing) = self.storage.find_active_by_tag(tag_number).await? {
            if Some(existing.id) != own_id {
                warn!("Tag {} already used by animal {}", tag_number, existing.id);
                return Err(AnimalError::DuplicateTag(tag_number.to_string()).into());
            }
        }
        Ok(())
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}
