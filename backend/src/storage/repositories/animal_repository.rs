use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use shared::{ExitReason, PregnancyCheck};

use crate::domain::models::{Animal, HerdExit};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AnimalStorage;

const DATE_FORMAT: &str = "%Y-%m-%d";

const ANIMAL_COLUMNS: &str = r#"
    id, name, tag_number, birth_date, last_heat, insemination_date,
    insemination_attempts, pregnancy_check, dry_off_date, calving_date,
    hoof_care_needed, sorted_out, active, exit_date, exit_reason, notes,
    created_at, updated_at
"#;

/// Repository for animal records
#[derive(Clone)]
pub struct AnimalRepository {
    db: DbConnection,
}

impl AnimalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_animal(row: &SqliteRow) -> Result<Animal> {
        let id: i64 = row.get("id");
        let attempts: i64 = row.get("insemination_attempts");
        let pregnancy_check: Option<String> = row.get("pregnancy_check");
        let exit_reason: Option<String> = row.get("exit_reason");

        let pregnancy_check = PregnancyCheck::from_db_value(pregnancy_check.as_deref()).with_context(|| {
            format!("Invalid pregnancy_check '{}' for animal {}", pregnancy_check.as_deref().unwrap_or_default(), id)
        })?;
        let exit_reason = exit_reason
            .map(|text| {
                ExitReason::from_db_value(&text)
                    .with_context(|| format!("Invalid exit_reason '{}' for animal {}", text, id))
            })
            .transpose()?;

        let exit = match (read_date(row, "exit_date")?, exit_reason) {
            (Some(date), Some(reason)) => Some(HerdExit { date, reason }),
            _ => None,
        };

        Ok(Animal {
            id,
            name: row.get("name"),
            tag_number: row.get("tag_number"),
            birth_date: read_date(row, "birth_date")?,
            last_heat: read_date(row, "last_heat")?,
            insemination_date: read_date(row, "insemination_date")?,
            insemination_attempts: u32::try_from(attempts)
                .with_context(|| format!("Invalid insemination count {} for animal {}", attempts, id))?,
            pregnancy_check,
            dry_off_date: read_date(row, "dry_off_date")?,
            calving_date: read_date(row, "calving_date")?,
            hoof_care_needed: row.get("hoof_care_needed"),
            sorted_out: row.get("sorted_out"),
            active: row.get("active"),
            exit,
            notes: row.get("notes"),
            created_at: read_timestamp(row, "created_at")?,
            updated_at: read_timestamp(row, "updated_at")?,
        })
    }
}

fn read_date(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>> {
    let value: Option<String> = row.get(column);
    value
        .map(|text| {
            NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .with_context(|| format!("Invalid {} '{}' in animals table", column, text))
        })
        .transpose()
}

fn read_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let text: String = row.get(column);
    DateTime::parse_from_rfc3339(&text)
        .map(|parsed| parsed.with_timezone(&Utc))
        .with_context(|| format!("Invalid {} '{}' in animals table", column, text))
}

fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(|date| date.format(DATE_FORMAT).to_string())
}

#[async_trait]
impl AnimalStorage for AnimalRepository {
    async fn insert_animal(&self, animal: &Animal) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO animals (
                name, tag_number, birth_date, last_heat, insemination_date,
                insemination_attempts, pregnancy_check, dry_off_date, calving_date,
                hoof_care_needed, sorted_out, active, exit_date, exit_reason, notes,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&animal.name)
        .bind(&animal.tag_number)
        .bind(date_text(animal.birth_date))
        .bind(date_text(animal.last_heat))
        .bind(date_text(animal.insemination_date))
        .bind(i64::from(animal.insemination_attempts))
        .bind(animal.pregnancy_check.as_db_value())
        .bind(date_text(animal.dry_off_date))
        .bind(date_text(animal.calving_date))
        .bind(animal.hoof_care_needed)
        .bind(animal.sorted_out)
        .bind(animal.active)
        .bind(date_text(animal.exit.map(|exit| exit.date)))
        .bind(animal.exit.map(|exit| exit.reason.as_db_value()))
        .bind(&animal.notes)
        .bind(animal.created_at.to_rfc3339())
        .bind(animal.updated_at.to_rfc3339())
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted animal {} with id {}", animal.tag_number, id);
        Ok(id)
    }

    async fn get_animal(&self, id: i64) -> Result<Option<Animal>> {
        let row = sqlx::query(&format!("SELECT {} FROM animals WHERE id = ?", ANIMAL_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_animal).transpose()
    }

    async fn list_animals(&self, active_only: bool) -> Result<Vec<Animal>> {
        let filter = if active_only { "WHERE active = 1" } else { "" };
        let rows = sqlx::query(&format!(
            "SELECT {} FROM animals {} ORDER BY name COLLATE NOCASE ASC, id ASC",
            ANIMAL_COLUMNS, filter
        ))
        .fetch_all(self.db.pool())
        .await?;

        debug!("Loaded {} animals (active_only={})", rows.len(), active_only);
        rows.iter().map(Self::row_to_animal).collect()
    }

    async fn update_animal(&self, animal: &Animal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE animals
            SET name = ?, tag_number = ?, birth_date = ?, last_heat = ?,
                insemination_date = ?, insemination_attempts = ?, pregnancy_check = ?,
                dry_off_date = ?, calving_date = ?, hoof_care_needed = ?, sorted_out = ?,
                active = ?, exit_date = ?, exit_reason = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&animal.name)
        .bind(&animal.tag_number)
        .bind(date_text(animal.birth_date))
        .bind(date_text(animal.last_heat))
        .bind(date_text(animal.insemination_date))
        .bind(i64::from(animal.insemination_attempts))
        .bind(animal.pregnancy_check.as_db_value())
        .bind(date_text(animal.dry_off_date))
        .bind(date_text(animal.calving_date))
        .bind(animal.hoof_care_needed)
        .bind(animal.sorted_out)
        .bind(animal.active)
        .bind(date_text(animal.exit.map(|exit| exit.date)))
        .bind(animal.exit.map(|exit| exit.reason.as_db_value()))
        .bind(&animal.notes)
        .bind(animal.updated_at.to_rfc3339())
        .bind(animal.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_animal(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_active_by_tag(&self, tag_number: &str) -> Result<Option<Animal>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM animals WHERE tag_number = ? AND active = 1",
            ANIMAL_COLUMNS
        ))
        .bind(tag_number)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_animal).transpose()
    }
}
