//! Sales lead business logic.

use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Lead, lead};
use crate::errors::{Error, Result};

fn validate_email(email: &str) -> Result<()> {
    // Light-weight shape check; real validation belongs to the mail provider
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(Error::Validation {
            field: "email",
            message: "Enter a valid email address.".to_string(),
        });
    }
    Ok(())
}

/// Captures a new sales lead. `name` and `goals` are required free text.
pub async fn create_lead(
    db: &DatabaseConnection,
    name: String,
    goals: String,
    birth_date: NaiveDate,
    interests: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<lead::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "This field may not be blank.".to_string(),
        });
    }
    if goals.trim().is_empty() {
        return Err(Error::Validation {
            field: "goals",
            message: "This field may not be blank.".to_string(),
        });
    }
    if let Some(ref email) = email {
        validate_email(email)?;
    }

    let now = Utc::now();
    let lead = lead::ActiveModel {
        name: Set(name),
        goals: Set(goals),
        birth_date: Set(birth_date),
        interests: Set(interests),
        email: Set(email),
        phone: Set(phone),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = lead.insert(db).await?;
    info!("Captured lead '{}' (ID: {})", result.name, result.id);
    Ok(result)
}

/// Finds a live lead by id.
pub async fn get_lead(db: &DatabaseConnection, id: i64) -> Result<Option<lead::Model>> {
    lifecycle::get_active::<Lead>(db, id).await
}

/// Optional field updates for an existing lead.
#[derive(Debug, Default)]
pub struct LeadChanges {
    /// New name, if changing
    pub name: Option<String>,
    /// New goals text, if changing
    pub goals: Option<String>,
    /// New birth date, if changing
    pub birth_date: Option<NaiveDate>,
    /// New interests text, if changing
    pub interests: Option<String>,
    /// New email, if changing
    pub email: Option<String>,
    /// New phone, if changing
    pub phone: Option<String>,
}

/// Applies the provided field changes to a live lead and refreshes
/// `updated_at`.
pub async fn update_lead(
    db: &DatabaseConnection,
    id: i64,
    changes: LeadChanges,
) -> Result<lead::Model> {
    let existing = get_lead(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "lead", id })?;

    let mut lead: lead::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation {
                field: "name",
                message: "This field may not be blank.".to_string(),
            });
        }
        lead.name = Set(name);
    }
    if let Some(goals) = changes.goals {
        if goals.trim().is_empty() {
            return Err(Error::Validation {
                field: "goals",
                message: "This field may not be blank.".to_string(),
            });
        }
        lead.goals = Set(goals);
    }
    if let Some(birth_date) = changes.birth_date {
        lead.birth_date = Set(birth_date);
    }
    if let Some(interests) = changes.interests {
        lead.interests = Set(Some(interests));
    }
    if let Some(email) = changes.email {
        validate_email(&email)?;
        lead.email = Set(Some(email));
    }
    if let Some(phone) = changes.phone {
        lead.phone = Set(Some(phone));
    }

    lead.updated_at = Set(Utc::now());
    lead.update(db).await.map_err(Into::into)
}
