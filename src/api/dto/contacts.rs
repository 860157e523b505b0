/*
 * Responsibility
 * - Contacts の request/response DTO
 * - contactID は UUID をそのまま扱う
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::contact_repo::ContactRow;

// Column width of every text field in the schema.
pub const MAX_TEXT_LEN: usize = 75;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[serde(alias = "OrgNumber")]
    pub org_number: i32,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    #[serde(alias = "Phone")]
    pub phone: i64,
    #[serde(default, alias = "PositionName")]
    pub position_name: Option<String>,
}

impl CreateContactRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.org_number <= 0 {
            return Err("orgNumber must be positive");
        }
        validate_fields(
            &self.name,
            self.email.as_deref(),
            self.position_name.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(rename = "contactID", alias = "ContactID")]
    pub contact_id: Uuid,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    #[serde(alias = "Phone")]
    pub phone: i64,
    #[serde(default, alias = "PositionName")]
    pub position_name: Option<String>,
    #[serde(alias = "ContactedAt")]
    pub contacted_at: DateTime<Utc>,
}

impl UpdateContactRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_fields(
            &self.name,
            self.email.as_deref(),
            self.position_name.as_deref(),
        )
    }
}

fn validate_fields(
    name: &str,
    email: Option<&str>,
    position_name: Option<&str>,
) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is required");
    }
    if name.chars().count() > MAX_TEXT_LEN {
        return Err("name must be <= 75 chars");
    }
    if let Some(email) = email
        && email.chars().count() > MAX_TEXT_LEN
    {
        return Err("email must be <= 75 chars");
    }
    if let Some(position) = position_name
        && position.chars().count() > MAX_TEXT_LEN
    {
        return Err("positionName must be <= 75 chars");
    }
    Ok(())
}

/// Empty strings from form inputs are stored as NULL.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(rename = "contactID")]
    pub contact_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub contacted_at: DateTime<Utc>,
    pub position_name: Option<String>,
    pub phone: i64,
    pub org_number: i32,
}

impl From<ContactRow> for ContactResponse {
    fn from(row: ContactRow) -> Self {
        Self {
            contact_id: row.contact_id,
            name: row.name,
            email: row.email,
            contacted_at: row.contacted_at,
            position_name: row.position_name,
            phone: row.phone,
            org_number: row.org_number,
        }
    }
}
