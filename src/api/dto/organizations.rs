/*
 * Responsibility
 * - Organizations の request/response DTO
 * - 入力は camelCase、既存フロントエンドが送る PascalCase も alias で受ける
 */
use serde::{Deserialize, Serialize};

use crate::api::dto::contacts::{ContactResponse, MAX_TEXT_LEN};
use crate::repos::organization_repo::OrganizationWithContacts;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    #[serde(alias = "OrgNumber")]
    pub org_number: i32,
    #[serde(rename = "organizationName", alias = "OrganizationName")]
    pub org_name: String,
    #[serde(default, alias = "OrgType")]
    pub org_type: String,
}

impl CreateOrganizationRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.org_number <= 0 {
            return Err("orgNumber must be positive");
        }
        if self.org_name.trim().is_empty() {
            return Err("organizationName is required");
        }
        if self.org_name.chars().count() > MAX_TEXT_LEN {
            return Err("organizationName must be <= 75 chars");
        }
        if self.org_type.chars().count() > MAX_TEXT_LEN {
            return Err("orgType must be <= 75 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub org_number: i32,
    pub org_name: String,
    pub org_type: String,
    pub contacts: Vec<ContactResponse>,
}

impl From<OrganizationWithContacts> for OrganizationResponse {
    fn from(org: OrganizationWithContacts) -> Self {
        Self {
            org_number: org.org_number,
            org_name: org.org_name,
            org_type: org.org_type,
            contacts: org.contacts.into_iter().map(ContactResponse::from).collect(),
        }
    }
}
