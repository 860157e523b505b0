/*
 * Responsibility
 * - organizations テーブル向け SQLx 操作
 * - organizations LEFT JOIN contacts を 1 query で読み、org ごとにまとめて返す
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::{contact_repo::ContactRow, error::RepoError};

// One row of the LEFT JOIN; contact columns are NULL for organizations
// without contacts.
#[derive(Debug, FromRow)]
pub struct OrgContactRow {
    #[sqlx(rename = "orgNumber")]
    pub org_number: i32,
    #[sqlx(rename = "orgName")]
    pub org_name: String,
    #[sqlx(rename = "orgType")]
    pub org_type: String,

    #[sqlx(rename = "contactId")]
    pub contact_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<i64>,
    #[sqlx(rename = "positionName")]
    pub position_name: Option<String>,
    #[sqlx(rename = "contactedAt")]
    pub contacted_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct OrganizationWithContacts {
    pub org_number: i32,
    pub org_name: String,
    pub org_type: String,
    pub contacts: Vec<ContactRow>,
}

pub async fn create(
    db: &PgPool,
    org_number: i32,
    org_name: &str,
    org_type: &str,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO organizations ("orgNumber", "orgName", "orgType")
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(org_number)
    .bind(org_name)
    .bind(org_type)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(())
}

pub async fn list_org_types(db: &PgPool) -> Result<Vec<String>, RepoError> {
    let types = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT "orgType"
        FROM organizations
        WHERE "orgType" <> ''
        ORDER BY "orgType"
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(types)
}

pub async fn list_with_contacts(db: &PgPool) -> Result<Vec<OrganizationWithContacts>, RepoError> {
    let rows = sqlx::query_as::<_, OrgContactRow>(
        r#"
        SELECT
            o."orgNumber", o."orgName", o."orgType",
            c."contactId", c.name, c.email, c.phone, c."positionName", c."contactedAt"
        FROM organizations o
        LEFT JOIN contacts c ON c."orgNumber" = o."orgNumber"
        ORDER BY o."orgNumber", c."contactedAt", c."contactId"
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(group_rows(rows))
}

/// Fold joined rows (ordered by orgNumber) into one entry per organization.
pub fn group_rows(rows: Vec<OrgContactRow>) -> Vec<OrganizationWithContacts> {
    let mut orgs: Vec<OrganizationWithContacts> = Vec::new();

    for row in rows {
        let contact = match (row.contact_id, row.name, row.phone, row.contacted_at) {
            (Some(contact_id), Some(name), Some(phone), Some(contacted_at)) => Some(ContactRow {
                contact_id,
                org_number: row.org_number,
                name,
                email: row.email,
                phone,
                position_name: row.position_name,
                contacted_at,
            }),
            _ => None,
        };

        match orgs.last_mut() {
            Some(last) if last.org_number == row.org_number => {
                last.contacts.extend(contact);
            }
            _ => orgs.push(OrganizationWithContacts {
                org_number: row.org_number,
                org_name: row.org_name,
                org_type: row.org_type,
                contacts: contact.into_iter().collect(),
            }),
        }
    }

    orgs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn org_only(org_number: i32, name: &str) -> OrgContactRow {
        OrgContactRow {
            org_number,
            org_name: name.to_string(),
            org_type: "customer".to_string(),
            contact_id: None,
            name: None,
            email: None,
            phone: None,
            position_name: None,
            contacted_at: None,
        }
    }

    fn with_contact(org_number: i32, name: &str, contact: &str) -> OrgContactRow {
        OrgContactRow {
            contact_id: Some(Uuid::new_v4()),
            name: Some(contact.to_string()),
            email: Some(format!("{}@example.com", contact.to_lowercase())),
            phone: Some(401234567),
            position_name: Some("CTO".to_string()),
            contacted_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            ..org_only(org_number, name)
        }
    }

    #[test]
    fn organizations_without_contacts_get_an_empty_list() {
        let orgs = group_rows(vec![org_only(1, "Acme"), org_only(2, "Globex")]);

        assert_eq!(orgs.len(), 2);
        assert!(orgs.iter().all(|o| o.contacts.is_empty()));
    }

    #[test]
    fn contacts_are_nested_under_their_organization_in_order() {
        let orgs = group_rows(vec![
            with_contact(1, "Acme", "Alice"),
            with_contact(1, "Acme", "Bob"),
            org_only(2, "Globex"),
            with_contact(3, "Initech", "Peter"),
        ]);

        let summary: Vec<(i32, Vec<&str>)> = orgs
            .iter()
            .map(|o| {
                (
                    o.org_number,
                    o.contacts.iter().map(|c| c.name.as_str()).collect(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (1, vec!["Alice", "Bob"]),
                (2, vec![]),
                (3, vec!["Peter"]),
            ]
        );
        assert_eq!(orgs[0].contacts[0].org_number, 1);
    }

    #[test]
    fn no_rows_means_no_organizations() {
        assert!(group_rows(Vec::new()).is_empty());
    }
}
