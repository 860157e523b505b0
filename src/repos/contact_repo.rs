/*
 * Responsibility
 * - contacts テーブル向け SQLx 操作 (insert / update / delete)
 * - contactId は Rust 側で生成 (uuid v4)、contactedAt は insert 時に now()
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct ContactRow {
    #[sqlx(rename = "contactId")]
    pub contact_id: Uuid,
    #[sqlx(rename = "orgNumber")]
    pub org_number: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: i64,
    #[sqlx(rename = "positionName")]
    pub position_name: Option<String>,
    #[sqlx(rename = "contactedAt")]
    pub contacted_at: DateTime<Utc>,
}

pub struct NewContact<'a> {
    pub org_number: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: i64,
    pub position_name: Option<&'a str>,
}

pub struct ContactUpdate<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: i64,
    pub position_name: Option<&'a str>,
    pub contacted_at: DateTime<Utc>,
}

pub async fn create(db: &PgPool, contact: NewContact<'_>) -> Result<ContactRow, RepoError> {
    let row = sqlx::query_as::<_, ContactRow>(
        r#"
        INSERT INTO contacts ("contactId", "orgNumber", name, email, phone, "positionName", "contactedAt")
        VALUES ($1, $2, $3, $4, $5, $6, now())
        RETURNING "contactId", "orgNumber", name, email, phone, "positionName", "contactedAt"
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(contact.org_number)
    .bind(contact.name)
    .bind(contact.email)
    .bind(contact.phone)
    .bind(contact.position_name)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    contact_id: Uuid,
    change: ContactUpdate<'_>,
) -> Result<Option<ContactRow>, RepoError> {
    let row = sqlx::query_as::<_, ContactRow>(
        r#"
        UPDATE contacts
        SET
            name = $2,
            email = $3,
            phone = $4,
            "positionName" = $5,
            "contactedAt" = $6
        WHERE "contactId" = $1
        RETURNING "contactId", "orgNumber", name, email, phone, "positionName", "contactedAt"
        "#,
    )
    .bind(contact_id)
    .bind(change.name)
    .bind(change.email)
    .bind(change.phone)
    .bind(change.position_name)
    .bind(change.contacted_at)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, contact_id: Uuid) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM contacts
        WHERE "contactId" = $1
        "#,
    )
    .bind(contact_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
