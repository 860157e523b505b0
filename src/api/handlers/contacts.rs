/*
 * Responsibility
 * - POST /add_contact, PUT /edit_contact, DELETE /delete_contact/{id}
 * - 存在しない contactID は 404
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    api::dto::contacts::{ContactResponse, CreateContactRequest, UpdateContactRequest, non_blank},
    api::extractors::AuthCtxExtractor,
    error::AppError,
    repos::contact_repo::{self, ContactUpdate, NewContact},
    state::AppState,
};

pub async fn add_contact(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::bad_request)?;

    let row = contact_repo::create(
        &state.db,
        NewContact {
            org_number: req.org_number,
            name: req.name.trim(),
            email: non_blank(req.email.as_deref()),
            phone: req.phone,
            position_name: non_blank(req.position_name.as_deref()),
        },
    )
    .await?;

    tracing::info!(user_id = %auth.user_id, contact_id = %row.contact_id, "contact added");
    Ok(Json(row.into()))
}

pub async fn edit_contact(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    payload: Result<Json<UpdateContactRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::bad_request)?;

    contact_repo::update(
        &state.db,
        req.contact_id,
        ContactUpdate {
            name: req.name.trim(),
            email: non_blank(req.email.as_deref()),
            phone: req.phone,
            position_name: non_blank(req.position_name.as_deref()),
            contacted_at: req.contacted_at,
        },
    )
    .await?
    .ok_or(AppError::not_found("contact"))?;

    tracing::info!(user_id = %auth.user_id, contact_id = %req.contact_id, "contact updated");
    Ok(Json(json!({"message": "Contact info changed successfully"})))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(contact_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let contact_id =
        Uuid::parse_str(&contact_id).map_err(|_| AppError::bad_request("invalid contact id"))?;

    if !contact_repo::delete(&state.db, contact_id).await? {
        return Err(AppError::not_found("contact"));
    }

    tracing::info!(user_id = %auth.user_id, contact_id = %contact_id, "contact deleted");
    Ok(Json(json!({"message": "Contact deleted successfully"})))
}
