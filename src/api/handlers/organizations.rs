/*
 * Responsibility
 * - POST /add_organization, GET /all_data, GET /org_types
 * - Json を extractor で受け、DTO validation → repo 呼び出し
 */
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::{Value, json};

use crate::{
    api::dto::organizations::{CreateOrganizationRequest, OrganizationResponse},
    api::extractors::AuthCtxExtractor,
    error::AppError,
    repos::organization_repo,
    state::AppState,
};

pub async fn add_organization(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    payload: Result<Json<CreateOrganizationRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::bad_request)?;

    organization_repo::create(&state.db, req.org_number, req.org_name.trim(), req.org_type.trim())
        .await?;

    tracing::info!(user_id = %auth.user_id, org_number = req.org_number, "organization added");
    Ok(Json(json!({"message": "Organization added successfully"})))
}

pub async fn all_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationResponse>>, AppError> {
    let orgs = organization_repo::list_with_contacts(&state.db).await?;

    Ok(Json(orgs.into_iter().map(OrganizationResponse::from).collect()))
}

pub async fn org_types(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let types = organization_repo::list_org_types(&state.db).await?;

    Ok(Json(types))
}
