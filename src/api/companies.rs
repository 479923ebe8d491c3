//! Company endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::company::{Company, CreateCompany, UpdateCompany},
    AppState,
};

/// List companies
#[utoipa::path(
    get,
    path = "/companies",
    tag = "companies",
    responses(
        (status = 200, description = "Companies", body = Vec<Company>)
    )
)]
pub async fn list_companies(State(state): State<AppState>) -> AppResult<Json<Vec<Company>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.companies.list(&mut conn).await?))
}

/// Register a company
#[utoipa::path(
    post,
    path = "/companies",
    tag = "companies",
    request_body = CreateCompany,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Invalid data or duplicate tax id")
    )
)]
pub async fn create_company(
    State(state): State<AppState>,
    Json(data): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let mut conn = state.repository.acquire().await?;
    let company = state.services.companies.create(&mut conn, &data).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// Get a company
#[utoipa::path(
    get,
    path = "/companies/{id}",
    tag = "companies",
    params(("id" = i32, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company details", body = Company),
        (status = 404, description = "Company not found")
    )
)]
pub async fn get_company(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Company>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.companies.get_by_id(&mut conn, id).await?))
}

/// Update a company
#[utoipa::path(
    put,
    path = "/companies/{id}",
    tag = "companies",
    params(("id" = i32, Path, description = "Company ID")),
    request_body = UpdateCompany,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 404, description = "Company not found")
    )
)]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateCompany>,
) -> AppResult<Json<Company>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.companies.update(&mut conn, id, &data).await?))
}

/// Delete a company
#[utoipa::path(
    delete,
    path = "/companies/{id}",
    tag = "companies",
    params(("id" = i32, Path, description = "Company ID")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found")
    )
)]
pub async fn delete_company(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut conn = state.repository.acquire().await?;
    state.services.companies.delete(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
