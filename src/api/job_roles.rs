//! Job role endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        job_role::{CreateJobRole, JobRole, UpdateJobRole},
        person::Person,
    },
    AppState,
};

/// List job roles
#[utoipa::path(
    get,
    path = "/job-roles",
    tag = "job-roles",
    responses(
        (status = 200, description = "Job roles", body = Vec<JobRole>)
    )
)]
pub async fn list_job_roles(State(state): State<AppState>) -> AppResult<Json<Vec<JobRole>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.job_roles.list(&mut conn).await?))
}

/// Create a job role
#[utoipa::path(
    post,
    path = "/job-roles",
    tag = "job-roles",
    request_body = CreateJobRole,
    responses(
        (status = 201, description = "Job role created", body = JobRole),
        (status = 400, description = "Invalid data or duplicate name")
    )
)]
pub async fn create_job_role(
    State(state): State<AppState>,
    Json(data): Json<CreateJobRole>,
) -> AppResult<(StatusCode, Json<JobRole>)> {
    let mut conn = state.repository.acquire().await?;
    let role = state.services.job_roles.create(&mut conn, &data).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Get a job role
#[utoipa::path(
    get,
    path = "/job-roles/{id}",
    tag = "job-roles",
    params(("id" = i32, Path, description = "Job role ID")),
    responses(
        (status = 200, description = "Job role details", body = JobRole),
        (status = 404, description = "Job role not found")
    )
)]
pub async fn get_job_role(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<JobRole>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.job_roles.get_by_id(&mut conn, id).await?))
}

/// Update a job role
#[utoipa::path(
    put,
    path = "/job-roles/{id}",
    tag = "job-roles",
    params(("id" = i32, Path, description = "Job role ID")),
    request_body = UpdateJobRole,
    responses(
        (status = 200, description = "Job role updated", body = JobRole),
        (status = 400, description = "Duplicate name"),
        (status = 404, description = "Job role not found")
    )
)]
pub async fn update_job_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateJobRole>,
) -> AppResult<Json<JobRole>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.job_roles.update(&mut conn, id, &data).await?))
}

/// Delete a job role
#[utoipa::path(
    delete,
    path = "/job-roles/{id}",
    tag = "job-roles",
    params(("id" = i32, Path, description = "Job role ID")),
    responses(
        (status = 204, description = "Job role deleted"),
        (status = 400, description = "Employees still hold the role"),
        (status = 404, description = "Job role not found")
    )
)]
pub async fn delete_job_role(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut tx = state.repository.begin().await?;
    state.services.job_roles.delete(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List employees holding a job role
#[utoipa::path(
    get,
    path = "/job-roles/{id}/employees",
    tag = "job-roles",
    params(("id" = i32, Path, description = "Job role ID")),
    responses(
        (status = 200, description = "Employees with the role", body = Vec<Person>),
        (status = 404, description = "Job role not found")
    )
)]
pub async fn list_job_role_employees(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.job_roles.list_employees(&mut conn, id).await?))
}
