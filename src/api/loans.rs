//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan},
    AppState,
};

/// Check a copy out to a patron
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Copy unavailable or due time not in the future"),
        (status = 404, description = "Patron or copy not found")
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let mut tx = state.repository.begin().await?;
    let loan = state.services.loans.open_loan(&mut *tx, &request).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All loans", body = Vec<Loan>)
    )
)]
pub async fn list_loans(State(state): State<AppState>) -> AppResult<Json<Vec<Loan>>> {
    let mut conn = state.repository.acquire().await?;
    let loans = state.services.loans.list_loans(&mut *conn).await?;
    Ok(Json(loans))
}

/// Get loan details
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = Loan),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let mut conn = state.repository.acquire().await?;
    let loan = state.services.loans.get_loan(&mut *conn, loan_id).await?;
    Ok(Json(loan))
}

/// Return a borrowed copy
#[utoipa::path(
    put,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Copy returned, fine computed", body = Loan),
        (status = 400, description = "Loan already returned"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    let mut tx = state.repository.begin().await?;
    let loan = state.services.loans.close_loan(&mut *tx, loan_id).await?;
    tx.commit().await?;

    Ok(Json(loan))
}

/// List the loans of a patron
#[utoipa::path(
    get,
    path = "/loans/patron/{patron_id}",
    tag = "loans",
    params(
        ("patron_id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Patron's loans", body = Vec<Loan>),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn list_patron_loans(
    State(state): State<AppState>,
    Path(patron_id): Path<i32>,
) -> AppResult<Json<Vec<Loan>>> {
    let mut conn = state.repository.acquire().await?;
    let loans = state
        .services
        .loans
        .list_loans_by_patron(&mut *conn, patron_id)
        .await?;
    Ok(Json(loans))
}

/// List the loans of a copy
#[utoipa::path(
    get,
    path = "/loans/copy/{copy_id}",
    tag = "loans",
    params(
        ("copy_id" = i32, Path, description = "Book copy ID")
    ),
    responses(
        (status = 200, description = "Copy's loans", body = Vec<Loan>),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn list_copy_loans(
    State(state): State<AppState>,
    Path(copy_id): Path<i32>,
) -> AppResult<Json<Vec<Loan>>> {
    let mut conn = state.repository.acquire().await?;
    let loans = state.services.loans.list_loans_by_copy(&mut *conn, copy_id).await?;
    Ok(Json(loans))
}
