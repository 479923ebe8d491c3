//! People endpoints: persons, clients and employees

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::person::{
        ClientStatus, CreateClient, CreateEmployee, Person, UpdateClient, UpdateEmployee, UpdatePerson,
    },
    AppState,
};

/// List all persons
#[utoipa::path(
    get,
    path = "/persons",
    tag = "persons",
    responses(
        (status = 200, description = "Clients and employees", body = Vec<Person>)
    )
)]
pub async fn list_persons(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.list_persons(&mut conn).await?))
}

/// Get a person
#[utoipa::path(
    get,
    path = "/persons/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Person details", body = Person),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Person>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.get_person(&mut conn, id).await?))
}

/// Update shared person fields
#[utoipa::path(
    put,
    path = "/persons/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Person ID")),
    request_body = UpdatePerson,
    responses(
        (status = 200, description = "Person updated", body = Person),
        (status = 404, description = "Person not found")
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdatePerson>,
) -> AppResult<Json<Person>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.update_person(&mut conn, id, &data).await?))
}

/// Delete a person
#[utoipa::path(
    delete,
    path = "/persons/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 400, description = "Client has loans on record"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn delete_person(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut tx = state.repository.begin().await?;
    state.services.people.delete_person(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Find a person by national id
#[utoipa::path(
    get,
    path = "/persons/national-id/{national_id}",
    tag = "persons",
    params(("national_id" = String, Path, description = "National identification number")),
    responses(
        (status = 200, description = "Person details", body = Person),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person_by_national_id(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> AppResult<Json<Person>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.get_by_national_id(&mut conn, &national_id).await?))
}

/// Register a client
#[utoipa::path(
    post,
    path = "/persons/clients",
    tag = "persons",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = Person),
        (status = 400, description = "Invalid data or duplicate national id")
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    Json(data): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let mut tx = state.repository.begin().await?;
    let client = state.services.people.create_client(&mut tx, &data).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// List clients
#[utoipa::path(
    get,
    path = "/persons/clients",
    tag = "persons",
    responses(
        (status = 200, description = "Clients", body = Vec<Person>)
    )
)]
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.list_clients(&mut conn).await?))
}

/// List clients with a given status
#[utoipa::path(
    get,
    path = "/persons/clients/status/{status}",
    tag = "persons",
    params(("status" = ClientStatus, Path, description = "Client status")),
    responses(
        (status = 200, description = "Clients with the status", body = Vec<Person>)
    )
)]
pub async fn list_clients_by_status(
    State(state): State<AppState>,
    Path(status): Path<ClientStatus>,
) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.list_clients_by_status(&mut conn, status).await?))
}

/// Get a client
#[utoipa::path(
    get,
    path = "/persons/clients/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client details", body = Person),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Person>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.get_client(&mut conn, id).await?))
}

/// Update a client
#[utoipa::path(
    put,
    path = "/persons/clients/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Client updated", body = Person),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateClient>,
) -> AppResult<Json<Person>> {
    let mut tx = state.repository.begin().await?;
    let client = state.services.people.update_client(&mut tx, id, &data).await?;
    tx.commit().await?;
    Ok(Json(client))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/persons/clients/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 400, description = "Client has loans on record"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut tx = state.repository.begin().await?;
    state.services.people.delete_client(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Hire an employee
#[utoipa::path(
    post,
    path = "/persons/employees",
    tag = "persons",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Person),
        (status = 400, description = "Invalid data or duplicate national id"),
        (status = 404, description = "Job role not found")
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(data): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let mut tx = state.repository.begin().await?;
    let employee = state.services.people.create_employee(&mut tx, &data).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// List employees
#[utoipa::path(
    get,
    path = "/persons/employees",
    tag = "persons",
    responses(
        (status = 200, description = "Employees", body = Vec<Person>)
    )
)]
pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.list_employees(&mut conn).await?))
}

/// List active employees
#[utoipa::path(
    get,
    path = "/persons/employees/active",
    tag = "persons",
    responses(
        (status = 200, description = "Active employees", body = Vec<Person>)
    )
)]
pub async fn list_active_employees(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.list_active_employees(&mut conn).await?))
}

/// List employees holding a job role
#[utoipa::path(
    get,
    path = "/persons/employees/job-role/{job_role_id}",
    tag = "persons",
    params(("job_role_id" = i32, Path, description = "Job role ID")),
    responses(
        (status = 200, description = "Employees with the role", body = Vec<Person>),
        (status = 404, description = "Job role not found")
    )
)]
pub async fn list_employees_by_job_role(
    State(state): State<AppState>,
    Path(job_role_id): Path<i32>,
) -> AppResult<Json<Vec<Person>>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(
        state
            .services
            .people
            .list_employees_by_job_role(&mut conn, job_role_id)
            .await?,
    ))
}

/// Get an employee
#[utoipa::path(
    get,
    path = "/persons/employees/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details", body = Person),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Person>> {
    let mut conn = state.repository.acquire().await?;
    Ok(Json(state.services.people.get_employee(&mut conn, id).await?))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/persons/employees/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Person),
        (status = 404, description = "Employee or job role not found")
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEmployee>,
) -> AppResult<Json<Person>> {
    let mut tx = state.repository.begin().await?;
    let employee = state.services.people.update_employee(&mut tx, id, &data).await?;
    tx.commit().await?;
    Ok(Json(employee))
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/persons/employees/{id}",
    tag = "persons",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn delete_employee(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut tx = state.repository.begin().await?;
    state.services.people.delete_employee(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
