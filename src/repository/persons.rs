//! Persons repository (base records with client / employee variants)

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::person::{
        ClientStatus, CreateClient, CreateEmployee, Person, PersonRow, UpdateClient, UpdateEmployee,
        UpdatePerson,
    },
};

const SELECT_PERSON: &str = r#"
    SELECT p.id, p.kind, p.name, p.national_id, p.birth_date, p.email, p.phone, p.address,
           c.registered_on, c.status AS client_status,
           e.job_role_id, r.name AS job_role_name, e.hired_on, e.salary, e.active
    FROM persons p
    LEFT JOIN clients c ON c.person_id = p.id
    LEFT JOIN employees e ON e.person_id = p.id
    LEFT JOIN job_roles r ON r.id = e.job_role_id
"#;

fn into_persons(rows: Vec<PersonRow>) -> AppResult<Vec<Person>> {
    rows.into_iter().map(Person::try_from).collect()
}

/// List persons, optionally restricted to one kind (`client` / `employee`)
pub async fn list(conn: &mut PgConnection, kind: Option<&str>) -> AppResult<Vec<Person>> {
    let rows = sqlx::query_as::<_, PersonRow>(&format!(
        "{} WHERE ($1::text IS NULL OR p.kind = $1) ORDER BY p.name, p.id",
        SELECT_PERSON
    ))
    .bind(kind)
    .fetch_all(&mut *conn)
    .await?;
    into_persons(rows)
}

/// Get person by ID, whatever its kind
pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> AppResult<Option<Person>> {
    sqlx::query_as::<_, PersonRow>(&format!("{} WHERE p.id = $1", SELECT_PERSON))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .map(Person::try_from)
        .transpose()
}

pub async fn get_by_id(conn: &mut PgConnection, id: i32) -> AppResult<Person> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
}

pub async fn get_by_national_id(conn: &mut PgConnection, national_id: &str) -> AppResult<Person> {
    sqlx::query_as::<_, PersonRow>(&format!("{} WHERE p.national_id = $1", SELECT_PERSON))
        .bind(national_id)
        .fetch_optional(&mut *conn)
        .await?
        .map(Person::try_from)
        .transpose()?
        .ok_or_else(|| AppError::NotFound(format!("No person with national id {}", national_id)))
}

pub async fn national_id_exists(conn: &mut PgConnection, national_id: &str) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM persons WHERE national_id = $1)")
        .bind(national_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

pub async fn list_clients_by_status(conn: &mut PgConnection, status: ClientStatus) -> AppResult<Vec<Person>> {
    let rows = sqlx::query_as::<_, PersonRow>(&format!(
        "{} WHERE p.kind = 'client' AND c.status = $1 ORDER BY p.name, p.id",
        SELECT_PERSON
    ))
    .bind(status.as_str())
    .fetch_all(&mut *conn)
    .await?;
    into_persons(rows)
}

pub async fn list_employees_by_role(conn: &mut PgConnection, job_role_id: i32) -> AppResult<Vec<Person>> {
    let rows = sqlx::query_as::<_, PersonRow>(&format!(
        "{} WHERE p.kind = 'employee' AND e.job_role_id = $1 ORDER BY p.name, p.id",
        SELECT_PERSON
    ))
    .bind(job_role_id)
    .fetch_all(&mut *conn)
    .await?;
    into_persons(rows)
}

pub async fn list_active_employees(conn: &mut PgConnection) -> AppResult<Vec<Person>> {
    let rows = sqlx::query_as::<_, PersonRow>(&format!(
        "{} WHERE p.kind = 'employee' AND e.active = TRUE ORDER BY p.name, p.id",
        SELECT_PERSON
    ))
    .fetch_all(&mut *conn)
    .await?;
    into_persons(rows)
}

struct NewBase<'a> {
    kind: &'a str,
    name: &'a str,
    national_id: &'a str,
    birth_date: chrono::NaiveDate,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    address: Option<&'a str>,
}

async fn insert_base(conn: &mut PgConnection, base: NewBase<'_>) -> AppResult<i32> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO persons (kind, name, national_id, birth_date, email, phone, address)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(base.kind)
    .bind(base.name)
    .bind(base.national_id)
    .bind(base.birth_date)
    .bind(base.email)
    .bind(base.phone)
    .bind(base.address)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "A person with this national id already exists"))
}

/// Insert a client; run inside a transaction
pub async fn create_client(conn: &mut PgConnection, data: &CreateClient) -> AppResult<Person> {
    let id = insert_base(
        conn,
        NewBase {
            kind: "client",
            name: &data.name,
            national_id: &data.national_id,
            birth_date: data.birth_date,
            email: data.email.as_deref(),
            phone: data.phone.as_deref(),
            address: data.address.as_deref(),
        },
    )
    .await?;

    let registered_on = data
        .registered_on
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    sqlx::query("INSERT INTO clients (person_id, registered_on, status) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(registered_on)
        .bind(data.status.unwrap_or_default().as_str())
        .execute(&mut *conn)
        .await?;

    get_by_id(conn, id).await
}

/// Insert an employee; run inside a transaction
pub async fn create_employee(conn: &mut PgConnection, data: &CreateEmployee) -> AppResult<Person> {
    let id = insert_base(
        conn,
        NewBase {
            kind: "employee",
            name: &data.name,
            national_id: &data.national_id,
            birth_date: data.birth_date,
            email: data.email.as_deref(),
            phone: data.phone.as_deref(),
            address: data.address.as_deref(),
        },
    )
    .await?;

    sqlx::query(
        "INSERT INTO employees (person_id, job_role_id, hired_on, salary, active) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(data.job_role_id)
    .bind(data.hired_on)
    .bind(data.salary)
    .bind(data.active.unwrap_or(true))
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "Unknown job role"))?;

    get_by_id(conn, id).await
}

/// Update shared fields of a person
pub async fn update_base(conn: &mut PgConnection, id: i32, data: &UpdatePerson) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE persons
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            address = COALESCE($5, address)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Person with id {} not found", id)));
    }
    Ok(())
}

pub async fn update_client(conn: &mut PgConnection, id: i32, data: &UpdateClient) -> AppResult<()> {
    update_base(conn, id, &data.person).await?;
    if let Some(status) = data.status {
        sqlx::query("UPDATE clients SET status = $2 WHERE person_id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn update_employee(conn: &mut PgConnection, id: i32, data: &UpdateEmployee) -> AppResult<()> {
    update_base(conn, id, &data.person).await?;
    sqlx::query(
        r#"
        UPDATE employees
        SET job_role_id = COALESCE($2, job_role_id),
            salary = COALESCE($3, salary),
            active = COALESCE($4, active)
        WHERE person_id = $1
        "#,
    )
    .bind(id)
    .bind(data.job_role_id)
    .bind(data.salary)
    .bind(data.active)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "Unknown job role"))?;
    Ok(())
}

/// Delete a person; variant rows cascade
pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM persons WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "Person is referenced by loans"))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Person with id {} not found", id)));
    }
    Ok(())
}
