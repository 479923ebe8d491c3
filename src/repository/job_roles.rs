//! Job roles repository

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::job_role::{CreateJobRole, JobRole, UpdateJobRole},
};

pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<JobRole>> {
    let roles = sqlx::query_as::<_, JobRole>("SELECT * FROM job_roles ORDER BY hierarchy_level, name")
        .fetch_all(&mut *conn)
        .await?;
    Ok(roles)
}

pub async fn get_by_id(conn: &mut PgConnection, id: i32) -> AppResult<JobRole> {
    sqlx::query_as::<_, JobRole>("SELECT * FROM job_roles WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job role with id {} not found", id)))
}

pub async fn exists(conn: &mut PgConnection, id: i32) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM job_roles WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Whether another role already uses this name
pub async fn name_exists(conn: &mut PgConnection, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM job_roles WHERE name = $1 AND ($2::int IS NULL OR id != $2))",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

pub async fn create(conn: &mut PgConnection, data: &CreateJobRole) -> AppResult<JobRole> {
    sqlx::query_as::<_, JobRole>(
        r#"
        INSERT INTO job_roles (name, description, base_salary, hierarchy_level)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.base_salary)
    .bind(data.hierarchy_level)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "A job role with this name already exists"))
}

pub async fn update(conn: &mut PgConnection, id: i32, data: &UpdateJobRole) -> AppResult<JobRole> {
    sqlx::query_as::<_, JobRole>(
        r#"
        UPDATE job_roles
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            base_salary = COALESCE($4, base_salary),
            hierarchy_level = COALESCE($5, hierarchy_level)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.base_salary)
    .bind(data.hierarchy_level)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "A job role with this name already exists"))?
    .ok_or_else(|| AppError::NotFound(format!("Job role with id {} not found", id)))
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM job_roles WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "Job role still has employees"))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job role with id {} not found", id)));
    }
    Ok(())
}

/// Count employees holding a role
pub async fn count_employees(conn: &mut PgConnection, id: i32) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE job_role_id = $1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
