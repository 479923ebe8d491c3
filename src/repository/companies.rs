//! Companies repository

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::company::{Company, CreateCompany, UpdateCompany},
};

pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<Company>> {
    let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY legal_name")
        .fetch_all(&mut *conn)
        .await?;
    Ok(companies)
}

pub async fn get_by_id(conn: &mut PgConnection, id: i32) -> AppResult<Company> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company with id {} not found", id)))
}

pub async fn create(conn: &mut PgConnection, data: &CreateCompany) -> AppResult<Company> {
    sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (tax_id, legal_name, contact_email)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&data.tax_id)
    .bind(&data.legal_name)
    .bind(&data.contact_email)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "A company with this tax id already exists"))
}

pub async fn update(conn: &mut PgConnection, id: i32, data: &UpdateCompany) -> AppResult<Company> {
    sqlx::query_as::<_, Company>(
        r#"
        UPDATE companies
        SET legal_name = COALESCE($2, legal_name),
            contact_email = COALESCE($3, contact_email)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&data.legal_name)
    .bind(&data.contact_email)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Company with id {} not found", id)))
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Company with id {} not found", id)));
    }
    Ok(())
}
