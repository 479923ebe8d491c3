//! Companies service

use sqlx::PgConnection;
use validator::Validate;

use crate::{
    error::AppResult,
    models::company::{Company, CreateCompany, UpdateCompany},
    repository::companies,
};

#[derive(Clone, Default)]
pub struct CompaniesService;

impl CompaniesService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, conn: &mut PgConnection) -> AppResult<Vec<Company>> {
        companies::list(conn).await
    }

    pub async fn get_by_id(&self, conn: &mut PgConnection, id: i32) -> AppResult<Company> {
        companies::get_by_id(conn, id).await
    }

    pub async fn create(&self, conn: &mut PgConnection, data: &CreateCompany) -> AppResult<Company> {
        data.validate()?;
        companies::create(conn, data).await
    }

    pub async fn update(&self, conn: &mut PgConnection, id: i32, data: &UpdateCompany) -> AppResult<Company> {
        data.validate()?;
        companies::update(conn, id, data).await
    }

    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        companies::get_by_id(conn, id).await?;
        companies::delete(conn, id).await?;
        tracing::info!(company_id = id, "Company deleted");
        Ok(())
    }
}
