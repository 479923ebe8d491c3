//! Job roles service

use sqlx::PgConnection;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        job_role::{CreateJobRole, JobRole, UpdateJobRole},
        person::Person,
    },
    repository::{job_roles, persons},
};

#[derive(Clone, Default)]
pub struct JobRolesService;

impl JobRolesService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, conn: &mut PgConnection) -> AppResult<Vec<JobRole>> {
        job_roles::list(conn).await
    }

    pub async fn get_by_id(&self, conn: &mut PgConnection, id: i32) -> AppResult<JobRole> {
        job_roles::get_by_id(conn, id).await
    }

    pub async fn create(&self, conn: &mut PgConnection, data: &CreateJobRole) -> AppResult<JobRole> {
        data.validate()?;
        if job_roles::name_exists(conn, &data.name, None).await? {
            return Err(AppError::Conflict("A job role with this name already exists".to_string()));
        }
        job_roles::create(conn, data).await
    }

    pub async fn update(&self, conn: &mut PgConnection, id: i32, data: &UpdateJobRole) -> AppResult<JobRole> {
        data.validate()?;
        if let Some(ref name) = data.name {
            if job_roles::name_exists(conn, name, Some(id)).await? {
                return Err(AppError::Conflict("A job role with this name already exists".to_string()));
            }
        }
        job_roles::update(conn, id, data).await
    }

    /// Delete a role no employee holds
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        job_roles::get_by_id(conn, id).await?;
        if job_roles::count_employees(conn, id).await? > 0 {
            return Err(AppError::Conflict(
                "Cannot delete this job role while employees are assigned to it".to_string(),
            ));
        }
        job_roles::delete(conn, id).await
    }

    pub async fn list_employees(&self, conn: &mut PgConnection, id: i32) -> AppResult<Vec<Person>> {
        job_roles::get_by_id(conn, id).await?;
        persons::list_employees_by_role(conn, id).await
    }
}
