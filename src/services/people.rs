//! People service: persons, clients and employees

use sqlx::PgConnection;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::person::{
        ClientStatus, CreateClient, CreateEmployee, Person, PersonKind, UpdateClient, UpdateEmployee,
        UpdatePerson,
    },
    repository::{job_roles, loans, persons},
};

#[derive(Clone, Default)]
pub struct PeopleService;

impl PeopleService {
    pub fn new() -> Self {
        Self
    }

    // ---------------------------------------------------------------------
    // Persons (any kind)
    // ---------------------------------------------------------------------

    pub async fn list_persons(&self, conn: &mut PgConnection) -> AppResult<Vec<Person>> {
        persons::list(conn, None).await
    }

    pub async fn get_person(&self, conn: &mut PgConnection, id: i32) -> AppResult<Person> {
        persons::get_by_id(conn, id).await
    }

    pub async fn get_by_national_id(&self, conn: &mut PgConnection, national_id: &str) -> AppResult<Person> {
        persons::get_by_national_id(conn, national_id).await
    }

    pub async fn update_person(&self, conn: &mut PgConnection, id: i32, data: &UpdatePerson) -> AppResult<Person> {
        data.validate()?;
        persons::update_base(conn, id, data).await?;
        persons::get_by_id(conn, id).await
    }

    /// Delete a person; clients with loan history cannot be removed
    pub async fn delete_person(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        let person = persons::get_by_id(conn, id).await?;
        if let PersonKind::Client { .. } = person.details {
            if loans::patron_has_loans(conn, id).await? {
                return Err(AppError::Conflict(format!("Client {} has loans on record", id)));
            }
        }
        persons::delete(conn, id).await?;
        tracing::info!(person_id = id, kind = person.details.as_str(), "Person deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Clients
    // ---------------------------------------------------------------------

    pub async fn create_client(&self, conn: &mut PgConnection, data: &CreateClient) -> AppResult<Person> {
        data.validate()?;
        if persons::national_id_exists(conn, &data.national_id).await? {
            return Err(AppError::Conflict(
                "A person with this national id already exists".to_string(),
            ));
        }
        let client = persons::create_client(conn, data).await?;
        tracing::info!(person_id = client.id, "Client created");
        Ok(client)
    }

    pub async fn list_clients(&self, conn: &mut PgConnection) -> AppResult<Vec<Person>> {
        persons::list(conn, Some("client")).await
    }

    pub async fn list_clients_by_status(&self, conn: &mut PgConnection, status: ClientStatus) -> AppResult<Vec<Person>> {
        persons::list_clients_by_status(conn, status).await
    }

    pub async fn get_client(&self, conn: &mut PgConnection, id: i32) -> AppResult<Person> {
        persons::find_by_id(conn, id)
            .await?
            .filter(Person::is_client)
            .ok_or_else(|| client_not_found(id))
    }

    pub async fn update_client(&self, conn: &mut PgConnection, id: i32, data: &UpdateClient) -> AppResult<Person> {
        data.validate()?;
        self.get_client(conn, id).await?;
        persons::update_client(conn, id, data).await?;
        persons::get_by_id(conn, id).await
    }

    pub async fn delete_client(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        self.get_client(conn, id).await?;
        self.delete_person(conn, id).await
    }

    // ---------------------------------------------------------------------
    // Employees
    // ---------------------------------------------------------------------

    pub async fn create_employee(&self, conn: &mut PgConnection, data: &CreateEmployee) -> AppResult<Person> {
        data.validate()?;
        if persons::national_id_exists(conn, &data.national_id).await? {
            return Err(AppError::Conflict(
                "A person with this national id already exists".to_string(),
            ));
        }
        if !job_roles::exists(conn, data.job_role_id).await? {
            return Err(job_role_not_found(data.job_role_id));
        }
        let employee = persons::create_employee(conn, data).await?;
        tracing::info!(person_id = employee.id, job_role_id = data.job_role_id, "Employee created");
        Ok(employee)
    }

    pub async fn list_employees(&self, conn: &mut PgConnection) -> AppResult<Vec<Person>> {
        persons::list(conn, Some("employee")).await
    }

    pub async fn list_active_employees(&self, conn: &mut PgConnection) -> AppResult<Vec<Person>> {
        persons::list_active_employees(conn).await
    }

    pub async fn list_employees_by_job_role(&self, conn: &mut PgConnection, job_role_id: i32) -> AppResult<Vec<Person>> {
        if !job_roles::exists(conn, job_role_id).await? {
            return Err(job_role_not_found(job_role_id));
        }
        persons::list_employees_by_role(conn, job_role_id).await
    }

    pub async fn get_employee(&self, conn: &mut PgConnection, id: i32) -> AppResult<Person> {
        persons::find_by_id(conn, id)
            .await?
            .filter(Person::is_employee)
            .ok_or_else(|| employee_not_found(id))
    }

    pub async fn update_employee(&self, conn: &mut PgConnection, id: i32, data: &UpdateEmployee) -> AppResult<Person> {
        data.validate()?;
        self.get_employee(conn, id).await?;
        if let Some(job_role_id) = data.job_role_id {
            if !job_roles::exists(conn, job_role_id).await? {
                return Err(job_role_not_found(job_role_id));
            }
        }
        persons::update_employee(conn, id, data).await?;
        persons::get_by_id(conn, id).await
    }

    pub async fn delete_employee(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        self.get_employee(conn, id).await?;
        self.delete_person(conn, id).await
    }
}

fn client_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Client with id {} not found", id))
}

fn employee_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Employee with id {} not found", id))
}

fn job_role_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Job role with id {} not found", id))
}
