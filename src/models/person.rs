//! Person model: a shared base record plus a client or employee variant

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Client membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Blocked,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Blocked => "blocked",
        }
    }
}

impl Default for ClientStatus {
    fn default() -> Self {
        ClientStatus::Active
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "blocked" => Ok(ClientStatus::Blocked),
            _ => Err(format!("Invalid client status: {}", s)),
        }
    }
}

/// Fields shared by every person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PersonBase {
    pub name: String,
    /// National identification number, unique across persons
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Variant-specific fields, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PersonKind {
    Client {
        registered_on: NaiveDate,
        status: ClientStatus,
    },
    Employee {
        job_role_id: i32,
        /// Joined from the job role, absent when not loaded
        job_role_name: Option<String>,
        hired_on: NaiveDate,
        #[schema(value_type = String, example = "2500.00")]
        salary: Decimal,
        active: bool,
    },
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Client { .. } => "client",
            PersonKind::Employee { .. } => "employee",
        }
    }
}

/// Person record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    pub id: i32,
    #[serde(flatten)]
    pub base: PersonBase,
    pub details: PersonKind,
}

impl Person {
    pub fn is_client(&self) -> bool {
        matches!(self.details, PersonKind::Client { .. })
    }

    pub fn is_employee(&self) -> bool {
        matches!(self.details, PersonKind::Employee { .. })
    }
}

/// Row produced by the persons/clients/employees join
#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    pub id: i32,
    pub kind: String,
    pub name: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub registered_on: Option<NaiveDate>,
    pub client_status: Option<String>,
    pub job_role_id: Option<i32>,
    pub job_role_name: Option<String>,
    pub hired_on: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub active: Option<bool>,
}

fn missing(id: i32, column: &str) -> AppError {
    AppError::Internal(format!("Person {} is missing {}", id, column))
}

impl TryFrom<PersonRow> for Person {
    type Error = AppError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let details = match row.kind.as_str() {
            "client" => PersonKind::Client {
                registered_on: row.registered_on.ok_or_else(|| missing(id, "registered_on"))?,
                status: row
                    .client_status
                    .ok_or_else(|| missing(id, "status"))?
                    .parse()
                    .map_err(AppError::Internal)?,
            },
            "employee" => PersonKind::Employee {
                job_role_id: row.job_role_id.ok_or_else(|| missing(id, "job_role_id"))?,
                job_role_name: row.job_role_name,
                hired_on: row.hired_on.ok_or_else(|| missing(id, "hired_on"))?,
                salary: row.salary.ok_or_else(|| missing(id, "salary"))?,
                active: row.active.unwrap_or(true),
            },
            other => {
                return Err(AppError::Internal(format!(
                    "Person {} has unknown kind {}",
                    id, other
                )))
            }
        };

        Ok(Person {
            id,
            base: PersonBase {
                name: row.name,
                national_id: row.national_id,
                birth_date: row.birth_date,
                email: row.email,
                phone: row.phone,
                address: row.address,
            },
            details,
        })
    }
}

/// Update shared person fields
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePerson {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 16))]
    pub phone: Option<String>,
    #[validate(length(max = 256))]
    pub address: Option<String>,
}

/// Create client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 128, message = "Name must be 1 to 128 characters"))]
    pub name: String,
    #[validate(length(equal = 11, message = "National id must be 11 characters"))]
    pub national_id: String,
    pub birth_date: NaiveDate,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 16))]
    pub phone: Option<String>,
    #[validate(length(max = 256))]
    pub address: Option<String>,
    /// Defaults to today
    pub registered_on: Option<NaiveDate>,
    pub status: Option<ClientStatus>,
}

/// Update client request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(nested)]
    #[serde(flatten)]
    pub person: UpdatePerson,
    pub status: Option<ClientStatus>,
}

/// Create employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 128, message = "Name must be 1 to 128 characters"))]
    pub name: String,
    #[validate(length(equal = 11, message = "National id must be 11 characters"))]
    pub national_id: String,
    pub birth_date: NaiveDate,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 16))]
    pub phone: Option<String>,
    #[validate(length(max = 256))]
    pub address: Option<String>,
    pub job_role_id: i32,
    pub hired_on: NaiveDate,
    #[schema(value_type = String, example = "2500.00")]
    pub salary: Decimal,
    pub active: Option<bool>,
}

/// Update employee request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[validate(nested)]
    #[serde(flatten)]
    pub person: UpdatePerson,
    pub job_role_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub salary: Option<Decimal>,
    pub active: Option<bool>,
}
