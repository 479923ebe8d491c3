//! Job role model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Job role record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct JobRole {
    pub id: i32,
    /// Unique role name
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "2500.00")]
    pub base_salary: Decimal,
    /// Position in the hierarchy (1 = top)
    pub hierarchy_level: i32,
}

/// Create job role request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJobRole {
    #[validate(length(min = 1, max = 64, message = "Name must be 1 to 64 characters"))]
    pub name: String,
    #[validate(length(max = 256))]
    pub description: Option<String>,
    #[schema(value_type = String, example = "2500.00")]
    pub base_salary: Decimal,
    pub hierarchy_level: i32,
}

/// Update job role request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateJobRole {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(length(max = 256))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub base_salary: Option<Decimal>,
    pub hierarchy_level: Option<i32>,
}
