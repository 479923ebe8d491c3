//! Company model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Company record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Company {
    pub id: i32,
    /// Company tax registration number, unique
    pub tax_id: String,
    pub legal_name: String,
    pub contact_email: String,
}

/// Create company request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompany {
    #[validate(length(equal = 14, message = "Tax id must be 14 characters"))]
    pub tax_id: String,
    #[validate(length(min = 1, max = 128))]
    pub legal_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: String,
}

/// Update company request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompany {
    #[validate(length(min = 1, max = 128))]
    pub legal_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,
}
