//! Book (catalog entry) and copy (physical instance) models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// ISBN-13, unique across the catalog
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub edition: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 128, message = "Title must be 1 to 128 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 128, message = "Author must be 1 to 128 characters"))]
    pub author: String,
    #[validate(length(equal = 13, message = "ISBN must be 13 characters"))]
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    #[validate(length(max = 32))]
    pub edition: Option<String>,
}

/// Update book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub author: Option<String>,
    #[validate(length(equal = 13, message = "ISBN must be 13 characters"))]
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    #[validate(length(max = 32))]
    pub edition: Option<String>,
}

/// Physical copy of a book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: i32,
    pub book_id: i32,
    pub copy_number: i32,
    /// False while an active loan holds the copy
    pub is_available: bool,
    pub condition: Option<String>,
    pub location: Option<String>,
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookCopy {
    pub book_id: i32,
    #[validate(range(min = 1))]
    pub copy_number: i32,
    #[validate(length(max = 32))]
    pub condition: Option<String>,
    #[validate(length(max = 64))]
    pub location: Option<String>,
}

/// Update copy request (availability is managed by loans)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookCopy {
    #[validate(range(min = 1))]
    pub copy_number: Option<i32>,
    #[validate(length(max = 32))]
    pub condition: Option<String>,
    #[validate(length(max = 64))]
    pub location: Option<String>,
}
