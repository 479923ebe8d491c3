//! Catalog service: books and their physical copies

use sqlx::PgConnection;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookCopy, CreateBook, CreateBookCopy, UpdateBook, UpdateBookCopy},
    repository::{books, loans},
};

#[derive(Clone, Default)]
pub struct CatalogService;

impl CatalogService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_books(&self, conn: &mut PgConnection) -> AppResult<Vec<Book>> {
        books::list(conn).await
    }

    pub async fn get_book(&self, conn: &mut PgConnection, id: i32) -> AppResult<Book> {
        books::get_by_id(conn, id).await
    }

    /// Create a book; ISBNs are unique
    pub async fn create_book(&self, conn: &mut PgConnection, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        if books::isbn_exists(conn, &data.isbn, None).await? {
            return Err(AppError::Conflict("A book with this ISBN already exists".to_string()));
        }
        let book = books::create(conn, data).await?;
        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    pub async fn update_book(&self, conn: &mut PgConnection, id: i32, data: &UpdateBook) -> AppResult<Book> {
        data.validate()?;
        if let Some(ref isbn) = data.isbn {
            if books::isbn_exists(conn, isbn, Some(id)).await? {
                return Err(AppError::Conflict("A book with this ISBN already exists".to_string()));
            }
        }
        books::update(conn, id, data).await
    }

    /// Delete a book that has no copies left
    pub async fn delete_book(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        books::get_by_id(conn, id).await?;
        let copies = books::count_copies(conn, id).await?;
        if copies > 0 {
            return Err(AppError::Conflict(format!(
                "Book {} still has {} copies",
                id, copies
            )));
        }
        books::delete(conn, id).await
    }

    pub async fn list_book_copies(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<Vec<BookCopy>> {
        books::get_by_id(conn, book_id).await?;
        books::list_copies_for_book(conn, book_id).await
    }

    pub async fn list_copies(&self, conn: &mut PgConnection) -> AppResult<Vec<BookCopy>> {
        books::list_copies(conn).await
    }

    pub async fn get_copy(&self, conn: &mut PgConnection, id: i32) -> AppResult<BookCopy> {
        books::get_copy(conn, id).await
    }

    pub async fn create_copy(&self, conn: &mut PgConnection, data: &CreateBookCopy) -> AppResult<BookCopy> {
        data.validate()?;
        books::get_by_id(conn, data.book_id).await?;
        let copy = books::create_copy(conn, data).await?;
        tracing::info!(copy_id = copy.id, book_id = copy.book_id, "Copy created");
        Ok(copy)
    }

    pub async fn update_copy(&self, conn: &mut PgConnection, id: i32, data: &UpdateBookCopy) -> AppResult<BookCopy> {
        data.validate()?;
        books::get_copy(conn, id).await?;
        let copy = books::update_copy(conn, id, data).await?;
        tracing::info!(copy_id = copy.id, "Copy updated");
        Ok(copy)
    }

    /// Delete a copy that was never borrowed
    pub async fn delete_copy(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        books::get_copy(conn, id).await?;
        if loans::copy_has_loans(conn, id).await? {
            return Err(AppError::Conflict(format!("Copy {} is referenced by loans", id)));
        }
        books::delete_copy(conn, id).await
    }
}
