//! Catalog endpoints: books and copies

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookCopy, CreateBook, CreateBookCopy, UpdateBook, UpdateBookCopy},
    AppState,
};

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Books in the catalog", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let mut conn = state.repository.acquire().await?;
    let books = state.services.catalog.list_books(&mut conn).await?;
    Ok(Json(books))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid data or duplicate ISBN")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let mut conn = state.repository.acquire().await?;
    let book = state.services.catalog.create_book(&mut conn, &data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Book>> {
    let mut conn = state.repository.acquire().await?;
    let book = state.services.catalog.get_book(&mut conn, id).await?;
    Ok(Json(book))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid data or duplicate ISBN"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let mut conn = state.repository.acquire().await?;
    let book = state.services.catalog.update_book(&mut conn, id, &data).await?;
    Ok(Json(book))
}

/// Delete a book without copies
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book still has copies"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut tx = state.repository.begin().await?;
    state.services.catalog.delete_book(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<BookCopy>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_copies(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookCopy>>> {
    let mut conn = state.repository.acquire().await?;
    let copies = state.services.catalog.list_book_copies(&mut conn, id).await?;
    Ok(Json(copies))
}

/// List every copy
#[utoipa::path(
    get,
    path = "/books/copies",
    tag = "books",
    responses(
        (status = 200, description = "All copies", body = Vec<BookCopy>)
    )
)]
pub async fn list_copies(State(state): State<AppState>) -> AppResult<Json<Vec<BookCopy>>> {
    let mut conn = state.repository.acquire().await?;
    let copies = state.services.catalog.list_copies(&mut conn).await?;
    Ok(Json(copies))
}

/// Create a copy
#[utoipa::path(
    post,
    path = "/books/copies",
    tag = "books",
    request_body = CreateBookCopy,
    responses(
        (status = 201, description = "Copy created", body = BookCopy),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    Json(data): Json<CreateBookCopy>,
) -> AppResult<(StatusCode, Json<BookCopy>)> {
    let mut conn = state.repository.acquire().await?;
    let copy = state.services.catalog.create_copy(&mut conn, &data).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Get a copy
#[utoipa::path(
    get,
    path = "/books/copies/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy details", body = BookCopy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<BookCopy>> {
    let mut conn = state.repository.acquire().await?;
    let copy = state.services.catalog.get_copy(&mut conn, id).await?;
    Ok(Json(copy))
}

/// Update a copy
#[utoipa::path(
    put,
    path = "/books/copies/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Copy ID")),
    request_body = UpdateBookCopy,
    responses(
        (status = 200, description = "Copy updated", body = BookCopy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_copy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBookCopy>,
) -> AppResult<Json<BookCopy>> {
    let mut conn = state.repository.acquire().await?;
    let copy = state.services.catalog.update_copy(&mut conn, id, &data).await?;
    Ok(Json(copy))
}

/// Delete a copy that was never borrowed
#[utoipa::path(
    delete,
    path = "/books/copies/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 400, description = "Copy is referenced by loans"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_copy(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    let mut tx = state.repository.begin().await?;
    state.services.catalog.delete_copy(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
