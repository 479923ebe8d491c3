//! Books and copies repository

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookCopy, CreateBook, CreateBookCopy, UpdateBook, UpdateBookCopy},
};

/// List all books
pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title, id")
        .fetch_all(&mut *conn)
        .await?;
    Ok(books)
}

/// Get book by ID
pub async fn get_by_id(conn: &mut PgConnection, id: i32) -> AppResult<Book> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
}

/// Whether another book already uses this ISBN
pub async fn isbn_exists(conn: &mut PgConnection, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id != $2))",
    )
    .bind(isbn)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

/// Create a book
pub async fn create(conn: &mut PgConnection, data: &CreateBook) -> AppResult<Book> {
    sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, author, isbn, publisher, publication_year, edition)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.author)
    .bind(&data.isbn)
    .bind(&data.publisher)
    .bind(data.publication_year)
    .bind(&data.edition)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "A book with this ISBN already exists"))
}

/// Update a book (only provided fields)
pub async fn update(conn: &mut PgConnection, id: i32, data: &UpdateBook) -> AppResult<Book> {
    let mut sets: Vec<String> = Vec::new();
    let mut idx = 1;

    macro_rules! add_field {
        ($field:expr, $name:expr) => {
            if $field.is_some() {
                sets.push(format!("{} = ${}", $name, idx));
                idx += 1;
            }
        };
    }

    add_field!(data.title, "title");
    add_field!(data.author, "author");
    add_field!(data.isbn, "isbn");
    add_field!(data.publisher, "publisher");
    add_field!(data.publication_year, "publication_year");
    add_field!(data.edition, "edition");

    if sets.is_empty() {
        return get_by_id(conn, id).await;
    }

    let query = format!(
        "UPDATE books SET {} WHERE id = ${} RETURNING *",
        sets.join(", "),
        idx
    );
    let mut builder = sqlx::query_as::<_, Book>(&query);

    macro_rules! bind_field {
        ($field:expr) => {
            if let Some(ref val) = $field {
                builder = builder.bind(val);
            }
        };
    }

    bind_field!(data.title);
    bind_field!(data.author);
    bind_field!(data.isbn);
    bind_field!(data.publisher);
    bind_field!(data.publication_year);
    bind_field!(data.edition);

    builder
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "A book with this ISBN already exists"))?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
}

/// Delete a book
pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "Book still has copies"))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Book with id {} not found", id)));
    }
    Ok(())
}

/// Count copies of a book
pub async fn count_copies(conn: &mut PgConnection, book_id: i32) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE book_id = $1")
        .bind(book_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// List all copies
pub async fn list_copies(conn: &mut PgConnection) -> AppResult<Vec<BookCopy>> {
    let copies = sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies ORDER BY book_id, copy_number")
        .fetch_all(&mut *conn)
        .await?;
    Ok(copies)
}

/// List copies of one book
pub async fn list_copies_for_book(conn: &mut PgConnection, book_id: i32) -> AppResult<Vec<BookCopy>> {
    let copies = sqlx::query_as::<_, BookCopy>(
        "SELECT * FROM book_copies WHERE book_id = $1 ORDER BY copy_number",
    )
    .bind(book_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(copies)
}

/// Get copy by ID
pub async fn get_copy(conn: &mut PgConnection, id: i32) -> AppResult<BookCopy> {
    sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
}

/// Create a copy; new copies are available
pub async fn create_copy(conn: &mut PgConnection, data: &CreateBookCopy) -> AppResult<BookCopy> {
    let copy = sqlx::query_as::<_, BookCopy>(
        r#"
        INSERT INTO book_copies (book_id, copy_number, is_available, condition, location)
        VALUES ($1, $2, TRUE, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.book_id)
    .bind(data.copy_number)
    .bind(&data.condition)
    .bind(&data.location)
    .fetch_one(&mut *conn)
    .await?;
    Ok(copy)
}

/// Update copy details
pub async fn update_copy(conn: &mut PgConnection, id: i32, data: &UpdateBookCopy) -> AppResult<BookCopy> {
    sqlx::query_as::<_, BookCopy>(
        r#"
        UPDATE book_copies
        SET copy_number = COALESCE($2, copy_number),
            condition = COALESCE($3, condition),
            location = COALESCE($4, location)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(data.copy_number)
    .bind(&data.condition)
    .bind(&data.location)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
}

/// Delete a copy
pub async fn delete_copy(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM book_copies WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "Copy is referenced by loans"))?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
    }
    Ok(())
}
