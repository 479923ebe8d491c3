//! Loans repository: Postgres implementation of the loan storage traits

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanReturn, LoanRow, NewLoan},
    services::loans::{CopyDirectory, LoanFilter, LoanStore, PatronDirectory},
};

const LOAN_COLUMNS: &str =
    "id, patron_id, copy_id, checkout_time, due_time, return_time, fine_amount, status";

#[async_trait]
impl PatronDirectory for PgConnection {
    async fn patron_exists(&mut self, patron_id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE person_id = $1)")
                .bind(patron_id)
                .fetch_one(&mut *self)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl CopyDirectory for PgConnection {
    async fn copy_exists(&mut self, copy_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM book_copies WHERE id = $1)")
            .bind(copy_id)
            .fetch_one(&mut *self)
            .await?;
        Ok(exists)
    }

    async fn copy_is_available(&mut self, copy_id: i32) -> AppResult<bool> {
        // Row lock serializes concurrent checkouts of the same copy
        sqlx::query_scalar::<_, bool>("SELECT is_available FROM book_copies WHERE id = $1 FOR UPDATE")
            .bind(copy_id)
            .fetch_optional(&mut *self)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", copy_id)))
    }

    async fn set_copy_available(&mut self, copy_id: i32, available: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_copies SET is_available = $1 WHERE id = $2")
            .bind(available)
            .bind(copy_id)
            .execute(&mut *self)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", copy_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl LoanStore for PgConnection {
    async fn insert_loan(&mut self, loan: &NewLoan) -> AppResult<Loan> {
        let row = sqlx::query_as::<_, LoanRow>(&format!(
            r#"
            INSERT INTO loans (patron_id, copy_id, checkout_time, due_time, fine_amount, status)
            VALUES ($1, $2, $3, $4, 0, 'active')
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan.patron_id)
        .bind(loan.copy_id)
        .bind(loan.checkout_time)
        .bind(loan.due_time)
        .fetch_one(&mut *self)
        .await
        .map_err(|e| AppError::from_constraint(e, &format!("Copy {} is not available", loan.copy_id)))?;

        row.try_into()
    }

    async fn find_loan(&mut self, loan_id: i32) -> AppResult<Option<Loan>> {
        sqlx::query_as::<_, LoanRow>(&format!("SELECT {} FROM loans WHERE id = $1", LOAN_COLUMNS))
            .bind(loan_id)
            .fetch_optional(&mut *self)
            .await?
            .map(Loan::try_from)
            .transpose()
    }

    async fn find_loan_for_update(&mut self, loan_id: i32) -> AppResult<Option<Loan>> {
        sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {} FROM loans WHERE id = $1 FOR UPDATE",
            LOAN_COLUMNS
        ))
        .bind(loan_id)
        .fetch_optional(&mut *self)
        .await?
        .map(Loan::try_from)
        .transpose()
    }

    async fn mark_returned(&mut self, loan_id: i32, closing: &LoanReturn) -> AppResult<Option<Loan>> {
        sqlx::query_as::<_, LoanRow>(&format!(
            r#"
            UPDATE loans
            SET return_time = $2, fine_amount = $3, status = 'returned'
            WHERE id = $1 AND status = 'active'
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan_id)
        .bind(closing.return_time)
        .bind(closing.fine_amount)
        .fetch_optional(&mut *self)
        .await?
        .map(Loan::try_from)
        .transpose()
    }

    async fn list_loans(&mut self, filter: LoanFilter) -> AppResult<Vec<Loan>> {
        let rows = match filter {
            LoanFilter::All => {
                sqlx::query_as::<_, LoanRow>(&format!("SELECT {} FROM loans ORDER BY id", LOAN_COLUMNS))
                    .fetch_all(&mut *self)
                    .await?
            }
            LoanFilter::Patron(patron_id) => {
                sqlx::query_as::<_, LoanRow>(&format!(
                    "SELECT {} FROM loans WHERE patron_id = $1 ORDER BY id",
                    LOAN_COLUMNS
                ))
                .bind(patron_id)
                .fetch_all(&mut *self)
                .await?
            }
            LoanFilter::Copy(copy_id) => {
                sqlx::query_as::<_, LoanRow>(&format!(
                    "SELECT {} FROM loans WHERE copy_id = $1 ORDER BY id",
                    LOAN_COLUMNS
                ))
                .bind(copy_id)
                .fetch_all(&mut *self)
                .await?
            }
        };

        rows.into_iter().map(Loan::try_from).collect()
    }
}

/// Whether any loan, active or returned, references the copy
pub async fn copy_has_loans(conn: &mut PgConnection, copy_id: i32) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE copy_id = $1)")
        .bind(copy_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Whether any loan references the patron
pub async fn patron_has_loans(conn: &mut PgConnection, patron_id: i32) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE patron_id = $1)")
        .bind(patron_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}
