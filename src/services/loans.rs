//! Loan management service
//!
//! Opening a loan flips the copy to unavailable and closing it computes the
//! fine and flips the copy back. Callers pass the storage handle; for the
//! two mutating operations it must be a transaction so the loan write and the
//! availability flip commit together.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{compute_fine, CreateLoan, Loan, LoanReturn, NewLoan},
};

/// Source of the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Lookup of patrons (clients) eligible to hold loans
#[async_trait]
pub trait PatronDirectory: Send {
    async fn patron_exists(&mut self, patron_id: i32) -> AppResult<bool>;
}

/// Lookup and availability control of book copies
#[async_trait]
pub trait CopyDirectory: Send {
    async fn copy_exists(&mut self, copy_id: i32) -> AppResult<bool>;

    /// Current availability. Inside a transaction the copy stays locked
    /// until commit or rollback.
    async fn copy_is_available(&mut self, copy_id: i32) -> AppResult<bool>;

    async fn set_copy_available(&mut self, copy_id: i32, available: bool) -> AppResult<()>;
}

/// Which loans to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanFilter {
    All,
    Patron(i32),
    Copy(i32),
}

/// Loan persistence
#[async_trait]
pub trait LoanStore: Send {
    async fn insert_loan(&mut self, loan: &NewLoan) -> AppResult<Loan>;

    async fn find_loan(&mut self, loan_id: i32) -> AppResult<Option<Loan>>;

    /// Like `find_loan`, locking the loan for the rest of the transaction
    async fn find_loan_for_update(&mut self, loan_id: i32) -> AppResult<Option<Loan>>;

    /// Close an active loan; `None` when the loan is no longer active
    async fn mark_returned(&mut self, loan_id: i32, closing: &LoanReturn) -> AppResult<Option<Loan>>;

    async fn list_loans(&mut self, filter: LoanFilter) -> AppResult<Vec<Loan>>;
}

/// Everything a loan operation touches, reachable through one handle
pub trait LoanUnitOfWork: PatronDirectory + CopyDirectory + LoanStore {}

impl<T: PatronDirectory + CopyDirectory + LoanStore + ?Sized> LoanUnitOfWork for T {}

#[derive(Clone)]
pub struct LoansService {
    clock: Arc<dyn Clock>,
    fine_per_day: Decimal,
}

impl LoansService {
    pub fn new(config: &LoansConfig) -> Self {
        Self::with_clock(config.fine_per_day, Arc::new(SystemClock))
    }

    pub fn with_clock(fine_per_day: Decimal, clock: Arc<dyn Clock>) -> Self {
        Self { clock, fine_per_day }
    }

    /// Check a copy out to a patron
    pub async fn open_loan<S>(&self, store: &mut S, request: &CreateLoan) -> AppResult<Loan>
    where
        S: LoanUnitOfWork + ?Sized,
    {
        let now = self.clock.now();

        if request.due_time <= now {
            return Err(AppError::Validation(
                "Due time must be after the checkout time".to_string(),
            ));
        }

        if !store.patron_exists(request.patron_id).await? {
            return Err(AppError::NotFound(format!(
                "Patron with id {} not found",
                request.patron_id
            )));
        }

        if !store.copy_exists(request.copy_id).await? {
            return Err(AppError::NotFound(format!(
                "Copy with id {} not found",
                request.copy_id
            )));
        }

        if !store.copy_is_available(request.copy_id).await? {
            tracing::warn!(copy_id = request.copy_id, "Checkout refused, copy unavailable");
            return Err(AppError::Conflict(format!(
                "Copy {} is not available",
                request.copy_id
            )));
        }

        let loan = store
            .insert_loan(&NewLoan {
                patron_id: request.patron_id,
                copy_id: request.copy_id,
                checkout_time: now,
                due_time: request.due_time,
            })
            .await?;
        store.set_copy_available(request.copy_id, false).await?;

        tracing::info!(
            loan_id = loan.id,
            patron_id = loan.patron_id,
            copy_id = loan.copy_id,
            "Loan opened"
        );
        Ok(loan)
    }

    /// Return the copy held by a loan, charging the overdue fine
    pub async fn close_loan<S>(&self, store: &mut S, loan_id: i32) -> AppResult<Loan>
    where
        S: LoanUnitOfWork + ?Sized,
    {
        let loan = store
            .find_loan_for_update(loan_id)
            .await?
            .ok_or_else(|| loan_not_found(loan_id))?;

        if !loan.is_active() {
            tracing::warn!(loan_id, "Return refused, loan already returned");
            return Err(already_returned(loan_id));
        }

        let now = self.clock.now();
        let closing = LoanReturn {
            return_time: now,
            fine_amount: compute_fine(loan.due_time, now, self.fine_per_day),
        };

        let closed = store
            .mark_returned(loan_id, &closing)
            .await?
            .ok_or_else(|| already_returned(loan_id))?;
        store.set_copy_available(closed.copy_id, true).await?;

        tracing::info!(
            loan_id,
            copy_id = closed.copy_id,
            fine = %closed.fine_amount,
            "Loan returned"
        );
        Ok(closed)
    }

    /// Get a loan by ID
    pub async fn get_loan<S>(&self, store: &mut S, loan_id: i32) -> AppResult<Loan>
    where
        S: LoanUnitOfWork + ?Sized,
    {
        store
            .find_loan(loan_id)
            .await?
            .ok_or_else(|| loan_not_found(loan_id))
    }

    /// List every loan
    pub async fn list_loans<S>(&self, store: &mut S) -> AppResult<Vec<Loan>>
    where
        S: LoanUnitOfWork + ?Sized,
    {
        store.list_loans(LoanFilter::All).await
    }

    /// List the loans of a patron
    pub async fn list_loans_by_patron<S>(&self, store: &mut S, patron_id: i32) -> AppResult<Vec<Loan>>
    where
        S: LoanUnitOfWork + ?Sized,
    {
        if !store.patron_exists(patron_id).await? {
            return Err(AppError::NotFound(format!("Patron with id {} not found", patron_id)));
        }
        store.list_loans(LoanFilter::Patron(patron_id)).await
    }

    /// List the loans of a copy
    pub async fn list_loans_by_copy<S>(&self, store: &mut S, copy_id: i32) -> AppResult<Vec<Loan>>
    where
        S: LoanUnitOfWork + ?Sized,
    {
        if !store.copy_exists(copy_id).await? {
            return Err(AppError::NotFound(format!("Copy with id {} not found", copy_id)));
        }
        store.list_loans(LoanFilter::Copy(copy_id)).await
    }
}

fn loan_not_found(loan_id: i32) -> AppError {
    AppError::NotFound(format!("Loan with id {} not found", loan_id))
}

fn already_returned(loan_id: i32) -> AppError {
    AppError::Conflict(format!("Loan {} was already returned", loan_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loan::LoanStatus;
    use chrono::{Duration, TimeZone};
    use std::collections::{HashMap, HashSet};
    use tokio::sync::Mutex;

    /// In-memory library; holding `&mut` to it stands in for a transaction
    #[derive(Default)]
    struct MemoryLibrary {
        patrons: HashSet<i32>,
        copies: HashMap<i32, bool>,
        loans: Vec<Loan>,
    }

    impl MemoryLibrary {
        fn with(patrons: &[i32], copies: &[i32]) -> Self {
            Self {
                patrons: patrons.iter().copied().collect(),
                copies: copies.iter().map(|id| (*id, true)).collect(),
                loans: Vec::new(),
            }
        }

        fn available(&self, copy_id: i32) -> bool {
            self.copies[&copy_id]
        }
    }

    #[async_trait]
    impl PatronDirectory for MemoryLibrary {
        async fn patron_exists(&mut self, patron_id: i32) -> AppResult<bool> {
            Ok(self.patrons.contains(&patron_id))
        }
    }

    #[async_trait]
    impl CopyDirectory for MemoryLibrary {
        async fn copy_exists(&mut self, copy_id: i32) -> AppResult<bool> {
            Ok(self.copies.contains_key(&copy_id))
        }

        async fn copy_is_available(&mut self, copy_id: i32) -> AppResult<bool> {
            self.copies
                .get(&copy_id)
                .copied()
                .ok_or_else(|| AppError::NotFound("copy".to_string()))
        }

        async fn set_copy_available(&mut self, copy_id: i32, available: bool) -> AppResult<()> {
            self.copies.insert(copy_id, available);
            Ok(())
        }
    }

    #[async_trait]
    impl LoanStore for MemoryLibrary {
        async fn insert_loan(&mut self, loan: &NewLoan) -> AppResult<Loan> {
            let loan = Loan {
                id: self.loans.len() as i32 + 1,
                patron_id: loan.patron_id,
                copy_id: loan.copy_id,
                checkout_time: loan.checkout_time,
                due_time: loan.due_time,
                return_time: None,
                fine_amount: Decimal::ZERO,
                status: LoanStatus::Active,
            };
            self.loans.push(loan.clone());
            Ok(loan)
        }

        async fn find_loan(&mut self, loan_id: i32) -> AppResult<Option<Loan>> {
            Ok(self.loans.iter().find(|l| l.id == loan_id).cloned())
        }

        async fn find_loan_for_update(&mut self, loan_id: i32) -> AppResult<Option<Loan>> {
            self.find_loan(loan_id).await
        }

        async fn mark_returned(&mut self, loan_id: i32, closing: &LoanReturn) -> AppResult<Option<Loan>> {
            let Some(loan) = self
                .loans
                .iter_mut()
                .find(|l| l.id == loan_id && l.status == LoanStatus::Active)
            else {
                return Ok(None);
            };
            loan.return_time = Some(closing.return_time);
            loan.fine_amount = closing.fine_amount;
            loan.status = LoanStatus::Returned;
            Ok(Some(loan.clone()))
        }

        async fn list_loans(&mut self, filter: LoanFilter) -> AppResult<Vec<Loan>> {
            Ok(self
                .loans
                .iter()
                .filter(|l| match filter {
                    LoanFilter::All => true,
                    LoanFilter::Patron(id) => l.patron_id == id,
                    LoanFilter::Copy(id) => l.copy_id == id,
                })
                .cloned()
                .collect())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap()
    }

    fn service_at(now: DateTime<Utc>) -> LoansService {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now);
        LoansService::with_clock(Decimal::new(200, 2), Arc::new(clock))
    }

    fn request(patron_id: i32, copy_id: i32, due_time: DateTime<Utc>) -> CreateLoan {
        CreateLoan {
            patron_id,
            copy_id,
            due_time,
        }
    }

    #[tokio::test]
    async fn test_open_loan_marks_copy_unavailable() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let due = t0() + Duration::days(7);

        let loan = service_at(t0())
            .open_loan(&mut lib, &request(1, 10, due))
            .await
            .unwrap();

        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.checkout_time, t0());
        assert_eq!(loan.due_time, due);
        assert_eq!(loan.return_time, None);
        assert_eq!(loan.fine_amount, Decimal::ZERO);
        assert!(!lib.available(10));
    }

    #[tokio::test]
    async fn test_open_loan_checks_patron_before_copy() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let service = service_at(t0());
        let due = t0() + Duration::days(7);

        let err = service.open_loan(&mut lib, &request(99, 99, due)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("Patron")));

        let err = service.open_loan(&mut lib, &request(1, 99, due)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("Copy")));
        assert!(lib.loans.is_empty());
    }

    #[tokio::test]
    async fn test_open_loan_rejects_due_time_not_in_future() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);

        let err = service_at(t0())
            .open_loan(&mut lib, &request(1, 10, t0()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(lib.available(10));
    }

    #[tokio::test]
    async fn test_unavailable_copy_conflicts_for_any_patron() {
        let mut lib = MemoryLibrary::with(&[1, 2], &[10]);
        let service = service_at(t0());
        let due = t0() + Duration::days(7);
        service.open_loan(&mut lib, &request(1, 10, due)).await.unwrap();

        for patron in [1, 2] {
            let err = service.open_loan(&mut lib, &request(patron, 10, due)).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
        assert_eq!(lib.loans.len(), 1);
    }

    #[tokio::test]
    async fn test_close_loan_on_time_has_no_fine() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let due = t0() + Duration::days(7);
        let loan = service_at(t0()).open_loan(&mut lib, &request(1, 10, due)).await.unwrap();

        let closed = service_at(due - Duration::hours(1))
            .close_loan(&mut lib, loan.id)
            .await
            .unwrap();

        assert_eq!(closed.status, LoanStatus::Returned);
        assert_eq!(closed.return_time, Some(due - Duration::hours(1)));
        assert_eq!(closed.fine_amount, Decimal::ZERO);
        assert!(lib.available(10));
    }

    #[tokio::test]
    async fn test_close_loan_charges_whole_late_days() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let due = t0() + Duration::days(7);
        let loan = service_at(t0()).open_loan(&mut lib, &request(1, 10, due)).await.unwrap();

        let closed = service_at(due + Duration::days(3) + Duration::hours(1))
            .close_loan(&mut lib, loan.id)
            .await
            .unwrap();

        assert_eq!(closed.fine_amount, Decimal::new(600, 2));
    }

    #[tokio::test]
    async fn test_second_close_conflicts_and_changes_nothing() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let due = t0() + Duration::days(7);
        let loan = service_at(t0()).open_loan(&mut lib, &request(1, 10, due)).await.unwrap();
        let first = service_at(due + Duration::days(2))
            .close_loan(&mut lib, loan.id)
            .await
            .unwrap();

        let err = service_at(due + Duration::days(5))
            .close_loan(&mut lib, loan.id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let stored = service_at(t0()).get_loan(&mut lib, loan.id).await.unwrap();
        assert_eq!(stored, first);
        assert_eq!(stored.fine_amount, Decimal::new(400, 2));
    }

    #[tokio::test]
    async fn test_close_unknown_loan_is_not_found() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let err = service_at(t0()).close_loan(&mut lib, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_checkout_return_checkout_cycle() {
        let mut lib = MemoryLibrary::with(&[1, 2], &[10]);
        let due = t0() + Duration::days(7);
        let at_start = service_at(t0());

        let first = at_start.open_loan(&mut lib, &request(1, 10, due)).await.unwrap();
        assert!(!lib.available(10));

        let err = at_start.open_loan(&mut lib, &request(2, 10, due)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let nine_days_later = service_at(t0() + Duration::days(9));
        let closed = nine_days_later.close_loan(&mut lib, first.id).await.unwrap();
        assert_eq!(closed.fine_amount, Decimal::new(400, 2));
        assert!(lib.available(10));

        let again = nine_days_later
            .open_loan(&mut lib, &request(2, 10, t0() + Duration::days(16)))
            .await
            .unwrap();
        assert_eq!(again.patron_id, 2);
        assert!(!lib.available(10));
    }

    #[tokio::test]
    async fn test_get_loan_matches_opened_loan() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let service = service_at(t0());
        let opened = service
            .open_loan(&mut lib, &request(1, 10, t0() + Duration::days(7)))
            .await
            .unwrap();

        assert_eq!(service.get_loan(&mut lib, opened.id).await.unwrap(), opened);
        assert!(matches!(
            service.get_loan(&mut lib, opened.id + 1).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_loans_by_patron_and_copy() {
        let mut lib = MemoryLibrary::with(&[1, 2], &[10, 11]);
        let service = service_at(t0());
        let due = t0() + Duration::days(7);
        service.open_loan(&mut lib, &request(1, 10, due)).await.unwrap();
        service.open_loan(&mut lib, &request(2, 11, due)).await.unwrap();

        assert_eq!(service.list_loans(&mut lib).await.unwrap().len(), 2);

        let by_patron = service.list_loans_by_patron(&mut lib, 2).await.unwrap();
        assert_eq!(by_patron.len(), 1);
        assert_eq!(by_patron[0].copy_id, 11);

        let by_copy = service.list_loans_by_copy(&mut lib, 10).await.unwrap();
        assert_eq!(by_copy.len(), 1);
        assert_eq!(by_copy[0].patron_id, 1);
    }

    #[tokio::test]
    async fn test_listing_for_unknown_references_is_not_found() {
        let mut lib = MemoryLibrary::with(&[1], &[10]);
        let service = service_at(t0());

        assert!(matches!(
            service.list_loans_by_patron(&mut lib, 5).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.list_loans_by_copy(&mut lib, 50).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.list_loans_by_patron(&mut lib, 1).await.unwrap().is_empty());
    }

    /// Checkouts racing for the store handle, one transaction at a time
    #[tokio::test]
    async fn test_serialized_checkouts_of_one_copy() {
        let lib = Arc::new(Mutex::new(MemoryLibrary::with(&[1, 2, 3, 4], &[10])));
        let service = service_at(t0());
        let due = t0() + Duration::days(7);

        let mut handles = Vec::new();
        for patron in 1..=4 {
            let lib = lib.clone();
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let mut tx = lib.lock().await;
                service.open_loan(&mut *tx, &request(patron, 10, due)).await
            }));
        }

        let mut opened = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => opened += 1,
                Err(err) => assert!(matches!(err, AppError::Conflict(_))),
            }
        }

        assert_eq!(opened, 1);
        let lib = lib.lock().await;
        assert_eq!(lib.loans.iter().filter(|l| l.is_active()).count(), 1);
    }
}
