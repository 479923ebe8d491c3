//! Loan (checkout) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan lifecycle status.
///
/// `Overdue` is accepted and stored for display purposes only; loans move
/// from `Active` to `Returned` and nothing ever assigns `Overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
    Overdue,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            "overdue" => Ok(LoanStatus::Overdue),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// Internal row structure for database queries (status as text)
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    id: i32,
    patron_id: i32,
    copy_id: i32,
    checkout_time: DateTime<Utc>,
    due_time: DateTime<Utc>,
    return_time: Option<DateTime<Utc>>,
    fine_amount: Decimal,
    status: String,
}

impl TryFrom<LoanRow> for Loan {
    type Error = crate::error::AppError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(crate::error::AppError::Internal)?;

        // Postgres hands back a bare `0` for zero NUMERIC values
        let mut fine_amount = row.fine_amount;
        fine_amount.rescale(2);

        Ok(Loan {
            id: row.id,
            patron_id: row.patron_id,
            copy_id: row.copy_id,
            checkout_time: row.checkout_time,
            due_time: row.due_time,
            return_time: row.return_time,
            fine_amount,
            status,
        })
    }
}

/// Loan record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: i32,
    /// Client holding the loan
    pub patron_id: i32,
    /// Borrowed book copy
    pub copy_id: i32,
    pub checkout_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    /// Set once, when the copy comes back
    pub return_time: Option<DateTime<Utc>>,
    #[schema(value_type = String, example = "0.00")]
    pub fine_amount: Decimal,
    pub status: LoanStatus,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

/// Values needed to insert a loan
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub patron_id: i32,
    pub copy_id: i32,
    pub checkout_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
}

/// Fields written when a loan is closed
#[derive(Debug, Clone)]
pub struct LoanReturn {
    pub return_time: DateTime<Utc>,
    pub fine_amount: Decimal,
}

/// Checkout request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    /// Client ID
    pub patron_id: i32,
    /// Book copy ID
    pub copy_id: i32,
    /// When the copy must be back (ISO 8601)
    pub due_time: DateTime<Utc>,
}

/// Fine owed for a return at `returned_at`.
///
/// Only whole days past `due_time` are charged; a return at or before the
/// due time costs nothing.
pub fn compute_fine(due_time: DateTime<Utc>, returned_at: DateTime<Utc>, per_day: Decimal) -> Decimal {
    if returned_at <= due_time {
        return Decimal::ZERO;
    }
    let late_days = (returned_at - due_time).num_days();
    Decimal::from(late_days) * per_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn rate() -> Decimal {
        Decimal::new(200, 2)
    }

    #[test]
    fn test_fine_counts_whole_late_days() {
        let returned = due() + Duration::days(3) + Duration::hours(1);
        assert_eq!(compute_fine(due(), returned, rate()), Decimal::new(600, 2));
    }

    #[test]
    fn test_fine_is_zero_when_early() {
        let returned = due() - Duration::hours(1);
        assert_eq!(compute_fine(due(), returned, rate()), Decimal::ZERO);
    }

    #[test]
    fn test_fine_is_zero_on_due_time() {
        assert_eq!(compute_fine(due(), due(), rate()), Decimal::ZERO);
    }

    #[test]
    fn test_fine_is_zero_within_first_late_day() {
        let returned = due() + Duration::hours(23);
        assert_eq!(compute_fine(due(), returned, rate()), Decimal::ZERO);
    }

    #[test]
    fn test_fine_has_no_cap() {
        let returned = due() + Duration::days(400);
        assert_eq!(compute_fine(due(), returned, rate()), Decimal::new(80000, 2));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("active".parse::<LoanStatus>().unwrap(), LoanStatus::Active);
        assert_eq!("Returned".parse::<LoanStatus>().unwrap(), LoanStatus::Returned);
        assert_eq!("overdue".parse::<LoanStatus>().unwrap(), LoanStatus::Overdue);
        assert!("lost".parse::<LoanStatus>().is_err());
    }

    fn row(fine_amount: Decimal, status: &str) -> LoanRow {
        LoanRow {
            id: 1,
            patron_id: 2,
            copy_id: 3,
            checkout_time: due() - Duration::days(7),
            due_time: due(),
            return_time: None,
            fine_amount,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_zero_fine_keeps_two_decimals() {
        let loan = Loan::try_from(row(Decimal::ZERO, "active")).unwrap();
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["fine_amount"], "0.00");
    }

    #[test]
    fn test_fine_scale_is_normalized() {
        let loan = Loan::try_from(row(Decimal::new(4, 0), "returned")).unwrap();
        assert_eq!(loan.fine_amount.to_string(), "4.00");
        assert_eq!(loan.status, LoanStatus::Returned);
    }

    #[test]
    fn test_unknown_row_status_is_rejected() {
        assert!(Loan::try_from(row(Decimal::ZERO, "lost")).is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&LoanStatus::Returned).unwrap();
        assert_eq!(json, "\"returned\"");
    }
}
