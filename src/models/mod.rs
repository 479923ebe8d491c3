//! Data models for Libris

pub mod book;
pub mod company;
pub mod job_role;
pub mod loan;
pub mod person;

// Re-export commonly used types
pub use book::{Book, BookCopy};
pub use company::Company;
pub use job_role::JobRole;
pub use loan::{Loan, LoanStatus};
pub use person::{ClientStatus, Person, PersonBase, PersonKind};
