//! Personal expense tracking engine.
//!
//! The crate has two halves:
//!
//! - [`aggregation`]: pure functions computing the monthly figures
//!   (categories, trends, unnecessary spend, payment methods, summary).
//! - [`Engine`]: a handle over a `sea_orm` connection storing users,
//!   transactions, budgets and declared income/saving, and feeding the
//!   aggregation with one user's data.

pub use budgets::{CategoryBudget, MonthlyBudgets};
pub use category::Category;
pub use error::EngineError;
pub use method::PaymentMethod;
pub use month::{MonthKey, parse_calendar_day};
pub use ops::{Dashboard, Engine, EngineBuilder, TransactionListFilter};
pub use transactions::{NewTransaction, Transaction, TransactionPatch};
pub use users::User;
pub use util::MAX_AMOUNT_MINOR;

pub mod aggregation;
mod budgets;
mod category;
mod error;
mod incomes;
mod method;
mod month;
mod ops;
mod savings;
mod transactions;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
