//! Monthly financial aggregation.
//!
//! Pure functions that turn one user's transactions, budgets and declared
//! income/saving into the figures shown by the dashboard, analytics and
//! categories views. Nothing here touches the database; every call with the
//! same snapshot yields the same report.
//!
//! Ratios whose denominator is zero (no spend, no income, no budget) are
//! reported as `0`, never as an error. Money sums are checked; a total that
//! does not fit in `i64` is `EngineError::InvalidAmount`.

use serde::Serialize;

use crate::{CategoryBudget, MonthKey, ResultEngine, Transaction, util::sum_minor};

mod categories;
mod methods;
mod summary;
mod trends;
mod unnecessary;

pub use categories::{BudgetOverview, CategorySummary, budget_overview, summarize_categories};
pub use methods::{CreditDebitSplit, MethodShare, split_by_method};
pub use summary::{MonthlySummary, monthly_summary};
pub use trends::{MonthlyComparison, change_percent, compare_with_previous_month, format_trend};
pub use unnecessary::{
    UnnecessaryCategory, UnnecessaryItem, UnnecessarySummary, summarize_unnecessary,
};

/// Everything the engine needs to describe one month.
#[derive(Clone, Copy, Debug)]
pub struct MonthSnapshot<'a> {
    pub month: MonthKey,
    /// Transaction history; may span several months. Only `month` and the
    /// month before it are read.
    pub transactions: &'a [Transaction],
    pub budgets: &'a [CategoryBudget],
    pub income_minor: i64,
    pub saving_minor: i64,
}

/// Derived metrics for one month. Recomputed on every request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub month: MonthKey,
    pub total_spent_minor: i64,
    pub transaction_count: usize,
    pub average_transaction_minor: f64,
    /// Only categories with activity in the month, by spend descending.
    pub categories: Vec<CategorySummary>,
    /// Same order as `categories`.
    pub comparisons: Vec<MonthlyComparison>,
    pub unnecessary: UnnecessarySummary,
    pub methods: CreditDebitSplit,
    pub summary: MonthlySummary,
    pub budget_overview: BudgetOverview,
}

/// Transactions whose calendar day falls inside `month`.
pub fn month_transactions(month: MonthKey, history: &[Transaction]) -> Vec<&Transaction> {
    history.iter().filter(|tx| month.contains(tx.date)).collect()
}

/// Sum of absolute amounts.
pub fn total_spent<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> ResultEngine<i64> {
    sum_minor(transactions.into_iter().map(Transaction::spent_minor))
}

/// Build the full report for `snapshot.month`.
pub fn monthly_report(snapshot: &MonthSnapshot<'_>) -> ResultEngine<MonthlyReport> {
    let current = month_transactions(snapshot.month, snapshot.transactions);
    let total_spent_minor = total_spent(current.iter().copied())?;
    let transaction_count = current.len();
    let average_transaction_minor = if transaction_count == 0 {
        0.0
    } else {
        total_spent_minor as f64 / transaction_count as f64
    };

    let categories = summarize_categories(current.iter().copied(), snapshot.budgets)?;
    let spend: Vec<_> = categories
        .iter()
        .map(|summary| (summary.category, summary.spent_minor))
        .collect();
    let comparisons = compare_with_previous_month(snapshot.month, &spend, snapshot.transactions)?;
    let budget_overview = budget_overview(&categories, snapshot.budgets)?;

    Ok(MonthlyReport {
        month: snapshot.month,
        total_spent_minor,
        transaction_count,
        average_transaction_minor,
        comparisons,
        unnecessary: summarize_unnecessary(current.iter().copied())?,
        methods: split_by_method(current.iter().copied())?,
        summary: monthly_summary(
            snapshot.income_minor,
            snapshot.saving_minor,
            total_spent_minor,
        )?,
        budget_overview,
        categories,
    })
}

/// `part / whole * 100`, or `0` when `whole` is not positive.
pub(crate) fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use crate::{Category, PaymentMethod, Transaction};

    pub(crate) fn tx(
        date: (i32, u32, u32),
        category: Category,
        amount_minor: i64,
        method: PaymentMethod,
        unnecessary: bool,
    ) -> Transaction {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Transaction {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: format!("{category} {amount_minor}"),
            category,
            amount_minor,
            method,
            unnecessary,
            tags: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }
}
