use serde::Serialize;

use sea_orm::TransactionTrait;

use crate::{
    MonthKey, ResultEngine, Transaction,
    aggregation::{self, MonthSnapshot, MonthlyReport, MonthlySummary},
};

use super::{Engine, with_tx};

/// Landing view of a month: declared figures, roll-up and the month's
/// transactions, newest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub month: MonthKey,
    pub income_minor: i64,
    pub saving_minor: i64,
    pub expenses_minor: i64,
    pub summary: MonthlySummary,
    pub transactions: Vec<Transaction>,
}

impl Engine {
    /// Compute every metric of `month` from the stored data.
    pub async fn monthly_report(&self, user_id: &str, month: MonthKey) -> ResultEngine<MonthlyReport> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let history = self
                .transactions_between(
                    &db_tx,
                    user_id,
                    month.previous().first_day(),
                    month.last_day(),
                )
                .await?;
            let budgets = self.load_month_budgets(&db_tx, user_id, month).await?;
            let income_minor = self.load_income(&db_tx, user_id, month).await?;
            let saving_minor = self.load_saving(&db_tx, user_id, month).await?;

            let report = aggregation::monthly_report(&MonthSnapshot {
                month,
                transactions: &history,
                budgets: &budgets.budgets,
                income_minor,
                saving_minor,
            })?;
            tracing::debug!(
                "built report for {user_id} in {month}: {} transactions, {} categories",
                report.transaction_count,
                report.categories.len()
            );
            Ok(report)
        })
    }

    pub async fn dashboard(&self, user_id: &str, month: MonthKey) -> ResultEngine<Dashboard> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let transactions = self
                .transactions_between(&db_tx, user_id, month.first_day(), month.last_day())
                .await?;
            let income_minor = self.load_income(&db_tx, user_id, month).await?;
            let saving_minor = self.load_saving(&db_tx, user_id, month).await?;
            let expenses_minor = aggregation::total_spent(&transactions)?;

            Ok(Dashboard {
                month,
                income_minor,
                saving_minor,
                expenses_minor,
                summary: aggregation::monthly_summary(
                    income_minor,
                    saving_minor,
                    expenses_minor,
                )?,
                transactions,
            })
        })
    }
}
