use serde::Serialize;

use super::percentage;
use crate::{ResultEngine, util::sub_minor};

/// Income, saving and spend of a month, and what is left.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub income_minor: i64,
    pub saving_minor: i64,
    pub expenses_minor: i64,
    /// `income - saving - expenses`; negative when overspent.
    pub balance_minor: i64,
    /// `saving / income * 100`, `0` without income.
    pub savings_rate: f64,
    /// `expenses / income * 100`, `0` without income.
    pub expense_ratio: f64,
}

pub fn monthly_summary(
    income_minor: i64,
    saving_minor: i64,
    expenses_minor: i64,
) -> ResultEngine<MonthlySummary> {
    Ok(MonthlySummary {
        income_minor,
        saving_minor,
        expenses_minor,
        balance_minor: sub_minor(sub_minor(income_minor, saving_minor)?, expenses_minor)?,
        savings_rate: percentage(saving_minor, income_minor),
        expense_ratio: percentage(expenses_minor, income_minor),
    })
}
