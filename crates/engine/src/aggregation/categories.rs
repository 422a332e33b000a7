use std::collections::BTreeMap;

use serde::Serialize;

use super::percentage;
use crate::{
    Category, CategoryBudget, ResultEngine, Transaction,
    util::{add_minor, sum_minor},
};

/// Spend of one category in one month, measured against its budget.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub spent_minor: i64,
    pub percentage_of_total: f64,
    /// `0` when no budget is configured; see `budget_configured`.
    pub budget_minor: i64,
    pub budget_configured: bool,
    pub percentage_of_budget: f64,
    pub unnecessary_minor: i64,
    pub transaction_count: usize,
}

#[derive(Default)]
struct Totals {
    spent: i64,
    unnecessary: i64,
    count: usize,
}

/// Group a month's transactions by category.
///
/// Categories without transactions are omitted. The result is sorted by
/// spend descending, ties broken by category label.
pub fn summarize_categories<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    budgets: &[CategoryBudget],
) -> ResultEngine<Vec<CategorySummary>> {
    let mut groups: BTreeMap<Category, Totals> = BTreeMap::new();
    let mut total = 0i64;

    for tx in transactions {
        let spent = tx.spent_minor();
        total = add_minor(total, spent)?;
        let entry = groups.entry(tx.category).or_default();
        entry.spent = add_minor(entry.spent, spent)?;
        entry.count += 1;
        if tx.unnecessary {
            entry.unnecessary = add_minor(entry.unnecessary, spent)?;
        }
    }

    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, totals)| {
            let budget = budgets.iter().find(|b| b.category == category);
            let budget_minor = budget.map_or(0, |b| b.amount_minor);
            CategorySummary {
                category,
                spent_minor: totals.spent,
                percentage_of_total: percentage(totals.spent, total),
                budget_minor,
                budget_configured: budget.is_some(),
                percentage_of_budget: percentage(totals.spent, budget_minor),
                unnecessary_minor: totals.unnecessary,
                transaction_count: totals.count,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.spent_minor
            .cmp(&a.spent_minor)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    Ok(summaries)
}

/// Month-wide view of budget usage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub total_budget_minor: i64,
    /// Budgets with a positive amount.
    pub categories_with_budget: usize,
    /// Mean of `spent / budget * 100` over categories with a positive
    /// budget, including those without spend.
    pub average_budget_used: f64,
    /// Categories whose spend exceeds a positive budget, in summary order.
    pub over_budget: Vec<Category>,
}

pub fn budget_overview(
    categories: &[CategorySummary],
    budgets: &[CategoryBudget],
) -> ResultEngine<BudgetOverview> {
    let spent_of = |category: Category| {
        categories
            .iter()
            .find(|summary| summary.category == category)
            .map_or(0, |summary| summary.spent_minor)
    };

    let budgeted: Vec<_> = budgets.iter().filter(|b| b.amount_minor > 0).collect();
    let average_budget_used = if budgeted.is_empty() {
        0.0
    } else {
        budgeted
            .iter()
            .map(|b| percentage(spent_of(b.category), b.amount_minor))
            .sum::<f64>()
            / budgeted.len() as f64
    };

    Ok(BudgetOverview {
        total_budget_minor: sum_minor(budgets.iter().map(|b| b.amount_minor))?,
        categories_with_budget: budgeted.len(),
        average_budget_used,
        over_budget: categories
            .iter()
            .filter(|summary| summary.budget_minor > 0 && summary.spent_minor > summary.budget_minor)
            .map(|summary| summary.category)
            .collect(),
    })
}
