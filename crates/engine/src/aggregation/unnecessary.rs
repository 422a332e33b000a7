use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::percentage;
use crate::{
    Category, ResultEngine, Transaction,
    util::{add_minor, sum_minor},
};

/// Flagged expenses of one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnnecessaryCategory {
    pub category: Category,
    pub amount_minor: i64,
    pub transaction_count: usize,
    /// In ranking order.
    pub descriptions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnnecessaryItem {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    /// Absolute amount.
    pub amount_minor: i64,
}

/// Expenses the user flagged as avoidable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnnecessarySummary {
    pub total_minor: i64,
    /// Share of the month's total spend.
    pub percentage_of_total: f64,
    pub transaction_count: usize,
    /// Sorted by amount descending, ties by category label.
    pub by_category: Vec<UnnecessaryCategory>,
    /// Every flagged expense by amount descending, then most recent first.
    pub ranking: Vec<UnnecessaryItem>,
}

pub fn summarize_unnecessary<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> ResultEngine<UnnecessarySummary> {
    let mut month_total = 0i64;
    let mut ranking = Vec::new();
    for tx in transactions {
        month_total = add_minor(month_total, tx.spent_minor())?;
        if tx.unnecessary {
            ranking.push(UnnecessaryItem {
                id: tx.id,
                date: tx.date,
                description: tx.description.clone(),
                category: tx.category,
                amount_minor: tx.spent_minor(),
            });
        }
    }
    ranking.sort_by(|a, b| {
        b.amount_minor
            .cmp(&a.amount_minor)
            .then_with(|| b.date.cmp(&a.date))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut groups: BTreeMap<Category, UnnecessaryCategory> = BTreeMap::new();
    for item in &ranking {
        let group = groups
            .entry(item.category)
            .or_insert_with(|| UnnecessaryCategory {
                category: item.category,
                amount_minor: 0,
                transaction_count: 0,
                descriptions: Vec::new(),
            });
        group.amount_minor = add_minor(group.amount_minor, item.amount_minor)?;
        group.transaction_count += 1;
        group.descriptions.push(item.description.clone());
    }
    let mut by_category: Vec<_> = groups.into_values().collect();
    by_category.sort_by(|a, b| {
        b.amount_minor
            .cmp(&a.amount_minor)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    let total_minor = sum_minor(ranking.iter().map(|item| item.amount_minor))?;
    Ok(UnnecessarySummary {
        total_minor,
        percentage_of_total: percentage(total_minor, month_total),
        transaction_count: ranking.len(),
        by_category,
        ranking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PaymentMethod;
    use crate::aggregation::test_support::tx;

    #[test]
    fn flagged_spend_is_a_subset_of_the_total() {
        let transactions = [
            tx((2024, 3, 1), Category::Comida, -100, PaymentMethod::Debit, false),
            tx((2024, 3, 2), Category::Entretenimiento, -60, PaymentMethod::Credit, true),
            tx((2024, 3, 3), Category::Comida, -40, PaymentMethod::Debit, true),
        ];
        let summary = summarize_unnecessary(&transactions).unwrap();

        assert_eq!(summary.total_minor, 100);
        assert_eq!(summary.transaction_count, 2);
        assert!((summary.percentage_of_total - 50.0).abs() < 1e-9);
        assert!(summary.percentage_of_total <= 100.0);
        assert_eq!(
            summary
                .by_category
                .iter()
                .map(|c| c.category)
                .collect::<Vec<_>>(),
            vec![Category::Entretenimiento, Category::Comida]
        );
    }

    #[test]
    fn one_flagged_of_two() {
        let transactions = [
            tx((2024, 3, 1), Category::Otros, -10, PaymentMethod::Debit, true),
            tx((2024, 3, 2), Category::Otros, -20, PaymentMethod::Debit, false),
        ];
        let summary = summarize_unnecessary(&transactions).unwrap();
        assert_eq!(summary.total_minor, 10);
        assert_eq!(summary.transaction_count, 1);
        assert!((summary.percentage_of_total - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", summary.percentage_of_total), "33.33");
    }

    #[test]
    fn ranking_prefers_larger_then_newer() {
        let transactions = [
            tx((2024, 3, 1), Category::Compras, -50, PaymentMethod::Debit, true),
            tx((2024, 3, 9), Category::Compras, -50, PaymentMethod::Debit, true),
            tx((2024, 3, 5), Category::Otros, -80, PaymentMethod::Credit, true),
        ];
        let summary = summarize_unnecessary(&transactions).unwrap();
        let days: Vec<_> = summary.ranking.iter().map(|item| item.date).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ]
        );
        assert_eq!(summary.by_category[0].category, Category::Compras);
        assert_eq!(summary.by_category[0].descriptions.len(), 2);
    }

    #[test]
    fn nothing_flagged() {
        let transactions = [tx((2024, 3, 1), Category::Comida, -10, PaymentMethod::Debit, false)];
        let summary = summarize_unnecessary(&transactions).unwrap();
        assert_eq!(summary.total_minor, 0);
        assert_eq!(summary.percentage_of_total, 0.0);
        assert!(summary.ranking.is_empty());
        assert!(summary.by_category.is_empty());
    }
}
