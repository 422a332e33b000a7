use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Category, MonthKey, ResultEngine, Transaction, util::add_minor};

/// Month-over-month change for one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyComparison {
    pub category: Category,
    pub current_minor: i64,
    pub previous_minor: i64,
    pub change_percent: f64,
    /// `change_percent` rounded to an integer: `"+12%"`, `"-20%"`, `"0%"`.
    pub trend: String,
}

/// Relative change from `previous` to `current`.
///
/// A category with no spend in the previous month counts as `+100%` when it
/// has spend now and `0%` otherwise.
pub fn change_percent(current: i64, previous: i64) -> f64 {
    if previous > 0 {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    } else if current > 0 {
        100.0
    } else {
        0.0
    }
}

pub fn format_trend(change: f64) -> String {
    let rounded = change.round();
    if rounded == 0.0 {
        "0%".to_string()
    } else if rounded > 0.0 {
        format!("+{rounded:.0}%")
    } else {
        format!("{rounded:.0}%")
    }
}

/// Compare each `(category, spend)` of `month` with the same category in the
/// month before it, read from `history`.
pub fn compare_with_previous_month<'a>(
    month: MonthKey,
    current: &[(Category, i64)],
    history: impl IntoIterator<Item = &'a Transaction>,
) -> ResultEngine<Vec<MonthlyComparison>> {
    let previous_month = month.previous();
    let mut previous: BTreeMap<Category, i64> = BTreeMap::new();
    for tx in history {
        if previous_month.contains(tx.date) {
            let spent = previous.entry(tx.category).or_default();
            *spent = add_minor(*spent, tx.spent_minor())?;
        }
    }

    Ok(current
        .iter()
        .map(|&(category, current_minor)| {
            let previous_minor = previous.get(&category).copied().unwrap_or(0);
            let change = change_percent(current_minor, previous_minor);
            MonthlyComparison {
                category,
                current_minor,
                previous_minor,
                change_percent: change,
                trend: format_trend(change),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PaymentMethod;
    use crate::aggregation::test_support::tx;

    #[test]
    fn trend_boundaries() {
        assert_eq!(format_trend(change_percent(50, 0)), "+100%");
        assert_eq!(format_trend(change_percent(100, 0)), "+100%");
        assert_eq!(format_trend(change_percent(0, 0)), "0%");
        assert_eq!(format_trend(change_percent(80, 100)), "-20%");
        assert_eq!(format_trend(change_percent(100, 100)), "0%");
        assert_eq!(format_trend(change_percent(0, 50)), "-100%");
        assert_eq!(format_trend(change_percent(250, 100)), "+150%");
    }

    #[test]
    fn tiny_changes_round_to_zero() {
        assert_eq!(format_trend(0.4), "0%");
        assert_eq!(format_trend(-0.4), "0%");
        assert_eq!(format_trend(12.5), "+13%");
        assert_eq!(format_trend(-12.5), "-13%");
    }

    #[test]
    fn previous_month_crosses_the_year() {
        let history = [
            tx((2023, 12, 31), Category::Comida, -200, PaymentMethod::Debit, false),
            tx((2023, 11, 30), Category::Comida, -999, PaymentMethod::Debit, false),
            tx((2024, 1, 5), Category::Comida, -100, PaymentMethod::Debit, false),
        ];
        let january = MonthKey::new(2024, 1).unwrap();
        let comparisons =
            compare_with_previous_month(january, &[(Category::Comida, 100)], &history).unwrap();

        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].previous_minor, 200);
        assert_eq!(comparisons[0].trend, "-50%");
    }
}
