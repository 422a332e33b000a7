use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Body of every response.
///
/// ```json
/// {"status":"success","data":{..},"message":null}
/// {"status":"error","error":"..."}
/// ```
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope<T> {
    Success { data: T, message: Option<String> },
    Error { error: String },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self::Success {
            data,
            message: Some(message.into()),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }
}

/// Tells a missing field (`None`) apart from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod month {
    use super::*;

    /// `?year=2024&month=3`; `month` may also be a Spanish name (`marzo`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthQuery {
        pub year: i32,
        pub month: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// `YYYY-MM-DD` or an RFC 3339 timestamp.
        pub date: String,
        pub description: String,
        pub category: String,
        /// Magnitude in minor units; stored as an expense whatever the sign.
        pub amount_minor: i64,
        pub method: String,
        #[serde(default)]
        pub unnecessary: bool,
        pub tags: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub date: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub method: Option<String>,
        pub unnecessary: Option<bool>,
        /// `null` clears the tags, a missing field keeps them.
        #[serde(
            default,
            deserialize_with = "super::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub tags: Option<Option<String>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub from: Option<String>,
        pub to: Option<String>,
        pub category: Option<String>,
        pub method: Option<String>,
        pub unnecessary: Option<bool>,
        pub search: Option<String>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub description: String,
        pub category: String,
        pub amount_minor: i64,
        pub method: String,
        pub unnecessary: bool,
        pub tags: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetEntry {
        pub category: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetsQuery {
        #[serde(alias = "yearMonth")]
        pub year_month: String,
    }

    /// Replaces every budget of `year_month`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetsSet {
        #[serde(alias = "yearMonth")]
        pub year_month: String,
        pub budgets: Vec<BudgetEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetAmount {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthBudgetsView {
        pub year_month: String,
        /// `false` when the month has no stored budgets and the defaults are shown.
        pub configured: bool,
        pub budgets: Vec<BudgetEntry>,
    }
}

pub mod declaration {
    use super::*;

    /// Declared income or saving for a month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeclarationSet {
        pub year: i32,
        pub month: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeclarationView {
        pub year_month: String,
        pub amount_minor: i64,
    }
}

pub mod dashboard {
    use super::*;
    use crate::transaction::TransactionView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub income_minor: i64,
        pub saving_minor: i64,
        pub expenses_minor: i64,
        pub balance_minor: i64,
        pub savings_rate: f64,
        pub expense_ratio: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub year_month: String,
        pub income_minor: i64,
        pub saving_minor: i64,
        pub expenses_minor: i64,
        pub summary: SummaryView,
        pub transactions: Vec<TransactionView>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub name: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::budget::BudgetsQuery;
    use super::transaction::TransactionUpdate;
    use super::*;

    #[test]
    fn envelope_shapes() {
        let ok = serde_json::to_value(Envelope::success(3)).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"status": "success", "data": 3, "message": null})
        );

        let err = serde_json::to_value(Envelope::<()>::error("boom")).unwrap();
        assert_eq!(err, serde_json::json!({"status": "error", "error": "boom"}));
    }

    #[test]
    fn envelope_reads_back() {
        let parsed: Envelope<Vec<u8>> = serde_json::from_str(
            r#"{"status":"success","data":[1,2],"message":"created"}"#,
        )
        .unwrap();
        assert_eq!(parsed, Envelope::with_message(vec![1, 2], "created"));
    }

    #[test]
    fn null_tags_clear_and_missing_tags_keep() {
        let cleared: TransactionUpdate = serde_json::from_str(r#"{"tags":null}"#).unwrap();
        assert_eq!(cleared.tags, Some(None));

        let kept: TransactionUpdate = serde_json::from_str(r#"{"unnecessary":true}"#).unwrap();
        assert_eq!(kept.tags, None);
        assert_eq!(kept.unnecessary, Some(true));
    }

    #[test]
    fn year_month_accepts_camel_case() {
        let query: BudgetsQuery = serde_json::from_str(r#"{"yearMonth":"2024-03"}"#).unwrap();
        assert_eq!(query.year_month, "2024-03");
    }
}
