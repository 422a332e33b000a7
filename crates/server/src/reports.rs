//! Dashboard and monthly report endpoints

use api_types::{
    Envelope,
    dashboard::{DashboardView, SummaryView},
    month::MonthQuery,
};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::{MonthKey, User, aggregation::MonthlyReport};

use crate::{ServerError, server::ServerState, transactions::view};

pub async fn dashboard(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Envelope<DashboardView>>, ServerError> {
    let Query(query) = query?;
    let month = MonthKey::from_parts(query.year, &query.month)?;
    let dashboard = state.engine.dashboard(&user.username, month).await?;

    let summary = dashboard.summary;
    Ok(Json(Envelope::success(DashboardView {
        year_month: dashboard.month.to_string(),
        income_minor: dashboard.income_minor,
        saving_minor: dashboard.saving_minor,
        expenses_minor: dashboard.expenses_minor,
        summary: SummaryView {
            income_minor: summary.income_minor,
            saving_minor: summary.saving_minor,
            expenses_minor: summary.expenses_minor,
            balance_minor: summary.balance_minor,
            savings_rate: summary.savings_rate,
            expense_ratio: summary.expense_ratio,
        },
        transactions: dashboard.transactions.into_iter().map(view).collect(),
    })))
}

pub async fn monthly(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Envelope<MonthlyReport>>, ServerError> {
    let Query(query) = query?;
    let month = MonthKey::from_parts(query.year, &query.month)?;
    let report = state.engine.monthly_report(&user.username, month).await?;
    Ok(Json(Envelope::success(report)))
}
