//! Monthly budgets endpoints

use api_types::{
    Envelope,
    budget::{BudgetAmount, BudgetEntry, BudgetsQuery, BudgetsSet, MonthBudgetsView},
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use engine::{Category, CategoryBudget, MonthKey, MonthlyBudgets, User};

use crate::{ServerError, server::ServerState};

fn entry(budget: &CategoryBudget) -> BudgetEntry {
    BudgetEntry {
        category: budget.category.as_str().to_string(),
        amount_minor: budget.amount_minor,
    }
}

fn month_view(budgets: MonthlyBudgets) -> MonthBudgetsView {
    MonthBudgetsView {
        year_month: budgets.month.to_string(),
        configured: budgets.configured,
        budgets: budgets.budgets.iter().map(entry).collect(),
    }
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<BudgetsQuery>, QueryRejection>,
) -> Result<Json<Envelope<MonthBudgetsView>>, ServerError> {
    let Query(query) = query?;
    let month: MonthKey = query.year_month.parse()?;
    let budgets = state.engine.month_budgets(&user.username, month).await?;
    Ok(Json(Envelope::success(month_view(budgets))))
}

pub async fn replace(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<BudgetsSet>, JsonRejection>,
) -> Result<Json<Envelope<MonthBudgetsView>>, ServerError> {
    let Json(payload) = payload?;
    let month: MonthKey = payload.year_month.parse()?;
    let entries = payload
        .budgets
        .iter()
        .map(|entry| {
            CategoryBudget::new(
                Category::try_from(entry.category.as_str())?,
                entry.amount_minor,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let budgets = state
        .engine
        .set_month_budgets(&user.username, month, entries)
        .await?;
    Ok(Json(Envelope::with_message(month_view(budgets), "budgets saved")))
}

pub async fn set_category(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<BudgetAmount>, JsonRejection>,
) -> Result<Json<Envelope<BudgetEntry>>, ServerError> {
    let Path((year_month, category)) = path?;
    let Json(payload) = payload?;
    let month: MonthKey = year_month.parse()?;
    let category = Category::try_from(category.as_str())?;

    let budget = state
        .engine
        .set_category_budget(&user.username, month, category, payload.amount_minor)
        .await?;
    Ok(Json(Envelope::with_message(entry(&budget), "budget saved")))
}
