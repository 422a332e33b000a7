//! Declared income and saving endpoints

use api_types::{
    Envelope,
    declaration::{DeclarationSet, DeclarationView},
    month::MonthQuery,
};
use axum::{
    Extension, Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use engine::{MonthKey, User};

use crate::{ServerError, server::ServerState};

fn declaration(month: MonthKey, amount_minor: i64) -> Json<Envelope<DeclarationView>> {
    Json(Envelope::success(DeclarationView {
        year_month: month.to_string(),
        amount_minor,
    }))
}

pub async fn income_get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Envelope<DeclarationView>>, ServerError> {
    let Query(query) = query?;
    let month = MonthKey::from_parts(query.year, &query.month)?;
    let amount = state.engine.monthly_income(&user.username, month).await?;
    Ok(declaration(month, amount))
}

pub async fn income_set(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<DeclarationSet>, JsonRejection>,
) -> Result<Json<Envelope<DeclarationView>>, ServerError> {
    let Json(payload) = payload?;
    let month = MonthKey::from_parts(payload.year, &payload.month)?;
    let amount = state
        .engine
        .set_monthly_income(&user.username, month, payload.amount_minor)
        .await?;
    Ok(declaration(month, amount))
}

pub async fn saving_get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Envelope<DeclarationView>>, ServerError> {
    let Query(query) = query?;
    let month = MonthKey::from_parts(query.year, &query.month)?;
    let amount = state.engine.monthly_saving(&user.username, month).await?;
    Ok(declaration(month, amount))
}

pub async fn saving_set(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<DeclarationSet>, JsonRejection>,
) -> Result<Json<Envelope<DeclarationView>>, ServerError> {
    let Json(payload) = payload?;
    let month = MonthKey::from_parts(payload.year, &payload.month)?;
    let amount = state
        .engine
        .set_monthly_saving(&user.username, month, payload.amount_minor)
        .await?;
    Ok(declaration(month, amount))
}
