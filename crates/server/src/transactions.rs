//! Transactions API endpoints

use api_types::{
    Envelope,
    transaction::{TransactionListQuery, TransactionNew, TransactionUpdate, TransactionView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::{JsonRejection, PathRejection, QueryRejection}},
    http::StatusCode,
};
use engine::{
    Category, NewTransaction, PaymentMethod, Transaction, TransactionListFilter,
    TransactionPatch, User, parse_calendar_day,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        date: tx.date,
        description: tx.description,
        category: tx.category.as_str().to_string(),
        amount_minor: tx.amount_minor,
        method: tx.method.as_str().to_string(),
        unnecessary: tx.unnecessary,
        tags: tx.tags,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn list_filter(query: TransactionListQuery) -> Result<TransactionListFilter, ServerError> {
    Ok(TransactionListFilter {
        from: query.from.as_deref().map(parse_calendar_day).transpose()?,
        to: query.to.as_deref().map(parse_calendar_day).transpose()?,
        category: query
            .category
            .as_deref()
            .map(Category::try_from)
            .transpose()?,
        method: query
            .method
            .as_deref()
            .map(PaymentMethod::try_from)
            .transpose()?,
        unnecessary: query.unnecessary,
        search: query.search,
        limit: query.limit,
    })
}

fn patch(payload: TransactionUpdate) -> Result<TransactionPatch, ServerError> {
    Ok(TransactionPatch {
        date: payload.date.as_deref().map(parse_calendar_day).transpose()?,
        description: payload.description,
        category: payload
            .category
            .as_deref()
            .map(Category::try_from)
            .transpose()?,
        amount_minor: payload.amount_minor,
        method: payload
            .method
            .as_deref()
            .map(PaymentMethod::try_from)
            .transpose()?,
        unnecessary: payload.unnecessary,
        tags: payload.tags,
    })
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<TransactionView>>>, ServerError> {
    let Query(query) = query?;
    let filter = list_filter(query)?;
    let txs = state
        .engine
        .list_transactions(&user.username, &filter)
        .await?;

    Ok(Json(Envelope::success(txs.into_iter().map(view).collect())))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<TransactionView>>), ServerError> {
    let Json(payload) = payload?;
    let input = NewTransaction {
        date: parse_calendar_day(&payload.date)?,
        description: payload.description,
        category: Category::try_from(payload.category.as_str())?,
        amount_minor: payload.amount_minor,
        method: PaymentMethod::try_from(payload.method.as_str())?,
        unnecessary: payload.unnecessary,
        tags: payload.tags,
    };
    let tx = state
        .engine
        .create_transaction(&user.username, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(view(tx), "transaction created")),
    ))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Envelope<TransactionView>>, ServerError> {
    let Path(id) = id?;
    let tx = state.engine.transaction(&user.username, id).await?;
    Ok(Json(Envelope::success(view(tx))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<Envelope<TransactionView>>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let tx = state
        .engine
        .update_transaction(&user.username, id, patch(payload)?)
        .await?;
    Ok(Json(Envelope::with_message(view(tx), "transaction updated")))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Envelope<Uuid>>, ServerError> {
    let Path(id) = id?;
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(Json(Envelope::with_message(id, "transaction deleted")))
}
