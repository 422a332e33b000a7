use api_types::Envelope;
use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use serde::Serialize;

use std::{future::Future, sync::Arc};

use crate::{ServerError, budgets, declarations, reports, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolve Basic credentials to an `engine::User` and store it in the
/// request extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        tracing::debug!("request without credentials");
        return Err(ServerError::Unauthorized);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let Some(user) = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await?
    else {
        tracing::debug!("bad credentials for {}", auth_header.username());
        return Err(ServerError::Unauthorized);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[derive(Serialize)]
struct Health {
    database: &'static str,
}

async fn health(State(state): State<ServerState>) -> Result<Json<Envelope<Health>>, ServerError> {
    state.engine.ping().await?;
    Ok(Json(Envelope::success(Health { database: "ok" })))
}

fn router(state: ServerState) -> Router {
    let authenticated = Router::new()
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/budgets", get(budgets::get).post(budgets::replace))
        .route("/budgets/{year_month}/{category}", put(budgets::set_category))
        .route(
            "/income",
            get(declarations::income_get).put(declarations::income_set),
        )
        .route(
            "/saving",
            get(declarations::saving_get).put(declarations::saving_set),
        )
        .route("/dashboard", get(reports::dashboard))
        .route("/reports/monthly", get(reports::monthly))
        .route(
            "/user",
            get(user::get).put(user::update).delete(user::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/health", get(health))
        .merge(authenticated)
        .with_state(state)
}

/// Build the application router around an engine.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

/// Serve until `shutdown` resolves.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine))
        .with_graceful_shutdown(shutdown)
        .await
}
