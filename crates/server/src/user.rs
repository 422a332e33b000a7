//! The module exposes the authenticated user's profile.

use api_types::{
    Envelope,
    user::{UserUpdate, UserView},
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use engine::User;

use crate::{ServerError, server::ServerState};

fn view(user: User) -> UserView {
    UserView {
        username: user.username,
        name: user.name,
        created_at: user.created_at,
    }
}

pub async fn get(Extension(user): Extension<User>) -> Json<Envelope<UserView>> {
    Json(Envelope::success(view(user)))
}

/// Set or clear the display name.
pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<Envelope<UserView>>, ServerError> {
    let Json(payload) = payload?;
    let user = state
        .engine
        .update_user(&user.username, payload.name.as_deref())
        .await?;
    Ok(Json(Envelope::with_message(view(user), "user updated")))
}

/// Delete the account with every transaction, budget and declaration.
pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<String>>, ServerError> {
    state.engine.delete_user(&user.username).await?;
    Ok(Json(Envelope::with_message(user.username, "user deleted")))
}
