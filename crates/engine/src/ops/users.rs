use chrono::Utc;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, budgets, incomes, savings, transactions, users,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

fn normalize_username(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    // Basic credentials are split on the first ':'.
    if trimmed.contains(':') {
        return Err(EngineError::InvalidInput(
            "username must not contain ':'".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

impl Engine {
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        name: Option<&str>,
    ) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }
            let model = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password.to_string()),
                name: ActiveValue::Set(normalize_optional_text(name)),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!("created user {username}");
            Ok(User::from(model))
        })
    }

    /// Check Basic credentials. `None` when the user is unknown or the
    /// password does not match.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        Ok(user
            .filter(|model| model.password == password)
            .map(User::from))
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, username).await.map(User::from)
        })
    }

    /// Set or clear the display name.
    pub async fn update_user(&self, username: &str, name: Option<&str>) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, username).await?;
            let mut model: users::ActiveModel = model.into();
            model.name = ActiveValue::Set(normalize_optional_text(name));
            let model = model.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    pub async fn list_users(&self) -> ResultEngine<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Remove a user and everything recorded under it.
    pub async fn delete_user(&self, username: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, username).await?;
            transactions::Entity::delete_many()
                .filter(transactions::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            budgets::Entity::delete_many()
                .filter(budgets::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            incomes::Entity::delete_many()
                .filter(incomes::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            savings::Entity::delete_many()
                .filter(savings::Column::UserId.eq(username.to_string()))
                .exec(&db_tx)
                .await?;
            users::Entity::delete_by_id(username.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!("deleted user {username}");
            Ok(())
        })
    }
}
