//! Declared monthly income and saving.
//!
//! Both are single amounts per month, absent meaning `0`.

use chrono::Utc;

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{EngineError, MonthKey, ResultEngine, incomes, savings, util::bounded_amount};

use super::{Engine, with_tx};

impl Engine {
    pub(super) async fn load_income(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        month: MonthKey,
    ) -> ResultEngine<i64> {
        let row = incomes::Entity::find_by_id((user_id.to_string(), month.to_string()))
            .one(db)
            .await?;
        Ok(row.map_or(0, |model| model.amount_minor))
    }

    pub(super) async fn load_saving(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        month: MonthKey,
    ) -> ResultEngine<i64> {
        let row = savings::Entity::find_by_id((user_id.to_string(), month.to_string()))
            .one(db)
            .await?;
        Ok(row.map_or(0, |model| model.amount_minor))
    }

    pub async fn monthly_income(&self, user_id: &str, month: MonthKey) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| { self.load_income(&db_tx, user_id, month).await })
    }

    /// Declare the income of a month. Must be positive.
    pub async fn set_monthly_income(
        &self,
        user_id: &str,
        month: MonthKey,
        amount_minor: i64,
    ) -> ResultEngine<i64> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "income must be greater than 0".to_string(),
            ));
        }
        let amount_minor = bounded_amount(amount_minor)?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model = incomes::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                year_month: ActiveValue::Set(month.to_string()),
                amount_minor: ActiveValue::Set(amount_minor),
                updated_at: ActiveValue::Set(Utc::now()),
            };
            let existing = incomes::Entity::find_by_id((user_id.to_string(), month.to_string()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                model.update(&db_tx).await?;
            } else {
                model.insert(&db_tx).await?;
            }
            Ok(amount_minor)
        })
    }

    pub async fn monthly_saving(&self, user_id: &str, month: MonthKey) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| { self.load_saving(&db_tx, user_id, month).await })
    }

    /// Declare the saving of a month. Zero is allowed.
    pub async fn set_monthly_saving(
        &self,
        user_id: &str,
        month: MonthKey,
        amount_minor: i64,
    ) -> ResultEngine<i64> {
        if amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "saving must be >= 0".to_string(),
            ));
        }
        let amount_minor = bounded_amount(amount_minor)?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model = savings::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                year_month: ActiveValue::Set(month.to_string()),
                amount_minor: ActiveValue::Set(amount_minor),
                updated_at: ActiveValue::Set(Utc::now()),
            };
            let existing = savings::Entity::find_by_id((user_id.to_string(), month.to_string()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                model.update(&db_tx).await?;
            } else {
                model.insert(&db_tx).await?;
            }
            Ok(amount_minor)
        })
    }
}
