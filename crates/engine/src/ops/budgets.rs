use chrono::Utc;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*,
};

use crate::{
    Category, CategoryBudget, MonthKey, MonthlyBudgets, ResultEngine, budgets,
    budgets::validate_budget_set,
};

use super::{Engine, with_tx};

fn budget_model(
    user_id: &str,
    month: MonthKey,
    budget: &CategoryBudget,
    now: chrono::DateTime<Utc>,
) -> budgets::ActiveModel {
    budgets::ActiveModel {
        user_id: ActiveValue::Set(user_id.to_string()),
        year_month: ActiveValue::Set(month.to_string()),
        category: ActiveValue::Set(budget.category.as_str().to_string()),
        amount_minor: ActiveValue::Set(budget.amount_minor),
        updated_at: ActiveValue::Set(now),
    }
}

impl Engine {
    pub(super) async fn load_month_budgets(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        month: MonthKey,
    ) -> ResultEngine<MonthlyBudgets> {
        let rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .filter(budgets::Column::YearMonth.eq(month.to_string()))
            .all(db)
            .await?;

        if rows.is_empty() {
            return Ok(MonthlyBudgets {
                month,
                configured: false,
                budgets: self.default_budgets.clone(),
            });
        }

        let mut stored = rows
            .into_iter()
            .map(CategoryBudget::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        stored.sort_by_key(|budget| budget.category);
        Ok(MonthlyBudgets {
            month,
            configured: true,
            budgets: stored,
        })
    }

    /// Budgets of a month; the engine defaults when none are stored.
    pub async fn month_budgets(&self, user_id: &str, month: MonthKey) -> ResultEngine<MonthlyBudgets> {
        with_tx!(self, |db_tx| {
            self.load_month_budgets(&db_tx, user_id, month).await
        })
    }

    /// Replace every budget of a month.
    ///
    /// The set is validated first, then the month is cleared and rewritten
    /// in one DB transaction. An empty set brings the month back to the
    /// defaults.
    pub async fn set_month_budgets(
        &self,
        user_id: &str,
        month: MonthKey,
        entries: Vec<CategoryBudget>,
    ) -> ResultEngine<MonthlyBudgets> {
        validate_budget_set(&entries)?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            budgets::Entity::delete_many()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .filter(budgets::Column::YearMonth.eq(month.to_string()))
                .exec(&db_tx)
                .await?;
            if !entries.is_empty() {
                budgets::Entity::insert_many(
                    entries
                        .iter()
                        .map(|budget| budget_model(user_id, month, budget, now)),
                )
                .exec(&db_tx)
                .await?;
            }
            tracing::debug!(
                "stored {} budgets for {user_id} in {month}",
                entries.len()
            );
            self.load_month_budgets(&db_tx, user_id, month).await
        })
    }

    /// Insert or overwrite the budget of one category.
    pub async fn set_category_budget(
        &self,
        user_id: &str,
        month: MonthKey,
        category: Category,
        amount_minor: i64,
    ) -> ResultEngine<CategoryBudget> {
        let budget = CategoryBudget::new(category, amount_minor)?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let existing = budgets::Entity::find_by_id((
                user_id.to_string(),
                month.to_string(),
                category.as_str().to_string(),
            ))
            .one(&db_tx)
            .await?;
            let model = budget_model(user_id, month, &budget, now);
            if existing.is_some() {
                model.update(&db_tx).await?;
            } else {
                model.insert(&db_tx).await?;
            }
            Ok(budget)
        })
    }
}
