//! Per-category monthly budgets.
//!
//! One row per `(user_id, year_month, category)`. A category without a row
//! has no budget configured, which is not the same as a budget of zero.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, MonthKey, ResultEngine, util::bounded_amount};

/// Spending ceiling for one category in one month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: Category,
    pub amount_minor: i64,
}

impl CategoryBudget {
    pub fn new(category: Category, amount_minor: i64) -> ResultEngine<Self> {
        if amount_minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "budget for {category} must be >= 0"
            )));
        }
        Ok(Self {
            category,
            amount_minor: bounded_amount(amount_minor)?,
        })
    }
}

/// Budgets for a month as returned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyBudgets {
    pub month: MonthKey,
    /// `false` when nothing was stored for the month and `budgets` holds the
    /// engine defaults.
    pub configured: bool,
    pub budgets: Vec<CategoryBudget>,
}

/// Reject negative amounts and repeated categories.
pub(crate) fn validate_budget_set(budgets: &[CategoryBudget]) -> ResultEngine<()> {
    let mut seen = Vec::with_capacity(budgets.len());
    for budget in budgets {
        CategoryBudget::new(budget.category, budget.amount_minor)?;
        if seen.contains(&budget.category) {
            return Err(EngineError::InvalidCategory(format!(
                "duplicate budget for {}",
                budget.category
            )));
        }
        seen.push(budget.category);
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year_month: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub category: String,
    pub amount_minor: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CategoryBudget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        CategoryBudget::new(
            Category::try_from(model.category.as_str())?,
            model.amount_minor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_budget_is_rejected() {
        assert!(matches!(
            CategoryBudget::new(Category::Salud, -1),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(CategoryBudget::new(Category::Salud, 0).is_ok());
    }

    #[test]
    fn oversized_budget_is_rejected() {
        assert!(matches!(
            CategoryBudget::new(Category::Salud, i64::MAX),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn duplicate_categories_are_rejected() {
        let set = [
            CategoryBudget::new(Category::Comida, 100).unwrap(),
            CategoryBudget::new(Category::Comida, 200).unwrap(),
        ];
        assert!(matches!(
            validate_budget_set(&set),
            Err(EngineError::InvalidCategory(_))
        ));
    }
}
