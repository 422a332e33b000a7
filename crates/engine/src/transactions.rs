//! Transaction primitives.
//!
//! A `Transaction` is a single expense recorded by a user. Amounts are kept
//! in minor units and stored negative (outflow); aggregation always works on
//! the absolute value.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Category, EngineError, PaymentMethod, ResultEngine,
    util::{expense_amount, normalize_description, normalize_optional_text, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    /// Signed amount in minor units; negative for expenses.
    pub amount_minor: i64,
    pub method: PaymentMethod,
    pub unnecessary: bool,
    /// Free text, comma separated.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a new expense.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    /// Magnitude of the expense; the sign is ignored.
    pub amount_minor: i64,
    pub method: PaymentMethod,
    pub unnecessary: bool,
    pub tags: Option<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub amount_minor: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub unnecessary: Option<bool>,
    /// `Some(None)` clears the tags.
    pub tags: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.amount_minor.is_none()
            && self.method.is_none()
            && self.unnecessary.is_none()
            && self.tags.is_none()
    }
}

impl Transaction {
    pub fn new(user_id: String, input: NewTransaction, now: DateTime<Utc>) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            date: input.date,
            description: normalize_description(&input.description)?,
            category: input.category,
            amount_minor: expense_amount(input.amount_minor)?,
            method: input.method,
            unnecessary: input.unnecessary,
            tags: normalize_optional_text(input.tags.as_deref()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate and apply a patch in place.
    pub fn apply(&mut self, patch: TransactionPatch, now: DateTime<Utc>) -> ResultEngine<()> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput(
                "provide at least one field to update".to_string(),
            ));
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = normalize_description(&description)?;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount_minor) = patch.amount_minor {
            self.amount_minor = expense_amount(amount_minor)?;
        }
        if let Some(method) = patch.method {
            self.method = method;
        }
        if let Some(unnecessary) = patch.unnecessary {
            self.unnecessary = unnecessary;
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_optional_text(tags.as_deref());
        }
        self.updated_at = now;
        Ok(())
    }

    /// Absolute amount, the value every aggregate is built from.
    pub fn spent_minor(&self) -> i64 {
        self.amount_minor.saturating_abs()
    }

    /// Tags split on commas, trimmed, blanks dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub date: Date,
    pub description: String,
    pub category: String,
    pub amount_minor: i64,
    pub method: String,
    pub unnecessary: bool,
    pub tags: Option<String>,
    pub created_at: DateTimeUtc,
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

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            date: ActiveValue::Set(tx.date),
            description: ActiveValue::Set(tx.description.clone()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            method: ActiveValue::Set(tx.method.as_str().to_string()),
            unnecessary: ActiveValue::Set(tx.unnecessary),
            tags: ActiveValue::Set(tx.tags.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    /// Rows carrying a category or method outside the enumerations are
    /// reported, never dropped or coerced.
    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            user_id: model.user_id,
            date: model.date,
            description: model.description,
            category: Category::try_from(model.category.as_str())?,
            amount_minor: model.amount_minor,
            method: PaymentMethod::try_from(model.method.as_str())?,
            unnecessary: model.unnecessary,
            tags: model.tags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
