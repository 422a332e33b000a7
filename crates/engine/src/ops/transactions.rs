use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::{Expr, LikeExpr},
};

use crate::{
    Category, EngineError, NewTransaction, PaymentMethod, ResultEngine, Transaction,
    TransactionPatch, transactions, users,
    util::{LIKE_ESCAPE, escape_like},
};

use super::{Engine, with_tx};

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive calendar days.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<Category>,
    pub method: Option<PaymentMethod>,
    pub unnecessary: Option<bool>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub limit: Option<u64>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidDate(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    if filter.limit == Some(0) {
        return Err(EngineError::InvalidInput(
            "limit must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::Date.lte(to));
        }
        if let Some(category) = filter.category {
            self = self.filter(transactions::Column::Category.eq(category.as_str()));
        }
        if let Some(method) = filter.method {
            self = self.filter(transactions::Column::Method.eq(method.as_str()));
        }
        if let Some(unnecessary) = filter.unnecessary {
            self = self.filter(transactions::Column::Unnecessary.eq(unnecessary));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            self = self.filter(
                Expr::expr(Expr::cust("LOWER(description)"))
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            );
        }
        self
    }
}

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Load a transaction, telling a missing id apart from someone else's.
    async fn require_owned_transaction(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(
                "transaction belongs to another user".to_string(),
            ));
        }
        Transaction::try_from(model)
    }

    /// Transactions of `user_id` dated within `[from, to]`, newest first.
    pub(super) async fn transactions_between(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<Vec<Transaction>> {
        let filter = TransactionListFilter {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        };
        self.query_transactions(db, user_id, &filter).await
    }

    async fn query_transactions(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        query
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Record a new expense for `user_id`.
    pub async fn create_transaction(
        &self,
        user_id: &str,
        input: NewTransaction,
    ) -> ResultEngine<Transaction> {
        let transaction = Transaction::new(user_id.to_string(), input, Utc::now())?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model: transactions::ActiveModel = (&transaction).into();
            model.insert(&db_tx).await?;
            tracing::debug!(
                "created transaction {} for {user_id} on {}",
                transaction.id,
                transaction.date
            );
            Ok(transaction)
        })
    }

    /// Return a single transaction.
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_owned_transaction(&db_tx, user_id, transaction_id)
                .await
        })
    }

    /// Apply a partial update. Ownership is checked before anything is written.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let mut transaction = self
                .require_owned_transaction(&db_tx, user_id, transaction_id)
                .await?;
            transaction.apply(patch, Utc::now())?;
            let model: transactions::ActiveModel = (&transaction).into();
            model.update(&db_tx).await?;
            Ok(transaction)
        })
    }

    pub async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_owned_transaction(&db_tx, user_id, transaction_id)
                .await?;
            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::debug!("deleted transaction {transaction_id} for {user_id}");
            Ok(())
        })
    }

    /// List transactions of `user_id`, newest first (`date DESC, created_at DESC`).
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;
        with_tx!(self, |db_tx| {
            self.query_transactions(&db_tx, user_id, filter).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let filter = TransactionListFilter {
            from: Some(day(10)),
            to: Some(day(1)),
            ..Default::default()
        };
        assert!(matches!(
            validate_list_filter(&filter),
            Err(EngineError::InvalidDate(_))
        ));
    }

    #[test]
    fn single_day_range_is_allowed() {
        let filter = TransactionListFilter {
            from: Some(day(5)),
            to: Some(day(5)),
            limit: Some(10),
            ..Default::default()
        };
        assert!(validate_list_filter(&filter).is_ok());
        assert!(
            validate_list_filter(&TransactionListFilter {
                limit: Some(0),
                ..Default::default()
            })
            .is_err()
        );
    }
}
