use sea_orm::DatabaseConnection;

use crate::{CategoryBudget, ResultEngine, budgets::validate_budget_set};

mod budgets;
mod declarations;
mod reports;
mod transactions;
mod users;

pub use reports::Dashboard;
pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Store handle. Every operation is scoped by the caller's username.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    default_budgets: Vec<CategoryBudget>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Budgets returned for months without stored ones.
    pub fn default_budgets(&self) -> &[CategoryBudget] {
        &self.default_budgets
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> ResultEngine<()> {
        self.database.ping().await.map_err(Into::into)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    default_budgets: Vec<CategoryBudget>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Budgets used for any month the user has not configured.
    pub fn default_budgets(mut self, budgets: Vec<CategoryBudget>) -> EngineBuilder {
        self.default_budgets = budgets;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        validate_budget_set(&self.default_budgets)?;
        Ok(Engine {
            database: self.database,
            default_budgets: self.default_budgets,
        })
    }
}
