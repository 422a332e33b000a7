use serde::{Deserialize, Serialize};

use crate::EngineError;

/// How an expense was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[serde(alias = "Crédito", alias = "Credit")]
    Credit,
    #[serde(alias = "Débito", alias = "Debit")]
    Debit,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "credit" | "crédito" | "credito" => Ok(Self::Credit),
            "debit" | "débito" | "debito" => Ok(Self::Debit),
            other => Err(EngineError::InvalidMethod(format!(
                "unknown payment method: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
