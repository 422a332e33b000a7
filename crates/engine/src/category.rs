//! Expense categories.
//!
//! The set is closed: every transaction and every budget belongs to exactly
//! one of these eight categories. Labels are the Spanish names shown in the
//! dashboard and stored verbatim in the database.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Comida,
    Transporte,
    Entretenimiento,
    Servicios,
    Compras,
    Salud,
    #[serde(rename = "Educación", alias = "Educacion")]
    Educacion,
    Otros,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 8] = [
        Category::Comida,
        Category::Transporte,
        Category::Entretenimiento,
        Category::Servicios,
        Category::Compras,
        Category::Salud,
        Category::Educacion,
        Category::Otros,
    ];

    /// Canonical label, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comida => "Comida",
            Self::Transporte => "Transporte",
            Self::Entretenimiento => "Entretenimiento",
            Self::Servicios => "Servicios",
            Self::Compras => "Compras",
            Self::Salud => "Salud",
            Self::Educacion => "Educación",
            Self::Otros => "Otros",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let lowered = trimmed.to_lowercase();
        let found = match lowered.as_str() {
            "educacion" => Some(Self::Educacion),
            other => Self::ALL
                .into_iter()
                .find(|category| category.as_str().to_lowercase() == other),
        };
        found.ok_or_else(|| EngineError::InvalidCategory(trimmed.to_string()))
    }
}

impl core::str::FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(Category::try_from("comida").unwrap(), Category::Comida);
        assert_eq!(Category::try_from(" SALUD ").unwrap(), Category::Salud);
        assert_eq!(Category::try_from("Educación").unwrap(), Category::Educacion);
        assert_eq!(Category::try_from("educacion").unwrap(), Category::Educacion);
    }

    #[test]
    fn unknown_label_is_rejected_not_coerced() {
        assert_eq!(
            Category::try_from("Mascotas"),
            Err(EngineError::InvalidCategory("Mascotas".to_string()))
        );
    }

    #[test]
    fn serializes_with_spanish_label() {
        let json = serde_json::to_string(&Category::Educacion).unwrap();
        assert_eq!(json, "\"Educación\"");
        let back: Category = serde_json::from_str("\"Educacion\"").unwrap();
        assert_eq!(back, Category::Educacion);
    }
}
