//! Categories and units of measure.

use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name, unique ignoring case.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Kind of goods, e.g. "Insumo" or "Equipo".
    pub kind: String,
    /// Typical shelf life, e.g. "2 años".
    pub shelf_life: String,
    /// Presentation, e.g. "Manual".
    pub presentation: String,
}

/// Form payload for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Kind of goods.
    pub kind: String,
    /// Typical shelf life.
    pub shelf_life: String,
    /// Presentation.
    pub presentation: String,
}

impl Category {
    /// Build a record from a draft and its assigned id.
    #[must_use]
    pub fn from_draft(id: i64, draft: CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            kind: draft.kind,
            shelf_life: draft.shelf_life,
            presentation: draft.presentation,
        }
    }
}

/// A unit of measure such as kilogram or litre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeasure {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name, unique ignoring case.
    pub name: String,
    /// Short form, unique ignoring case.
    pub abbreviation: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Form payload for a unit of measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDraft {
    /// Display name.
    pub name: String,
    /// Short form.
    pub abbreviation: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl UnitOfMeasure {
    /// Build a record from a draft and its assigned id.
    #[must_use]
    pub fn from_draft(id: i64, draft: UnitDraft) -> Self {
        Self {
            id,
            name: draft.name,
            abbreviation: draft.abbreviation,
            description: draft.description,
        }
    }
}
