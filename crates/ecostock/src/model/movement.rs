//! Stock movements (entradas and salidas).

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received into stock.
    Entry,
    /// Goods leaving stock.
    Exit,
}

impl MovementKind {
    /// Stable string form used in storage and query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }

    /// Effect of `quantity` units of this kind on stock.
    #[must_use]
    pub fn signed(self, quantity: i64) -> i64 {
        match self {
            Self::Entry => quantity,
            Self::Exit => -quantity,
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "entrada" => Ok(Self::Entry),
            "exit" | "salida" => Ok(Self::Exit),
            other => Err(Error::validation(
                "kind",
                format!("unknown movement kind '{other}'"),
            )),
        }
    }
}

/// A recorded stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// Store-assigned identifier.
    pub id: i64,
    /// Day the movement happened.
    pub date: NaiveDate,
    /// Entry or exit.
    pub kind: MovementKind,
    /// Product moved.
    pub product_id: i64,
    /// Name of the product moved, resolved on read.
    pub product_name: String,
    /// Units moved, always positive.
    pub quantity: i64,
    /// Person who registered the movement.
    pub recorded_by: String,
    /// Free-text detail, e.g. the purchase order or customer.
    pub notes: String,
}

/// Form payload for a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDraft {
    /// Day the movement happened.
    pub date: NaiveDate,
    /// Entry or exit.
    pub kind: MovementKind,
    /// Product moved.
    pub product_id: i64,
    /// Units moved.
    pub quantity: i64,
    /// Person who registered the movement.
    pub recorded_by: String,
    /// Free-text detail.
    pub notes: String,
}

impl Movement {
    /// Effect of this movement on the product's stock.
    #[must_use]
    pub fn stock_delta(&self) -> i64 {
        self.kind.signed(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("entrada".parse::<MovementKind>().unwrap(), MovementKind::Entry);
        assert_eq!("EXIT".parse::<MovementKind>().unwrap(), MovementKind::Exit);
        assert!("transfer".parse::<MovementKind>().is_err());
    }

    #[test]
    fn test_signed_quantity() {
        assert_eq!(MovementKind::Entry.signed(25), 25);
        assert_eq!(MovementKind::Exit.signed(25), -25);
    }

    #[test]
    fn test_draft_wire_format() {
        let draft: MovementDraft = serde_json::from_str(
            r#"{
                "date": "2024-06-11",
                "kind": "exit",
                "productId": 2,
                "quantity": 25,
                "recordedBy": "Ana García",
                "notes": "Venta a productor Juan Pérez"
            }"#,
        )
        .unwrap();
        assert_eq!(draft.kind, MovementKind::Exit);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
    }
}
