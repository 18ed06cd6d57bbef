//! Suppliers and distributors.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Whether a supplier or distributor is currently worked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Currently supplying.
    Active,
    /// Kept on file only.
    Inactive,
}

impl Activity {
    /// Map a stored flag to an activity.
    #[must_use]
    pub fn from_flag(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Stable string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activo" => Ok(Self::Active),
            "inactive" | "inactivo" => Ok(Self::Inactive),
            other => Err(Error::validation(
                "status",
                format!("unknown activity '{other}'"),
            )),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A supplier of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Store-assigned identifier.
    pub id: i64,
    /// Kind of supplier, e.g. "Mayorista".
    pub kind: Option<String>,
    /// Company name, unique ignoring case.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email, unique ignoring case.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// Whether the supplier is active.
    pub active: bool,
}

/// Form payload for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    /// Kind of supplier.
    #[serde(default)]
    pub kind: Option<String>,
    /// Company name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// Whether the supplier is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Supplier {
    /// Build a record from a draft and its assigned id.
    #[must_use]
    pub fn from_draft(id: i64, draft: SupplierDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
            active: draft.active,
        }
    }

    /// Current activity.
    #[must_use]
    pub fn activity(&self) -> Activity {
        Activity::from_flag(self.active)
    }
}

/// A distributor that moves goods for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributor {
    /// Store-assigned identifier.
    pub id: i64,
    /// Supplier this distributor works for.
    pub supplier_id: Option<i64>,
    /// Company name, unique ignoring case.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email, unique ignoring case.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// Delivery route served.
    pub delivery_route: Option<String>,
    /// Whether the distributor is active.
    pub active: bool,
}

/// Form payload for a distributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorDraft {
    /// Supplier this distributor works for.
    #[serde(default)]
    pub supplier_id: Option<i64>,
    /// Company name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// Delivery route served.
    #[serde(default)]
    pub delivery_route: Option<String>,
    /// Whether the distributor is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Distributor {
    /// Build a record from a draft and its assigned id.
    #[must_use]
    pub fn from_draft(id: i64, draft: DistributorDraft) -> Self {
        Self {
            id,
            supplier_id: draft.supplier_id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
            delivery_route: draft.delivery_route,
            active: draft.active,
        }
    }

    /// Current activity.
    #[must_use]
    pub fn activity(&self) -> Activity {
        Activity::from_flag(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_from_flag() {
        assert_eq!(Activity::from_flag(true), Activity::Active);
        assert_eq!(Activity::from_flag(false), Activity::Inactive);
    }

    #[test]
    fn test_activity_parse() {
        assert_eq!("Activo".parse::<Activity>().unwrap(), Activity::Active);
        assert_eq!("inactive".parse::<Activity>().unwrap(), Activity::Inactive);
        assert!("suspended".parse::<Activity>().is_err());
    }

    #[test]
    fn test_supplier_draft_defaults_to_active() {
        let draft: SupplierDraft = serde_json::from_str(
            r#"{
                "name": "Agroquímicos del Oriente",
                "phone": "3159876543",
                "email": "comercial@agroori.com",
                "address": "Parque Industrial, Bucaramanga"
            }"#,
        )
        .unwrap();
        assert!(draft.active);

        let supplier = Supplier::from_draft(2, draft);
        assert_eq!(supplier.activity(), Activity::Active);
    }

    #[test]
    fn test_distributor_wire_format() {
        let distributor = Distributor::from_draft(
            1,
            DistributorDraft {
                supplier_id: Some(4),
                name: "AgroDistribuidor Central".to_string(),
                phone: "3001234567".to_string(),
                email: "ventas@agrodistcentral.com".to_string(),
                address: "Calle 45 #23-67, Bogotá".to_string(),
                delivery_route: Some("Sabana Norte".to_string()),
                active: false,
            },
        );
        let json = serde_json::to_value(&distributor).unwrap();
        assert_eq!(json["supplierId"], 4);
        assert_eq!(json["deliveryRoute"], "Sabana Norte");
        assert_eq!(distributor.activity(), Activity::Inactive);
    }
}
