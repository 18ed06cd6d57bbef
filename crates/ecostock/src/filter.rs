//! Search and status filtering for record lists.
//!
//! Lists are filtered in two steps: a case-insensitive substring search over
//! the record's text fields, then an optional status filter. Counts for the
//! status filter strip are computed after the search is applied.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Category, Distributor, Movement, Product, Supplier, UnitOfMeasure};

/// A record that can be matched against a search term.
pub trait Searchable {
    /// Text fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// Check whether `item` matches the search `term`.
///
/// A missing or blank term matches everything.
#[must_use]
pub fn matches_search<T: Searchable + ?Sized>(item: &T, term: Option<&str>) -> bool {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return true;
    };
    let needle = term.to_lowercase();
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the items that match `term` and, when given, `status`.
pub fn apply<T, S, F>(items: Vec<T>, term: Option<&str>, status: Option<S>, status_of: F) -> Vec<T>
where
    T: Searchable,
    S: PartialEq + Copy,
    F: Fn(&T) -> Option<S>,
{
    items
        .into_iter()
        .filter(|item| matches_search(item, term))
        .filter(|item| status.is_none() || status_of(item) == status)
        .collect()
}

/// Totals shown on the status filter strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts<S: Ord> {
    /// Number of records matching the search.
    pub total: usize,
    /// Number of records per status.
    pub by_status: BTreeMap<S, usize>,
}

/// Count `items` per status.
pub fn count_by_status<T, S, F>(items: &[T], status_of: F) -> StatusCounts<S>
where
    S: Ord,
    F: Fn(&T) -> Option<S>,
{
    let mut by_status = BTreeMap::new();
    for status in items.iter().filter_map(&status_of) {
        *by_status.entry(status).or_insert(0) += 1;
    }
    StatusCounts {
        total: items.len(),
        by_status,
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.kind.as_str(),
            self.presentation.as_str(),
        ]
    }
}

impl Searchable for UnitOfMeasure {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.abbreviation.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.code.as_str(),
            self.name.as_str(),
            self.description.as_str(),
        ];
        fields.extend(self.lot.as_deref());
        fields
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.address.as_str(),
        ];
        fields.extend(self.kind.as_deref());
        fields
    }
}

impl Searchable for Distributor {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.address.as_str(),
        ];
        fields.extend(self.delivery_route.as_deref());
        fields
    }
}

impl Searchable for Movement {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.product_name.as_str(),
            self.recorded_by.as_str(),
            self.notes.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, SupplierDraft};

    fn supplier(id: i64, name: &str, email: &str, active: bool) -> Supplier {
        Supplier::from_draft(
            id,
            SupplierDraft {
                kind: None,
                name: name.to_string(),
                phone: "3001234567".to_string(),
                email: email.to_string(),
                address: "Zona Industrial, Cartagena".to_string(),
                active,
            },
        )
    }

    fn suppliers() -> Vec<Supplier> {
        vec![
            supplier(1, "Fertilizantes Colombianos S.A.", "ventas@fertilcol.com", true),
            supplier(2, "Agroquímicos del Oriente", "comercial@agroori.com", true),
            supplier(3, "Semillas Premium Ltda", "info@semillaspremium.com", false),
        ]
    }

    #[test]
    fn test_blank_term_matches_everything() {
        let item = supplier(1, "Agroquímicos del Oriente", "a@b.co", true);
        assert!(matches_search(&item, None));
        assert!(matches_search(&item, Some("   ")));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let item = supplier(1, "Agroquímicos del Oriente", "comercial@agroori.com", true);
        assert!(matches_search(&item, Some("AGROQUÍMICOS")));
        assert!(matches_search(&item, Some("agroori")));
        assert!(matches_search(&item, Some("cartagena")));
        assert!(!matches_search(&item, Some("semillas")));
    }

    #[test]
    fn test_apply_search_and_status() {
        let found = apply(suppliers(), Some("s"), Some(Activity::Inactive), |s| {
            Some(s.activity())
        });
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);

        let all = apply(suppliers(), None, None, |s| Some(s.activity()));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_count_by_status() {
        let counts = count_by_status(&suppliers(), |s| Some(s.activity()));
        assert_eq!(counts.total, 3);
        assert_eq!(counts.by_status[&Activity::Active], 2);
        assert_eq!(counts.by_status[&Activity::Inactive], 1);
    }

    #[test]
    fn test_count_serializes_status_keys() {
        let counts = count_by_status(&suppliers(), |s| Some(s.activity()));
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["byStatus"]["active"], 2);
    }
}
