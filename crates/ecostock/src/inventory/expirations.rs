//! Expiry entries and their alerts.

use std::collections::BTreeMap;

use super::{found, referenced, Inventory, Saved};
use crate::error::Result;
use crate::expiry::{self, ExpiryAlert, ExpiryStatus};
use crate::filter;
use crate::model::{ExpiryDraft, ExpiryEntry};
use crate::notice::Notice;
use crate::validation::{optional, positive};

impl Inventory {
    /// Get an expiry entry.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_expiry(&self, id: i64) -> Result<ExpiryEntry> {
        found(self.storage.get_expiry(id)?, "expiry entry", id)
    }

    /// Get an expiry entry with its derived status.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_expiry_alert(&self, id: i64) -> Result<ExpiryAlert> {
        let entry = self.get_expiry(id)?;
        self.build_alert(entry)
    }

    /// Register an expiration date for a product lot.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad draft.
    pub fn create_expiry(&self, draft: ExpiryDraft) -> Result<Saved<ExpiryAlert>> {
        let draft = self.check_expiry(draft)?;
        let id = self.storage.insert_expiry(&draft)?;
        let alert = self.get_expiry_alert(id)?;
        let notice = Notice::success(format!(
            "Expiration date registered for '{}'",
            alert.product_name
        ));
        Ok(Saved::new(alert, notice))
    }

    /// Replace an expiry entry. It will be alerted on again.
    ///
    /// # Errors
    ///
    /// Returns a not-found or validation error.
    pub fn update_expiry(&self, id: i64, draft: ExpiryDraft) -> Result<Saved<ExpiryAlert>> {
        self.get_expiry(id)?;
        let draft = self.check_expiry(draft)?;
        self.storage.update_expiry(id, &draft)?;
        let alert = self.get_expiry_alert(id)?;
        let notice = Notice::success(format!(
            "Expiration date updated for '{}'",
            alert.product_name
        ));
        Ok(Saved::new(alert, notice))
    }

    /// Delete an expiry entry.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn delete_expiry(&self, id: i64) -> Result<Notice> {
        let alert = self.get_expiry_alert(id)?;
        self.storage.delete_expiry(id)?;
        Ok(Notice::success(format!(
            "Expiration date removed for '{}'",
            alert.product_name
        )))
    }

    /// Every expiry entry with its derived status, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn expiry_alerts(&self) -> Result<Vec<ExpiryAlert>> {
        let names: BTreeMap<i64, String> = self
            .storage
            .list_products()?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        let mut suppliers = self.storage.supplier_names_by_product()?;
        let today = self.today();

        Ok(self
            .storage
            .list_expirations()?
            .into_iter()
            .map(|entry| {
                let name = names.get(&entry.product_id).cloned().unwrap_or_default();
                let supplier_names = suppliers.remove(&entry.product_id).unwrap_or_default();
                ExpiryAlert::build(entry, name, supplier_names, today, &self.alerts)
            })
            .collect())
    }

    /// Expiry entries matching `search` and `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_expirations(
        &self,
        search: Option<&str>,
        status: Option<ExpiryStatus>,
    ) -> Result<Vec<ExpiryAlert>> {
        let alerts = self.expiry_alerts()?;
        Ok(filter::apply(alerts, search, status, |a| Some(a.status)))
    }

    /// Entries that are expiring soon or already expired, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn expiring(
        &self,
        search: Option<&str>,
        status: Option<ExpiryStatus>,
    ) -> Result<Vec<ExpiryAlert>> {
        Ok(expiry::upcoming(self.expiry_alerts()?, status, search))
    }

    /// Raise a notice for each entry needing attention that has not been
    /// alerted on yet, and remember that it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn pending_notices(&self) -> Result<Vec<Notice>> {
        let pending: Vec<ExpiryAlert> = expiry::upcoming(self.expiry_alerts()?, None, None)
            .into_iter()
            .filter(|a| !a.entry.notified)
            .collect();
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = pending.iter().map(|a| a.entry.id).collect();
        self.storage.mark_notified(&ids)?;
        Ok(pending.iter().map(Notice::expiry).collect())
    }

    fn build_alert(&self, entry: ExpiryEntry) -> Result<ExpiryAlert> {
        let name = self
            .storage
            .get_product(entry.product_id)?
            .map(|p| p.name)
            .unwrap_or_default();
        let suppliers = self
            .storage
            .suppliers_of_product(entry.product_id)?
            .into_iter()
            .map(|s| s.name)
            .collect();
        Ok(ExpiryAlert::build(
            entry,
            name,
            suppliers,
            self.today(),
            &self.alerts,
        ))
    }

    fn check_expiry(&self, draft: ExpiryDraft) -> Result<ExpiryDraft> {
        referenced(
            self.storage.get_product(draft.product_id)?,
            "productId",
            "product",
            draft.product_id,
        )?;
        Ok(ExpiryDraft {
            product_id: draft.product_id,
            lot: optional(draft.lot),
            quantity: positive("quantity", draft.quantity)?,
            expires_on: draft.expires_on,
        })
    }
}
