//! Stock movements.

use super::{found, referenced, Inventory, Saved};
use crate::error::Result;
use crate::filter;
use crate::model::{Movement, MovementDraft, MovementKind};
use crate::notice::Notice;
use crate::validation::{not_in_future, positive, required};

impl Inventory {
    /// Movements matching `search` and `kind`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_movements(
        &self,
        search: Option<&str>,
        kind: Option<MovementKind>,
    ) -> Result<Vec<Movement>> {
        let movements = self.storage.list_movements()?;
        Ok(filter::apply(movements, search, kind, |m| Some(m.kind)))
    }

    /// Get a movement.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if it does not exist.
    pub fn get_movement(&self, id: i64) -> Result<Movement> {
        found(self.storage.get_movement(id)?, "movement", id)
    }

    /// Record a movement and apply it to the product's stock.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad draft, or an insufficient-stock
    /// error when an exit asks for more than is available.
    pub fn create_movement(&self, draft: MovementDraft) -> Result<Saved<Movement>> {
        let draft = self.check_movement(draft)?;
        let id = self.storage.insert_movement(&draft)?;
        let movement = self.get_movement(id)?;
        let notice = Notice::success(format!(
            "{} of {} {} recorded",
            kind_label(movement.kind),
            movement.quantity,
            movement.product_name
        ));
        Ok(Saved::new(movement, notice))
    }

    /// Replace a movement, moving its effect on stock accordingly.
    ///
    /// # Errors
    ///
    /// Returns a not-found, validation or insufficient-stock error.
    pub fn update_movement(&self, id: i64, draft: MovementDraft) -> Result<Saved<Movement>> {
        self.get_movement(id)?;
        let draft = self.check_movement(draft)?;
        self.storage.update_movement(id, &draft)?;
        let movement = self.get_movement(id)?;
        let notice = Notice::success(format!("Movement {id} updated"));
        Ok(Saved::new(movement, notice))
    }

    /// Delete a movement and reverse its effect on stock.
    ///
    /// # Errors
    ///
    /// Returns a not-found error, or an insufficient-stock error when the
    /// units of an entry have already left stock.
    pub fn delete_movement(&self, id: i64) -> Result<Notice> {
        let movement = self.get_movement(id)?;
        self.storage.delete_movement(id)?;
        Ok(Notice::success(format!(
            "{} of {} {} deleted",
            kind_label(movement.kind),
            movement.quantity,
            movement.product_name
        )))
    }

    fn check_movement(&self, draft: MovementDraft) -> Result<MovementDraft> {
        referenced(
            self.storage.get_product(draft.product_id)?,
            "productId",
            "product",
            draft.product_id,
        )?;
        Ok(MovementDraft {
            date: not_in_future("date", draft.date, self.today())?,
            kind: draft.kind,
            product_id: draft.product_id,
            quantity: positive("quantity", draft.quantity)?,
            recorded_by: required("recordedBy", &draft.recorded_by)?,
            notes: draft.notes.trim().to_string(),
        })
    }
}

fn kind_label(kind: MovementKind) -> &'static str {
    match kind {
        MovementKind::Entry => "Entry",
        MovementKind::Exit => "Exit",
    }
}
