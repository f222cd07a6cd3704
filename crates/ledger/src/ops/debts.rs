//! Debt operations.

use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    ResultLedger,
    debts::{self, Debt, DebtDraft, DebtPatch},
};

use super::Ledger;

impl Ledger {
    /// Inserts a new debt scoped to the current owner and appends the
    /// returned row to the in-memory list. Soft no-op when signed out.
    ///
    /// The draft goes through [`Debt::new`], so a remaining balance above
    /// the total (or a closing date on a loan) is rejected here, before the
    /// remote call.
    ///
    /// [`Debt::new`]: crate::Debt::new
    pub async fn add_debt(&mut self, draft: DebtDraft) -> ResultLedger<Option<Debt>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(None);
        };

        let debt = draft.into_debt(Uuid::new_v4().to_string())?;
        let mut model: debts::ActiveModel = (&debt).into();
        model.user_id = ActiveValue::Set(owner);
        let inserted = model.insert(&self.database).await?;

        let debt = Debt::try_from(inserted)?;
        self.debts.push(debt.clone());
        Ok(Some(debt))
    }

    /// Applies a partial update to a debt, scoped to the current owner.
    ///
    /// The patch is applied to the local entry and re-validated before the
    /// full row is written back; ids not present locally (not owned, or not
    /// yet fetched) are a silent no-op.
    pub async fn update_debt(&mut self, id: &str, patch: DebtPatch) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        let Some(current) = self.debts.iter().find(|d| d.id == id) else {
            return Ok(());
        };
        let updated = patch.apply(current)?;

        let result = debts::Entity::update_many()
            .set(debts::ActiveModel::from(&updated))
            .filter(debts::Column::Id.eq(id))
            .filter(debts::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(());
        }

        if let Some(entry) = self.debts.iter_mut().find(|d| d.id == id) {
            *entry = updated;
        }
        Ok(())
    }

    /// Deletes a debt by id, scoped to the current owner. Unknown ids leave
    /// both sides unchanged.
    pub async fn delete_debt(&mut self, id: &str) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        debts::Entity::delete_many()
            .filter(debts::Column::Id.eq(id))
            .filter(debts::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;

        self.debts.retain(|d| d.id != id);
        Ok(())
    }
}
