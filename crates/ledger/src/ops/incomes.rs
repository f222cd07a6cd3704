//! Income operations.

use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    ResultLedger,
    incomes::{self, Income, IncomeDraft},
};

use super::Ledger;

impl Ledger {
    /// Inserts a new income scoped to the current owner and appends the
    /// returned row to the in-memory list. Soft no-op when signed out.
    pub async fn add_income(&mut self, draft: IncomeDraft) -> ResultLedger<Option<Income>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(None);
        };
        draft.validate()?;

        let income = draft.into_income(Uuid::new_v4().to_string());
        let mut model: incomes::ActiveModel = (&income).into();
        model.user_id = ActiveValue::Set(owner);
        let inserted = model.insert(&self.database).await?;

        let income = Income::from(inserted);
        self.incomes.push(income.clone());
        Ok(Some(income))
    }

    /// Overwrites an income by id, scoped to the current owner; silent
    /// no-op when the id is not owned.
    pub async fn edit_income(&mut self, id: &str, draft: IncomeDraft) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };
        draft.validate()?;

        let updated = draft.into_income(id.to_string());
        let result = incomes::Entity::update_many()
            .set(incomes::ActiveModel::from(&updated))
            .filter(incomes::Column::Id.eq(id))
            .filter(incomes::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(());
        }

        if let Some(entry) = self.incomes.iter_mut().find(|i| i.id == id) {
            *entry = updated;
        }
        Ok(())
    }

    /// Deletes an income by id, scoped to the current owner. Unknown ids
    /// leave both sides unchanged.
    pub async fn delete_income(&mut self, id: &str) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        incomes::Entity::delete_many()
            .filter(incomes::Column::Id.eq(id))
            .filter(incomes::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;

        self.incomes.retain(|i| i.id != id);
        Ok(())
    }
}
