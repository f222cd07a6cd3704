//! Account operations.

use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    ResultLedger,
    accounts::{self, Account, AccountDraft},
};

use super::Ledger;

impl Ledger {
    /// Inserts a new account scoped to the current owner and appends the
    /// returned row to the in-memory list. Soft no-op when signed out.
    pub async fn add_account(&mut self, draft: AccountDraft) -> ResultLedger<Option<Account>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(None);
        };

        let account = draft.into_account(Uuid::new_v4().to_string());
        let mut model: accounts::ActiveModel = (&account).into();
        model.user_id = ActiveValue::Set(owner);
        let inserted = model.insert(&self.database).await?;

        let account = Account::try_from(inserted)?;
        self.accounts.push(account.clone());
        Ok(Some(account))
    }

    /// Overwrites an account by id, scoped to the current owner; silent
    /// no-op when the id is not owned.
    pub async fn edit_account(&mut self, id: &str, draft: AccountDraft) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        let updated = draft.into_account(id.to_string());
        let result = accounts::Entity::update_many()
            .set(accounts::ActiveModel::from(&updated))
            .filter(accounts::Column::Id.eq(id))
            .filter(accounts::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(());
        }

        if let Some(entry) = self.accounts.iter_mut().find(|a| a.id == id) {
            *entry = updated;
        }
        Ok(())
    }

    /// Balance-only partial update; the other columns stay untouched.
    pub async fn update_account_balance(
        &mut self,
        id: &str,
        balance_cents: i64,
    ) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        let model = accounts::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            balance_cents: ActiveValue::Set(balance_cents),
            ..Default::default()
        };
        let result = accounts::Entity::update_many()
            .set(model)
            .filter(accounts::Column::Id.eq(id))
            .filter(accounts::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(());
        }

        if let Some(entry) = self.accounts.iter_mut().find(|a| a.id == id) {
            entry.balance_cents = balance_cents;
        }
        Ok(())
    }

    /// Deletes an account by id, scoped to the current owner. Unknown ids
    /// leave both sides unchanged.
    pub async fn delete_account(&mut self, id: &str) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        accounts::Entity::delete_many()
            .filter(accounts::Column::Id.eq(id))
            .filter(accounts::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;

        self.accounts.retain(|a| a.id != id);
        Ok(())
    }
}
