//! Category reclassification.
//!
//! The category *set* is a fixed enumeration on the remote store and cannot
//! be extended from a client. What these operations do instead is move or
//! drop the owner's expenses between fixed categories, persisted like any
//! other mutation so the result survives a refresh.

use sea_orm::{QueryFilter, prelude::*, sea_query::Expr};

use crate::{Category, LedgerError, ResultLedger, expenses};

use super::Ledger;

impl Ledger {
    /// Reassigns every expense in `old` to `new`, remotely and locally.
    ///
    /// Returns how many rows moved. Soft no-op when signed out.
    pub async fn rename_category(&mut self, old: Category, new: Category) -> ResultLedger<u64> {
        if old == new {
            return Err(LedgerError::InvalidCategory(
                "old and new category are the same".to_string(),
            ));
        }
        let Some(owner) = self.owner.clone() else {
            return Ok(0);
        };

        let result = expenses::Entity::update_many()
            .col_expr(expenses::Column::Category, Expr::value(new.as_str()))
            .filter(expenses::Column::UserId.eq(owner))
            .filter(expenses::Column::Category.eq(old.as_str()))
            .exec(&self.database)
            .await?;

        for expense in self.expenses.iter_mut().filter(|e| e.category == old) {
            expense.category = new;
        }
        Ok(result.rows_affected)
    }

    /// Deletes every expense in `category`, remotely and locally.
    ///
    /// Returns how many rows were removed. Soft no-op when signed out.
    pub async fn delete_category(&mut self, category: Category) -> ResultLedger<u64> {
        let Some(owner) = self.owner.clone() else {
            return Ok(0);
        };

        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::UserId.eq(owner))
            .filter(expenses::Column::Category.eq(category.as_str()))
            .exec(&self.database)
            .await?;

        self.expenses.retain(|e| e.category != category);
        Ok(result.rows_affected)
    }
}
