//! Expense operations.

use chrono::{Datelike, NaiveDate};
use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    ResultLedger,
    expenses::{self, Expense, ExpenseDraft, Frequency},
};

use super::Ledger;

impl Ledger {
    /// Inserts a new expense scoped to the current owner and appends the
    /// returned row to the in-memory list.
    ///
    /// Returns `None` without touching anything when no owner is bound
    /// (signed-out sessions are a soft no-op).
    pub async fn add_expense(&mut self, draft: ExpenseDraft) -> ResultLedger<Option<Expense>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(None);
        };
        draft.validate()?;

        let mut draft = draft;
        if draft.is_recurring && draft.parent_expense_id.is_none() {
            // Fill the template cursor so materialization can pick it up.
            if draft.frequency.is_none() {
                draft.frequency = Some(Frequency::Monthly);
            }
            if draft.base_amount_cents.is_none() {
                draft.base_amount_cents = Some(draft.amount_cents);
            }
            if draft.next_due_date.is_none() {
                draft.next_due_date = Some(add_one_month(draft.date));
            }
        }

        let expense = draft.into_expense(Uuid::new_v4().to_string());
        let mut model: expenses::ActiveModel = (&expense).into();
        model.user_id = ActiveValue::Set(owner);
        let inserted = model.insert(&self.database).await?;

        let expense = Expense::try_from(inserted)?;
        self.expenses.push(expense.clone());
        Ok(Some(expense))
    }

    /// Overwrites an expense by id, scoped to the current owner.
    ///
    /// When the id does not belong to the owner the remote filter matches
    /// zero rows and the call is a silent no-op, local state included.
    pub async fn edit_expense(&mut self, id: &str, draft: ExpenseDraft) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };
        draft.validate()?;

        let updated = draft.into_expense(id.to_string());
        let result = expenses::Entity::update_many()
            .set(expenses::ActiveModel::from(&updated))
            .filter(expenses::Column::Id.eq(id))
            .filter(expenses::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(());
        }

        if let Some(entry) = self.expenses.iter_mut().find(|e| e.id == id) {
            *entry = updated;
        }
        Ok(())
    }

    /// Deletes an expense by id, scoped to the current owner. Unknown ids
    /// leave both sides unchanged.
    pub async fn delete_expense(&mut self, id: &str) -> ResultLedger<()> {
        let Some(owner) = self.owner.clone() else {
            return Ok(());
        };

        expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(id))
            .filter(expenses::Column::UserId.eq(owner))
            .exec(&self.database)
            .await?;

        self.expenses.retain(|e| e.id != id);
        Ok(())
    }

    /// Generates the dated instances every recurring template is due for.
    ///
    /// For each template whose `next_due_date` is on or before `today`, an
    /// instance is inserted (dated at the due date, linked through
    /// `parent_expense_id`) and the template cursor advances one calendar
    /// month at a time until it passes `today`. Returns the new instances.
    pub async fn materialize_recurring(&mut self, today: NaiveDate) -> ResultLedger<Vec<Expense>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(Vec::new());
        };

        let templates: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.is_template())
            .cloned()
            .collect();

        let mut created = Vec::new();
        for template in templates {
            let Some(mut next_due) = template.next_due_date else {
                continue;
            };
            let mut last_occurrence = template.last_occurrence;

            while next_due <= today {
                let instance = ExpenseDraft {
                    amount_cents: template.base_amount_cents.unwrap_or(template.amount_cents),
                    category: template.category,
                    date: next_due,
                    description: template.description.clone(),
                    base_amount_cents: None,
                    is_recurring: true,
                    frequency: template.frequency,
                    next_due_date: None,
                    last_occurrence: None,
                    parent_expense_id: Some(template.id.clone()),
                }
                .into_expense(Uuid::new_v4().to_string());

                let mut model: expenses::ActiveModel = (&instance).into();
                model.user_id = ActiveValue::Set(owner.clone());
                let inserted = model.insert(&self.database).await?;

                let instance = Expense::try_from(inserted)?;
                self.expenses.push(instance.clone());
                created.push(instance);

                last_occurrence = Some(next_due);
                next_due = add_one_month(next_due);
            }

            if last_occurrence == template.last_occurrence {
                continue;
            }

            let cursor = expenses::ActiveModel {
                id: ActiveValue::Set(template.id.clone()),
                next_due_date: ActiveValue::Set(Some(next_due)),
                last_occurrence: ActiveValue::Set(last_occurrence),
                ..Default::default()
            };
            let result = expenses::Entity::update_many()
                .set(cursor)
                .filter(expenses::Column::Id.eq(template.id.as_str()))
                .filter(expenses::Column::UserId.eq(owner.as_str()))
                .exec(&self.database)
                .await?;
            if result.rows_affected > 0
                && let Some(entry) = self.expenses.iter_mut().find(|e| e.id == template.id)
            {
                entry.next_due_date = Some(next_due);
                entry.last_occurrence = last_occurrence;
            }
        }

        Ok(created)
    }
}

/// One calendar month later, day clamped to the target month's length
/// (Jan 31 → Feb 28/29).
pub(crate) fn add_one_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = match date.month() {
        12 => (date.year() + 1, 1),
        m => (date.year(), m + 1),
    };
    let mut day = date.day();
    loop {
        // Day 28 exists in every month, so this always returns.
        if let Some(next) = NaiveDate::from_ymd_opt(year, month, day) {
            return next;
        }
        day -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn add_one_month_plain() {
        assert_eq!(add_one_month(date("2025-04-05")), date("2025-05-05"));
    }

    #[test]
    fn add_one_month_wraps_year() {
        assert_eq!(add_one_month(date("2025-12-15")), date("2026-01-15"));
    }

    #[test]
    fn add_one_month_clamps_short_months() {
        assert_eq!(add_one_month(date("2025-01-31")), date("2025-02-28"));
        assert_eq!(add_one_month(date("2024-01-31")), date("2024-02-29"));
        assert_eq!(add_one_month(date("2025-03-31")), date("2025-04-30"));
    }
}
