//! Expense records.
//!
//! An expense is either a plain dated record or a recurring template. A
//! template (`is_recurring` with no parent) generates dated instances that
//! point back to it through `parent_expense_id`.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Category, LedgerError, MoneyCents, ResultLedger};

/// Recurrence cadence of an expense template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OneTime,
    Monthly,
    VariableMonthly,
}

impl Frequency {
    /// Canonical value stored in the database column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Frequency::OneTime => "one_time",
            Frequency::Monthly => "monthly",
            Frequency::VariableMonthly => "variable_monthly",
        }
    }
}

impl TryFrom<&str> for Frequency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "one_time" => Ok(Frequency::OneTime),
            "monthly" => Ok(Frequency::Monthly),
            "variable_monthly" => Ok(Frequency::VariableMonthly),
            other => Err(LedgerError::InvalidAmount(format!(
                "unknown frequency: {other}"
            ))),
        }
    }
}

/// An expense record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount_cents: i64,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
    pub base_amount_cents: Option<i64>,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub next_due_date: Option<NaiveDate>,
    pub last_occurrence: Option<NaiveDate>,
    pub parent_expense_id: Option<String>,
}

impl Expense {
    /// A template is a recurring expense that is not itself an instance.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.is_recurring && self.parent_expense_id.is_none()
    }
}

impl core::fmt::Display for Expense {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {}",
            MoneyCents::new(self.amount_cents),
            self.category,
            self.description
        )
    }
}

/// Everything needed to create or overwrite an expense; the id is assigned
/// by the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub amount_cents: i64,
    pub category: Category,
    pub date: NaiveDate,
    pub description: String,
    pub base_amount_cents: Option<i64>,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub next_due_date: Option<NaiveDate>,
    pub last_occurrence: Option<NaiveDate>,
    pub parent_expense_id: Option<String>,
}

impl ExpenseDraft {
    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.amount_cents < 0 {
            return Err(LedgerError::InvalidAmount(
                "expense amount must be >= 0".to_string(),
            ));
        }
        if let Some(base) = self.base_amount_cents
            && base < 0
        {
            return Err(LedgerError::InvalidAmount(
                "base amount must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_expense(self, id: String) -> Expense {
        Expense {
            id,
            amount_cents: self.amount_cents,
            category: self.category,
            date: self.date,
            description: self.description,
            base_amount_cents: self.base_amount_cents,
            is_recurring: self.is_recurring,
            frequency: self.frequency,
            next_due_date: self.next_due_date,
            last_occurrence: self.last_occurrence,
            parent_expense_id: self.parent_expense_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub amount_cents: i64,
    pub category: String,
    pub date: Date,
    pub description: String,
    pub base_amount_cents: Option<i64>,
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub next_due_date: Option<Date>,
    pub last_occurrence: Option<Date>,
    pub parent_expense_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Expense {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let frequency = model
            .frequency
            .as_deref()
            .map(Frequency::try_from)
            .transpose()?;
        Ok(Self {
            id: model.id,
            amount_cents: model.amount_cents,
            category: Category::try_from(model.category.as_str())?,
            date: model.date,
            description: model.description,
            base_amount_cents: model.base_amount_cents,
            is_recurring: model.is_recurring,
            frequency,
            next_due_date: model.next_due_date,
            last_occurrence: model.last_occurrence,
            parent_expense_id: model.parent_expense_id,
        })
    }
}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::NotSet,
            amount_cents: ActiveValue::Set(value.amount_cents),
            category: ActiveValue::Set(value.category.as_str().to_string()),
            date: ActiveValue::Set(value.date),
            description: ActiveValue::Set(value.description.clone()),
            base_amount_cents: ActiveValue::Set(value.base_amount_cents),
            is_recurring: ActiveValue::Set(value.is_recurring),
            frequency: ActiveValue::Set(value.frequency.map(|f| f.as_str().to_string())),
            next_due_date: ActiveValue::Set(value.next_due_date),
            last_occurrence: ActiveValue::Set(value.last_occurrence),
            parent_expense_id: ActiveValue::Set(value.parent_expense_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn draft_rejects_negative_amount() {
        let draft = ExpenseDraft {
            amount_cents: -1,
            date: date("2025-04-05"),
            description: "Groceries".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn template_detection() {
        let mut expense = ExpenseDraft {
            amount_cents: 4550,
            category: Category::Food,
            date: date("2025-04-05"),
            description: "Groceries".to_string(),
            is_recurring: true,
            frequency: Some(Frequency::Monthly),
            ..Default::default()
        }
        .into_expense("t-1".to_string());
        assert!(expense.is_template());

        expense.parent_expense_id = Some("t-0".to_string());
        assert!(!expense.is_template());
    }

    #[test]
    fn model_round_trip_preserves_recurrence() {
        let model = Model {
            id: "e-1".to_string(),
            user_id: "alice".to_string(),
            amount_cents: 1200,
            category: "transport".to_string(),
            date: date("2025-04-07"),
            description: "Gas".to_string(),
            base_amount_cents: Some(1200),
            is_recurring: true,
            frequency: Some("variable_monthly".to_string()),
            next_due_date: Some(date("2025-05-07")),
            last_occurrence: None,
            parent_expense_id: None,
        };

        let expense = Expense::try_from(model).unwrap();
        assert_eq!(expense.category, Category::Transport);
        assert_eq!(expense.frequency, Some(Frequency::VariableMonthly));
        assert_eq!(expense.next_due_date, Some(date("2025-05-07")));
    }

    #[test]
    fn model_with_unknown_category_fails() {
        let model = Model {
            id: "e-1".to_string(),
            user_id: "alice".to_string(),
            amount_cents: 100,
            category: "utilities".to_string(),
            date: date("2025-04-07"),
            description: String::new(),
            base_amount_cents: None,
            is_recurring: false,
            frequency: None,
            next_due_date: None,
            last_occurrence: None,
            parent_expense_id: None,
        };
        assert!(Expense::try_from(model).is_err());
    }
}
