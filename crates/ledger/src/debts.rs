//! Debt records.
//!
//! Debts are validated at the boundary: the remaining balance can never
//! exceed the total amount, and only credit cards carry a statement closing
//! date. [`Debt::new`] and [`DebtPatch`] both go through the same checks, so
//! an invalid combination cannot enter the store.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, MoneyCents, ResultLedger};

/// Kind of debt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    #[default]
    Loan,
    CreditCard,
}

impl DebtKind {
    /// Canonical value stored in the database column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DebtKind::Loan => "loan",
            DebtKind::CreditCard => "credit_card",
        }
    }
}

impl TryFrom<&str> for DebtKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "loan" => Ok(DebtKind::Loan),
            "credit_card" => Ok(DebtKind::CreditCard),
            other => Err(LedgerError::InvalidDebt(format!(
                "unknown debt kind: {other}"
            ))),
        }
    }
}

/// A debt record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub name: String,
    pub amount_cents: i64,
    pub remaining_cents: i64,
    pub kind: DebtKind,
    /// Annual interest rate in basis points (550 = 5.50%).
    pub interest_rate_bp: Option<i64>,
    /// Statement closing date; credit cards only.
    pub closing_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub description: Option<String>,
}

impl Debt {
    /// Builds a validated debt.
    pub fn new(
        id: String,
        name: String,
        amount_cents: i64,
        remaining_cents: i64,
        kind: DebtKind,
        interest_rate_bp: Option<i64>,
        closing_date: Option<NaiveDate>,
        due_date: NaiveDate,
        description: Option<String>,
    ) -> ResultLedger<Self> {
        let debt = Self {
            id,
            name,
            amount_cents,
            remaining_cents,
            kind,
            interest_rate_bp,
            closing_date,
            due_date,
            description,
        };
        debt.validate()?;
        Ok(debt)
    }

    fn validate(&self) -> ResultLedger<()> {
        if self.amount_cents < 0 {
            return Err(LedgerError::InvalidDebt(
                "debt amount must be >= 0".to_string(),
            ));
        }
        if self.remaining_cents < 0 {
            return Err(LedgerError::InvalidDebt(
                "remaining amount must be >= 0".to_string(),
            ));
        }
        if self.remaining_cents > self.amount_cents {
            return Err(LedgerError::InvalidDebt(format!(
                "remaining amount {} exceeds total {}",
                self.remaining_cents, self.amount_cents
            )));
        }
        if self.closing_date.is_some() && self.kind != DebtKind::CreditCard {
            return Err(LedgerError::InvalidDebt(
                "closing date is only valid for credit cards".to_string(),
            ));
        }
        if let Some(rate) = self.interest_rate_bp
            && rate < 0
        {
            return Err(LedgerError::InvalidDebt(
                "interest rate must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `true` when the due date is strictly before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}

impl core::fmt::Display for Debt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: {} of {} due {}",
            self.name,
            MoneyCents::new(self.remaining_cents),
            MoneyCents::new(self.amount_cents),
            self.due_date
        )
    }
}

/// Everything needed to create a debt; the id is assigned by the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DebtDraft {
    pub name: String,
    pub amount_cents: i64,
    pub remaining_cents: i64,
    pub kind: DebtKind,
    pub interest_rate_bp: Option<i64>,
    pub closing_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub description: Option<String>,
}

impl DebtDraft {
    pub(crate) fn into_debt(self, id: String) -> ResultLedger<Debt> {
        Debt::new(
            id,
            self.name,
            self.amount_cents,
            self.remaining_cents,
            self.kind,
            self.interest_rate_bp,
            self.closing_date,
            self.due_date,
            self.description,
        )
    }
}

/// Partial update for a debt. `None` leaves the field untouched; the
/// optional columns use a double `Option` so they can be cleared.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DebtPatch {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub remaining_cents: Option<i64>,
    pub kind: Option<DebtKind>,
    pub interest_rate_bp: Option<Option<i64>>,
    pub closing_date: Option<Option<NaiveDate>>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<Option<String>>,
}

impl DebtPatch {
    /// Applies the patch to a copy of `debt`, re-running validation.
    pub fn apply(&self, debt: &Debt) -> ResultLedger<Debt> {
        let mut updated = debt.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(amount) = self.amount_cents {
            updated.amount_cents = amount;
        }
        if let Some(remaining) = self.remaining_cents {
            updated.remaining_cents = remaining;
        }
        if let Some(kind) = self.kind {
            updated.kind = kind;
        }
        if let Some(rate) = self.interest_rate_bp {
            updated.interest_rate_bp = rate;
        }
        if let Some(closing) = self.closing_date {
            updated.closing_date = closing;
        }
        if let Some(due) = self.due_date {
            updated.due_date = due;
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        updated.validate()?;
        Ok(updated)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount_cents: i64,
    pub remaining_cents: i64,
    pub kind: String,
    pub interest_rate_bp: Option<i64>,
    pub closing_date: Option<Date>,
    pub due_date: Date,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Debt {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        // Stored rows already passed validation; re-parse the kind only.
        Ok(Self {
            id: model.id,
            name: model.name,
            amount_cents: model.amount_cents,
            remaining_cents: model.remaining_cents,
            kind: DebtKind::try_from(model.kind.as_str())?,
            interest_rate_bp: model.interest_rate_bp,
            closing_date: model.closing_date,
            due_date: model.due_date,
            description: model.description,
        })
    }
}

impl From<&Debt> for ActiveModel {
    fn from(value: &Debt) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            amount_cents: ActiveValue::Set(value.amount_cents),
            remaining_cents: ActiveValue::Set(value.remaining_cents),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            interest_rate_bp: ActiveValue::Set(value.interest_rate_bp),
            closing_date: ActiveValue::Set(value.closing_date),
            due_date: ActiveValue::Set(value.due_date),
            description: ActiveValue::Set(value.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn loan() -> Debt {
        Debt::new(
            "d-1".to_string(),
            "Car loan".to_string(),
            500_000,
            350_000,
            DebtKind::Loan,
            Some(450),
            None,
            date("2025-05-01"),
            None,
        )
        .unwrap()
    }

    #[test]
    fn rejects_remaining_above_total() {
        let result = Debt::new(
            "d-1".to_string(),
            "Car loan".to_string(),
            500_000,
            500_001,
            DebtKind::Loan,
            None,
            None,
            date("2025-05-01"),
            None,
        );
        assert!(matches!(result, Err(LedgerError::InvalidDebt(_))));
    }

    #[test]
    fn rejects_closing_date_on_loan() {
        let result = Debt::new(
            "d-1".to_string(),
            "Car loan".to_string(),
            500_000,
            100_000,
            DebtKind::Loan,
            None,
            Some(date("2025-04-28")),
            date("2025-05-01"),
            None,
        );
        assert!(matches!(result, Err(LedgerError::InvalidDebt(_))));
    }

    #[test]
    fn patch_revalidates() {
        let debt = loan();
        let patch = DebtPatch {
            remaining_cents: Some(600_000),
            ..Default::default()
        };
        assert!(patch.apply(&debt).is_err());

        let patch = DebtPatch {
            remaining_cents: Some(200_000),
            ..Default::default()
        };
        assert_eq!(patch.apply(&debt).unwrap().remaining_cents, 200_000);
    }

    #[test]
    fn patch_can_clear_optionals() {
        let debt = loan();
        let patch = DebtPatch {
            interest_rate_bp: Some(None),
            ..Default::default()
        };
        assert_eq!(patch.apply(&debt).unwrap().interest_rate_bp, None);
    }

    #[test]
    fn display_shows_remaining_over_total() {
        assert_eq!(
            loan().to_string(),
            "Car loan: $3500.00 of $5000.00 due 2025-05-01"
        );
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let debt = loan();
        assert!(debt.is_overdue(date("2025-05-02")));
        assert!(!debt.is_overdue(date("2025-05-01")));
        assert!(!debt.is_overdue(date("2025-04-30")));
    }
}
