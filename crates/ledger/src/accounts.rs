//! Account records.
//!
//! An account is a place where money lives: a bank account, physical cash, a
//! credit card, a savings pot. Balances are signed; a credit account usually
//! carries a negative balance.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, MoneyCents};

/// Kind of account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Bank,
    Cash,
    Credit,
    Savings,
    Other,
}

impl AccountKind {
    /// Canonical value stored in the database column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AccountKind::Bank => "bank",
            AccountKind::Cash => "cash",
            AccountKind::Credit => "credit",
            AccountKind::Savings => "savings",
            AccountKind::Other => "other",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bank" => Ok(AccountKind::Bank),
            "cash" => Ok(AccountKind::Cash),
            "credit" => Ok(AccountKind::Credit),
            "savings" => Ok(AccountKind::Savings),
            "other" => Ok(AccountKind::Other),
            other => Err(LedgerError::InvalidAmount(format!(
                "unknown account kind: {other}"
            ))),
        }
    }
}

/// An account record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance_cents: i64,
    pub color: String,
    pub kind: AccountKind,
}

/// Everything needed to create an account; the id is assigned by the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountDraft {
    pub name: String,
    pub balance_cents: i64,
    pub color: String,
    pub kind: AccountKind,
}

impl core::fmt::Display for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.name,
            self.kind.as_str(),
            MoneyCents::new(self.balance_cents)
        )
    }
}

impl AccountDraft {
    pub(crate) fn into_account(self, id: String) -> Account {
        Account {
            id,
            name: self.name,
            balance_cents: self.balance_cents,
            color: self.color,
            kind: self.kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub balance_cents: i64,
    pub color: String,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            balance_cents: model.balance_cents,
            color: model.color,
            kind: AccountKind::try_from(model.kind.as_str())?,
        })
    }
}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            balance_cents: ActiveValue::Set(value.balance_cents),
            color: ActiveValue::Set(value.color.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
        }
    }
}
