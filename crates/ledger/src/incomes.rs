//! Income records.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, MoneyCents, ResultLedger};

/// An income record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub amount_cents: i64,
    pub source: String,
    pub date: NaiveDate,
    pub description: String,
}

impl core::fmt::Display for Income {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {}",
            MoneyCents::new(self.amount_cents),
            self.source,
            self.description
        )
    }
}

/// Everything needed to create or overwrite an income; the id is assigned by
/// the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IncomeDraft {
    pub amount_cents: i64,
    pub source: String,
    pub date: NaiveDate,
    pub description: String,
}

impl IncomeDraft {
    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.amount_cents < 0 {
            return Err(LedgerError::InvalidAmount(
                "income amount must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_income(self, id: String) -> Income {
        Income {
            id,
            amount_cents: self.amount_cents,
            source: self.source,
            date: self.date,
            description: self.description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub amount_cents: i64,
    pub source: String,
    pub date: Date,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Income {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount_cents: model.amount_cents,
            source: model.source,
            date: model.date,
            description: model.description,
        }
    }
}

impl From<&Income> for ActiveModel {
    fn from(value: &Income) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            user_id: ActiveValue::NotSet,
            amount_cents: ActiveValue::Set(value.amount_cents),
            source: ActiveValue::Set(value.source.clone()),
            date: ActiveValue::Set(value.date),
            description: ActiveValue::Set(value.description.clone()),
        }
    }
}
