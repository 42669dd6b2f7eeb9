//! Monthly budget model
//!
//! Holds the fixed recurring income used as the baseline for the monthly
//! summary. The expense/savings fields are reserved: nothing in the crate
//! derives them, but callers may populate them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// The user's monthly budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyBudget {
    /// Fixed recurring monthly income
    pub income: Money,

    /// Reserved; no derivation exists for this field
    #[serde(default)]
    pub fixed_expenses: Money,

    /// Reserved; no derivation exists for this field
    #[serde(default)]
    pub variable_expenses: Money,

    /// Reserved; no derivation exists for this field
    #[serde(default)]
    pub savings: Money,
}

impl MonthlyBudget {
    /// Create a budget with the given recurring income
    pub fn with_income(income: Money) -> Self {
        Self {
            income,
            ..Self::default()
        }
    }
}

impl fmt::Display for MonthlyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "income {}/month", self.income)
    }
}
