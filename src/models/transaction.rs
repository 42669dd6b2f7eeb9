//! Transaction model
//!
//! Income and expense entries with free-text categories, conventionally
//! drawn from a suggested list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// Suggested categories for income transactions
pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Business",
    "Investment",
    "Rental",
    "Other Income",
];

/// Suggested categories for expense transactions
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Insurance",
    "Other Expense",
];

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    /// Parse a type from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The suggested category list for this type
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Income => INCOME_CATEGORIES,
            Self::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// An income or expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier (gateway-assigned)
    pub id: TransactionId,

    /// Amount, always positive; direction comes from `kind`
    pub amount: Money,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Free-text category
    pub category: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Transaction date
    pub date: NaiveDate,

    /// Whether the entry repeats every month
    #[serde(default)]
    pub is_recurring: bool,

    /// When the record was created (gateway-assigned)
    pub created_at: DateTime<Utc>,

    /// When the record was last modified (gateway-assigned)
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Check if this is an income entry
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Check if this is an expense entry
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Check if the transaction falls in the given calendar month
    pub fn in_month(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.date.year() == year && self.date.month() == month
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            self.category
        )
    }
}

/// A new transaction awaiting creation; the gateway assigns id and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
}

impl NewTransaction {
    /// Create a new transaction draft
    pub fn new(
        amount: Money,
        kind: TransactionType,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            kind,
            category: category.into(),
            description: String::new(),
            date,
            is_recurring: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the entry as recurring
    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }
        Ok(())
    }
}

/// Sparse update for a transaction: only provided fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub amount: Option<Money>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
}

impl TransactionPatch {
    /// A patch that rewrites every mutable field from a full record
    pub fn from_full(txn: &Transaction) -> Self {
        Self {
            amount: Some(txn.amount),
            kind: Some(txn.kind),
            category: Some(txn.category.clone()),
            description: Some(txn.description.clone()),
            date: Some(txn.date),
            is_recurring: Some(txn.is_recurring),
        }
    }

    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.is_recurring.is_none()
    }

    /// Apply the patch to a record, leaving absent fields untouched
    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(category) = &self.category {
            txn.category = category.clone();
        }
        if let Some(description) = &self.description {
            txn.description = description.clone();
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            txn.is_recurring = is_recurring;
        }
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    EmptyCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::EmptyCategory => write!(f, "Category cannot be empty"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
