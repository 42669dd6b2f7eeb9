//! Core data models for fintrack
//!
//! Domain records mirrored from the remote gateway: loan installment
//! plans (EMIs), income/expense transactions, and the monthly budget,
//! plus the strongly-typed ids and the `Money` currency type they share.

pub mod budget;
pub mod emi;
pub mod ids;
pub mod money;
pub mod transaction;

pub use budget::MonthlyBudget;
pub use emi::{Emi, EmiCategory, EmiPatch, EmiValidationError, NewEmi};
pub use ids::{EmiId, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use transaction::{
    NewTransaction, Transaction, TransactionPatch, TransactionType, TransactionValidationError,
    EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
