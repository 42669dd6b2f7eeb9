//! Remote data gateway contract
//!
//! The gateway is the system of record: it owns persistence and
//! query ordering, assigns ids and timestamps on creation, and applies
//! sparse updates. The hosted implementation is an external
//! collaborator; [`local::LocalGateway`] is a JSON-file implementation
//! bundled for the CLI and for tests.
//!
//! Every call may fail with a generic transport/auth/validation error;
//! the store treats all gateway failures uniformly.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    Emi, EmiId, EmiPatch, Money, NewEmi, NewTransaction, Transaction, TransactionId,
    TransactionPatch, UserId,
};

pub use local::LocalGateway;

/// The user's profile record, carrying the fixed monthly income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The owning user
    pub id: UserId,

    /// Fixed recurring monthly income
    pub monthly_income: Money,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Sparse update for a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub monthly_income: Option<Money>,
}

impl ProfileUpdate {
    /// An update that sets the monthly income
    pub fn income(monthly_income: Money) -> Self {
        Self {
            monthly_income: Some(monthly_income),
        }
    }
}

/// Authenticated CRUD against the hosted record store
///
/// List results come back ordered: EMIs by creation time descending,
/// transactions by date descending.
#[async_trait]
pub trait FinanceGateway: Send + Sync {
    /// Fetch the user's profile, if one exists
    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>>;

    /// Update (or create) the user's profile
    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<Profile>;

    /// List the user's EMIs, newest first
    async fn list_emis(&self, user: &UserId) -> Result<Vec<Emi>>;

    /// Create an EMI; the gateway assigns id and timestamps
    async fn create_emi(&self, user: &UserId, draft: NewEmi) -> Result<Emi>;

    /// Apply a sparse update to an EMI
    async fn update_emi(&self, id: EmiId, patch: EmiPatch) -> Result<Emi>;

    /// Delete an EMI
    async fn delete_emi(&self, id: EmiId) -> Result<()>;

    /// List the user's transactions, most recent date first
    async fn list_transactions(&self, user: &UserId) -> Result<Vec<Transaction>>;

    /// Create a transaction; the gateway assigns id and timestamps
    async fn create_transaction(&self, user: &UserId, draft: NewTransaction)
        -> Result<Transaction>;

    /// Apply a sparse update to a transaction
    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction>;

    /// Delete a transaction
    async fn delete_transaction(&self, id: TransactionId) -> Result<()>;
}
