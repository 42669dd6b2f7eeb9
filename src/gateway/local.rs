//! JSON-file gateway implementation
//!
//! Plays the hosted record store for the CLI and for tests: one JSON
//! file per record class under the data directory, rewritten atomically
//! on every mutation. Ids and timestamps are assigned here, mirroring
//! the server-side contract, and drafts are validated the way the
//! hosted service would validate them.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::FintrackPaths;
use crate::error::{Error, Result};
use crate::models::{
    Emi, EmiId, EmiPatch, NewEmi, NewTransaction, Transaction, TransactionId, TransactionPatch,
    UserId,
};
use crate::storage::{read_json, write_json_atomic};

use super::{FinanceGateway, Profile, ProfileUpdate};

/// An EMI record with its owner, as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmiRow {
    user_id: UserId,
    #[serde(flatten)]
    emi: Emi,
}

/// A transaction record with its owner, as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionRow {
    user_id: UserId,
    #[serde(flatten)]
    txn: Transaction,
}

/// Gateway backed by JSON files in the local data directory
pub struct LocalGateway {
    paths: FintrackPaths,
    // Serializes read-modify-write cycles on the data files
    write_lock: Mutex<()>,
}

impl LocalGateway {
    /// Create a gateway over the given paths
    pub fn new(paths: FintrackPaths) -> Self {
        Self {
            paths,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_profiles(&self) -> Result<Vec<Profile>> {
        read_json(self.paths.profiles_file()).await
    }

    async fn read_emis(&self) -> Result<Vec<EmiRow>> {
        read_json(self.paths.emis_file()).await
    }

    async fn read_transactions(&self) -> Result<Vec<TransactionRow>> {
        read_json(self.paths.transactions_file()).await
    }
}

#[async_trait]
impl FinanceGateway for LocalGateway {
    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>> {
        let profiles = self.read_profiles().await?;
        Ok(profiles.into_iter().find(|p| p.id == *user))
    }

    async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<Profile> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.read_profiles().await?;
        let now = Utc::now();

        let profile = match profiles.iter_mut().find(|p| p.id == *user) {
            Some(profile) => {
                if let Some(income) = update.monthly_income {
                    profile.monthly_income = income;
                }
                profile.updated_at = now;
                profile.clone()
            }
            None => {
                debug!("creating profile for {}", user);
                let profile = Profile {
                    id: *user,
                    monthly_income: update.monthly_income.unwrap_or_default(),
                    created_at: now,
                    updated_at: now,
                };
                profiles.push(profile.clone());
                profile
            }
        };

        write_json_atomic(self.paths.profiles_file(), &profiles).await?;
        Ok(profile)
    }

    async fn list_emis(&self, user: &UserId) -> Result<Vec<Emi>> {
        let rows = self.read_emis().await?;
        let mut emis: Vec<Emi> = rows
            .into_iter()
            .filter(|r| r.user_id == *user)
            .map(|r| r.emi)
            .collect();
        emis.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(emis)
    }

    async fn create_emi(&self, user: &UserId, draft: NewEmi) -> Result<Emi> {
        draft
            .validate()
            .map_err(|e| Error::Gateway(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_emis().await?;
        let now = Utc::now();

        let emi = Emi {
            id: EmiId::new(),
            name: draft.name,
            loan_amount: draft.loan_amount,
            emi_amount: draft.emi_amount,
            due_day: draft.due_day,
            start_date: draft.start_date,
            duration_months: draft.duration_months,
            remaining_months: draft.remaining_months,
            interest_rate: draft.interest_rate,
            category: draft.category,
            created_at: now,
            updated_at: now,
        };
        debug!("created EMI {} for {}", emi.id, user);

        rows.push(EmiRow {
            user_id: *user,
            emi: emi.clone(),
        });
        write_json_atomic(self.paths.emis_file(), &rows).await?;
        Ok(emi)
    }

    async fn update_emi(&self, id: EmiId, patch: EmiPatch) -> Result<Emi> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_emis().await?;

        let row = rows
            .iter_mut()
            .find(|r| r.emi.id == id)
            .ok_or_else(|| Error::emi_not_found(id.to_string()))?;

        patch.apply_to(&mut row.emi);
        row.emi.updated_at = Utc::now();
        row.emi
            .validate()
            .map_err(|e| Error::Gateway(e.to_string()))?;
        let emi = row.emi.clone();

        write_json_atomic(self.paths.emis_file(), &rows).await?;
        Ok(emi)
    }

    async fn delete_emi(&self, id: EmiId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_emis().await?;
        let before = rows.len();
        rows.retain(|r| r.emi.id != id);

        if rows.len() == before {
            // Deleting an absent row succeeds, matching hosted semantics
            warn!("delete of unknown EMI {}", id);
            return Ok(());
        }

        write_json_atomic(self.paths.emis_file(), &rows).await
    }

    async fn list_transactions(&self, user: &UserId) -> Result<Vec<Transaction>> {
        let rows = self.read_transactions().await?;
        let mut txns: Vec<Transaction> = rows
            .into_iter()
            .filter(|r| r.user_id == *user)
            .map(|r| r.txn)
            .collect();
        txns.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(txns)
    }

    async fn create_transaction(
        &self,
        user: &UserId,
        draft: NewTransaction,
    ) -> Result<Transaction> {
        draft
            .validate()
            .map_err(|e| Error::Gateway(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_transactions().await?;
        let now = Utc::now();

        let txn = Transaction {
            id: TransactionId::new(),
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            is_recurring: draft.is_recurring,
            created_at: now,
            updated_at: now,
        };
        debug!("created transaction {} for {}", txn.id, user);

        rows.push(TransactionRow {
            user_id: *user,
            txn: txn.clone(),
        });
        write_json_atomic(self.paths.transactions_file(), &rows).await?;
        Ok(txn)
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_transactions().await?;

        let row = rows
            .iter_mut()
            .find(|r| r.txn.id == id)
            .ok_or_else(|| Error::transaction_not_found(id.to_string()))?;

        patch.apply_to(&mut row.txn);
        row.txn.updated_at = Utc::now();
        if !row.txn.amount.is_positive() {
            return Err(Error::Gateway(format!(
                "Amount must be positive, got {}",
                row.txn.amount
            )));
        }
        let txn = row.txn.clone();

        write_json_atomic(self.paths.transactions_file(), &rows).await?;
        Ok(txn)
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_transactions().await?;
        let before = rows.len();
        rows.retain(|r| r.txn.id != id);

        if rows.len() == before {
            warn!("delete of unknown transaction {}", id);
            return Ok(());
        }

        write_json_atomic(self.paths.transactions_file(), &rows).await
    }
}
