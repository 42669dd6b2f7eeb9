//! Finance store
//!
//! The single authoritative state container for the session. Every
//! mutation goes through the gateway first and is mirrored locally only
//! from the gateway's response, so local state never diverges from the
//! last-known remote result.
//!
//! Contract per mutating operation: requires an identity, clears the
//! previous error and raises the loading flag before the remote call,
//! applies the local transition on success, records a fixed
//! per-operation message and re-raises on failure, and drops the
//! loading flag on every exit path. Results carry the session epoch
//! captured when the operation started; a result landing after a
//! sign-in/sign-out transition is discarded without touching state.

pub mod state;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use log::{error, info, warn};

use crate::auth::Identity;
use crate::error::{Error, Result};
use crate::gateway::{FinanceGateway, ProfileUpdate};
use crate::models::{
    Emi, EmiId, EmiPatch, MonthlyBudget, NewEmi, NewTransaction, Transaction, TransactionId,
    TransactionPatch,
};
use crate::summary;

pub use state::{FinanceAction, FinanceState};

struct StoreInner {
    state: FinanceState,
    identity: Option<Identity>,
    epoch: u64,
}

/// Session-scoped store mediating all reads and mutations through the gateway
pub struct FinanceStore {
    gateway: Arc<dyn FinanceGateway>,
    inner: Mutex<StoreInner>,
}

impl FinanceStore {
    /// Create a store over a gateway, with no active session
    pub fn new(gateway: Arc<dyn FinanceGateway>) -> Self {
        Self {
            gateway,
            inner: Mutex::new(StoreInner {
                state: FinanceState::default(),
                identity: None,
                epoch: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("finance store lock poisoned")
    }

    /// A clone of the current state snapshot
    pub fn state(&self) -> FinanceState {
        self.lock().state.clone()
    }

    /// The active identity, if signed in
    pub fn identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    /// Start a session and load its data. The previous session's state
    /// is discarded unconditionally before the load.
    pub async fn sign_in(&self, identity: Identity) -> Result<()> {
        {
            let mut inner = self.lock();
            inner.epoch += 1;
            info!("session started for {}", identity);
            inner.identity = Some(identity);
            inner.state = inner.state.apply(FinanceAction::Reset);
        }
        self.refresh().await
    }

    /// End the session, dropping all of its data
    pub fn sign_out(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        if let Some(identity) = inner.identity.take() {
            info!("session ended for {}", identity);
        }
        inner.state = inner.state.apply(FinanceAction::Reset);
    }

    /// Clear the in-memory snapshot without touching the session
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = inner.state.apply(FinanceAction::Reset);
    }

    /// Capture the identity and epoch, clear the error, raise loading
    fn begin(&self) -> Result<(Identity, u64)> {
        let mut inner = self.lock();
        let identity = inner.identity.clone().ok_or(Error::Unauthenticated)?;
        let epoch = inner.epoch;
        inner.state = inner.state.apply(FinanceAction::SetError(None));
        inner.state = inner.state.apply(FinanceAction::SetLoading(true));
        Ok((identity, epoch))
    }

    /// Apply a settled gateway result. Success applies `on_ok`'s
    /// transition, failure records `message`; both drop the loading
    /// flag. A result from a dead epoch is discarded entirely.
    fn settle<T>(
        &self,
        epoch: u64,
        message: &str,
        result: Result<T>,
        on_ok: impl FnOnce(&T) -> FinanceAction,
    ) -> Result<T> {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!("discarding result from a previous session: {}", message);
            return Err(Error::StaleSession);
        }
        match &result {
            Ok(value) => {
                inner.state = inner.state.apply(on_ok(value));
            }
            Err(err) => {
                error!("{}: {}", message, err);
                inner.state = inner
                    .state
                    .apply(FinanceAction::SetError(Some(message.to_string())));
            }
        }
        inner.state = inner.state.apply(FinanceAction::SetLoading(false));
        result
    }

    /// Reload the full snapshot from the gateway
    ///
    /// The profile is fetched first; the EMI and transaction fetches
    /// then run concurrently, and both settle before the loading flag
    /// drops. The load is all-or-nothing: on any failure the prior
    /// snapshot stays as it was and a single "Failed to load data"
    /// error is recorded. A missing profile row leaves the budget at
    /// its default.
    pub async fn refresh(&self) -> Result<()> {
        let (identity, epoch) = {
            let mut inner = self.lock();
            let Some(identity) = inner.identity.clone() else {
                return Ok(());
            };
            let epoch = inner.epoch;
            inner.state = inner.state.apply(FinanceAction::SetError(None));
            inner.state = inner.state.apply(FinanceAction::SetLoading(true));
            (identity, epoch)
        };

        let profile = self.gateway.get_profile(&identity.id).await;
        let (emis, transactions) = futures::join!(
            self.gateway.list_emis(&identity.id),
            self.gateway.list_transactions(&identity.id)
        );

        let loaded = profile.and_then(|profile| Ok((profile, emis?, transactions?)));

        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!("discarding refresh result from a previous session");
            return Err(Error::StaleSession);
        }
        match loaded {
            Ok((profile, emis, transactions)) => {
                let budget = profile
                    .map(|p| MonthlyBudget::with_income(p.monthly_income))
                    .unwrap_or_default();
                inner.state = inner.state.apply(FinanceAction::SetBudget(budget));
                inner.state = inner.state.apply(FinanceAction::SetEmis(emis));
                inner.state = inner
                    .state
                    .apply(FinanceAction::SetTransactions(transactions));
                inner.state = inner.state.apply(FinanceAction::SetLoading(false));
                Ok(())
            }
            Err(err) => {
                error!("Failed to load data: {}", err);
                inner.state = inner
                    .state
                    .apply(FinanceAction::SetError(Some("Failed to load data".into())));
                inner.state = inner.state.apply(FinanceAction::SetLoading(false));
                Err(err)
            }
        }
    }

    /// Create an EMI. The remaining-month count is computed from the
    /// start date and duration as of today.
    pub async fn add_emi(&self, mut draft: NewEmi) -> Result<Emi> {
        let (identity, epoch) = self.begin()?;
        let today = Local::now().date_naive();
        draft.remaining_months =
            summary::remaining_months_for(draft.start_date, draft.duration_months, today);
        let result = self.gateway.create_emi(&identity.id, draft).await;
        self.settle(epoch, "Failed to add EMI", result, |emi| {
            FinanceAction::AddEmi(emi.clone())
        })
    }

    /// Replace an EMI with an updated full record
    pub async fn update_emi(&self, emi: Emi) -> Result<Emi> {
        let (_identity, epoch) = self.begin()?;
        let patch = EmiPatch::from_full(&emi);
        let result = self.gateway.update_emi(emi.id, patch).await;
        self.settle(epoch, "Failed to update EMI", result, |updated| {
            FinanceAction::UpdateEmi(updated.clone())
        })
    }

    /// Delete an EMI by id
    pub async fn delete_emi(&self, id: EmiId) -> Result<()> {
        let (_identity, epoch) = self.begin()?;
        let result = self.gateway.delete_emi(id).await;
        self.settle(epoch, "Failed to delete EMI", result, |_| {
            FinanceAction::RemoveEmi(id)
        })
    }

    /// Create a transaction
    pub async fn add_transaction(&self, draft: NewTransaction) -> Result<Transaction> {
        let (identity, epoch) = self.begin()?;
        let result = self.gateway.create_transaction(&identity.id, draft).await;
        self.settle(epoch, "Failed to add transaction", result, |txn| {
            FinanceAction::AddTransaction(txn.clone())
        })
    }

    /// Replace a transaction with an updated full record
    pub async fn update_transaction(&self, txn: Transaction) -> Result<Transaction> {
        let (_identity, epoch) = self.begin()?;
        let patch = TransactionPatch::from_full(&txn);
        let result = self.gateway.update_transaction(txn.id, patch).await;
        self.settle(epoch, "Failed to update transaction", result, |updated| {
            FinanceAction::UpdateTransaction(updated.clone())
        })
    }

    /// Delete a transaction by id
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let (_identity, epoch) = self.begin()?;
        let result = self.gateway.delete_transaction(id).await;
        self.settle(epoch, "Failed to delete transaction", result, |_| {
            FinanceAction::RemoveTransaction(id)
        })
    }

    /// Persist a new monthly budget through the profile record
    pub async fn update_budget(&self, budget: MonthlyBudget) -> Result<()> {
        let (identity, epoch) = self.begin()?;
        let result = self
            .gateway
            .update_profile(&identity.id, ProfileUpdate::income(budget.income))
            .await
            .map(|_| ());
        self.settle(epoch, "Failed to update budget", result, |_| {
            FinanceAction::SetBudget(budget)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Profile;
    use crate::models::{EmiCategory, Money, TransactionType, UserId};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    /// In-memory gateway with per-operation failure injection and an
    /// optional gate that holds create_transaction open until released
    #[derive(Default)]
    struct MockGateway {
        emis: StdMutex<Vec<Emi>>,
        transactions: StdMutex<Vec<Transaction>>,
        profile: StdMutex<Option<Profile>>,
        failing: StdMutex<HashSet<&'static str>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockGateway {
        fn fail_on(&self, op: &'static str) {
            self.failing.lock().unwrap().insert(op);
        }

        fn check(&self, op: &'static str) -> Result<()> {
            if self.failing.lock().unwrap().contains(op) {
                Err(Error::Gateway(format!("injected failure in {}", op)))
            } else {
                Ok(())
            }
        }

        fn with_profile(self, user: UserId, income: Money) -> Self {
            let now = Utc::now();
            *self.profile.lock().unwrap() = Some(Profile {
                id: user,
                monthly_income: income,
                created_at: now,
                updated_at: now,
            });
            self
        }
    }

    #[async_trait]
    impl FinanceGateway for MockGateway {
        async fn get_profile(&self, _user: &UserId) -> Result<Option<Profile>> {
            self.check("get_profile")?;
            Ok(self.profile.lock().unwrap().clone())
        }

        async fn update_profile(&self, user: &UserId, update: ProfileUpdate) -> Result<Profile> {
            self.check("update_profile")?;
            let now = Utc::now();
            let profile = Profile {
                id: *user,
                monthly_income: update.monthly_income.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            };
            *self.profile.lock().unwrap() = Some(profile.clone());
            Ok(profile)
        }

        async fn list_emis(&self, _user: &UserId) -> Result<Vec<Emi>> {
            self.check("list_emis")?;
            Ok(self.emis.lock().unwrap().clone())
        }

        async fn create_emi(&self, _user: &UserId, draft: NewEmi) -> Result<Emi> {
            self.check("create_emi")?;
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
            self.emis.lock().unwrap().push(emi.clone());
            Ok(emi)
        }

        async fn update_emi(&self, id: EmiId, patch: EmiPatch) -> Result<Emi> {
            self.check("update_emi")?;
            let mut emis = self.emis.lock().unwrap();
            let emi = emis
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| Error::emi_not_found(id.to_string()))?;
            patch.apply_to(emi);
            emi.updated_at = Utc::now();
            Ok(emi.clone())
        }

        async fn delete_emi(&self, id: EmiId) -> Result<()> {
            self.check("delete_emi")?;
            self.emis.lock().unwrap().retain(|e| e.id != id);
            Ok(())
        }

        async fn list_transactions(&self, _user: &UserId) -> Result<Vec<Transaction>> {
            self.check("list_transactions")?;
            Ok(self.transactions.lock().unwrap().clone())
        }

        async fn create_transaction(
            &self,
            _user: &UserId,
            draft: NewTransaction,
        ) -> Result<Transaction> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.check("create_transaction")?;
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
            self.transactions.lock().unwrap().push(txn.clone());
            Ok(txn)
        }

        async fn update_transaction(
            &self,
            id: TransactionId,
            patch: TransactionPatch,
        ) -> Result<Transaction> {
            self.check("update_transaction")?;
            let mut txns = self.transactions.lock().unwrap();
            let txn = txns
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::transaction_not_found(id.to_string()))?;
            patch.apply_to(txn);
            txn.updated_at = Utc::now();
            Ok(txn.clone())
        }

        async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
            self.check("delete_transaction")?;
            self.transactions.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }
    }

    fn identity() -> Identity {
        Identity::new(UserId::new(), "asha@example.com")
    }

    fn emi_draft(name: &str) -> NewEmi {
        NewEmi::new(
            name,
            Money::from_rupees(800_000),
            Money::from_rupees(15_000),
            5,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            60,
        )
        .with_category(EmiCategory::Car)
    }

    fn txn_draft(amount: i64) -> NewTransaction {
        NewTransaction::new(
            Money::from_rupees(amount),
            TransactionType::Expense,
            "Shopping",
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
        )
    }

    async fn signed_in_store(gateway: MockGateway) -> FinanceStore {
        let store = FinanceStore::new(Arc::new(gateway));
        store.sign_in(identity()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_mutation_requires_identity() {
        let store = FinanceStore::new(Arc::new(MockGateway::default()));
        let err = store.add_transaction(txn_draft(500)).await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
        // No gateway call was issued, so no loading/error flip either
        assert_eq!(store.state(), FinanceState::default());
    }

    #[tokio::test]
    async fn test_sign_in_loads_budget_and_records() {
        let user = identity();
        let gateway =
            MockGateway::default().with_profile(user.id, Money::from_rupees(50_000));
        let store = FinanceStore::new(Arc::new(gateway));
        store.sign_in(user).await.unwrap();

        let state = store.state();
        assert_eq!(
            state.monthly_budget.income,
            Money::from_rupees(50_000)
        );
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_profile_leaves_default_budget() {
        let store = signed_in_store(MockGateway::default()).await;
        assert_eq!(store.state().monthly_budget, MonthlyBudget::default());
    }

    #[tokio::test]
    async fn test_add_transaction_prepends() {
        let store = signed_in_store(MockGateway::default()).await;
        store.add_transaction(txn_draft(100)).await.unwrap();
        let second = store.add_transaction(txn_draft(200)).await.unwrap();

        let state = store.state();
        assert_eq!(state.transactions.len(), 2);
        assert_eq!(state.transactions[0].id, second.id);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_add_emi_computes_remaining_months() {
        let store = signed_in_store(MockGateway::default()).await;
        let today = Local::now().date_naive();
        let mut draft = emi_draft("Car Loan");
        draft.start_date = today;
        let emi = store.add_emi(draft).await.unwrap();

        assert_eq!(emi.remaining_months, 60);
        assert_eq!(store.state().emis.len(), 1);
    }

    #[tokio::test]
    async fn test_update_emi_replaces_in_place() {
        let store = signed_in_store(MockGateway::default()).await;
        let emi = store.add_emi(emi_draft("Car Loan")).await.unwrap();

        let mut changed = emi.clone();
        changed.emi_amount = Money::from_rupees(14_000);
        store.update_emi(changed).await.unwrap();

        let state = store.state();
        assert_eq!(state.emis.len(), 1);
        assert_eq!(state.emis[0].emi_amount, Money::from_rupees(14_000));
    }

    #[tokio::test]
    async fn test_failed_mutation_sets_error_and_keeps_state() {
        let gateway = MockGateway::default();
        gateway.fail_on("create_transaction");
        let store = signed_in_store(gateway).await;

        let err = store.add_transaction(txn_draft(500)).await.unwrap_err();
        assert!(err.is_gateway());

        let state = store.state();
        assert!(state.transactions.is_empty());
        assert_eq!(state.error.as_deref(), Some("Failed to add transaction"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_next_attempt_clears_previous_error() {
        let gateway = MockGateway::default();
        gateway.fail_on("delete_emi");
        let store = signed_in_store(gateway).await;

        store.delete_emi(EmiId::new()).await.unwrap_err();
        assert!(store.state().error.is_some());

        store.add_transaction(txn_draft(500)).await.unwrap();
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_quiet() {
        let store = signed_in_store(MockGateway::default()).await;
        store.add_transaction(txn_draft(100)).await.unwrap();

        store.delete_transaction(TransactionId::new()).await.unwrap();
        assert_eq!(store.state().transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_all_or_nothing() {
        let user = identity();
        let gateway = Arc::new(
            MockGateway::default().with_profile(user.id, Money::from_rupees(50_000)),
        );
        let store = FinanceStore::new(gateway.clone());
        store.sign_in(user).await.unwrap();
        store.add_emi(emi_draft("Car Loan")).await.unwrap();
        store.add_transaction(txn_draft(100)).await.unwrap();
        let before = store.state();

        // Break one of the two concurrent fetches
        gateway.fail_on("list_transactions");
        let err = store.refresh().await.unwrap_err();
        assert!(err.is_gateway());

        let state = store.state();
        // Prior snapshot intact: neither record class was replaced
        assert_eq!(state.emis, before.emis);
        assert_eq!(state.transactions, before.transactions);
        assert_eq!(state.error.as_deref(), Some("Failed to load data"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_double_refresh_settles_clean() {
        let user = identity();
        let gateway = MockGateway::default().with_profile(user.id, Money::from_rupees(50_000));
        let store = FinanceStore::new(Arc::new(gateway));
        store.sign_in(user).await.unwrap();
        store.add_emi(emi_draft("Car Loan")).await.unwrap();
        store.add_transaction(txn_draft(100)).await.unwrap();

        let (a, b) = futures::join!(store.refresh(), store.refresh());
        a.unwrap();
        b.unwrap();

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.emis.len(), 1);
        assert_eq!(state.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_state_but_keeps_session() {
        let store = signed_in_store(MockGateway::default()).await;
        store.add_transaction(txn_draft(100)).await.unwrap();

        store.reset();
        assert_eq!(store.state(), FinanceState::default());
        assert!(store.identity().is_some());

        // A refresh restores the gateway's copy
        store.refresh().await.unwrap();
        assert_eq!(store.state().transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_resets_everything() {
        let store = signed_in_store(MockGateway::default()).await;
        store.add_transaction(txn_draft(100)).await.unwrap();

        store.sign_out();
        assert_eq!(store.state(), FinanceState::default());
        assert!(store.identity().is_none());
    }

    #[tokio::test]
    async fn test_stale_mutation_after_sign_out_is_discarded() {
        let gate = Arc::new(Notify::new());
        let gateway = MockGateway {
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let store = Arc::new(FinanceStore::new(Arc::new(gateway)));
        // sign_in's refresh does not pass through the gate
        store.sign_in(identity()).await.unwrap();

        let in_flight = {
            let store = store.clone();
            tokio::spawn(async move { store.add_transaction(txn_draft(500)).await })
        };
        // Let the spawned operation capture its epoch and block on the gate
        tokio::task::yield_now().await;

        store.sign_out();
        gate.notify_one();

        let result = in_flight.await.unwrap();
        assert!(matches!(result, Err(Error::StaleSession)));

        // The late response did not leak into the fresh session state
        assert_eq!(store.state(), FinanceState::default());
    }

    #[tokio::test]
    async fn test_update_budget_applies_after_gateway_success() {
        let store = signed_in_store(MockGateway::default()).await;
        let budget = MonthlyBudget::with_income(Money::from_rupees(60_000));
        store.update_budget(budget).await.unwrap();
        assert_eq!(store.state().monthly_budget, budget);
    }

    #[tokio::test]
    async fn test_update_budget_failure_keeps_old_budget() {
        let user = identity();
        let gateway = MockGateway::default().with_profile(user.id, Money::from_rupees(50_000));
        gateway.fail_on("update_profile");
        let store = FinanceStore::new(Arc::new(gateway));
        store.sign_in(user).await.unwrap();

        let err = store
            .update_budget(MonthlyBudget::with_income(Money::from_rupees(60_000)))
            .await
            .unwrap_err();
        assert!(err.is_gateway());
        assert_eq!(
            store.state().monthly_budget.income,
            Money::from_rupees(50_000)
        );
        assert_eq!(store.state().error.as_deref(), Some("Failed to update budget"));
    }
}
