//! Finance state snapshot and transitions
//!
//! State changes are modeled as a tagged union of transition messages
//! applied to an immutable snapshot by a pure function, producing a new
//! snapshot. The store applies one action at a time, so every published
//! state is a complete, consistent view.

use crate::models::{Emi, EmiId, MonthlyBudget, Transaction, TransactionId};

/// The authoritative in-memory snapshot for the active session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinanceState {
    /// EMIs, newest first
    pub emis: Vec<Emi>,

    /// Transactions, most recent date first on load; new entries are
    /// prepended regardless of date
    pub transactions: Vec<Transaction>,

    /// The monthly budget
    pub monthly_budget: MonthlyBudget,

    /// Whether a load or mutation is in flight
    pub loading: bool,

    /// The last failure message, cleared at the start of each attempt
    pub error: Option<String>,
}

/// A state transition message
#[derive(Debug, Clone)]
pub enum FinanceAction {
    SetLoading(bool),
    SetError(Option<String>),
    SetEmis(Vec<Emi>),
    AddEmi(Emi),
    UpdateEmi(Emi),
    RemoveEmi(EmiId),
    SetTransactions(Vec<Transaction>),
    AddTransaction(Transaction),
    UpdateTransaction(Transaction),
    RemoveTransaction(TransactionId),
    SetBudget(MonthlyBudget),
    Reset,
}

impl FinanceState {
    /// Apply a transition, producing the next snapshot
    ///
    /// Additions prepend so lists read most-recent-first; updates
    /// replace by id; removals of an absent id leave the list as it
    /// was. Setting an error also clears the loading flag.
    pub fn apply(&self, action: FinanceAction) -> FinanceState {
        let mut next = self.clone();
        match action {
            FinanceAction::SetLoading(loading) => {
                next.loading = loading;
            }
            FinanceAction::SetError(error) => {
                next.error = error;
                next.loading = false;
            }
            FinanceAction::SetEmis(emis) => {
                next.emis = emis;
            }
            FinanceAction::AddEmi(emi) => {
                next.emis.insert(0, emi);
            }
            FinanceAction::UpdateEmi(emi) => {
                if let Some(existing) = next.emis.iter_mut().find(|e| e.id == emi.id) {
                    *existing = emi;
                }
            }
            FinanceAction::RemoveEmi(id) => {
                next.emis.retain(|e| e.id != id);
            }
            FinanceAction::SetTransactions(transactions) => {
                next.transactions = transactions;
            }
            FinanceAction::AddTransaction(txn) => {
                next.transactions.insert(0, txn);
            }
            FinanceAction::UpdateTransaction(txn) => {
                if let Some(existing) = next.transactions.iter_mut().find(|t| t.id == txn.id) {
                    *existing = txn;
                }
            }
            FinanceAction::RemoveTransaction(id) => {
                next.transactions.retain(|t| t.id != id);
            }
            FinanceAction::SetBudget(budget) => {
                next.monthly_budget = budget;
            }
            FinanceAction::Reset => {
                next = FinanceState::default();
            }
        }
        next
    }
}
