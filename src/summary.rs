//! Derived financial metrics
//!
//! Pure, stateless aggregation over the current EMI, transaction, and
//! budget state. Every function takes the reference date explicitly so
//! results are deterministic; callers pass `Local::now().date_naive()`.
//!
//! Month arithmetic counts whole calendar-month differences
//! (year*12 + month), ignoring the day-of-month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Emi, Money, Transaction};

/// Snapshot of the month's finances, recomputed on demand and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Budget income plus this month's income transactions
    pub total_income: Money,

    /// This month's expense transactions plus all EMI obligations
    pub total_expenses: Money,

    /// Sum of every EMI's monthly installment
    pub total_emis: Money,

    /// `total_income - total_expenses`
    pub remaining_balance: Money,

    /// Remaining balance as a percentage of total income; 0 when there
    /// is no income
    pub savings_rate: f64,
}

impl FinancialSummary {
    /// The all-zero summary produced by empty inputs
    pub fn empty() -> Self {
        Self {
            total_income: Money::zero(),
            total_expenses: Money::zero(),
            total_emis: Money::zero(),
            remaining_balance: Money::zero(),
            savings_rate: 0.0,
        }
    }
}

/// Whole calendar months from `from` to `to`; negative when `to` is earlier
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}

/// Months left on a loan as of `today`, clamped to `[0, duration_months]`
///
/// The upper clamp keeps the `remaining_months <= duration_months`
/// invariant for loans whose start date is still in the future.
pub fn remaining_months_for(start_date: NaiveDate, duration_months: u32, today: NaiveDate) -> u32 {
    let elapsed = months_between(start_date, today);
    (duration_months as i64 - elapsed).clamp(0, duration_months as i64) as u32
}

/// Months left on an EMI as of `today`
pub fn remaining_months(emi: &Emi, today: NaiveDate) -> u32 {
    remaining_months_for(emi.start_date, emi.duration_months, today)
}

/// Number of days in the given month
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("valid first-of-month")
        .pred_opt()
        .expect("valid last-of-month")
        .day()
}

/// The due day placed in a month, clamped to the month's last day when
/// the day overflows (a due day of 31 falls due on Feb 28/29)
fn due_date_in_month(year: i32, month: u32, due_day: u32) -> NaiveDate {
    let day = due_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is valid")
}

/// The next occurrence of a due day, strictly after `today` unless the
/// same-month occurrence is still ahead
pub fn next_due_date(due_day: u32, today: NaiveDate) -> NaiveDate {
    let candidate = due_date_in_month(today.year(), today.month(), due_day);
    if candidate > today {
        return candidate;
    }
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    due_date_in_month(year, month, due_day)
}

/// Compute the monthly summary from the current state
///
/// Transactions outside today's calendar month are ignored. EMI
/// installments count in full regardless of date: they are a standing
/// monthly obligation, not a dated entry.
pub fn financial_summary(
    emis: &[Emi],
    transactions: &[Transaction],
    monthly_income: Money,
    today: NaiveDate,
) -> FinancialSummary {
    let (year, month) = (today.year(), today.month());

    let month_income: Money = transactions
        .iter()
        .filter(|t| t.in_month(year, month) && t.is_income())
        .map(|t| t.amount)
        .sum();

    let month_expenses: Money = transactions
        .iter()
        .filter(|t| t.in_month(year, month) && t.is_expense())
        .map(|t| t.amount)
        .sum();

    let total_emis: Money = emis.iter().map(|e| e.emi_amount).sum();

    let total_income = monthly_income + month_income;
    let total_expenses = month_expenses + total_emis;
    let remaining_balance = total_income - total_expenses;

    let savings_rate = if total_income.is_positive() {
        remaining_balance.paise() as f64 / total_income.paise() as f64 * 100.0
    } else {
        0.0
    };

    FinancialSummary {
        total_income,
        total_expenses,
        total_emis,
        remaining_balance,
        savings_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmiCategory, EmiId, TransactionId, TransactionType};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn emi(start: NaiveDate, duration: u32, amount: i64) -> Emi {
        let now = Utc::now();
        Emi {
            id: EmiId::new(),
            name: "Loan".into(),
            loan_amount: Money::from_rupees(amount * 100),
            emi_amount: Money::from_rupees(amount),
            due_day: 5,
            start_date: start,
            duration_months: duration,
            remaining_months: duration,
            interest_rate: None,
            category: EmiCategory::Other,
            created_at: now,
            updated_at: now,
        }
    }

    fn txn(kind: TransactionType, amount: i64, on: NaiveDate) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId::new(),
            amount: Money::from_rupees(amount),
            kind,
            category: "Test".into(),
            description: String::new(),
            date: on,
            is_recurring: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_remaining_months_counts_whole_months() {
        // 14 whole months from June 2024 to August 2025, day ignored
        assert_eq!(
            remaining_months_for(date(2024, 6, 25), 240, date(2025, 8, 1)),
            226
        );
        assert_eq!(
            remaining_months_for(date(2024, 6, 1), 240, date(2025, 8, 31)),
            226
        );
    }

    #[test]
    fn test_remaining_months_clamps_to_zero() {
        assert_eq!(
            remaining_months_for(date(2020, 1, 1), 12, date(2025, 8, 1)),
            0
        );
    }

    #[test]
    fn test_remaining_months_future_start_clamps_to_duration() {
        // Loan starting next year has the full duration left, not more
        assert_eq!(
            remaining_months_for(date(2026, 1, 1), 24, date(2025, 8, 1)),
            24
        );
    }

    #[test]
    fn test_remaining_months_bounds_hold() {
        let e = emi(date(2024, 6, 1), 240, 21_000);
        for today in [date(2020, 1, 1), date(2024, 6, 1), date(2060, 1, 1)] {
            let left = remaining_months(&e, today);
            assert!(left <= e.duration_months);
        }
    }

    #[test]
    fn test_next_due_date_same_month() {
        // Due day still ahead this month is returned as-is
        assert_eq!(next_due_date(15, date(2025, 8, 6)), date(2025, 8, 15));
    }

    #[test]
    fn test_next_due_date_advances_when_not_strictly_after() {
        // Today itself is not strictly after today
        assert_eq!(next_due_date(6, date(2025, 8, 6)), date(2025, 9, 6));
        assert_eq!(next_due_date(1, date(2025, 8, 6)), date(2025, 9, 1));
    }

    #[test]
    fn test_next_due_date_year_rollover() {
        assert_eq!(next_due_date(10, date(2025, 12, 20)), date(2026, 1, 10));
    }

    #[test]
    fn test_next_due_date_clamps_short_months() {
        // 31st clamps to the last day of short months
        assert_eq!(next_due_date(31, date(2025, 2, 10)), date(2025, 2, 28));
        assert_eq!(next_due_date(31, date(2024, 2, 10)), date(2024, 2, 29));
        // Past the clamped date, advances into the next month's real 31st
        assert_eq!(next_due_date(31, date(2025, 2, 28)), date(2025, 3, 31));
        assert_eq!(next_due_date(31, date(2025, 3, 31)), date(2025, 4, 30));
    }

    #[test]
    fn test_next_due_date_is_never_in_the_past() {
        let today = date(2025, 8, 6);
        for due_day in 1..=31 {
            let due = next_due_date(due_day, today);
            assert!(due > today, "due day {} produced {}", due_day, due);
        }
    }

    #[test]
    fn test_summary_empty_inputs_yield_zeros() {
        let summary = financial_summary(&[], &[], Money::zero(), date(2025, 8, 6));
        assert_eq!(summary, FinancialSummary::empty());
    }

    #[test]
    fn test_summary_worked_example() {
        // One EMI of 15,000, no transactions, 50,000 income:
        // balance 35,000, savings rate 70%
        let emis = vec![emi(date(2025, 1, 1), 60, 15_000)];
        let summary = financial_summary(
            &emis,
            &[],
            Money::from_rupees(50_000),
            date(2025, 8, 6),
        );

        assert_eq!(summary.total_income, Money::from_rupees(50_000));
        assert_eq!(summary.total_emis, Money::from_rupees(15_000));
        assert_eq!(summary.total_expenses, Money::from_rupees(15_000));
        assert_eq!(summary.remaining_balance, Money::from_rupees(35_000));
        assert!((summary.savings_rate - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_filters_other_months() {
        let today = date(2025, 8, 6);
        let txns = vec![
            txn(TransactionType::Income, 10_000, date(2025, 8, 2)),
            txn(TransactionType::Expense, 4_000, date(2025, 8, 4)),
            // Same month last year and last month: both excluded
            txn(TransactionType::Income, 99_000, date(2024, 8, 2)),
            txn(TransactionType::Expense, 99_000, date(2025, 7, 30)),
        ];
        let summary = financial_summary(&[], &txns, Money::from_rupees(50_000), today);

        assert_eq!(summary.total_income, Money::from_rupees(60_000));
        assert_eq!(summary.total_expenses, Money::from_rupees(4_000));
        assert_eq!(summary.remaining_balance, Money::from_rupees(56_000));
    }

    #[test]
    fn test_summary_counts_all_emis_regardless_of_date() {
        // EMI start dates never filter the standing obligation
        let emis = vec![
            emi(date(2020, 1, 1), 12, 5_000),
            emi(date(2030, 1, 1), 12, 7_000),
        ];
        let summary = financial_summary(&emis, &[], Money::from_rupees(20_000), date(2025, 8, 6));
        assert_eq!(summary.total_emis, Money::from_rupees(12_000));
    }

    #[test]
    fn test_summary_zero_income_has_zero_savings_rate() {
        let txns = vec![txn(TransactionType::Expense, 4_000, date(2025, 8, 4))];
        let summary = financial_summary(&[], &txns, Money::zero(), date(2025, 8, 6));
        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(summary.remaining_balance, Money::from_rupees(-4_000));
    }

    #[test]
    fn test_summary_negative_balance_gives_negative_rate() {
        let txns = vec![txn(TransactionType::Expense, 75_000, date(2025, 8, 4))];
        let summary = financial_summary(&[], &txns, Money::from_rupees(50_000), date(2025, 8, 6));
        assert!((summary.savings_rate - (-50.0)).abs() < f64::EPSILON);
    }
}
