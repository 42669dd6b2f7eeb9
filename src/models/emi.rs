//! EMI (equated monthly installment) model
//!
//! Represents a loan installment plan: a fixed periodic payment with a
//! due day, a start date, and a month countdown maintained against the
//! loan duration.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EmiId;
use super::money::Money;

/// Loan category for an EMI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmiCategory {
    Home,
    Car,
    Personal,
    Education,
    #[default]
    Other,
}

impl EmiCategory {
    /// Parse a category from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "car" => Some(Self::Car),
            "personal" => Some(Self::Personal),
            "education" => Some(Self::Education),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// All categories, for help text and prompts
    pub fn all() -> [Self; 5] {
        [
            Self::Home,
            Self::Car,
            Self::Personal,
            Self::Education,
            Self::Other,
        ]
    }
}

impl fmt::Display for EmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Car => write!(f, "Car"),
            Self::Personal => write!(f, "Personal"),
            Self::Education => write!(f, "Education"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A loan installment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emi {
    /// Unique identifier (gateway-assigned)
    pub id: EmiId,

    /// Display name, e.g. "Home Loan"
    pub name: String,

    /// Total loan principal
    pub loan_amount: Money,

    /// Fixed periodic payment
    pub emi_amount: Money,

    /// Day of month the payment falls due (1-31)
    pub due_day: u32,

    /// First installment month
    pub start_date: NaiveDate,

    /// Loan duration in months
    pub duration_months: u32,

    /// Months left to pay; never exceeds `duration_months`
    pub remaining_months: u32,

    /// Annual interest rate as a percentage
    pub interest_rate: Option<f64>,

    /// Loan category
    #[serde(default)]
    pub category: EmiCategory,

    /// When the record was created (gateway-assigned)
    pub created_at: DateTime<Utc>,

    /// When the record was last modified (gateway-assigned)
    pub updated_at: DateTime<Utc>,
}

impl Emi {
    /// Validate the record
    pub fn validate(&self) -> Result<(), EmiValidationError> {
        validate_emi_fields(
            &self.name,
            self.loan_amount,
            self.emi_amount,
            self.due_day,
            self.duration_months,
            self.interest_rate,
        )?;
        if self.remaining_months > self.duration_months {
            return Err(EmiValidationError::RemainingExceedsDuration {
                remaining: self.remaining_months,
                duration: self.duration_months,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Emi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/mo ({} of {} months left)",
            self.name, self.emi_amount, self.remaining_months, self.duration_months
        )
    }
}

/// A new EMI awaiting creation; the gateway assigns id and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmi {
    pub name: String,
    pub loan_amount: Money,
    pub emi_amount: Money,
    pub due_day: u32,
    pub start_date: NaiveDate,
    pub duration_months: u32,
    pub remaining_months: u32,
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub category: EmiCategory,
}

impl NewEmi {
    /// Create a new EMI draft. `remaining_months` starts at the full
    /// duration; the store recomputes it from the start date when the
    /// record is created.
    pub fn new(
        name: impl Into<String>,
        loan_amount: Money,
        emi_amount: Money,
        due_day: u32,
        start_date: NaiveDate,
        duration_months: u32,
    ) -> Self {
        Self {
            name: name.into(),
            loan_amount,
            emi_amount,
            due_day,
            start_date,
            duration_months,
            remaining_months: duration_months,
            interest_rate: None,
            category: EmiCategory::default(),
        }
    }

    /// Set the annual interest rate
    pub fn with_interest_rate(mut self, rate: f64) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    /// Set the loan category
    pub fn with_category(mut self, category: EmiCategory) -> Self {
        self.category = category;
        self
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), EmiValidationError> {
        validate_emi_fields(
            &self.name,
            self.loan_amount,
            self.emi_amount,
            self.due_day,
            self.duration_months,
            self.interest_rate,
        )
    }
}

/// Sparse update for an EMI: only provided fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmiPatch {
    pub name: Option<String>,
    pub loan_amount: Option<Money>,
    pub emi_amount: Option<Money>,
    pub due_day: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub duration_months: Option<u32>,
    pub remaining_months: Option<u32>,
    pub interest_rate: Option<Option<f64>>,
    pub category: Option<EmiCategory>,
}

impl EmiPatch {
    /// A patch that rewrites every mutable field from a full record
    pub fn from_full(emi: &Emi) -> Self {
        Self {
            name: Some(emi.name.clone()),
            loan_amount: Some(emi.loan_amount),
            emi_amount: Some(emi.emi_amount),
            due_day: Some(emi.due_day),
            start_date: Some(emi.start_date),
            duration_months: Some(emi.duration_months),
            remaining_months: Some(emi.remaining_months),
            interest_rate: Some(emi.interest_rate),
            category: Some(emi.category),
        }
    }

    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.loan_amount.is_none()
            && self.emi_amount.is_none()
            && self.due_day.is_none()
            && self.start_date.is_none()
            && self.duration_months.is_none()
            && self.remaining_months.is_none()
            && self.interest_rate.is_none()
            && self.category.is_none()
    }

    /// Apply the patch to a record, leaving absent fields untouched
    pub fn apply_to(&self, emi: &mut Emi) {
        if let Some(name) = &self.name {
            emi.name = name.clone();
        }
        if let Some(loan_amount) = self.loan_amount {
            emi.loan_amount = loan_amount;
        }
        if let Some(emi_amount) = self.emi_amount {
            emi.emi_amount = emi_amount;
        }
        if let Some(due_day) = self.due_day {
            emi.due_day = due_day;
        }
        if let Some(start_date) = self.start_date {
            emi.start_date = start_date;
        }
        if let Some(duration_months) = self.duration_months {
            emi.duration_months = duration_months;
        }
        if let Some(remaining_months) = self.remaining_months {
            emi.remaining_months = remaining_months;
        }
        if let Some(interest_rate) = self.interest_rate {
            emi.interest_rate = interest_rate;
        }
        if let Some(category) = self.category {
            emi.category = category;
        }
    }
}

fn validate_emi_fields(
    name: &str,
    loan_amount: Money,
    emi_amount: Money,
    due_day: u32,
    duration_months: u32,
    interest_rate: Option<f64>,
) -> Result<(), EmiValidationError> {
    if name.trim().is_empty() {
        return Err(EmiValidationError::EmptyName);
    }
    if !loan_amount.is_positive() {
        return Err(EmiValidationError::NonPositiveLoanAmount(loan_amount));
    }
    if !emi_amount.is_positive() {
        return Err(EmiValidationError::NonPositiveEmiAmount(emi_amount));
    }
    if !(1..=31).contains(&due_day) {
        return Err(EmiValidationError::DueDayOutOfRange(due_day));
    }
    if duration_months == 0 {
        return Err(EmiValidationError::ZeroDuration);
    }
    if let Some(rate) = interest_rate {
        if rate < 0.0 || !rate.is_finite() {
            return Err(EmiValidationError::NegativeInterestRate(rate));
        }
    }
    Ok(())
}

/// Validation errors for EMIs
#[derive(Debug, Clone, PartialEq)]
pub enum EmiValidationError {
    EmptyName,
    NonPositiveLoanAmount(Money),
    NonPositiveEmiAmount(Money),
    DueDayOutOfRange(u32),
    ZeroDuration,
    NegativeInterestRate(f64),
    RemainingExceedsDuration { remaining: u32, duration: u32 },
}

impl fmt::Display for EmiValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "EMI name cannot be empty"),
            Self::NonPositiveLoanAmount(amount) => {
                write!(f, "Loan amount must be positive, got {}", amount)
            }
            Self::NonPositiveEmiAmount(amount) => {
                write!(f, "EMI amount must be positive, got {}", amount)
            }
            Self::DueDayOutOfRange(day) => {
                write!(f, "Due day must be between 1 and 31, got {}", day)
            }
            Self::ZeroDuration => write!(f, "Duration must be at least one month"),
            Self::NegativeInterestRate(rate) => {
                write!(f, "Interest rate cannot be negative, got {}", rate)
            }
            Self::RemainingExceedsDuration {
                remaining,
                duration,
            } => write!(
                f,
                "Remaining months ({}) cannot exceed duration ({})",
                remaining, duration
            ),
        }
    }
}

impl std::error::Error for EmiValidationError {}
