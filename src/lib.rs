//! fintrack - Personal finance tracker for EMIs and transactions
//!
//! This library provides the core functionality for the fintrack
//! application: users record loan installments (EMIs) and income/expense
//! transactions against a remote data gateway and view aggregated
//! monthly summaries.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (EMIs, transactions, budget, money)
//! - `summary`: Pure aggregation functions for derived metrics
//! - `auth`: The authentication collaborator's identity type
//! - `gateway`: The remote data gateway contract and the bundled
//!   JSON-file implementation
//! - `store`: The session-scoped finance store and its reducer
//! - `storage`: Atomic JSON file I/O
//! - `display`: Terminal formatting
//! - `export`: Snapshot export (JSON, CSV, YAML)
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fintrack::config::FintrackPaths;
//! use fintrack::gateway::LocalGateway;
//! use fintrack::store::FinanceStore;
//!
//! let paths = FintrackPaths::new()?;
//! let store = FinanceStore::new(Arc::new(LocalGateway::new(paths)));
//! store.sign_in(identity).await?;
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod gateway;
pub mod models;
pub mod storage;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
