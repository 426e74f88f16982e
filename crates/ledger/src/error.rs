//! The module contains the errors the ledger engine can return.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] returned when a money value is built from a negative
//!   (where disallowed), non-finite, or unparsable source value.
//! - [`Integrity`] returned when an expense record is internally
//!   inconsistent or references a member outside the group. Callers should
//!   surface it as a data-repair signal, not a "try again".
//! - [`Unbalanced`] returned when aggregated balances do not sum to zero
//!   within the rounding tolerance; the engine refuses to produce a
//!   lopsided settlement.
//! - [`EmptyGroup`] returned when a settlement is requested for a group
//!   with no members.
//!
//! [`InvalidAmount`]: LedgerError::InvalidAmount
//! [`Integrity`]: LedgerError::Integrity
//! [`Unbalanced`]: LedgerError::Unbalanced
//! [`EmptyGroup`]: LedgerError::EmptyGroup

use thiserror::Error;

use crate::{ExpenseId, Money};

/// Ledger engine custom errors.
///
/// Every failure is detected synchronously while a settlement is computed
/// and returned as a typed value; the engine never partially applies a
/// settlement. The computation is pure, so none of these errors is
/// retriable by re-invocation with the same input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("corrupt expense {expense}: {detail}")]
    Integrity { expense: ExpenseId, detail: String },
    #[error("ledger out of balance: residual {residual}")]
    Unbalanced { residual: Money },
    #[error("group has no members")]
    EmptyGroup,
}
