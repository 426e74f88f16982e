//! Expense records and their per-member splits.
//!
//! These are the boundary input types: the caller maps storage rows onto
//! them, which keeps the engine isolated from persistence-schema drift.
//! The constructors validate the invariants that are local to a single
//! record; group-relative validation (membership, split totals) happens in
//! the aggregation stage, which re-checks everything before any balance is
//! touched.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MemberId, Money, ResultLedger};

/// Stable identifier of an expense record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ExpenseId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// How much of one expense a single member owes.
///
/// A member need not be the payer to owe a split, and the payer need not
/// owe a split of their own expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub member: MemberId,
    pub amount: Money,
}

impl ExpenseSplit {
    #[must_use]
    pub const fn new(member: MemberId, amount: Money) -> Self {
        Self { member, amount }
    }
}

/// A recorded group expense: who paid, how much, and how the amount is
/// divided among members.
///
/// Invariant: the split amounts sum to the expense amount (to the
/// currency's minor-unit precision). The engine treats a mismatch as a
/// data-integrity error from the upstream store, never something to correct
/// silently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub payer: MemberId,
    pub amount: Money,
    pub splits: Vec<ExpenseSplit>,
}

impl Expense {
    /// Creates a new expense with a fresh id.
    pub fn new(payer: MemberId, amount: Money, splits: Vec<ExpenseSplit>) -> ResultLedger<Self> {
        Self::from_record(ExpenseId::new(Uuid::new_v4()), payer, amount, splits)
    }

    /// Builds an expense from an already-stored record, keeping its id.
    pub fn from_record(
        id: ExpenseId,
        payer: MemberId,
        amount: Money,
        splits: Vec<ExpenseSplit>,
    ) -> ResultLedger<Self> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "expense amount must be > 0".to_string(),
            ));
        }
        if splits.is_empty() {
            return Err(LedgerError::Integrity {
                expense: id,
                detail: "expense has no splits".to_string(),
            });
        }
        if let Some(split) = splits.iter().find(|split| split.amount.is_negative()) {
            return Err(LedgerError::InvalidAmount(format!(
                "split for member {} must not be negative",
                split.member
            )));
        }

        Ok(Self {
            id,
            payer,
            amount,
            splits,
        })
    }

    /// Records an evenly divided expense.
    ///
    /// The amount is divided across `participants` with
    /// [`Money::split_even`], so the shares always sum back to the expense
    /// amount exactly.
    pub fn split_even(
        payer: MemberId,
        amount: Money,
        participants: &[MemberId],
    ) -> ResultLedger<Self> {
        let shares = amount.split_even(participants.len());
        let splits = participants
            .iter()
            .zip(shares)
            .map(|(member, share)| ExpenseSplit::new(*member, share))
            .collect();
        Self::new(payer, amount, splits)
    }

    /// Sum of the split amounts (`None` on overflow).
    #[must_use]
    pub fn split_total(&self) -> Option<Money> {
        self.splits
            .iter()
            .try_fold(Money::ZERO, |acc, split| acc.checked_add(split.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(n: u128) -> MemberId {
        MemberId::new(Uuid::from_u128(n))
    }

    #[test]
    fn new_rejects_non_positive_amount() {
        let splits = vec![ExpenseSplit::new(member(1), Money::ZERO)];
        assert!(Expense::new(member(1), Money::ZERO, splits.clone()).is_err());
        assert!(Expense::new(member(1), Money::new(-100), splits).is_err());
    }

    #[test]
    fn new_rejects_empty_splits() {
        let err = Expense::new(member(1), Money::new(100), Vec::new()).unwrap_err();
        assert!(matches!(err, LedgerError::Integrity { .. }));
    }

    #[test]
    fn new_rejects_negative_split() {
        let splits = vec![
            ExpenseSplit::new(member(1), Money::new(200)),
            ExpenseSplit::new(member(2), Money::new(-100)),
        ];
        let err = Expense::new(member(1), Money::new(100), splits).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[test]
    fn from_record_keeps_the_stored_id() {
        let id = ExpenseId::new(Uuid::from_u128(42));
        let expense = Expense::from_record(
            id,
            member(1),
            Money::new(100),
            vec![ExpenseSplit::new(member(1), Money::new(100))],
        )
        .unwrap();
        assert_eq!(expense.id, id);
    }

    #[test]
    fn split_even_covers_the_full_amount() {
        let participants = [member(1), member(2), member(3)];
        let expense = Expense::split_even(member(1), Money::new(100_00), &participants).unwrap();

        assert_eq!(expense.splits.len(), 3);
        assert_eq!(expense.split_total(), Some(Money::new(100_00)));
        assert_eq!(expense.splits[0].amount, Money::new(33_34));
    }
}
