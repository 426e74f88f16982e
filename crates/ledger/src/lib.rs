//! Group expense ledger and debt-settlement engine.
//!
//! Given a group's members, its recorded expenses, and how each expense is
//! divided, the engine computes every member's net position ("who is owed,
//! who owes") and the list of point-to-point transfers that settles all
//! positions.
//!
//! The computation is **single-threaded-pure**: both stages —
//! [`aggregate_balances`] and [`resolve_transfers`] — are deterministic,
//! side-effect-free functions over immutable snapshots, which is what makes
//! them independently testable and cacheable. There is no incremental mode:
//! any mutation to an expense invalidates previous results, and the engine
//! is simply re-run against the full current expense set (a single new
//! expense can change every member's optimal transfer pairing). Fetching
//! members and expenses, persistence, authentication, and serializing
//! concurrent recomputations of the same group are all the caller's
//! responsibility.
//!
//! ```rust
//! use ledger::{Currency, Expense, Group, LedgerEngine, MemberId, Money};
//! use uuid::Uuid;
//!
//! let anna = MemberId::new(Uuid::from_u128(1));
//! let bruno = MemberId::new(Uuid::from_u128(2));
//!
//! let engine = LedgerEngine::new(Group::new("lisbon-trip".to_string(), Currency::Eur));
//! let dinner = Expense::split_even(anna, Money::new(40_00), &[anna, bruno]).unwrap();
//!
//! let settlement = engine
//!     .compute_settlement(&[anna, bruno], &[dinner])
//!     .unwrap();
//!
//! assert_eq!(settlement.transfers.len(), 1);
//! assert_eq!(settlement.transfers[0].from, bruno);
//! assert_eq!(settlement.transfers[0].to, anna);
//! assert_eq!(settlement.transfers[0].amount, Money::new(20_00));
//! ```

use serde::{Deserialize, Serialize};

pub use balances::{MemberBalances, aggregate_balances};
pub use currency::Currency;
pub use error::LedgerError;
pub use expense::{Expense, ExpenseId, ExpenseSplit};
pub use group::{Group, MemberId};
pub use money::Money;
pub use settlement::{DebtTransfer, resolve_transfers};

mod balances;
mod currency;
mod error;
mod expense;
mod group;
mod money;
mod settlement;

type ResultLedger<T> = Result<T, LedgerError>;

/// Outcome of a settlement computation: every member's balance, the
/// transfers that zero them, and the total of all expense amounts.
///
/// Balances and transfers are derived, not stored; they are recomputed on
/// demand from the current expense set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub balances: MemberBalances,
    pub transfers: Vec<DebtTransfer>,
    pub total_expenses: Money,
}

/// Per-member rollup read from an existing [`Settlement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub currency: Currency,
    pub total_expenses: Money,
    pub member_balance: Money,
}

/// Facade over the two computation stages.
///
/// Construct one per group; [`compute_settlement`] is the single entry
/// point external callers use. The engine holds no mutable state and
/// performs no I/O.
///
/// [`compute_settlement`]: LedgerEngine::compute_settlement
#[derive(Clone, Debug)]
pub struct LedgerEngine {
    group: Group,
}

impl LedgerEngine {
    #[must_use]
    pub fn new(group: Group) -> Self {
        Self { group }
    }

    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Computes balances and settlement transfers for the full current
    /// expense set.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyGroup`] when `members` is empty.
    /// - [`LedgerError::Integrity`] when an expense is internally
    ///   inconsistent or references a non-member.
    /// - [`LedgerError::Unbalanced`] when aggregated balances do not sum to
    ///   zero within the rounding tolerance.
    /// - [`LedgerError::InvalidAmount`] when accumulation overflows.
    pub fn compute_settlement(
        &self,
        members: &[MemberId],
        expenses: &[Expense],
    ) -> ResultLedger<Settlement> {
        tracing::debug!(
            group = %self.group.id,
            members = members.len(),
            expenses = expenses.len(),
            "computing settlement"
        );

        let balances = aggregate_balances(members, expenses)?;
        let transfers = resolve_transfers(&balances)?;
        let total_expenses = expenses
            .iter()
            .try_fold(Money::ZERO, |acc, expense| acc.checked_add(expense.amount))
            .ok_or_else(|| LedgerError::InvalidAmount("expense total overflows".to_string()))?;

        tracing::debug!(
            group = %self.group.id,
            transfers = transfers.len(),
            total = %total_expenses,
            "settlement computed"
        );

        Ok(Settlement {
            balances,
            transfers,
            total_expenses,
        })
    }

    /// Reads a member's rollup from an already-computed settlement.
    ///
    /// Works purely off the balance map; there is no second pass over raw
    /// expenses. Returns `None` when the member is not part of the computed
    /// balance set.
    #[must_use]
    pub fn group_summary(&self, settlement: &Settlement, member: MemberId) -> Option<GroupSummary> {
        let member_balance = settlement.balances.get(&member).copied()?;
        Some(GroupSummary {
            currency: self.group.currency,
            total_expenses: settlement.total_expenses,
            member_balance,
        })
    }
}
