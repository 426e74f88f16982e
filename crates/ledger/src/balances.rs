//! Balance aggregation: reduce a group's expense/split records into one
//! signed balance per member.

use std::collections::BTreeMap;

use crate::{Expense, LedgerError, MemberId, Money, ResultLedger};

/// One signed balance per member: positive means owed money, negative means
/// owing money.
///
/// A `BTreeMap` keyed by [`MemberId`], so iteration order is stable and the
/// resolver's output order is structural rather than incidental.
pub type MemberBalances = BTreeMap<MemberId, Money>;

/// Rounding tolerance in minor units.
///
/// Upstream records produced by float arithmetic can be off by one minor
/// unit per expense; anything beyond that is treated as corruption.
pub(crate) const ROUNDING_TOLERANCE: Money = Money::new(1);

/// Reduces a group's expenses into one balance per member.
///
/// Every member of `members` appears in the output, members with no ledger
/// activity at an explicit zero, so downstream consumers can render
/// "settled up" without a presence check. Pure function of its inputs; safe
/// to memoize on the expense set.
///
/// # Errors
///
/// - [`LedgerError::EmptyGroup`] when `members` is empty.
/// - [`LedgerError::Integrity`] when an expense references a member outside
///   the group or its splits do not sum to its amount within
///   one minor unit.
/// - [`LedgerError::InvalidAmount`] when accumulation overflows.
pub fn aggregate_balances(
    members: &[MemberId],
    expenses: &[Expense],
) -> ResultLedger<MemberBalances> {
    if members.is_empty() {
        return Err(LedgerError::EmptyGroup);
    }

    let mut balances: MemberBalances = members
        .iter()
        .map(|member| (*member, Money::ZERO))
        .collect();

    // Validate every record before touching any balance; a settlement is
    // never computed from partially applied data.
    for expense in expenses {
        validate_expense(&balances, expense)?;
    }

    for expense in expenses {
        apply_expense(&mut balances, expense)?;
    }

    Ok(balances)
}

fn validate_expense(balances: &MemberBalances, expense: &Expense) -> ResultLedger<()> {
    let integrity = |detail: String| {
        tracing::error!(expense = %expense.id, %detail, "rejecting corrupt expense");
        LedgerError::Integrity {
            expense: expense.id,
            detail,
        }
    };

    if !expense.amount.is_positive() {
        return Err(integrity(format!("amount {} must be > 0", expense.amount)));
    }
    if !balances.contains_key(&expense.payer) {
        return Err(integrity(format!(
            "payer {} is not a group member",
            expense.payer
        )));
    }
    if expense.splits.is_empty() {
        return Err(integrity("expense has no splits".to_string()));
    }
    for split in &expense.splits {
        if split.amount.is_negative() {
            return Err(integrity(format!(
                "split for member {} is negative",
                split.member
            )));
        }
        if !balances.contains_key(&split.member) {
            return Err(integrity(format!(
                "split member {} is not a group member",
                split.member
            )));
        }
    }

    let split_total = expense
        .split_total()
        .ok_or_else(|| LedgerError::InvalidAmount("split total overflows".to_string()))?;
    if (split_total - expense.amount).abs() > ROUNDING_TOLERANCE {
        return Err(integrity(format!(
            "splits sum to {split_total}, expense amount is {}",
            expense.amount
        )));
    }

    Ok(())
}

fn apply_expense(balances: &mut MemberBalances, expense: &Expense) -> ResultLedger<()> {
    let overflow = || LedgerError::InvalidAmount("balance accumulation overflow".to_string());
    let missing = |member: MemberId| LedgerError::Integrity {
        expense: expense.id,
        detail: format!("member {member} is not a group member"),
    };

    // A payer splitting their own expense nets both adjustments on the same
    // balance; no special-casing.
    let payer_balance = balances
        .get_mut(&expense.payer)
        .ok_or_else(|| missing(expense.payer))?;
    *payer_balance = payer_balance
        .checked_add(expense.amount)
        .ok_or_else(overflow)?;

    for split in &expense.splits {
        let member_balance = balances
            .get_mut(&split.member)
            .ok_or_else(|| missing(split.member))?;
        *member_balance = member_balance
            .checked_sub(split.amount)
            .ok_or_else(overflow)?;
    }

    Ok(())
}
