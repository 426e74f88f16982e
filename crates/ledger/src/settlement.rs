//! Debt-settlement resolution: turn a balance map into the point-to-point
//! transfers that drive every balance to zero.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    LedgerError, MemberId, Money, ResultLedger,
    balances::{MemberBalances, ROUNDING_TOLERANCE},
};

/// A single payment instruction: `from` pays `to` the given amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtTransfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// Produces the transfers that settle a balance map.
///
/// Greedy largest-remaining-first matching: debtors and creditors are each
/// sorted by remaining amount descending (equal remainders order by member
/// id ascending, so output is reproducible) and paired head-to-head with
/// `min(debtor remaining, creditor remaining)` transfers. This reproduces
/// the settlement numbers users already see; it is **not** a globally
/// transfer-count-minimal matching, and must not be "improved" into one
/// without treating that as a behavior change.
///
/// Members with a zero balance need no transfer and appear on neither side.
///
/// # Errors
///
/// [`LedgerError::Unbalanced`] when the balances do not sum to zero within
/// the rounding tolerance, before or after matching.
pub fn resolve_transfers(balances: &MemberBalances) -> ResultLedger<Vec<DebtTransfer>> {
    let residual: Money = balances.values().copied().sum();
    if residual.abs() > ROUNDING_TOLERANCE {
        tracing::error!(
            %residual,
            members = balances.len(),
            "refusing to settle an unbalanced ledger"
        );
        return Err(LedgerError::Unbalanced { residual });
    }

    let mut debtors: Vec<(MemberId, Money)> = Vec::new();
    let mut creditors: Vec<(MemberId, Money)> = Vec::new();
    for (member, balance) in balances {
        if balance.is_negative() {
            debtors.push((*member, balance.abs()));
        } else if balance.is_positive() {
            creditors.push((*member, *balance));
        }
    }

    debtors.sort_by(by_remaining_desc);
    creditors.sort_by(by_remaining_desc);

    let mut transfers = Vec::new();
    let mut debtor_idx = 0;
    let mut creditor_idx = 0;
    while debtor_idx < debtors.len() && creditor_idx < creditors.len() {
        let (debtor, debtor_remaining) = debtors[debtor_idx];
        let (creditor, creditor_remaining) = creditors[creditor_idx];
        let amount = debtor_remaining.min(creditor_remaining);

        if amount.is_positive() {
            transfers.push(DebtTransfer {
                from: debtor,
                to: creditor,
                amount,
            });
        }

        debtors[debtor_idx].1 = debtor_remaining - amount;
        creditors[creditor_idx].1 = creditor_remaining - amount;
        if debtors[debtor_idx].1.is_zero() {
            debtor_idx += 1;
        }
        if creditors[creditor_idx].1.is_zero() {
            creditor_idx += 1;
        }
    }

    // Conservation guarantees both sides exhaust together; a leftover beyond
    // the tolerance means the input was corrupt in a way the pre-check
    // missed. Checked, not assumed.
    let leftover: Money = debtors[debtor_idx..]
        .iter()
        .chain(creditors[creditor_idx..].iter())
        .map(|(_, remaining)| *remaining)
        .sum();
    if leftover > ROUNDING_TOLERANCE {
        tracing::error!(%leftover, "settlement terminated with unmatched remainders");
        return Err(LedgerError::Unbalanced { residual: leftover });
    }

    Ok(transfers)
}

/// Largest remaining first; member id keeps equal remainders deterministic.
fn by_remaining_desc(a: &(MemberId, Money), b: &(MemberId, Money)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn member(n: u128) -> MemberId {
        MemberId::new(Uuid::from_u128(n))
    }

    fn balances(entries: &[(u128, i64)]) -> MemberBalances {
        entries
            .iter()
            .map(|(id, minor)| (member(*id), Money::new(*minor)))
            .collect()
    }

    fn transfers(entries: &[(u128, u128, i64)]) -> Vec<DebtTransfer> {
        entries
            .iter()
            .map(|(from, to, minor)| DebtTransfer {
                from: member(*from),
                to: member(*to),
                amount: Money::new(*minor),
            })
            .collect()
    }

    #[rstest]
    #[case::two_members(
        &[(1, 100), (2, -100)],
        &[(2, 1, 100)]
    )]
    #[case::one_creditor_two_debtors(
        &[(1, -50_00), (2, -30_00), (3, 80_00)],
        &[(1, 3, 50_00), (2, 3, 30_00)]
    )]
    #[case::debtors_chain_across_creditors(
        &[(1, 70_00), (2, 30_00), (3, -60_00), (4, -40_00)],
        &[(3, 1, 60_00), (4, 1, 10_00), (4, 2, 30_00)]
    )]
    #[case::equal_remainders_order_by_member_id(
        &[(2, -40_00), (1, -40_00), (3, 80_00)],
        &[(1, 3, 40_00), (2, 3, 40_00)]
    )]
    #[case::zero_balances_drop_out(
        &[(1, 0), (2, 50_00), (3, -50_00)],
        &[(3, 2, 50_00)]
    )]
    #[case::all_settled(
        &[(1, 0), (2, 0)],
        &[]
    )]
    fn greedy_matching_cases(
        #[case] input: &[(u128, i64)],
        #[case] expected: &[(u128, u128, i64)],
    ) {
        let result = resolve_transfers(&balances(input)).unwrap();
        assert_eq!(result, transfers(expected));
    }

    #[test]
    fn empty_balances_yield_no_transfers() {
        assert_eq!(resolve_transfers(&MemberBalances::new()).unwrap(), vec![]);
    }

    #[test]
    fn unbalanced_input_is_rejected() {
        let err = resolve_transfers(&balances(&[(1, 100)])).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unbalanced {
                residual: Money::new(100)
            }
        );
    }

    #[test]
    fn one_minor_unit_of_residual_is_tolerated() {
        // A single expense recorded one minor unit short leaves a one-unit
        // creditor remainder; the resolver absorbs it instead of failing.
        let result = resolve_transfers(&balances(&[(1, 50_01), (2, -50_00)])).unwrap();
        assert_eq!(result, transfers(&[(2, 1, 50_00)]));
    }

    #[test]
    fn transfers_apply_back_to_zero() {
        let input = balances(&[(1, 70_00), (2, 30_00), (3, -60_00), (4, -40_00)]);
        let result = resolve_transfers(&input).unwrap();

        let mut remaining = input;
        for transfer in &result {
            *remaining.get_mut(&transfer.from).unwrap() += transfer.amount;
            *remaining.get_mut(&transfer.to).unwrap() -= transfer.amount;
        }
        assert!(remaining.values().all(|balance| balance.is_zero()));
    }
}
