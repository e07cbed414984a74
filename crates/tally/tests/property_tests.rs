mod common;

use std::collections::{BTreeSet, HashMap};

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{datetime, Fixture};
use tally_core::{compute_shares, RecurringScheduler};
use tally_domain::{
    Frequency, RecurringSchedule, Transaction, TransactionCategory, TransactionKind,
};

fn participants(n: usize) -> BTreeSet<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// Random positive monetary amount, exact to the cent.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop::sample::select(vec![
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ])
}

/// Normalizes raw positive weights into basis points summing to exactly one.
fn to_unit_weights(raw: &[u64]) -> Vec<Decimal> {
    let total: u64 = raw.iter().sum();
    let mut bps: Vec<u64> = raw.iter().map(|w| w * 10_000 / total).collect();
    let assigned: u64 = bps.iter().sum();
    bps[0] += 10_000 - assigned;
    bps.into_iter()
        .map(|bp| Decimal::new(bp as i64, 4))
        .collect()
}

proptest! {
    // Split conservation: shares always sum exactly to the total, with or
    // without weights.
    #[test]
    fn equal_split_conserves_total(total in arb_amount(), n in 1usize..12) {
        let members = participants(n);
        let shares = compute_shares(total, &members, None).unwrap();
        let sum: Decimal = shares.values().copied().sum();
        prop_assert_eq!(sum, total);
    }

    // Equal-split fairness: the largest and smallest share differ by at most
    // one minor unit.
    #[test]
    fn equal_split_is_fair_to_a_cent(total in arb_amount(), n in 1usize..12) {
        let members = participants(n);
        let shares = compute_shares(total, &members, None).unwrap();
        let max = shares.values().max().unwrap();
        let min = shares.values().min().unwrap();
        prop_assert!(*max - *min <= Decimal::new(1, 2));
    }

    #[test]
    fn weighted_split_conserves_total(
        total in arb_amount(),
        raw in prop::collection::vec(1u64..1000, 2..8),
    ) {
        let members = participants(raw.len());
        let map: HashMap<Uuid, Decimal> = members
            .iter()
            .copied()
            .zip(to_unit_weights(&raw))
            .collect();

        let shares = compute_shares(total, &members, Some(&map)).unwrap();
        let sum: Decimal = shares.values().copied().sum();
        prop_assert_eq!(sum, total);
    }

    // Group balances always net to zero, whatever the expense mix.
    #[test]
    fn group_balances_sum_to_zero(
        amounts in prop::collection::vec(arb_amount(), 1..8),
        payer_seed in any::<u64>(),
        extra_members in 1usize..5,
    ) {
        let fx = Fixture::new();
        let (group, members) = fx.group_of(extra_members);

        for (i, amount) in amounts.iter().enumerate() {
            let payer = members[payer_seed.wrapping_add(i as u64) as usize % members.len()];
            let expense = Transaction::new(
                payer,
                *amount,
                "Shared",
                TransactionKind::BillSplit,
                TransactionCategory::Other,
                datetime(2024, 1, 1, 12, 0),
            )
            .with_group(group.id);
            fx.settlements.record_group_expense(expense, None).unwrap();
        }

        let balances = fx.settlements.group_balances(group.id).unwrap();
        let sum: Decimal = balances.values().copied().sum();
        prop_assert_eq!(sum, Decimal::ZERO);
    }

    // No settlement ever points at itself.
    #[test]
    fn settlements_never_self_reference(
        amount in arb_amount(),
        extra_members in 1usize..6,
    ) {
        let fx = Fixture::new();
        let (group, members) = fx.group_of(extra_members);
        let expense = Transaction::new(
            members[0],
            amount,
            "Shared",
            TransactionKind::BillSplit,
            TransactionCategory::Other,
            datetime(2024, 1, 1, 12, 0),
        )
        .with_group(group.id);
        let recorded = fx.settlements.record_group_expense(expense, None).unwrap();

        for settlement in fx
            .settlements
            .settlements_for_transaction(recorded.id)
            .unwrap()
        {
            prop_assert_ne!(settlement.payer_id, settlement.payee_id);
        }
    }

    // Repeated next-occurrence computation is strictly increasing.
    #[test]
    fn recurrence_dates_strictly_increase(
        frequency in arb_frequency(),
        interval in 1u32..24,
        start_offset_days in 0i64..3650,
    ) {
        let mut schedule = RecurringSchedule::new(
            Uuid::new_v4(),
            "Recurring",
            Decimal::new(100, 0),
            TransactionKind::Expense,
            TransactionCategory::Other,
            frequency,
            interval,
            datetime(2020, 1, 1, 9, 0) + Duration::days(start_offset_days),
        );

        let mut previous = schedule.start_date;
        for _ in 0..12 {
            let next = RecurringScheduler::compute_next_execution(&schedule);
            prop_assert!(next > previous);
            schedule.last_execution = Some(next);
            previous = next;
        }
    }
}
