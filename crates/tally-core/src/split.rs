//! Splits a total amount into per-participant shares that sum exactly to the
//! total.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use uuid::Uuid;

use tally_domain::money;

use crate::error::{CoreError, Result};

/// Computes each participant's share of `total`.
///
/// With `weights`, each share is `weight x total` rounded half-up to the
/// monetary scale; participants absent from the map weigh zero, and the
/// supplied weights must sum to exactly one. Without `weights`, the split is
/// equal.
///
/// Per-participant rounding can leave the rounded shares a few minor units
/// away from `total`; the difference is re-distributed one minor unit at a
/// time across positive shares in ascending user-id order, so the returned
/// shares always sum to `total` exactly.
pub fn compute_shares(
    total: Decimal,
    participants: &BTreeSet<Uuid>,
    weights: Option<&HashMap<Uuid, Decimal>>,
) -> Result<BTreeMap<Uuid, Decimal>> {
    if participants.is_empty() {
        return Err(CoreError::InvalidSplit("no participants".into()));
    }
    if total <= Decimal::ZERO {
        return Err(CoreError::InvalidSplit(format!(
            "total must be positive, got {total}"
        )));
    }

    let mut shares: BTreeMap<Uuid, Decimal> = BTreeMap::new();
    match weights {
        Some(weights) => {
            if weights.values().any(|w| *w < Decimal::ZERO) {
                return Err(CoreError::InvalidSplit("weights must be non-negative".into()));
            }
            let weight_sum: Decimal = weights.values().copied().sum();
            if weight_sum != Decimal::ONE {
                return Err(CoreError::InvalidSplit(format!(
                    "weights must sum to 1, got {weight_sum}"
                )));
            }
            for member in participants {
                let weight = weights.get(member).copied().unwrap_or(Decimal::ZERO);
                shares.insert(*member, money::round(weight * total));
            }
        }
        None => {
            let count = Decimal::from(participants.len() as u64);
            let equal = money::round(total / count);
            for member in participants {
                shares.insert(*member, equal);
            }
        }
    }

    distribute_remainder(total, &mut shares);
    Ok(shares)
}

/// Applies `total - sum(shares)` in minor units so the shares conserve the
/// total exactly.
fn distribute_remainder(total: Decimal, shares: &mut BTreeMap<Uuid, Decimal>) {
    let unit = money::minor_unit();
    let mut delta = total - shares.values().copied().sum::<Decimal>();
    if delta == Decimal::ZERO {
        return;
    }

    let step = if delta > Decimal::ZERO { unit } else { -unit };
    let candidates: Vec<Uuid> = {
        let positive: Vec<Uuid> = shares
            .iter()
            .filter(|(_, share)| **share > Decimal::ZERO)
            .map(|(id, _)| *id)
            .collect();
        if positive.is_empty() {
            shares.keys().copied().collect()
        } else {
            positive
        }
    };

    let mut cursor = candidates.iter().cycle();
    while delta.abs() >= unit {
        let id = cursor.next().expect("candidates are non-empty");
        *shares.get_mut(id).expect("candidate came from the map") += step;
        delta -= step;
    }
    // A sub-unit residue only appears when the total itself is finer than the
    // monetary scale; fold it into the first candidate to keep the sum exact.
    if delta != Decimal::ZERO {
        *shares
            .get_mut(&candidates[0])
            .expect("candidate came from the map") += delta;
    }
}
