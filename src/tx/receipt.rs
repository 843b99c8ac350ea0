//! Paid-fee reconciliation from transaction receipt events
//!
//! Nodes report the fee in different event shapes depending on the chain and
//! SDK version:
//! - `fee_pay` events with a `fee` attribute (and `tip_refund` with `tip`)
//! - generic `tx` events whose attribute key is literally `fee`
//!
//! Values look like `102684uosmo`. Only the leading integer is used; values
//! without one are skipped. Reconciliation never fails.

use crate::chain::{TxEvent, TxReceipt};

/// Event types that may carry fee-bearing attributes
const FEE_EVENT_TYPES: &[&str] = &["fee_pay", "tip_refund", "tx"];

/// Attribute keys whose value is an amount
const FEE_ATTRIBUTE_KEYS: &[&str] = &["fee", "tip"];

/// Total fee paid according to the receipt, 0 when nothing qualifies
pub fn paid_fee_from_receipt(receipt: &TxReceipt) -> u128 {
    paid_fee(&receipt.events)
}

/// Sum every fee-bearing amount across all qualifying events
pub fn paid_fee(events: &[TxEvent]) -> u128 {
    fee_amounts(events)
        .filter_map(|value| split_amount(value).map(|(amount, _)| amount))
        .fold(0u128, u128::saturating_add)
}

/// Denom suffix of the first well-formed fee amount, if any
pub fn fee_denom(events: &[TxEvent]) -> Option<String> {
    fee_amounts(events)
        .filter_map(split_amount)
        .map(|(_, denom)| denom)
        .find(|denom| !denom.is_empty())
        .map(str::to_string)
}

fn fee_amounts(events: &[TxEvent]) -> impl Iterator<Item = &str> {
    events
        .iter()
        .filter(|event| FEE_EVENT_TYPES.contains(&event.event_type.as_str()))
        .flat_map(|event| event.attributes.iter())
        .filter(|attr| FEE_ATTRIBUTE_KEYS.contains(&attr.key.as_str()))
        .map(|attr| attr.value.as_str())
}

/// Split `"<digits><denom>"` into its integer and suffix
fn split_amount(value: &str) -> Option<(u128, &str)> {
    let value = value.trim_start();
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, denom) = value.split_at(digits_end);
    digits.parse::<u128>().ok().map(|amount| (amount, denom))
}
