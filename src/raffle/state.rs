//! Decoding of the `get::raffle_state` result tuple.
//!
//! The method returns sixteen entries in storage order:
//!
//! ```text
//!  0 state            int     8 left_commission    int
//!  1 right_count      int     9 right_commission   int
//!  2 right_received   int    10 left_coins_got     int
//!  3 left_count       int    11 right_coins_got    int
//!  4 left_received    int    12 coins_for_nft      int
//!  5 left_user        slice  13 left_nfts          cell | null
//!  6 right_user       slice  14 right_nfts         cell | null
//!  7 super_user       slice  15 raffled_nfts       cell | null
//! ```

use crate::cell::Builder;
use crate::dict::{decode_dict, encode_dict};
use crate::error::CodecError;
use crate::executor::GetMethodResult;
use crate::executor::stack::StackValue;
use crate::raffle::storage::StorageSnapshot;
use crate::raffle::{MAX_NFTS_PER_SIDE, NftSet, RaffleState};
use crate::types::address::Address;
use crate::types::coins::Coins;
use crate::warn;

/// Number of entries in the result tuple.
pub const RAFFLE_STATE_LEN: usize = 16;

fn load_state(value: &StackValue) -> Result<RaffleState, CodecError> {
    match value {
        StackValue::Null => Err(CodecError::InvalidState(0)),
        other => {
            let raw = other.as_int(0)?;
            let code = u8::try_from(raw).map_err(|_| {
                CodecError::DecodeFailure(format!("state code {raw} out of range"))
            })?;
            RaffleState::try_from(code)
        }
    }
}

fn load_count(value: &StackValue, index: usize) -> Result<u8, CodecError> {
    let raw = value.as_int(index)?;
    match u8::try_from(raw) {
        Ok(n) if n <= MAX_NFTS_PER_SIDE => Ok(n),
        _ => Err(CodecError::DecodeFailure(format!(
            "stack entry {index}: count {raw} exceeds {MAX_NFTS_PER_SIDE}"
        ))),
    }
}

fn load_coins(value: &StackValue, index: usize) -> Result<Coins, CodecError> {
    Coins::try_from(value.as_int(index)?)
}

fn load_address(value: &StackValue, index: usize) -> Result<Address, CodecError> {
    Ok(value.as_slice(index)?.parse().load_address()?)
}

fn load_set(value: &StackValue, index: usize) -> Result<Option<NftSet>, CodecError> {
    value
        .as_cell_opt(index)?
        .map(|root| decode_dict(Some(root)))
        .transpose()
}

fn decode_entries(stack: &[StackValue]) -> Result<StorageSnapshot, CodecError> {
    if stack.len() != RAFFLE_STATE_LEN {
        return Err(CodecError::DecodeFailure(format!(
            "expected {RAFFLE_STATE_LEN} stack entries, got {}",
            stack.len()
        )));
    }

    Ok(StorageSnapshot {
        state: load_state(&stack[0])?,
        right_nfts_count: load_count(&stack[1], 1)?,
        right_nfts_received: load_count(&stack[2], 2)?,
        left_nfts_count: load_count(&stack[3], 3)?,
        left_nfts_received: load_count(&stack[4], 4)?,
        left_user: load_address(&stack[5], 5)?,
        right_user: load_address(&stack[6], 6)?,
        super_user: load_address(&stack[7], 7)?,
        left_commission: load_coins(&stack[8], 8)?,
        right_commission: load_coins(&stack[9], 9)?,
        left_coins_got: load_coins(&stack[10], 10)?,
        right_coins_got: load_coins(&stack[11], 11)?,
        coins_for_nft: load_coins(&stack[12], 12)?,
        left_nfts: load_set(&stack[13], 13)?,
        right_nfts: load_set(&stack[14], 14)?,
        raffled_nfts: load_set(&stack[15], 15)?,
    })
}

/// Decodes a `get::raffle_state` result into a snapshot.
///
/// Fails with `DecodeFailure` when the method did not succeed or the tuple
/// has the wrong shape. Null dictionary entries decode to `None`.
///
/// A null or `0` state entry is rejected with `InvalidState(0)` rather than
/// producing a snapshot in the reserved state, so callers never see a state
/// outside [`RaffleState`].
pub fn decode_state(result: &GetMethodResult) -> Result<StorageSnapshot, CodecError> {
    if !result.is_success() {
        warn!("get::raffle_state exited with code {}", result.exit_code);
        return Err(CodecError::DecodeFailure(format!(
            "get-method exited with code {}",
            result.exit_code
        )));
    }
    decode_entries(&result.stack).inspect_err(|e| warn!("bad raffle state tuple: {e}"))
}

fn address_slice(addr: &Address) -> Result<StackValue, CodecError> {
    let mut b = Builder::new();
    b.store_address(addr)?;
    Ok(StackValue::Slice(b.end_cell()))
}

fn coins_entry(coins: Coins) -> Result<StackValue, CodecError> {
    i128::try_from(coins.nano())
        .map(StackValue::Int)
        .map_err(|_| CodecError::ValueOutOfRange(format!("{coins} does not fit a stack int")))
}

fn set_entry(set: &Option<NftSet>) -> Result<StackValue, CodecError> {
    match set {
        None => Ok(StackValue::Null),
        Some(set) => Ok(encode_dict(set)?.into()),
    }
}

impl StorageSnapshot {
    /// Lays the snapshot out the way `get::raffle_state` returns it.
    ///
    /// `Some` of an empty set comes back as null, the same as `None`.
    pub fn to_stack(&self) -> Result<Vec<StackValue>, CodecError> {
        Ok(vec![
            StackValue::Int(self.state.code() as i128),
            StackValue::Int(self.right_nfts_count as i128),
            StackValue::Int(self.right_nfts_received as i128),
            StackValue::Int(self.left_nfts_count as i128),
            StackValue::Int(self.left_nfts_received as i128),
            address_slice(&self.left_user)?,
            address_slice(&self.right_user)?,
            address_slice(&self.super_user)?,
            coins_entry(self.left_commission)?,
            coins_entry(self.right_commission)?,
            coins_entry(self.left_coins_got)?,
            coins_entry(self.right_coins_got)?,
            coins_entry(self.coins_for_nft)?,
            set_entry(&self.left_nfts)?,
            set_entry(&self.right_nfts)?,
            set_entry(&self.raffled_nfts)?,
        ])
    }
}
