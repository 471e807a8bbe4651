//! Operation message bodies.
//!
//! Encoders only lay out bits; whether an operation is allowed in the current
//! state is decided by the contract.

use crate::cell::{Builder, Cell};
use crate::error::CodecError;
use crate::raffle::{OP_ADD_COINS, OP_CANCEL, OP_OWNERSHIP_ASSIGNED, OP_SEND_TRANS};
use crate::types::address::Address;
use crate::types::coins::Coins;

/// Width of every opcode.
pub const OP_BITS: usize = 32;
/// Width of the query id in the ownership notification.
pub const QUERY_ID_BITS: usize = 64;
/// `int_msg_info$0`, `ihr_disabled`, `bounce`, `bounced` = `0 1 1 0`, then
/// `addr_none` as the source: six bits `011000`.
pub const INT_MSG_BOUNCEABLE_TAG: u128 = 0x18;
/// Width of [`INT_MSG_BOUNCEABLE_TAG`].
pub const INT_MSG_TAG_BITS: usize = 6;
/// Zero run following the value, written as a single block.
pub const RELAYED_MSG_TAIL_BITS: usize = 1 + 4 + 4 + 64 + 32 + 1 + 1;
/// Amount attached to a relayed message unless overridden: 0.1 coin.
pub const DEFAULT_RELAY_AMOUNT: Coins = Coins(100_000_000);

/// Tunables for message encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageConfig {
    /// Opcode expected in ownership notifications.
    pub transfer_notification_op: u32,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            transfer_notification_op: OP_OWNERSHIP_ASSIGNED,
        }
    }
}

/// Parameters of a message the contract should relay verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualSend {
    pub destination: Address,
    pub amount: Coins,
    /// Send mode byte passed to the relay.
    pub mode: u8,
}

impl ManualSend {
    pub fn new(destination: Address) -> Self {
        Self {
            destination,
            amount: DEFAULT_RELAY_AMOUNT,
            mode: 0,
        }
    }
}

/// Ownership-assigned notification: opcode, query id, previous owner, and an
/// empty forward payload marker.
pub fn transfer_notification(
    query_id: u64,
    prev_owner: &Address,
    config: &MessageConfig,
) -> Result<Cell, CodecError> {
    let mut b = Builder::new();
    b.store_uint(config.transfer_notification_op as u128, OP_BITS)?
        .store_uint(query_id as u128, QUERY_ID_BITS)?
        .store_address(prev_owner)?
        .store_bit(false)?;
    Ok(b.end_cell())
}

fn op_only(op: u32) -> Result<Cell, CodecError> {
    let mut b = Builder::new();
    b.store_uint(op as u128, OP_BITS)?;
    Ok(b.end_cell())
}

/// Cancel body: opcode only.
pub fn cancel() -> Result<Cell, CodecError> {
    op_only(OP_CANCEL)
}

/// Add-coins body: opcode only.
pub fn add_coins() -> Result<Cell, CodecError> {
    op_only(OP_ADD_COINS)
}

/// Internal message skeleton carried by [`manual_send`].
pub fn relayed_message(params: &ManualSend) -> Result<Cell, CodecError> {
    let mut b = Builder::new();
    b.store_uint(INT_MSG_BOUNCEABLE_TAG, INT_MSG_TAG_BITS)?
        .store_address(&params.destination)?
        .store_coins(params.amount)?
        .store_zeros(RELAYED_MSG_TAIL_BITS)?;
    Ok(b.end_cell())
}

/// Manual-send body: opcode, reference to the message to relay, mode byte.
pub fn manual_send(params: &ManualSend) -> Result<Cell, CodecError> {
    let mut b = Builder::new();
    b.store_uint(OP_SEND_TRANS as u128, OP_BITS)?
        .store_ref(relayed_message(params)?)?
        .store_uint(params.mode as u128, 8)?;
    Ok(b.end_cell())
}
