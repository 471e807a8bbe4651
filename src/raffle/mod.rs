//! NFT raffle contract layouts.
//!
//! The contract itself runs inside the virtual machine; this module only
//! produces and consumes the cells it exchanges with the host:
//!
//! - [`storage`]: the four-reference storage cell used to deploy an instance
//! - [`messages`]: fixed-opcode operation bodies
//! - [`state`]: decoding of the `get::raffle_state` result tuple
//!
//! # Storage layout
//!
//! ```text
//! root
//!  ├─ state:       state:2 right_count:4 right_received:4 left_count:4 left_received:4
//!  ├─ addresses:   left_user right_user super_user           (addr_std each)
//!  ├─ commissions: left right left_got right_got coins_for_nft (var_uint 16 each)
//!  └─ nfts:        left? right? raffled?                     (optional dictionaries)
//! ```
//!
//! Received counters and collected coins are maintained by the contract; a
//! freshly encoded storage always carries zero there.

pub mod messages;
pub mod state;
pub mod storage;

use crate::error::CodecError;
use crate::executor::ExitCode;
use crate::types::hash::Hash;
use std::collections::BTreeMap;
use std::fmt;

/// `ownership_assigned` notification sent by an NFT item to its new owner.
pub const OP_OWNERSHIP_ASSIGNED: u32 = 0x05138d91;
/// Cancel the raffle and return everything.
pub const OP_CANCEL: u32 = 2001;
/// Top up the contract balance.
pub const OP_ADD_COINS: u32 = 2002;
/// Relay a prebuilt outbound message (super user only).
pub const OP_SEND_TRANS: u32 = 2003;

/// Name of the read-only method returning the raffle snapshot.
pub const GET_RAFFLE_STATE: &str = "get::raffle_state";

/// Width of the NFT count and received-count fields.
pub const COUNT_BITS: usize = 4;
/// Largest NFT count a side can declare.
pub const MAX_NFTS_PER_SIDE: u8 = (1 << COUNT_BITS) - 1;
/// Width of the state code.
pub const STATE_BITS: usize = 2;

/// Key -> received flag, keyed by the NFT item's account id.
pub type NftSet = BTreeMap<Hash, bool>;

impl ExitCode {
    /// Operation not allowed in the current raffle state.
    pub const INVALID_STATE: ExitCode = ExitCode(1001);
    /// Sender is not allowed to perform the operation.
    pub const UNAUTHORIZED: ExitCode = ExitCode(1002);
    /// Unknown opcode or NFT not part of the raffle.
    pub const NOT_FOUND: ExitCode = ExitCode(0xffff);
}

/// Lifecycle state, stored as a 2-bit code. Code `0` is reserved.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaffleState {
    Active = 1,
    Canceled = 2,
    Completed = 3,
}

impl RaffleState {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RaffleState {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Active),
            2 => Ok(Self::Canceled),
            3 => Ok(Self::Completed),
            other => Err(CodecError::InvalidState(other)),
        }
    }
}

impl fmt::Display for RaffleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleState::Active => write!(f, "active"),
            RaffleState::Canceled => write!(f, "canceled"),
            RaffleState::Completed => write!(f, "completed"),
        }
    }
}
