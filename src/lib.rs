//! Raffle contract cell codec.
//!
//! Builds and parses the cell trees exchanged with an NFT raffle contract:
//! the bit-level cell primitive, a prefix-compressed dictionary codec, the
//! storage and operation-message encoders, and the decoder for the state the
//! contract reports back. Contract execution itself is left to an external
//! virtual machine behind [`executor::ContractExecutor`].

pub mod cell;
pub mod dict;
pub mod error;
pub mod executor;
pub mod raffle;
pub mod types;
pub mod utils;

pub use cell::{Builder, Cell, CellError, Slice};
pub use error::CodecError;
pub use raffle::RaffleState;
pub use raffle::messages::{ManualSend, MessageConfig};
pub use raffle::state::decode_state;
pub use raffle::storage::{StorageSnapshot, decode_storage, encode_storage};
