//! Storage cell encoder and decoder.

use crate::cell::{Builder, Cell, Slice};
use crate::debug;
use crate::dict::{decode_dict, encode_dict};
use crate::error::CodecError;
use crate::raffle::{COUNT_BITS, MAX_NFTS_PER_SIDE, NftSet, RaffleState, STATE_BITS};
use crate::types::address::Address;
use crate::types::coins::Coins;

/// Scalar part of the state sub-cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSlice {
    pub state: RaffleState,
    pub right_nfts_count: u8,
    pub left_nfts_count: u8,
}

/// The three participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSlice {
    pub left_user: Address,
    pub right_user: Address,
    /// Administrator allowed to cancel and relay messages.
    pub super_user: Address,
}

/// Commissions owed by each side and the per-NFT coin price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionSlice {
    pub left_commission: Coins,
    pub right_commission: Coins,
    pub coins_for_nft: Coins,
}

/// One NFT taking part in the raffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NftItem {
    /// Address of the NFT item contract; its account id is the dictionary key.
    pub addr: Address,
    pub received: bool,
}

/// NFTs offered by each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftSlice {
    pub left_nfts: Vec<NftItem>,
    pub right_nfts: Vec<NftItem>,
}

/// Typed view of the whole contract state.
///
/// Produced by [`decode_storage`] from a storage cell or by
/// [`decode_state`](crate::raffle::state::decode_state) from a get-method
/// result. A dictionary field is `None` when the cell carried no dictionary
/// at all, which is how an empty set is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSnapshot {
    pub state: RaffleState,
    pub right_nfts_count: u8,
    pub right_nfts_received: u8,
    pub left_nfts_count: u8,
    pub left_nfts_received: u8,
    pub left_user: Address,
    pub right_user: Address,
    pub super_user: Address,
    pub left_commission: Coins,
    pub right_commission: Coins,
    pub left_coins_got: Coins,
    pub right_coins_got: Coins,
    pub coins_for_nft: Coins,
    pub left_nfts: Option<NftSet>,
    pub right_nfts: Option<NftSet>,
    pub raffled_nfts: Option<NftSet>,
}

impl StorageSnapshot {
    /// Received flag of `nft` in the left set; absent dictionaries hold nothing.
    pub fn left_received(&self, nft: &Address) -> Option<bool> {
        self.left_nfts.as_ref()?.get(&nft.hash).copied()
    }

    pub fn right_received(&self, nft: &Address) -> Option<bool> {
        self.right_nfts.as_ref()?.get(&nft.hash).copied()
    }

    pub fn raffled_received(&self, nft: &Address) -> Option<bool> {
        self.raffled_nfts.as_ref()?.get(&nft.hash).copied()
    }
}

fn check_count(side: &str, count: u8) -> Result<(), CodecError> {
    if count > MAX_NFTS_PER_SIDE {
        return Err(CodecError::ValueOutOfRange(format!(
            "{side} NFT count {count} exceeds {MAX_NFTS_PER_SIDE}"
        )));
    }
    Ok(())
}

/// Collects `items` into `set`, rejecting repeated NFTs.
fn insert_items(set: &mut NftSet, items: &[NftItem]) -> Result<(), CodecError> {
    for item in items {
        if set.insert(item.addr.hash, item.received).is_some() {
            return Err(CodecError::DuplicateKey(item.addr.hash));
        }
    }
    Ok(())
}

fn encode_state_cell(slice: &StateSlice) -> Result<Cell, CodecError> {
    check_count("right", slice.right_nfts_count)?;
    check_count("left", slice.left_nfts_count)?;

    let mut b = Builder::new();
    b.store_uint(slice.state.code() as u128, STATE_BITS)?
        .store_uint(slice.right_nfts_count as u128, COUNT_BITS)?
        .store_zeros(COUNT_BITS)?
        .store_uint(slice.left_nfts_count as u128, COUNT_BITS)?
        .store_zeros(COUNT_BITS)?;
    Ok(b.end_cell())
}

fn encode_address_cell(slice: &AddressSlice) -> Result<Cell, CodecError> {
    let mut b = Builder::new();
    b.store_address(&slice.left_user)?
        .store_address(&slice.right_user)?
        .store_address(&slice.super_user)?;
    Ok(b.end_cell())
}

fn encode_commission_cell(slice: &CommissionSlice) -> Result<Cell, CodecError> {
    let mut b = Builder::new();
    b.store_coins(slice.left_commission)?
        .store_coins(slice.right_commission)?
        .store_coins(Coins::ZERO)?
        .store_coins(Coins::ZERO)?
        .store_coins(slice.coins_for_nft)?;
    Ok(b.end_cell())
}

fn encode_nft_cell(slice: &NftSlice) -> Result<Cell, CodecError> {
    let mut left = NftSet::new();
    insert_items(&mut left, &slice.left_nfts)?;
    let mut right = NftSet::new();
    insert_items(&mut right, &slice.right_nfts)?;

    let mut raffled = left.clone();
    insert_items(&mut raffled, &slice.right_nfts)?;

    let mut b = Builder::new();
    b.store_dict(encode_dict(&left)?)?
        .store_dict(encode_dict(&right)?)?
        .store_dict(encode_dict(&raffled)?)?;
    Ok(b.end_cell())
}

/// Builds the storage cell for a new raffle instance.
///
/// Fails with `ValueOutOfRange` if either NFT count exceeds 15 or a coin
/// amount needs more than 15 bytes, and with `DuplicateKey` if an NFT is
/// listed twice (on either side).
pub fn encode_storage(
    state: &StateSlice,
    addresses: &AddressSlice,
    commissions: &CommissionSlice,
    nfts: &NftSlice,
) -> Result<Cell, CodecError> {
    let mut root = Builder::new();
    root.store_ref(encode_state_cell(state)?)?
        .store_ref(encode_address_cell(addresses)?)?
        .store_ref(encode_commission_cell(commissions)?)?
        .store_ref(encode_nft_cell(nfts)?)?;

    debug!(
        "encoded raffle storage: state={} left={}/{} right={}/{}",
        state.state,
        nfts.left_nfts.len(),
        state.left_nfts_count,
        nfts.right_nfts.len(),
        state.right_nfts_count
    );
    Ok(root.end_cell())
}

fn load_count(s: &mut Slice<'_>) -> Result<u8, CodecError> {
    Ok(s.load_uint(COUNT_BITS)? as u8)
}

/// Parses a storage cell back into a snapshot.
///
/// The counters and collected-coin slots the encoder leaves at zero are read
/// as whatever the contract has written there since.
pub fn decode_storage(cell: &Cell) -> Result<StorageSnapshot, CodecError> {
    let mut root = cell.parse();
    let state_cell = root.load_ref()?;
    let address_cell = root.load_ref()?;
    let commission_cell = root.load_ref()?;
    let nft_cell = root.load_ref()?;

    let mut s = state_cell.parse();
    let state = RaffleState::try_from(s.load_uint(STATE_BITS)? as u8)?;
    let right_nfts_count = load_count(&mut s)?;
    let right_nfts_received = load_count(&mut s)?;
    let left_nfts_count = load_count(&mut s)?;
    let left_nfts_received = load_count(&mut s)?;

    let mut a = address_cell.parse();
    let left_user = a.load_address()?;
    let right_user = a.load_address()?;
    let super_user = a.load_address()?;

    let mut c = commission_cell.parse();
    let left_commission = c.load_coins()?;
    let right_commission = c.load_coins()?;
    let left_coins_got = c.load_coins()?;
    let right_coins_got = c.load_coins()?;
    let coins_for_nft = c.load_coins()?;

    let mut d = nft_cell.parse();
    let left_nfts = d.load_dict()?.map(|r| decode_dict(Some(r))).transpose()?;
    let right_nfts = d.load_dict()?.map(|r| decode_dict(Some(r))).transpose()?;
    let raffled_nfts = d.load_dict()?.map(|r| decode_dict(Some(r))).transpose()?;

    Ok(StorageSnapshot {
        state,
        right_nfts_count,
        right_nfts_received,
        left_nfts_count,
        left_nfts_received,
        left_user,
        right_user,
        super_user,
        left_commission,
        right_commission,
        left_coins_got,
        right_coins_got,
        coins_for_nft,
        left_nfts,
        right_nfts,
        raffled_nfts,
    })
}
