//! Test utilities for raffle codec testing.

#[cfg(test)]
pub mod utils {
    use crate::cell::Cell;
    use crate::error::CodecError;
    use crate::executor::stack::StackValue;
    use crate::executor::{
        ContractExecutor, ExecutionResult, ExitCode, GetMethodResult, InternalMessage,
    };
    use crate::raffle::storage::{
        AddressSlice, CommissionSlice, NftItem, NftSlice, StateSlice, decode_storage,
        encode_storage,
    };
    use crate::raffle::{GET_RAFFLE_STATE, RaffleState};
    use crate::types::address::Address;
    use crate::types::coins::{Coins, NANO_PER_COIN};
    use crate::types::hash::{HASH_LEN, Hash};
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(1);

    /// Returns a hash unique within the test process.
    pub fn random_hash() -> Hash {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut value = [0u8; HASH_LEN];
        value[..8].copy_from_slice(&n.to_le_bytes());
        Hash(value)
    }

    pub fn random_address() -> Address {
        Address::basechain(random_hash())
    }

    /// Complete set of storage inputs with fresh addresses.
    #[derive(Debug, Clone)]
    pub struct RaffleFixture {
        pub state: StateSlice,
        pub addresses: AddressSlice,
        pub commissions: CommissionSlice,
        pub nfts: NftSlice,
    }

    impl RaffleFixture {
        /// Active raffle with `left` and `right` unreceived NFTs and a commission
        /// of half a coin per NFT.
        pub fn new(left: u8, right: u8) -> Self {
            let half = Coins::from_nano(NANO_PER_COIN / 2);
            let items = |n: u8| -> Vec<NftItem> {
                (0..n)
                    .map(|_| NftItem {
                        addr: random_address(),
                        received: false,
                    })
                    .collect()
            };
            Self {
                state: StateSlice {
                    state: RaffleState::Active,
                    right_nfts_count: right,
                    left_nfts_count: left,
                },
                addresses: AddressSlice {
                    left_user: random_address(),
                    right_user: random_address(),
                    super_user: random_address(),
                },
                commissions: CommissionSlice {
                    left_commission: Coins::from_nano(half.nano() * left as u128),
                    right_commission: Coins::from_nano(half.nano() * right as u128),
                    coins_for_nft: half,
                },
                nfts: NftSlice {
                    left_nfts: items(left),
                    right_nfts: items(right),
                },
            }
        }

        pub fn encode(&self) -> Result<Cell, CodecError> {
            encode_storage(&self.state, &self.addresses, &self.commissions, &self.nfts)
        }
    }

    /// Executor that runs no contract code.
    ///
    /// Messages are recorded and answered with `exit_code`; the storage cell is
    /// never modified and `get::raffle_state` returns it decoded.
    pub struct EchoExecutor {
        pub storage: Cell,
        pub received: Vec<InternalMessage>,
        pub exit_code: ExitCode,
    }

    impl EchoExecutor {
        pub fn new(storage: Cell) -> Self {
            Self {
                storage,
                received: Vec::new(),
                exit_code: ExitCode::OK,
            }
        }
    }

    impl ContractExecutor for EchoExecutor {
        fn send_internal(
            &mut self,
            message: InternalMessage,
        ) -> Result<ExecutionResult, CodecError> {
            self.received.push(message);
            Ok(ExecutionResult {
                exit_code: self.exit_code,
                actions: Vec::new(),
            })
        }

        fn run_get_method(
            &self,
            method: &str,
            _args: &[StackValue],
        ) -> Result<GetMethodResult, CodecError> {
            if method != GET_RAFFLE_STATE {
                return Ok(GetMethodResult {
                    exit_code: ExitCode::NOT_FOUND,
                    stack: Vec::new(),
                });
            }
            Ok(GetMethodResult {
                exit_code: ExitCode::OK,
                stack: decode_storage(&self.storage)?.to_stack()?,
            })
        }
    }

    #[test]
    fn hashes_are_unique() {
        assert_ne!(random_hash(), random_hash());
        assert_ne!(random_address(), random_address());
    }

    #[test]
    fn unknown_get_method() {
        let executor = EchoExecutor::new(RaffleFixture::new(1, 1).encode().unwrap());
        let result = executor.run_get_method("get::nothing", &[]).unwrap();
        assert_eq!(result.exit_code, ExitCode::NOT_FOUND);
        assert!(result.stack.is_empty());
    }
}
