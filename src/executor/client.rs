//! Typed driver for one deployed raffle instance.

use crate::cell::Cell;
use crate::debug;
use crate::error::CodecError;
use crate::executor::{ContractExecutor, ExecutionResult, InternalMessage};
use crate::raffle::GET_RAFFLE_STATE;
use crate::raffle::messages::{self, ManualSend, MessageConfig};
use crate::raffle::state::decode_state;
use crate::raffle::storage::StorageSnapshot;
use crate::types::address::Address;
use crate::types::coins::Coins;
use std::time::{SystemTime, UNIX_EPOCH};

/// Query id used when the caller does not pick one: current unix time in
/// seconds.
pub fn default_query_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Sends raffle operations to an instance and reads its state back.
pub struct RaffleClient<E: ContractExecutor> {
    executor: E,
    address: Address,
    config: MessageConfig,
}

impl<E: ContractExecutor> RaffleClient<E> {
    pub fn new(executor: E, address: Address) -> Self {
        Self::with_config(executor, address, MessageConfig::default())
    }

    pub fn with_config(executor: E, address: Address, config: MessageConfig) -> Self {
        Self {
            executor,
            address,
            config,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    fn send(
        &mut self,
        src: &Address,
        value: Coins,
        body: Cell,
    ) -> Result<ExecutionResult, CodecError> {
        let result = self.executor.send_internal(InternalMessage {
            src: *src,
            dest: self.address,
            value,
            bounce: true,
            body,
        })?;
        debug!(
            "raffle {} <- {}: exit {} actions {:?}",
            self.address,
            src,
            result.exit_code,
            result.action_types()
        );
        Ok(result)
    }

    /// Delivers the ownership notification an NFT item sends once it has been
    /// transferred to the raffle.
    pub fn transfer_nft(
        &mut self,
        nft: &Address,
        prev_owner: &Address,
        amount: Coins,
    ) -> Result<ExecutionResult, CodecError> {
        self.transfer_nft_with_query(nft, prev_owner, amount, default_query_id())
    }

    pub fn transfer_nft_with_query(
        &mut self,
        nft: &Address,
        prev_owner: &Address,
        amount: Coins,
        query_id: u64,
    ) -> Result<ExecutionResult, CodecError> {
        let body = messages::transfer_notification(query_id, prev_owner, &self.config)?;
        self.send(nft, amount, body)
    }

    pub fn cancel(
        &mut self,
        sender: &Address,
        amount: Coins,
    ) -> Result<ExecutionResult, CodecError> {
        self.send(sender, amount, messages::cancel()?)
    }

    pub fn add_coins(
        &mut self,
        sender: &Address,
        amount: Coins,
    ) -> Result<ExecutionResult, CodecError> {
        self.send(sender, amount, messages::add_coins()?)
    }

    /// Asks the contract to relay a message; only the super user may.
    pub fn manual_send(
        &mut self,
        sender: &Address,
        amount: Coins,
        params: &ManualSend,
    ) -> Result<ExecutionResult, CodecError> {
        self.send(sender, amount, messages::manual_send(params)?)
    }

    /// Runs `get::raffle_state` and decodes the result.
    pub fn raffle_state(&self) -> Result<StorageSnapshot, CodecError> {
        let result = self.executor.run_get_method(GET_RAFFLE_STATE, &[])?;
        decode_state(&result)
    }
}
