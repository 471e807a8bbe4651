//! Seam to the virtual machine that runs the contract.
//!
//! The codec never executes contract logic. Hosts plug an implementation of
//! [`ContractExecutor`] in, and [`client::RaffleClient`] drives it with the
//! bodies produced by [`crate::raffle::messages`].

pub mod client;
pub mod stack;

use crate::cell::Cell;
use crate::error::CodecError;
use crate::types::address::Address;
use crate::types::coins::Coins;
use stack::StackValue;
use std::fmt;

/// Exit code reported by a compute phase or a get-method run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const OK: ExitCode = ExitCode(0);
    /// Alternative success code used by some contracts.
    pub const OK_ALT: ExitCode = ExitCode(1);

    pub fn is_success(self) -> bool {
        self == Self::OK || self == Self::OK_ALT
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound internal message delivered to a contract instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalMessage {
    pub src: Address,
    pub dest: Address,
    /// Coins attached to the message.
    pub value: Coins,
    pub bounce: bool,
    pub body: Cell,
}

/// Action a contract queued during execution, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutAction {
    SendMsg { mode: u8, message: Cell },
    ReserveCurrency { mode: u8, amount: Coins },
}

impl OutAction {
    /// Action tag as reported by the executor.
    pub fn type_name(&self) -> &'static str {
        match self {
            OutAction::SendMsg { .. } => "send_msg",
            OutAction::ReserveCurrency { .. } => "reserve_currency",
        }
    }

    pub fn mode(&self) -> u8 {
        match self {
            OutAction::SendMsg { mode, .. } | OutAction::ReserveCurrency { mode, .. } => *mode,
        }
    }
}

/// Outcome of delivering one internal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: ExitCode,
    pub actions: Vec<OutAction>,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.exit_code.is_success()
    }

    /// Returns the tags of the emitted actions, in order.
    pub fn action_types(&self) -> Vec<&'static str> {
        self.actions.iter().map(OutAction::type_name).collect()
    }
}

/// Outcome of a read-only get-method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMethodResult {
    pub exit_code: ExitCode,
    pub stack: Vec<StackValue>,
}

impl GetMethodResult {
    pub fn is_success(&self) -> bool {
        self.exit_code.is_success()
    }
}

/// Virtual machine hosting one deployed raffle instance.
///
/// Errors are reserved for host-side failures (the instance could not be
/// reached at all); contract-level failures come back as a non-success
/// [`ExitCode`].
pub trait ContractExecutor {
    /// Delivers an internal message and runs the contract on it.
    fn send_internal(&mut self, message: InternalMessage) -> Result<ExecutionResult, CodecError>;
    /// Runs a read-only method by name.
    fn run_get_method(
        &self,
        method: &str,
        args: &[StackValue],
    ) -> Result<GetMethodResult, CodecError>;
}
