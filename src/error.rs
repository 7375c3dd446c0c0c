use thiserror::Error;

use crate::processor::RunState;

pub type EmulationResult<T> = Result<T, EmulationError>;

/// Fatal conditions surfaced to whoever owns the console. The execution
/// loop never skips past any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmulationError {
    #[error("unknown opcode {opcode:#04X} at {pc:#06X}")]
    UnknownOpcode { opcode: u8, pc: u16 },

    #[error("load of {len} bytes at {load_address:#06X} runs past end of memory")]
    AddressOutOfRange { load_address: u16, len: usize },

    #[error("cannot {operation} while processor is {state:?}")]
    InvalidStateTransition {
        operation: &'static str,
        state: RunState,
    },
}
