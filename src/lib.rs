//! 6502 CPU core and concurrent console driver.
//!
//! The crate models one emulated machine as a [`Console`] owning a flat
//! 64 KiB [`Memory`] and a register file, with a [`Processor`] driving
//! the fetch-decode-execute loop on its own thread. Programs are plain
//! byte slices loaded through the console; execution stops cooperatively
//! at instruction boundaries or halts on the first unknown opcode.

pub mod console;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod processor;
pub mod snapshot;

pub use console::{Console, Machine};
pub use cpu::{Cpu, StatusFlags};
pub use error::{EmulationError, EmulationResult};
pub use memory::Memory;
pub use processor::{Processor, RunState};
pub use snapshot::StateDump;
