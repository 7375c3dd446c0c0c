use std::sync::{Arc, Mutex, MutexGuard};

use crate::cpu::Cpu;
use crate::error::EmulationResult;
use crate::memory::Memory;
use crate::processor::Processor;
use crate::snapshot::StateDump;

/// Register file plus memory of one emulated machine. While the processor
/// is running, its worker thread is the only writer.
pub struct Machine {
    pub cpu: Cpu,
    pub memory: Memory,
}

/// One complete emulated machine: a machine state shared with exactly one
/// processor attached to drive it.
pub struct Console {
    machine: Arc<Mutex<Machine>>,
    processor: Processor,
}

impl Console {
    pub fn new() -> Self {
        let machine = Arc::new(Mutex::new(Machine {
            cpu: Cpu::new(),
            memory: Memory::new(),
        }));
        let processor = Processor::attach(Arc::clone(&machine));
        Console { machine, processor }
    }

    /// Write `program` sequentially into memory starting at
    /// `load_address` and point the program counter there.
    pub fn load_binaries(&self, program: &[u8], load_address: u16) -> EmulationResult<()> {
        let mut machine = self.lock();
        machine.memory.load(program, load_address)?;
        machine.cpu.pc = load_address;
        log::debug!("loaded {} bytes at {:#06X}", program.len(), load_address);
        Ok(())
    }

    /// Load, then begin execution on the processor's worker thread.
    pub fn load_and_execute_binaries(
        &mut self,
        program: &[u8],
        load_address: u16,
    ) -> EmulationResult<()> {
        self.load_binaries(program, load_address)?;
        self.processor.start()
    }

    pub fn processor(&mut self) -> &mut Processor {
        &mut self.processor
    }

    /// Read access to registers, flags and memory. Permitted at any time
    /// for diagnostics, but authoritative only once the processor has
    /// been observed Stopped.
    pub fn with_machine<R>(&self, f: impl FnOnce(&Machine) -> R) -> R {
        f(&self.lock())
    }

    /// Diagnostic snapshot of the whole machine. Write-only: there is no
    /// load-from-dump path.
    pub fn snapshot(&self) -> StateDump {
        StateDump::of(&self.lock())
    }

    /// Pretty-printed JSON rendering of [`Console::snapshot`].
    pub fn dump_state(&self) -> serde_json::Result<String> {
        self.snapshot().to_pretty_json()
    }

    fn lock(&self) -> MutexGuard<'_, Machine> {
        self.machine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
