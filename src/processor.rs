use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::console::Machine;
use crate::error::{EmulationError, EmulationResult};

/// Lifecycle of the execution loop, published through an atomic so other
/// threads observe transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RunState::Idle,
            1 => RunState::Running,
            2 => RunState::Stopping,
            _ => RunState::Stopped,
        }
    }
}

/// Drives the fetch-decode-execute loop on a dedicated worker thread.
///
/// The processor is a driver over console-owned state, never an owner of
/// it. Cancellation is cooperative: the stop flag is checked only at
/// instruction boundaries, so a cancelled loop never leaves an
/// instruction half applied.
pub struct Processor {
    machine: Arc<Mutex<Machine>>,
    stop: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    worker: Option<JoinHandle<EmulationResult<()>>>,
}

impl Processor {
    pub(crate) fn attach(machine: Arc<Mutex<Machine>>) -> Self {
        Processor {
            machine,
            stop: Arc::new(AtomicBool::new(false)),
            state: Arc::new(AtomicU8::new(RunState::Idle as u8)),
            worker: None,
        }
    }

    pub fn run_state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Begin executing at the current program counter on a worker thread
    /// and return immediately. Rejected while a loop is still live; a
    /// stopped processor may be started again.
    pub fn start(&mut self) -> EmulationResult<()> {
        match self.run_state() {
            state @ (RunState::Running | RunState::Stopping) => {
                Err(EmulationError::InvalidStateTransition {
                    operation: "start",
                    state,
                })
            }
            _ => {
                // Reap a finished worker whose result was never claimed.
                if let Some(handle) = self.worker.take() {
                    match handle.join() {
                        Ok(Err(err)) => {
                            log::debug!("discarding result of previous run: {err}")
                        }
                        Ok(Ok(())) => {}
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                self.stop.store(false, Ordering::SeqCst);
                self.state.store(RunState::Running as u8, Ordering::SeqCst);

                let machine = Arc::clone(&self.machine);
                let stop = Arc::clone(&self.stop);
                let state = Arc::clone(&self.state);
                self.worker = Some(thread::spawn(move || run_loop(&machine, &stop, &state)));
                Ok(())
            }
        }
    }

    /// Request a cooperative stop. The loop observes the request at the
    /// next instruction boundary; there is no timeout and no forced
    /// termination.
    pub fn interrupt(&mut self) -> EmulationResult<()> {
        // The worker publishes Stopped on its own when the loop halts, so
        // Running -> Stopping must be a single compare-exchange: a
        // check-then-store could land Stopping after the worker's Stopped
        // and wedge the state machine.
        match self.state.compare_exchange(
            RunState::Running as u8,
            RunState::Stopping as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => {
                self.stop.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(witnessed) => Err(EmulationError::InvalidStateTransition {
                operation: "interrupt",
                state: RunState::from_u8(witnessed),
            }),
        }
    }

    /// Join the worker thread and surface the loop's outcome: `Ok` after
    /// a cooperative stop, or the error that halted execution. Register
    /// and memory reads are authoritative only after this returns.
    pub fn wait_until_stopped(&mut self) -> EmulationResult<()> {
        let Some(handle) = self.worker.take() else {
            return Err(EmulationError::InvalidStateTransition {
                operation: "wait for",
                state: self.run_state(),
            });
        };
        match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

fn run_loop(
    machine: &Mutex<Machine>,
    stop: &AtomicBool,
    state: &AtomicU8,
) -> EmulationResult<()> {
    log::debug!("execution loop started");
    let result = loop {
        if stop.load(Ordering::SeqCst) {
            log::debug!("stop observed at instruction boundary");
            break Ok(());
        }
        // The lock is released between instructions so observers can take
        // diagnostic reads while the loop runs.
        let mut machine = machine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Machine { cpu, memory } = &mut *machine;
        if let Err(err) = cpu.step(memory) {
            log::error!("halting execution loop: {err}");
            break Err(err);
        }
    };
    state.store(RunState::Stopped as u8, Ordering::SeqCst);
    result
}
