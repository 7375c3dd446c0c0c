use serde::Serialize;

use crate::console::Machine;
use crate::cpu::StatusFlags;

/// Point-in-time rendering of registers, flags and memory for display
/// and debugging. Not part of the execution contract and never loaded
/// back into a machine.
#[derive(Serialize)]
pub struct StateDump {
    pub registers: RegisterDump,
    pub flags: FlagDump,
    pub memory: Vec<u8>,
}

#[derive(Serialize)]
pub struct RegisterDump {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
}

#[derive(Serialize)]
pub struct FlagDump {
    pub carry: bool,
    pub zero: bool,
    pub interrupt_disable: bool,
    pub decimal: bool,
    pub break_command: bool,
    pub overflow: bool,
    pub negative: bool,
}

impl StateDump {
    pub(crate) fn of(machine: &Machine) -> Self {
        let cpu = &machine.cpu;
        StateDump {
            registers: RegisterDump {
                a: cpu.a,
                x: cpu.x,
                y: cpu.y,
                sp: cpu.sp,
                pc: cpu.pc,
            },
            flags: FlagDump {
                carry: cpu.status.contains(StatusFlags::CARRY),
                zero: cpu.status.contains(StatusFlags::ZERO),
                interrupt_disable: cpu.status.contains(StatusFlags::INTERRUPT_DISABLE),
                decimal: cpu.status.contains(StatusFlags::DECIMAL),
                break_command: cpu.status.contains(StatusFlags::BREAK),
                overflow: cpu.status.contains(StatusFlags::OVERFLOW),
                negative: cpu.status.contains(StatusFlags::NEGATIVE),
            },
            memory: machine.memory.as_bytes().to_vec(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
