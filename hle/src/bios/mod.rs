//! # BIOS Software-Interrupt Dispatcher
//!
//! Entry point for every guest SWI instruction. The immediate selects the
//! service; handlers read their arguments from r0-r3, work through the
//! memory bus, and write results back into the register file.
//!
//! | Immediate   | Service                                   |
//! |-------------|-------------------------------------------|
//! | 0x01        | `RegisterRamReset` (stub)                 |
//! | 0x02        | Halt                                      |
//! | 0x04, 0x05  | `IntrWait` / `VBlankIntrWait` (real SWI)  |
//! | 0x06, 0x07  | Div / DivArm                              |
//! | 0x08        | Sqrt                                      |
//! | 0x0A        | `ArcTan2`                                 |
//! | 0x0B, 0x0C  | `CpuSet` / `CpuFastSet` (real SWI)        |
//! | 0x0D        | BIOS checksum                             |
//! | 0x0E, 0x0F  | `BgAffineSet` / `ObjAffineSet`            |
//! | 0x11, 0x12  | LZ77 decompression (8-bit / 16-bit writes)|
//! | 0x13        | Huffman decompression                     |
//! | 0x14, 0x15  | Run-length decompression (8 / 16)         |
//! | 0x16-0x18   | Differential unfiltering                  |
//! | 0x1F        | `MidiKey2Freq`                            |
//!
//! The interrupt-wait family and the `CpuSet` copies are not emulated here:
//! they re-enter the real BIOS through a synthesized SWI exception, as does
//! everything when the full-BIOS flag is set.

mod affine;
mod checksum;
mod decompress;
mod math;

pub use checksum::{bios_checksum, GBA_BIOS_CHECKSUM, GBA_DS_BIOS_CHECKSUM};

use logger::{log, Level};

use crate::cpu::SwiCpu;
use crate::memory::{is_decompress_destination, BASE_WORKING_RAM};

use decompress::StoreWidth;

/// Handles an SWI raised from Thumb state, where the instruction carries an
/// 8-bit comment field.
pub fn swi16(cpu: &mut impl SwiCpu, immediate: u32) {
    let registers = cpu.registers();
    log(
        Level::Swi,
        format!(
            "SWI: {immediate:02X} r0: {:08X} r1: {:08X} r2: {:08X} r3: {:08X}",
            registers.register_at(0),
            registers.register_at(1),
            registers.register_at(2),
            registers.register_at(3),
        ),
    );

    if cpu.full_bios() {
        cpu.raise_swi();
        return;
    }

    match immediate {
        0x01 => register_ram_reset(cpu),
        0x02 => cpu.halt(),
        // IntrWait and VBlankIntrWait need the real exception path.
        0x04 | 0x05 => cpu.raise_swi(),
        0x06 => {
            let numerator = cpu.registers().register_at(0) as i32;
            let denominator = cpu.registers().register_at(1) as i32;
            math::divide(cpu, numerator, denominator);
        }
        0x07 => {
            let numerator = cpu.registers().register_at(1) as i32;
            let denominator = cpu.registers().register_at(0) as i32;
            math::divide(cpu, numerator, denominator);
        }
        0x08 => math::square_root(cpu),
        0x0A => math::arc_tan2(cpu),
        0x0B | 0x0C => cpu.raise_swi(),
        0x0D => {
            let sum = bios_checksum(cpu.bios_rom());
            cpu.registers_mut().set_register_at(0, sum);
            // The checksum service runs straight into BgAffineSet with
            // whatever registers are live; games can observe this.
            affine::bg_affine_set(cpu);
        }
        0x0E => affine::bg_affine_set(cpu),
        0x0F => affine::obj_affine_set(cpu),
        0x11 => {
            decompress_precheck(cpu, "LZ77");
            decompress::lz77(cpu, StoreWidth::Byte);
        }
        0x12 => {
            decompress_precheck(cpu, "LZ77");
            decompress::lz77(cpu, StoreWidth::Halfword);
        }
        0x13 => {
            decompress_precheck(cpu, "Huffman");
            decompress::huffman(cpu);
        }
        0x14 => {
            decompress_precheck(cpu, "RL");
            decompress::run_length(cpu, StoreWidth::Byte);
        }
        0x15 => {
            decompress_precheck(cpu, "RL");
            decompress::run_length(cpu, StoreWidth::Halfword);
        }
        0x16 => {
            decompress_precheck(cpu, "UnFilter");
            decompress::un_filter(cpu, 1, 1);
        }
        0x17 => {
            decompress_precheck(cpu, "UnFilter");
            decompress::un_filter(cpu, 1, 2);
        }
        0x18 => {
            decompress_precheck(cpu, "UnFilter");
            decompress::un_filter(cpu, 2, 2);
        }
        0x1F => math::midi_key_to_frequency(cpu),
        _ => log(
            Level::Stub,
            format!("Stub software interrupt: {immediate:02X}"),
        ),
    }
}

/// Handles an SWI raised from ARM state: the 24-bit comment field holds the
/// service number in bits 16-23.
pub fn swi32(cpu: &mut impl SwiCpu, immediate: u32) {
    swi16(cpu, immediate >> 16);
}

fn register_ram_reset(cpu: &mut impl SwiCpu) {
    let _flags = cpu.registers().register_at(0);
    log(Level::Stub, "RegisterRamReset unimplemented");
}

/// Source and destination sanity checks shared by the codec services. A bad
/// pointer is a guest bug worth reporting, but the decode still runs.
fn decompress_precheck(cpu: &impl SwiCpu, name: &str) {
    let registers = cpu.registers();
    if registers.register_at(0) < BASE_WORKING_RAM {
        log(Level::GameError, format!("Bad {name} source"));
    }
    if !is_decompress_destination(registers.register_at(1)) {
        log(Level::GameError, format!("Bad {name} destination"));
    }
}
