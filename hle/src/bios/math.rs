//! Arithmetic BIOS services: Div, Sqrt, ArcTan2, MidiKey2Freq.

use std::f32::consts::PI;

use logger::{log, Level};

use crate::cpu::{MemoryAccess::NonSequential, SwiCpu};

/// Signed division. r0 gets the truncated quotient, r1 the remainder with
/// the sign of the dividend, r3 the absolute value of the quotient.
///
/// On hardware a zero denominator sends the BIOS routine into a loop for
/// most numerators; no game gets itself into that state on purpose, so the
/// handler resolves it to the sign-specific result instead.
pub(super) fn divide(cpu: &mut impl SwiCpu, numerator: i32, denominator: i32) {
    let registers = cpu.registers_mut();
    if denominator == 0 {
        log(
            Level::GameError,
            format!("Attempting to divide {numerator} by zero!"),
        );
        registers.set_register_at(0, if numerator < 0 { -1_i32 as u32 } else { 1 });
        registers.set_register_at(1, numerator as u32);
        registers.set_register_at(3, 1);
    } else {
        let quotient = numerator.wrapping_div(denominator);
        let remainder = numerator.wrapping_rem(denominator);
        registers.set_register_at(0, quotient as u32);
        registers.set_register_at(1, remainder as u32);
        registers.set_register_at(3, quotient.unsigned_abs());
    }
}

pub(super) fn square_root(cpu: &mut impl SwiCpu) {
    let value = cpu.registers().register_at(0) as i32;
    let root = f64::from(value).sqrt() as i32;
    cpu.registers_mut().set_register_at(0, root as u32);
}

/// r0 <- atan2(r1 / 16384, r0 / 16384), scaled so a full turn is 0x10000.
pub(super) fn arc_tan2(cpu: &mut impl SwiCpu) {
    let x = cpu.registers().register_at(0) as i32 as f32 / 16384.0;
    let y = cpu.registers().register_at(1) as i32 as f32 / 16384.0;
    let angle = (y.atan2(x) / (2.0 * PI) * 65536.0) as i32;
    cpu.registers_mut().set_register_at(0, angle as u32);
}

/// r0 points at a sound-channel structure whose word at offset 4 is the base
/// frequency; r1 is the MIDI key, r2 a fractional semitone in 8.8.
pub(super) fn midi_key_to_frequency(cpu: &mut impl SwiCpu) {
    let base = cpu.registers().register_at(0);
    let key = cpu.load32(base.wrapping_add(4), NonSequential);
    let semitones = cpu.registers().register_at(1) as i32 as f32;
    let fraction = cpu.registers().register_at(2) as i32 as f32;

    let frequency = key as f32 / 2.0_f32.powf((180.0 - semitones - fraction / 256.0) / 12.0);
    cpu.registers_mut().set_register_at(0, frequency as u32);
}
