//! Affine-matrix BIOS services.
//!
//! Both services compose scale and rotation (and, for backgrounds, the
//! translation that re-centers the view) into the fixed-point matrices the
//! display hardware consumes. Intermediates are computed in `f32`; every
//! cell is stored as `value * 256` truncated to 16 bits, translations as
//! 24.8 words.

use std::f32::consts::PI;

use crate::cpu::{MemoryAccess::NonSequential, SwiCpu};

/// `BgAffineSet`: r2 input blocks of 20 bytes starting at r0, one 16-byte
/// output block per input at r1.
///
/// ```text
/// [ sx   0  0 ]   [ cos(theta)  -sin(theta)  0 ]   [ 1  0  cx - ox ]   [ A B rx ]
/// [  0  sy  0 ] * [ sin(theta)   cos(theta)  0 ] * [ 0  1  cy - oy ] = [ C D ry ]
/// [  0   0  1 ]   [     0            0       1 ]   [ 0  0     1    ]   [ 0 0  1 ]
/// ```
pub(super) fn bg_affine_set(cpu: &mut impl SwiCpu) {
    let mut count = cpu.registers().register_at(2);
    let mut offset = cpu.registers().register_at(0);
    let mut destination = cpu.registers().register_at(1);

    while count > 0 {
        count -= 1;

        let ox = cpu.load32(offset, NonSequential) as i32 as f32 / 256.0;
        let oy = cpu.load32(offset.wrapping_add(4), NonSequential) as i32 as f32 / 256.0;
        let cx = f32::from(cpu.load16(offset.wrapping_add(8), NonSequential));
        let cy = f32::from(cpu.load16(offset.wrapping_add(10), NonSequential));
        let sx = f32::from(cpu.load16(offset.wrapping_add(12), NonSequential)) / 256.0;
        let sy = f32::from(cpu.load16(offset.wrapping_add(14), NonSequential)) / 256.0;
        let theta =
            f32::from(cpu.load_u16(offset.wrapping_add(16), NonSequential) >> 8) / 128.0 * PI;
        offset = offset.wrapping_add(20);

        let a = sx * theta.cos();
        let b = -sx * theta.sin();
        let c = sy * theta.sin();
        let d = sy * theta.cos();

        let rx = ox - (a * cx + b * cy);
        let ry = oy - (c * cx + d * cy);

        cpu.store16(destination, (a * 256.0) as i32 as u16, NonSequential);
        cpu.store16(
            destination.wrapping_add(2),
            (b * 256.0) as i32 as u16,
            NonSequential,
        );
        cpu.store16(
            destination.wrapping_add(4),
            (c * 256.0) as i32 as u16,
            NonSequential,
        );
        cpu.store16(
            destination.wrapping_add(6),
            (d * 256.0) as i32 as u16,
            NonSequential,
        );
        cpu.store32(
            destination.wrapping_add(8),
            (rx * 256.0) as i32 as u32,
            NonSequential,
        );
        cpu.store32(
            destination.wrapping_add(12),
            (ry * 256.0) as i32 as u32,
            NonSequential,
        );
        destination = destination.wrapping_add(16);
    }
}

/// `ObjAffineSet`: r2 input blocks of 8 bytes starting at r0, four matrix
/// cells per block written at r1 with an inter-cell stride of r3 (8 for the
/// interleaved OAM layout, 2 for a packed matrix).
pub(super) fn obj_affine_set(cpu: &mut impl SwiCpu) {
    let mut count = cpu.registers().register_at(2);
    let mut offset = cpu.registers().register_at(0);
    let mut destination = cpu.registers().register_at(1);
    let stride = cpu.registers().register_at(3);

    while count > 0 {
        count -= 1;

        let sx = f32::from(cpu.load16(offset, NonSequential)) / 256.0;
        let sy = f32::from(cpu.load16(offset.wrapping_add(2), NonSequential)) / 256.0;
        let theta =
            f32::from(cpu.load_u16(offset.wrapping_add(4), NonSequential) >> 8) / 128.0 * PI;
        offset = offset.wrapping_add(8);

        let a = sx * theta.cos();
        let b = -sx * theta.sin();
        let c = sy * theta.sin();
        let d = sy * theta.cos();

        cpu.store16(destination, (a * 256.0) as i32 as u16, NonSequential);
        cpu.store16(
            destination.wrapping_add(stride),
            (b * 256.0) as i32 as u16,
            NonSequential,
        );
        cpu.store16(
            destination.wrapping_add(stride.wrapping_mul(2)),
            (c * 256.0) as i32 as u16,
            NonSequential,
        );
        cpu.store16(
            destination.wrapping_add(stride.wrapping_mul(3)),
            (d * 256.0) as i32 as u16,
            NonSequential,
        );
        destination = destination.wrapping_add(stride.wrapping_mul(4));
    }
}

#[cfg(test)]
mod tests {
    use crate::bios::swi16;
    use crate::cpu::testing::TestCpu;
    use crate::cpu::{MemoryAccess::NonSequential, SwiCpu};

    const SRC: u32 = 0x0200_0000;
    const DST: u32 = 0x0200_1000;

    fn write_bg_block(cpu: &mut TestCpu, at: u32, ox: i32, oy: i32, cx: i16, cy: i16, sx: u16, sy: u16, theta: u16) {
        cpu.store32(at, ox as u32, NonSequential);
        cpu.store32(at + 4, oy as u32, NonSequential);
        cpu.store16(at + 8, cx as u16, NonSequential);
        cpu.store16(at + 10, cy as u16, NonSequential);
        cpu.store16(at + 12, sx, NonSequential);
        cpu.store16(at + 14, sy, NonSequential);
        cpu.store16(at + 16, theta, NonSequential);
        cpu.store16(at + 18, 0, NonSequential);
    }

    #[test]
    fn bg_affine_identity() {
        let mut cpu = TestCpu::default();
        write_bg_block(&mut cpu, SRC, 0, 0, 0, 0, 0x0100, 0x0100, 0);
        cpu.registers.set_register_at(0, SRC);
        cpu.registers.set_register_at(1, DST);
        cpu.registers.set_register_at(2, 1);

        swi16(&mut cpu, 0x0E);

        assert_eq!(cpu.load_u16(DST, NonSequential), 0x0100);
        assert_eq!(cpu.load_u16(DST + 2, NonSequential), 0);
        assert_eq!(cpu.load_u16(DST + 4, NonSequential), 0);
        assert_eq!(cpu.load_u16(DST + 6, NonSequential), 0x0100);
        assert_eq!(cpu.load32(DST + 8, NonSequential), 0);
        assert_eq!(cpu.load32(DST + 12, NonSequential), 0);
    }

    #[test]
    fn bg_affine_translation() {
        let mut cpu = TestCpu::default();
        // View origin at (100, -8), display center at (5, 3), no scaling.
        write_bg_block(
            &mut cpu,
            SRC,
            100 * 256,
            -8 * 256,
            5,
            3,
            0x0100,
            0x0100,
            0,
        );
        cpu.registers.set_register_at(0, SRC);
        cpu.registers.set_register_at(1, DST);
        cpu.registers.set_register_at(2, 1);

        swi16(&mut cpu, 0x0E);

        // rx = ox - (A*cx + B*cy) = 100 - 5, ry = -8 - 3.
        assert_eq!(cpu.load32(DST + 8, NonSequential) as i32, 95 * 256);
        assert_eq!(cpu.load32(DST + 12, NonSequential) as i32, -11 * 256);
    }

    #[test]
    fn bg_affine_half_turn() {
        let mut cpu = TestCpu::default();
        write_bg_block(&mut cpu, SRC, 0, 0, 0, 0, 0x0100, 0x0100, 0x8000);
        cpu.registers.set_register_at(0, SRC);
        cpu.registers.set_register_at(1, DST);
        cpu.registers.set_register_at(2, 1);

        swi16(&mut cpu, 0x0E);

        // cos(pi) = -1, sin(pi) truncates to zero.
        assert_eq!(cpu.load_u16(DST, NonSequential) as i16, -256);
        assert_eq!(cpu.load_u16(DST + 2, NonSequential), 0);
        assert_eq!(cpu.load_u16(DST + 4, NonSequential), 0);
        assert_eq!(cpu.load_u16(DST + 6, NonSequential) as i16, -256);
    }

    #[test]
    fn obj_affine_oam_stride() {
        let mut cpu = TestCpu::default();
        // sx = 2.0, sy = 0.5, theta = 0.
        cpu.store16(SRC, 0x0200, NonSequential);
        cpu.store16(SRC + 2, 0x0080, NonSequential);
        cpu.store16(SRC + 4, 0, NonSequential);
        cpu.store16(SRC + 6, 0, NonSequential);
        cpu.registers.set_register_at(0, SRC);
        cpu.registers.set_register_at(1, DST);
        cpu.registers.set_register_at(2, 1);
        cpu.registers.set_register_at(3, 8);

        swi16(&mut cpu, 0x0F);

        assert_eq!(cpu.load_u16(DST, NonSequential), 0x0200);
        assert_eq!(cpu.load_u16(DST + 8, NonSequential), 0);
        assert_eq!(cpu.load_u16(DST + 16, NonSequential), 0);
        assert_eq!(cpu.load_u16(DST + 24, NonSequential), 0x0080);
    }

    #[test]
    fn obj_affine_two_entries_packed() {
        let mut cpu = TestCpu::default();
        for i in 0..2_u32 {
            cpu.store16(SRC + i * 8, 0x0100, NonSequential);
            cpu.store16(SRC + i * 8 + 2, 0x0100, NonSequential);
            cpu.store16(SRC + i * 8 + 4, 0, NonSequential);
            cpu.store16(SRC + i * 8 + 6, 0, NonSequential);
        }
        cpu.registers.set_register_at(0, SRC);
        cpu.registers.set_register_at(1, DST);
        cpu.registers.set_register_at(2, 2);
        cpu.registers.set_register_at(3, 2);

        swi16(&mut cpu, 0x0F);

        for i in 0..2_u32 {
            assert_eq!(cpu.load_u16(DST + i * 8, NonSequential), 0x0100);
            assert_eq!(cpu.load_u16(DST + i * 8 + 2, NonSequential), 0);
            assert_eq!(cpu.load_u16(DST + i * 8 + 4, NonSequential), 0);
            assert_eq!(cpu.load_u16(DST + i * 8 + 6, NonSequential), 0x0100);
        }
    }
}
