//! The arithmetic/logic unit and the barrel shifter.
//!
//! Both units are pure combinational functions: the ALU models a single
//! 74181-style bit slice widened to 8 bits, the shifter implements the
//! nibble-encoded accumulator shifts. Neither holds state; the CPU samples
//! their outputs once per bus phase.

/// Evaluate the ALU.
///
/// `select` picks one of 16 functions; only its low 4 bits are used.
/// With `logic_mode` set the unit computes a bitwise function of `a` and `b`
/// and the carry input is ignored. Otherwise it computes an arithmetic
/// function as a 9-bit sum of terms built from `a`, `b`, their complements
/// and pairwise ANDs, plus the carry input.
///
/// Returns `(result, carry_out)` where `carry_out` is bit 8 of the 9-bit
/// value. In logic mode bit 8 is never set, so the carry out is always
/// false there; it is still returned so both modes share one contract.
pub fn alu(a: u8, b: u8, select: u8, logic_mode: bool, carry_in: bool) -> (u8, bool) {
    if logic_mode {
        let r = logic_function(a, b, select & 0x0f);
        (r, false)
    } else {
        let sum = arith_sum(a, b, select & 0x0f, carry_in);
        ((sum & 0xff) as u8, sum & 0x100 != 0)
    }
}

/// The 16 logic functions, in standard 74181 active-high order.
fn logic_function(a: u8, b: u8, select: u8) -> u8 {
    match select {
        0x0 => !a,
        0x1 => !(a | b),
        0x2 => !a & b,
        0x3 => 0x00,
        0x4 => !(a & b),
        0x5 => !b,
        0x6 => a ^ b,
        0x7 => a & !b,
        0x8 => !a | b,
        0x9 => !(a ^ b),
        0xa => b,
        0xb => a & b,
        0xc => 0xff,
        0xd => a | !b,
        0xe => a | b,
        0xf => a,
        _ => unreachable!(),
    }
}

/// The 16 arithmetic functions as 9-bit sums.
///
/// "Minus 1" terms are expressed as `+ 0xff`, the 8-bit two's complement of
/// 1, so subtraction selects follow the usual borrow convention: carry out
/// is 1 exactly when no borrow occurred.
fn arith_sum(a: u8, b: u8, select: u8, carry_in: bool) -> u16 {
    let a = u16::from(a);
    let b = u16::from(b);
    let na = !a & 0xff;
    let nb = !b & 0xff;
    let c = u16::from(carry_in);

    match select {
        0x0 => a + c,
        0x1 => a + b + c,
        0x2 => a + nb + c,
        0x3 => na + b + c,
        0x4 => a + (a & b) + c,
        0x5 => a + (a & nb) + c,
        0x6 => a + a + c,
        0x7 => (a | b) + c,
        0x8 => (a | nb) + c,
        0x9 => (a & b) + 0xff + c,
        0xa => b + c,
        0xb => (a | b) + (a & nb) + c,
        0xc => c,
        0xd => nb + c,
        0xe => na + c,
        0xf => a + 0xff + c,
        _ => unreachable!(),
    }
}

/// Shift the accumulator by a nibble-encoded signed distance.
///
/// Distances 8..=15 shift left by `n - 8`; distances 0..=7 shift right by
/// `n`. Bits shifted out are lost, vacated bits fill with zero.
pub fn shift(a: u8, nibble: u8) -> u8 {
    let n = nibble & 0x0f;
    if n >= 8 {
        a << (n - 8)
    } else {
        a >> n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_select_fixture() {
        // Fixture vectors from the reference implementation.
        assert_eq!(alu(70, 130, 1, false, false), (200, false));
        assert_eq!(alu(70, 130, 1, false, true), (201, false));
        assert_eq!(alu(170, 130, 1, false, false), (44, true));
    }

    #[test]
    fn test_subtract_select() {
        // A minus B minus 1, plus carry-in 1 = plain subtraction.
        assert_eq!(alu(10, 3, 2, false, true), (7, true));
        assert_eq!(alu(3, 10, 2, false, true), (249, false));
        assert_eq!(alu(5, 5, 2, false, true), (0, true));
        // Carry-in 0 gives the borrow-chained form.
        assert_eq!(alu(10, 3, 2, false, false), (6, true));
    }

    #[test]
    fn test_reverse_subtract_select() {
        // B minus A minus 1, plus carry-in: the compare select.
        // Carry out is set exactly when a < b + cin.
        assert_eq!(alu(4, 9, 3, false, false).1, true);
        assert_eq!(alu(9, 4, 3, false, false).1, false);
        assert_eq!(alu(9, 9, 3, false, false).1, false);
        assert_eq!(alu(9, 9, 3, false, true).1, true);
    }

    #[test]
    fn test_increment_decrement_selects() {
        assert_eq!(alu(41, 0, 0, false, true), (42, false));
        assert_eq!(alu(255, 0, 0, false, true), (0, true));
        assert_eq!(alu(42, 0, 15, false, false), (41, true));
        assert_eq!(alu(0, 0, 15, false, false), (255, false));
    }

    #[test]
    fn test_zero_select_passes_carry() {
        assert_eq!(alu(170, 85, 12, false, false), (0, false));
        assert_eq!(alu(170, 85, 12, false, true), (1, false));
    }

    #[test]
    fn test_logic_functions() {
        let a = 0b1100_1010;
        let b = 0b1010_0110;
        assert_eq!(alu(a, b, 0x0, true, false).0, !a);
        assert_eq!(alu(a, b, 0x6, true, false).0, a ^ b);
        assert_eq!(alu(a, b, 0xb, true, false).0, a & b);
        assert_eq!(alu(a, b, 0xe, true, false).0, a | b);
        assert_eq!(alu(a, b, 0x3, true, false).0, 0x00);
        assert_eq!(alu(a, b, 0xc, true, false).0, 0xff);
        assert_eq!(alu(a, b, 0xf, true, false).0, a);
        assert_eq!(alu(a, b, 0xa, true, false).0, b);
    }

    #[test]
    fn test_shift_distances() {
        assert_eq!(shift(0b0000_0001, 8 + 3), 0b0000_1000);
        assert_eq!(shift(0b1000_0000, 7), 0b0000_0001);
        assert_eq!(shift(0b1111_1111, 8 + 4), 0b1111_0000);
        assert_eq!(shift(0b1111_1111, 4), 0b0000_1111);
        // Distance 0 and 8 are both identity shifts.
        assert_eq!(shift(0xa5, 0), 0xa5);
        assert_eq!(shift(0xa5, 8), 0xa5);
    }

    proptest! {
        #[test]
        fn prop_add_matches_wide_sum(a: u8, b: u8, cin: bool) {
            let wide = u16::from(a) + u16::from(b) + u16::from(cin);
            let (r, c) = alu(a, b, 1, false, cin);
            prop_assert_eq!(r, (wide & 0xff) as u8);
            prop_assert_eq!(c, wide > 0xff);
        }

        #[test]
        fn prop_sub_borrow_convention(a: u8, b: u8) {
            let (r, c) = alu(a, b, 2, false, true);
            prop_assert_eq!(r, a.wrapping_sub(b));
            prop_assert_eq!(c, a >= b);
        }

        #[test]
        fn prop_logic_mode_never_carries(a: u8, b: u8, sel in 0u8..16, cin: bool) {
            prop_assert!(!alu(a, b, sel, true, cin).1);
        }

        #[test]
        fn prop_unused_operand_ignored(a: u8, b1: u8, b2: u8, cin: bool) {
            // Selects 0, 6, 12, 14 and 15 do not involve b.
            for sel in [0u8, 6, 12, 14, 15] {
                prop_assert_eq!(alu(a, b1, sel, false, cin), alu(a, b2, sel, false, cin));
            }
        }

        #[test]
        fn prop_carry_in_adds_one(a: u8, b: u8, sel in 0u8..16) {
            let lo = arith_sum(a, b, sel, false);
            let hi = arith_sum(a, b, sel, true);
            prop_assert_eq!(hi, lo + 1);
        }

        #[test]
        fn prop_shift_is_masked_power_of_two(a: u8, n in 0u8..16) {
            let r = shift(a, n);
            let expect = if n >= 8 {
                ((u16::from(a) << (n - 8)) & 0xff) as u8
            } else {
                a >> n
            };
            prop_assert_eq!(r, expect);
        }
    }
}
