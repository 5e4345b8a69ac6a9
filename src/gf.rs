//! Arithmetic over GF(2^8) with the QR code primitive polynomial
//! P = x^8 + x^4 + x^3 + x^2 + 1 (0x11D) and generator alpha = 2.

use lazy_static::lazy_static;

const PRIME_POLYNOMIAL: u32 = 0x11D;

struct Tables {
    pow: [u8; 256],
    log: [u8; 256],
}

fn build_tables() -> Tables {
    let mut pow = [0u8; 256];
    let mut log = [0u8; 256];

    let mut element: u32 = 1;
    for i in 0..255usize {
        pow[i] = element as u8;
        log[element as usize] = i as u8;
        element <<= 1;
        if element >= 256 {
            element ^= PRIME_POLYNOMIAL;
        }
    }
    // alpha^255 = alpha^0 = 1, keep the table total-length-256 for convenient indexing.
    pow[255] = pow[0];

    Tables { pow, log }
}

lazy_static! {
    static ref TABLES: Tables = build_tables();
}

/// a XOR b. GF(2^8) addition and subtraction are the same operation.
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// alpha^i, for i taken modulo 255.
pub fn power(i: i32) -> u8 {
    let i = i.rem_euclid(255) as usize;
    TABLES.pow[i]
}

/// log_alpha(a), for a != 0. Panics on a == 0 (undefined, caller bug).
pub fn log(a: u8) -> u8 {
    assert!(a != 0, "log(0) is undefined");
    TABLES.log[a as usize]
}

/// a * b.
pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let sum = log(a) as i32 + log(b) as i32;
    power(sum)
}

/// a^-1, for a != 0. Panics on a == 0 (undefined, caller bug).
pub fn inverse(a: u8) -> u8 {
    assert!(a != 0, "inverse(0) is undefined");
    power(255 - log(a) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_by_inverse_is_one() {
        for a in 1..=255u16 {
            let a = a as u8;
            assert_eq!(multiply(a, inverse(a)), 1, "a = {}", a);
        }
    }

    #[test]
    fn add_is_commutative_and_self_inverse() {
        for a in 0..=255u16 {
            for b in 0..=255u16 {
                let (a, b) = (a as u8, b as u8);
                assert_eq!(add(a, b), add(b, a));
            }
            let a = a as u8;
            assert_eq!(add(add(a, 7), 7), a);
        }
    }

    #[test]
    fn power_and_log_round_trip() {
        for i in 0..255i32 {
            let p = power(i);
            assert_ne!(p, 0);
            assert_eq!(log(p) as i32, i);
        }
    }
}
