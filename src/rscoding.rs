//! Reed-Solomon error detection and correction over GF(2^8), ported from
//! the same zxing algorithm the original C implementation names as its
//! source: syndrome calculation, the extended Euclidean algorithm to get
//! the error locator/evaluator polynomials, a Chien search for the error
//! locations and Forney's formula for the error magnitudes.

use crate::blocks::Block;
use crate::error::{QrError, Result};
use crate::gf;
use crate::polynomial::Polynomial;

/// Evaluates the syndromes S_i = R(alpha^i) for i in 0..n_syndromes. All
/// zero means the block, as received, is already a valid codeword.
fn calculate_syndromes(message: &Polynomial, n_syndromes: usize) -> Polynomial {
    let mut coefficients = vec![0u8; n_syndromes.max(1)];
    for i in 0..n_syndromes {
        let x = gf::power(i as i32);
        let value = message.evaluate(x);
        coefficients[n_syndromes - 1 - i] = value;
    }
    Polynomial::new(coefficients)
}

/// The extended Euclidean algorithm run until the remainder's degree drops
/// below `r/2`, giving the error locator (sigma) and error evaluator
/// (omega) polynomials. `r` is the number of error correction codewords.
fn run_euclidean_algorithm(a: &Polynomial, b: &Polynomial, r: usize) -> Result<(Polynomial, Polynomial)> {
    let (mut r_last, mut r_cur) = if a.degree() < b.degree() {
        (b.clone(), a.clone())
    } else {
        (a.clone(), b.clone())
    };
    let mut t_last = Polynomial::zero(1);
    let mut t_cur = Polynomial::monomial(0, 1);

    while r_cur.degree() >= r / 2 {
        let r_last_last = r_last;
        let t_last_last = t_last;
        r_last = r_cur;
        t_last = t_cur;

        if r_last.is_zero() {
            return Err(QrError::decode("r_{i-1} was zero in Euclidean algorithm"));
        }

        r_cur = r_last_last;
        let mut q = Polynomial::zero(1);
        let dlt_inverse = gf::inverse(r_last.leading_coefficient());

        while r_cur.degree() >= r_last.degree() && !r_cur.is_zero() {
            let degree_diff = r_cur.degree() - r_last.degree();
            let scale = gf::multiply(r_cur.leading_coefficient(), dlt_inverse);
            q = q.add(&Polynomial::monomial(degree_diff, scale));
            r_cur = r_cur.add(&r_last.multiply_by_monomial(degree_diff, scale));
        }

        t_cur = q.multiply(&t_last).add(&t_last_last);

        if r_cur.degree() >= r_last.degree() {
            return Err(QrError::decode("division algorithm failed to reduce polynomial"));
        }
    }

    let sigma_tilde_at_zero = t_cur.get(0);
    if sigma_tilde_at_zero == 0 {
        return Err(QrError::decode("sigma tilde at zero was zero"));
    }
    let inverse = gf::inverse(sigma_tilde_at_zero);
    let sigma = t_cur.scalar_multiply(inverse);
    let omega = r_cur.scalar_multiply(inverse);
    Ok((sigma, omega))
}

/// Chien search: tries every nonzero field element as a root of sigma. A
/// root at alpha^i means there is an error at codeword position i, stored
/// here as the error location alpha^i itself (its inverse is found later).
fn find_error_locations(sigma: &Polynomial) -> Result<Vec<u8>> {
    let num_errors = sigma.degree();
    if num_errors == 1 {
        return Ok(vec![sigma.get(1)]);
    }

    let mut result = Vec::with_capacity(num_errors);
    for i in 1..256u32 {
        if sigma.evaluate(i as u8) == 0 {
            result.push(gf::inverse(i as u8));
        }
    }
    if result.len() != num_errors {
        return Err(QrError::decode("error locator degree does not match number of roots"));
    }
    Ok(result)
}

/// Forney's formula: given the error evaluator polynomial and the error
/// locations, computes the magnitude to XOR into each error position.
fn find_error_magnitudes(omega: &Polynomial, error_locations: &[u8]) -> Vec<u8> {
    let s = error_locations.len();
    let mut result = vec![0u8; s];
    for i in 0..s {
        let xi_inverse = gf::inverse(error_locations[i]);
        let mut denominator = 1u8;
        for j in 0..s {
            if i == j {
                continue;
            }
            let term = gf::multiply(error_locations[j], xi_inverse);
            let term_plus_1 = if term & 1 == 0 { term | 1 } else { term & !1 };
            denominator = gf::multiply(denominator, term_plus_1);
        }
        result[i] = gf::multiply(omega.evaluate(xi_inverse), gf::inverse(denominator));
    }
    result
}

/// Detects and corrects errors in a de-interleaved block, writing the
/// corrected data codewords back into `block.data_codewords`. Returns the
/// number of errors corrected.
pub fn correct_block(block: &mut Block) -> Result<usize> {
    let n_ec = block.error_correction_codewords.len();
    let mut all: Vec<u8> = block.data_codewords.clone();
    all.extend_from_slice(&block.error_correction_codewords);
    let n = all.len();

    let message = Polynomial::new(all.clone());
    let syndromes = calculate_syndromes(&message, n_ec);
    if syndromes.is_zero() {
        return Ok(0);
    }

    let monomial = Polynomial::monomial(n_ec, 1);
    let (sigma, omega) = run_euclidean_algorithm(&monomial, &syndromes, n_ec)?;

    let error_locations = find_error_locations(&sigma)?;
    let error_magnitudes = find_error_magnitudes(&omega, &error_locations);

    let max_correctable = n_ec.saturating_sub(block.p as usize) / 2;
    if error_locations.len() > max_correctable {
        return Err(QrError::decode(format!(
            "too many errors: {} locations found, can correct at most {}",
            error_locations.len(),
            max_correctable
        )));
    }

    let mut corrected = all;
    for i in 0..error_locations.len() {
        let log = gf::log(error_locations[i]) as usize;
        if log >= n {
            return Err(QrError::decode("bad error location"));
        }
        let position = n - 1 - log;
        corrected[position] = gf::add(corrected[position], error_magnitudes[i]);
    }

    let n_data = block.data_codewords.len();
    block.data_codewords = corrected[..n_data].to_vec();
    block.error_correction_codewords = corrected[n_data..].to_vec();

    Ok(error_locations.len())
}

/// Corrects every block, then concatenates their data codewords back into
/// a single message buffer.
pub fn get_message_bytes(blocks: &mut [Block]) -> Result<Vec<u8>> {
    let mut message = Vec::new();
    for block in blocks.iter_mut() {
        correct_block(block)?;
        message.extend_from_slice(&block.data_codewords);
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;

    fn encode(data: &[u8], n_ec: usize) -> Vec<u8> {
        // Builds a systematic RS codeword the way an encoder would: data
        // codewords followed by the remainder of data(x)*x^n_ec divided by
        // the generator polynomial with roots at alpha^0..alpha^(n_ec-1).
        let mut generator = Polynomial::monomial(0, 1);
        for i in 0..n_ec {
            let term = Polynomial::new(vec![1, gf::power(i as i32)]);
            generator = generator.multiply(&term);
        }
        let shifted = {
            let mut coeffs = data.to_vec();
            coeffs.extend(std::iter::repeat(0u8).take(n_ec));
            Polynomial::new(coeffs)
        };
        let (_, remainder) = shifted.divide(&generator).unwrap();
        let mut result = data.to_vec();
        for d in (0..n_ec).rev() {
            result.push(remainder.get(d));
        }
        result
    }

    #[test]
    fn clean_block_needs_no_correction() {
        let data = b"HELLO WORLD".to_vec();
        let n_ec = 10;
        let codewords = encode(&data, n_ec);
        let mut block = Block {
            data_codewords: codewords[..data.len()].to_vec(),
            error_correction_codewords: codewords[data.len()..].to_vec(),
            error_correction_capacity: (n_ec / 2) as u32,
            p: 0,
        };
        let corrected = correct_block(&mut block).unwrap();
        assert_eq!(corrected, 0);
        assert_eq!(block.data_codewords, data);
    }

    #[test]
    fn corrects_a_single_byte_error() {
        let data = b"Twas brillig".to_vec();
        let n_ec = 10;
        let mut codewords = encode(&data, n_ec);
        codewords[3] ^= 0xFF;
        let mut block = Block {
            data_codewords: codewords[..data.len()].to_vec(),
            error_correction_codewords: codewords[data.len()..].to_vec(),
            error_correction_capacity: (n_ec / 2) as u32,
            p: 0,
        };
        let corrected = correct_block(&mut block).unwrap();
        assert_eq!(corrected, 1);
        assert_eq!(block.data_codewords, data);
    }

    #[test]
    fn corrects_multiple_byte_errors_up_to_capacity() {
        let data: Vec<u8> = (0..20).collect();
        let n_ec = 10;
        let mut codewords = encode(&data, n_ec);
        codewords[0] ^= 0x55;
        codewords[5] ^= 0xAA;
        codewords[10] ^= 0x11;
        codewords[15] ^= 0x22;
        codewords[25] ^= 0x33;
        let mut block = Block {
            data_codewords: codewords[..data.len()].to_vec(),
            error_correction_codewords: codewords[data.len()..].to_vec(),
            error_correction_capacity: (n_ec / 2) as u32,
            p: 0,
        };
        let corrected = correct_block(&mut block).unwrap();
        assert_eq!(corrected, 5);
        assert_eq!(block.data_codewords, data);
    }

    #[test]
    fn get_message_bytes_concatenates_corrected_blocks() {
        let data_a = b"ABCDEFGHIJ".to_vec();
        let data_b = b"KLMNOPQRST".to_vec();
        let n_ec = 8;
        let codewords_a = encode(&data_a, n_ec);
        let codewords_b = encode(&data_b, n_ec);
        let mut blocks = vec![
            Block {
                data_codewords: codewords_a[..data_a.len()].to_vec(),
                error_correction_codewords: codewords_a[data_a.len()..].to_vec(),
                error_correction_capacity: (n_ec / 2) as u32,
                p: 0,
            },
            Block {
                data_codewords: codewords_b[..data_b.len()].to_vec(),
                error_correction_codewords: codewords_b[data_b.len()..].to_vec(),
                error_correction_capacity: (n_ec / 2) as u32,
                p: 0,
            },
        ];
        let message = get_message_bytes(&mut blocks).unwrap();
        let mut expected = data_a.clone();
        expected.extend_from_slice(&data_b);
        assert_eq!(message, expected);
    }
}
