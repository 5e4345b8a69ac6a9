//! Polynomials over GF(2^8), coefficients stored highest-degree-first in a
//! fixed-capacity slot array. The *logical* degree is a function of the
//! contents (the highest index holding a non-zero coefficient), not of the
//! slot count, so a polynomial may carry leading zero slots with no effect
//! on its value or on equality.

use crate::gf;

#[derive(Debug, Clone)]
pub struct Polynomial {
    // coefficients[0] is the highest-degree slot.
    coefficients: Vec<u8>,
}

impl Polynomial {
    /// Builds a polynomial from coefficients given highest-degree-first.
    pub fn new(coefficients: Vec<u8>) -> Polynomial {
        assert!(!coefficients.is_empty());
        Polynomial { coefficients }
    }

    pub fn zero(capacity: usize) -> Polynomial {
        Polynomial {
            coefficients: vec![0u8; capacity.max(1)],
        }
    }

    pub fn monomial(degree: usize, coefficient: u8) -> Polynomial {
        if coefficient == 0 {
            return Polynomial::zero(1);
        }
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = coefficient;
        Polynomial { coefficients }
    }

    pub fn capacity(&self) -> usize {
        self.coefficients.len()
    }

    pub fn get(&self, degree: usize) -> u8 {
        if degree >= self.coefficients.len() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn set(&mut self, degree: usize, value: u8) {
        if degree >= self.coefficients.len() {
            // grow on the high-degree end to accommodate.
            let mut grown = vec![0u8; degree + 1];
            let old_len = self.coefficients.len();
            grown[(degree + 1 - old_len)..].copy_from_slice(&self.coefficients);
            self.coefficients = grown;
        }
        let len = self.coefficients.len();
        self.coefficients[len - 1 - degree] = value;
    }

    pub fn degree(&self) -> usize {
        for (i, &c) in self.coefficients.iter().enumerate() {
            if c != 0 {
                return self.coefficients.len() - 1 - i;
            }
        }
        0
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0)
    }

    pub fn leading_coefficient(&self) -> u8 {
        self.get(self.degree())
    }

    /// Evaluates the polynomial at x using Horner's method.
    pub fn evaluate(&self, x: u8) -> u8 {
        let mut result = 0u8;
        for &c in &self.coefficients {
            result = gf::add(gf::multiply(result, x), c);
        }
        result
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        let mut result = vec![0u8; len];
        for d in 0..len {
            result[len - 1 - d] = gf::add(self.get(d), other.get(d));
        }
        Polynomial { coefficients: result }
    }

    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero(1);
        }
        let da = self.degree();
        let db = other.degree();
        let len = da + db + 1;
        let mut result = vec![0u8; len];
        for i in 0..=da {
            let ai = self.get(i);
            if ai == 0 {
                continue;
            }
            for j in 0..=db {
                let bj = other.get(j);
                if bj == 0 {
                    continue;
                }
                let d = i + j;
                let idx = len - 1 - d;
                result[idx] = gf::add(result[idx], gf::multiply(ai, bj));
            }
        }
        Polynomial { coefficients: result }
    }

    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> Polynomial {
        self.multiply(&Polynomial::monomial(degree, coefficient))
    }

    pub fn scalar_multiply(&self, scalar: u8) -> Polynomial {
        let coefficients = self.coefficients.iter().map(|&c| gf::multiply(c, scalar)).collect();
        Polynomial { coefficients }
    }

    /// Extended synthetic division: self = quotient * divisor + remainder.
    /// Returns an error if dividing by the zero polynomial.
    pub fn divide(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial), String> {
        if divisor.is_zero() {
            return Err("division by zero polynomial".to_string());
        }

        let mut remainder = self.clone();
        let mut quotient = Polynomial::zero(self.degree().max(1));
        let db = divisor.degree();
        let dlead_inv = gf::inverse(divisor.leading_coefficient());

        while !remainder.is_zero() && remainder.degree() >= db {
            let dr = remainder.degree();
            let coeff = gf::multiply(remainder.leading_coefficient(), dlead_inv);
            let shift = dr - db;
            quotient.set(shift, coeff);
            let term = divisor.multiply_by_monomial(shift, coeff);
            remainder = remainder.add(&term);
        }

        Ok((quotient, remainder))
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Polynomial) -> bool {
        let max_degree = self.degree().max(other.degree());
        (0..=max_degree).all(|d| self.get(d) == other.get(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_of_zero_is_zero() {
        assert_eq!(Polynomial::new(vec![0, 0, 0]).degree(), 0);
    }

    #[test]
    fn get_and_set_coefficient() {
        let mut p = Polynomial::new(vec![5, 0, 3]);
        assert_eq!(p.get(2), 5);
        assert_eq!(p.get(0), 3);
        p.set(0, 9);
        assert_eq!(p.get(0), 9);
    }

    #[test]
    fn equal_ignores_leading_zero_padding() {
        let a = Polynomial::new(vec![0, 0, 5, 3]);
        let b = Polynomial::new(vec![5, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn add_polynomials() {
        let a = Polynomial::new(vec![1, 2, 3]);
        let b = Polynomial::new(vec![0, 5, 6]);
        let sum = a.add(&b);
        assert_eq!(sum.get(2), 1);
        assert_eq!(sum.get(1), gf::add(2, 5));
        assert_eq!(sum.get(0), gf::add(3, 6));
    }

    #[test]
    fn multiply_distributes_over_addition() {
        let a = Polynomial::new(vec![1, 2, 3]);
        let x_plus_one = Polynomial::new(vec![1, 1]);
        let lhs = a.multiply_by_monomial(1, 1).add(&a);
        let rhs = a.multiply(&x_plus_one);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn divide_exact() {
        let a = Polynomial::new(vec![1, 2, 3]);
        let x_plus_one = Polynomial::new(vec![1, 1]);
        let product = a.multiply(&x_plus_one);
        let (q, r) = product.divide(&x_plus_one).unwrap();
        assert_eq!(q, a);
        assert!(r.is_zero());
    }

    #[test]
    fn divide_with_remainder() {
        let a = Polynomial::new(vec![1, 2, 3]);
        let x_plus_one = Polynomial::new(vec![1, 1]);
        let product = a.multiply(&x_plus_one).add(&Polynomial::new(vec![1]));
        let (q, r) = product.divide(&x_plus_one).unwrap();
        assert_eq!(q, a);
        assert_eq!(r, Polynomial::new(vec![1]));
    }
}
