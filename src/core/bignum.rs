use std::cmp::Ordering;
use std::fmt;

/// universal compile time numeric value: sign + magnitude integer or f64
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BigNum {
    Int { negative: bool, magnitude: u64 },
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BigNumError {
    Overflow,
    DivByZero,
}

impl BigNum {
    pub fn from_unsigned(x: u64) -> Self {
        BigNum::Int {
            negative: false,
            magnitude: x,
        }
    }

    pub fn from_signed(x: i64) -> Self {
        if x < 0 {
            BigNum::Int {
                negative: true,
                magnitude: x.unsigned_abs(),
            }
        } else {
            BigNum::Int {
                negative: false,
                magnitude: x as u64,
            }
        }
    }

    pub fn from_float(x: f64) -> Self {
        BigNum::Float(x)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, BigNum::Int { .. })
    }

    pub fn is_float(&self) -> bool {
        matches!(self, BigNum::Float(_))
    }

    pub fn is_negative(&self) -> bool {
        match *self {
            BigNum::Int { negative, magnitude } => negative && magnitude != 0,
            BigNum::Float(f) => f < 0.0,
        }
    }

    /// magnitude of an integer value; meaningless for floats
    pub fn unsigned_value(&self) -> u64 {
        match *self {
            BigNum::Int { magnitude, .. } => magnitude,
            BigNum::Float(f) => f as u64,
        }
    }

    pub fn as_float(&self) -> f64 {
        match *self {
            BigNum::Int { negative, magnitude } => {
                let f = magnitude as f64;
                if negative {
                    -f
                } else {
                    f
                }
            }
            BigNum::Float(f) => f,
        }
    }

    pub fn negated(&self) -> BigNum {
        match *self {
            BigNum::Int { negative, magnitude } => BigNum::Int {
                negative: !negative && magnitude != 0,
                magnitude,
            },
            BigNum::Float(f) => BigNum::Float(-f),
        }
    }

    /// whether an integer value is representable in an integer of the given
    /// width and signedness
    pub fn fits_in_bits(&self, bits: u32, is_signed: bool) -> bool {
        let (negative, magnitude) = match *self {
            BigNum::Int { negative, magnitude } => (negative && magnitude != 0, magnitude),
            // float values never land here; callers check the kind first
            BigNum::Float(_) => return false,
        };
        if is_signed {
            let max = if bits >= 64 {
                i64::MAX as u64
            } else {
                (1u64 << (bits - 1)) - 1
            };
            if negative {
                magnitude <= max + 1
            } else {
                magnitude <= max
            }
        } else {
            if negative {
                return false;
            }
            if bits >= 64 {
                true
            } else {
                magnitude < (1u64 << bits)
            }
        }
    }

    fn int_parts(&self) -> (bool, u64) {
        match *self {
            BigNum::Int { negative, magnitude } => (negative && magnitude != 0, magnitude),
            BigNum::Float(_) => (false, 0),
        }
    }

    pub fn add(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        if a.is_float() || b.is_float() {
            return Ok(BigNum::Float(a.as_float() + b.as_float()));
        }
        let (an, am) = a.int_parts();
        let (bn, bm) = b.int_parts();
        if an == bn {
            let mag = am.checked_add(bm).ok_or(BigNumError::Overflow)?;
            Ok(BigNum::Int {
                negative: an && mag != 0,
                magnitude: mag,
            })
        } else if am >= bm {
            Ok(BigNum::Int {
                negative: an && am != bm,
                magnitude: am - bm,
            })
        } else {
            Ok(BigNum::Int {
                negative: bn,
                magnitude: bm - am,
            })
        }
    }

    pub fn sub(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        BigNum::add(a, &b.negated())
    }

    pub fn mul(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        if a.is_float() || b.is_float() {
            return Ok(BigNum::Float(a.as_float() * b.as_float()));
        }
        let (an, am) = a.int_parts();
        let (bn, bm) = b.int_parts();
        let mag = am.checked_mul(bm).ok_or(BigNumError::Overflow)?;
        Ok(BigNum::Int {
            negative: (an != bn) && mag != 0,
            magnitude: mag,
        })
    }

    pub fn div(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        if a.is_float() || b.is_float() {
            let divisor = b.as_float();
            if divisor == 0.0 {
                return Err(BigNumError::DivByZero);
            }
            return Ok(BigNum::Float(a.as_float() / divisor));
        }
        let (an, am) = a.int_parts();
        let (bn, bm) = b.int_parts();
        if bm == 0 {
            return Err(BigNumError::DivByZero);
        }
        let mag = am / bm;
        Ok(BigNum::Int {
            negative: (an != bn) && mag != 0,
            magnitude: mag,
        })
    }

    pub fn rem(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        if a.is_float() || b.is_float() {
            let divisor = b.as_float();
            if divisor == 0.0 {
                return Err(BigNumError::DivByZero);
            }
            return Ok(BigNum::Float(a.as_float() % divisor));
        }
        let (an, am) = a.int_parts();
        let (_, bm) = b.int_parts();
        if bm == 0 {
            return Err(BigNumError::DivByZero);
        }
        let mag = am % bm;
        Ok(BigNum::Int {
            negative: an && mag != 0,
            magnitude: mag,
        })
    }

    fn bit_op(
        a: &BigNum,
        b: &BigNum,
        f: fn(u64, u64) -> u64,
    ) -> Result<BigNum, BigNumError> {
        // bitwise ops on negative or float values have no defined result
        match (a, b) {
            (
                BigNum::Int {
                    negative: false,
                    magnitude: am,
                },
                BigNum::Int {
                    negative: false,
                    magnitude: bm,
                },
            ) => Ok(BigNum::from_unsigned(f(*am, *bm))),
            _ => Err(BigNumError::Overflow),
        }
    }

    pub fn bit_or(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        BigNum::bit_op(a, b, |x, y| x | y)
    }

    pub fn bit_and(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        BigNum::bit_op(a, b, |x, y| x & y)
    }

    pub fn bit_xor(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        BigNum::bit_op(a, b, |x, y| x ^ y)
    }

    pub fn shl(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        match (a, b) {
            (
                BigNum::Int {
                    negative: false,
                    magnitude: am,
                },
                BigNum::Int {
                    negative: false,
                    magnitude: bm,
                },
            ) => {
                if *bm >= 64 {
                    return Err(BigNumError::Overflow);
                }
                let shifted = am.checked_shl(*bm as u32).ok_or(BigNumError::Overflow)?;
                // a set bit shifted off the top loses data
                if (shifted >> *bm as u32) != *am {
                    return Err(BigNumError::Overflow);
                }
                Ok(BigNum::from_unsigned(shifted))
            }
            _ => Err(BigNumError::Overflow),
        }
    }

    pub fn shr(a: &BigNum, b: &BigNum) -> Result<BigNum, BigNumError> {
        match (a, b) {
            (
                BigNum::Int {
                    negative: false,
                    magnitude: am,
                },
                BigNum::Int {
                    negative: false,
                    magnitude: bm,
                },
            ) => {
                if *bm >= 64 {
                    return Ok(BigNum::from_unsigned(0));
                }
                Ok(BigNum::from_unsigned(am >> *bm as u32))
            }
            _ => Err(BigNumError::Overflow),
        }
    }

    pub fn compare(a: &BigNum, b: &BigNum) -> Ordering {
        if a.is_float() || b.is_float() {
            let af = a.as_float();
            let bf = b.as_float();
            return af.partial_cmp(&bf).unwrap_or(Ordering::Equal);
        }
        let (an, am) = a.int_parts();
        let (bn, bm) = b.int_parts();
        match (an, bn) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => am.cmp(&bm),
            (true, true) => bm.cmp(&am),
        }
    }

    pub fn cmp_eq(a: &BigNum, b: &BigNum) -> bool {
        BigNum::compare(a, b) == Ordering::Equal
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BigNum::Int { negative, magnitude } => {
                if negative && magnitude != 0 {
                    write!(f, "-{}", magnitude)
                } else {
                    write!(f, "{}", magnitude)
                }
            }
            BigNum::Float(x) => write!(f, "{}", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_mixed_signs() {
        let a = BigNum::from_signed(-3);
        let b = BigNum::from_unsigned(10);
        assert_eq!(BigNum::add(&a, &b).unwrap(), BigNum::from_unsigned(7));
        assert_eq!(BigNum::add(&b, &a).unwrap(), BigNum::from_unsigned(7));
        assert_eq!(BigNum::add(&a, &a).unwrap(), BigNum::from_signed(-6));
    }

    #[test]
    fn test_add_overflow() {
        let a = BigNum::from_unsigned(u64::MAX);
        let b = BigNum::from_unsigned(1);
        assert_eq!(BigNum::add(&a, &b), Err(BigNumError::Overflow));
    }

    #[test]
    fn test_sub_to_zero_is_not_negative() {
        let a = BigNum::from_signed(-5);
        let b = BigNum::from_signed(-5);
        let r = BigNum::sub(&a, &b).unwrap();
        assert!(!r.is_negative());
        assert_eq!(r, BigNum::from_unsigned(0));
    }

    #[test]
    fn test_mul_signs() {
        let a = BigNum::from_signed(-4);
        let b = BigNum::from_unsigned(3);
        assert_eq!(BigNum::mul(&a, &b).unwrap(), BigNum::from_signed(-12));
        assert_eq!(BigNum::mul(&a, &a).unwrap(), BigNum::from_unsigned(16));
    }

    #[test]
    fn test_div_by_zero() {
        let a = BigNum::from_unsigned(1);
        let z = BigNum::from_unsigned(0);
        assert_eq!(BigNum::div(&a, &z), Err(BigNumError::DivByZero));
        assert_eq!(
            BigNum::div(&a, &BigNum::from_float(0.0)),
            Err(BigNumError::DivByZero)
        );
    }

    #[test]
    fn test_float_contagion() {
        let a = BigNum::from_unsigned(1);
        let b = BigNum::from_float(0.5);
        assert_eq!(BigNum::add(&a, &b).unwrap(), BigNum::from_float(1.5));
    }

    #[test]
    fn test_fits_in_bits() {
        assert!(BigNum::from_unsigned(255).fits_in_bits(8, false));
        assert!(!BigNum::from_unsigned(256).fits_in_bits(8, false));
        assert!(BigNum::from_unsigned(127).fits_in_bits(8, true));
        assert!(!BigNum::from_unsigned(128).fits_in_bits(8, true));
        assert!(BigNum::from_signed(-128).fits_in_bits(8, true));
        assert!(!BigNum::from_signed(-129).fits_in_bits(8, true));
        assert!(!BigNum::from_signed(-1).fits_in_bits(32, false));
        assert!(BigNum::from_unsigned(u64::MAX).fits_in_bits(64, false));
        assert!(!BigNum::from_unsigned(u64::MAX).fits_in_bits(64, true));
    }

    #[test]
    fn test_shl_overflow() {
        let a = BigNum::from_unsigned(1);
        let b = BigNum::from_unsigned(63);
        assert!(BigNum::shl(&a, &b).is_ok());
        assert_eq!(
            BigNum::shl(&BigNum::from_unsigned(2), &b),
            Err(BigNumError::Overflow)
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            BigNum::compare(&BigNum::from_signed(-2), &BigNum::from_unsigned(1)),
            Ordering::Less
        );
        assert_eq!(
            BigNum::compare(&BigNum::from_signed(-2), &BigNum::from_signed(-3)),
            Ordering::Greater
        );
        assert!(BigNum::cmp_eq(
            &BigNum::from_unsigned(2),
            &BigNum::from_float(2.0)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(BigNum::from_signed(-42).to_string(), "-42");
        assert_eq!(BigNum::from_unsigned(300).to_string(), "300");
    }
}
