use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Exact fraction used for exposure time, aperture and other EXIF values where float rounding
/// would lose information.
///
/// The stored numerator/denominator are kept as given (only the sign is normalised so the
/// denominator is positive). Equality, ordering and hashing are by value, so `28/10 == 14/5`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RationalParts")]
pub struct Rational {
    num: i64,
    den: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RationalError {
    #[error("rational {num}/0 has a zero denominator")]
    ZeroDenominator { num: i64 },

    #[error("rational {num}/{den} cannot be normalised without overflow")]
    Overflow { num: i64, den: i64 },
}

#[derive(Deserialize)]
struct RationalParts {
    num: i64,
    den: i64,
}

impl TryFrom<RationalParts> for Rational {
    type Error = RationalError;

    fn try_from(parts: RationalParts) -> Result<Self, Self::Error> {
        Rational::new(parts.num, parts.den)
    }
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };

    pub fn new(num: i64, den: i64) -> Result<Self, RationalError> {
        if den == 0 {
            return Err(RationalError::ZeroDenominator { num });
        }
        if den > 0 {
            return Ok(Self { num, den });
        }
        match (num.checked_neg(), den.checked_neg()) {
            (Some(num), Some(den)) => Ok(Self { num, den }),
            _ => Err(RationalError::Overflow { num, den }),
        }
    }

    pub fn from_integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    pub fn numer(&self) -> i64 {
        self.num
    }

    /// Always positive.
    pub fn denom(&self) -> i64 {
        self.den
    }

    /// The same value in lowest terms.
    pub fn reduced(&self) -> Self {
        let g = gcd(self.num.unsigned_abs(), self.den.unsigned_abs());
        // g divides den.
        let g = g as i64;
        Self {
            num: self.num / g,
            den: self.den / g,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Renders in lowest terms: `"1/200"`, or just `"4"` when the denominator reduces to 1.
    pub fn to_fraction_string(&self) -> String {
        let r = self.reduced();
        if r.den == 1 {
            r.num.to_string()
        } else {
            format!("{}/{}", r.num, r.den)
        }
    }

    /// Renders as a decimal with exactly `places` digits after the point, rounding the last
    /// digit half away from zero. A negative value keeps its sign even when it rounds to zero.
    pub fn to_decimal_string(&self, places: usize) -> String {
        let den = self.den.unsigned_abs() as u128;
        let mut rem = self.num.unsigned_abs() as u128;
        let mut int_part = rem / den;
        rem %= den;

        let mut digits = Vec::with_capacity(places);
        for _ in 0..places {
            rem *= 10;
            digits.push((rem / den) as u8);
            rem %= den;
        }

        if rem * 2 >= den {
            let mut carry = true;
            for d in digits.iter_mut().rev() {
                if *d == 9 {
                    *d = 0;
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                int_part += 1;
            }
        }

        let mut out = String::with_capacity(places + 24);
        if self.num < 0 {
            out.push('-');
        }
        out.push_str(&int_part.to_string());
        if places > 0 {
            out.push('.');
            out.extend(digits.iter().map(|d| char::from(b'0' + d)));
        }
        out
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplying preserves order.
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let r = self.reduced();
        r.num.hash(state);
        r.den.hash(state);
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fraction_string())
    }
}
