//! CPF value object and check-digit algorithm.

use super::errors::CpfError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of digits in a CPF, check digits included.
pub const CPF_LEN: usize = 11;

/// Weighted sum of `digits`, with weights counting down from `weight_start`.
fn weighted_sum(digits: &[u8], weight_start: u32) -> u32 {
    digits
        .iter()
        .zip((2..=weight_start).rev())
        .map(|(&d, weight)| u32::from(d) * weight)
        .sum()
}

/// Compute one check digit over `digits`.
///
/// The first check digit uses the nine body digits with `weight_start = 10`;
/// the second uses the body plus the first check digit with `weight_start = 11`.
pub fn check_digit(digits: &[u8], weight_start: u32) -> u8 {
    match weighted_sum(digits, weight_start) % 11 {
        0 | 1 => 0,
        rest => (11 - rest) as u8,
    }
}

/// Whether both check digits of `digits` match its body.
///
/// Sequences of a single repeated digit satisfy the arithmetic but are not
/// issued, so they are rejected as well.
pub fn is_valid_cpf(digits: &[u8; CPF_LEN]) -> bool {
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    check_digit(&digits[..9], 10) == digits[9] && check_digit(&digits[..10], 11) == digits[10]
}

/// Strip `.` and `-` and read exactly 11 ASCII digits.
fn parse_digits(text: &str) -> Option<[u8; CPF_LEN]> {
    let mut digits = [0u8; CPF_LEN];
    let mut count = 0;

    for c in text.chars().filter(|&c| c != '.' && c != '-') {
        let d = c.to_digit(10)?;
        if count == CPF_LEN {
            return None;
        }
        digits[count] = d as u8;
        count += 1;
    }

    (count == CPF_LEN).then_some(digits)
}

/// Validate a CPF given as text.
///
/// Punctuation is optional: `"529.982.247-25"` and `"52998224725"` are both
/// accepted.
///
/// # Errors
///
/// - `CpfError::Format` if the text is not 11 digits after stripping `.` and `-`
/// - `CpfError::Checksum` if the check digits do not match
pub fn validate_cpf(text: &str) -> Result<(), CpfError> {
    Cpf::parse(text).map(|_| ())
}

/// A validated CPF.
///
/// Always displayed and serialized in the canonical `ddd.ddd.ddd-dd` form.
///
/// # Example
///
/// ```
/// use cadastro::domain::Cpf;
///
/// let cpf = Cpf::parse("52998224725").unwrap();
/// assert_eq!(cpf.to_string(), "529.982.247-25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cpf([u8; CPF_LEN]);

impl Cpf {
    /// Parse and validate a CPF.
    pub fn parse(text: &str) -> Result<Self, CpfError> {
        let digits = parse_digits(text).ok_or_else(|| CpfError::Format(text.to_string()))?;
        if !is_valid_cpf(&digits) {
            return Err(CpfError::Checksum(text.to_string()));
        }
        Ok(Self(digits))
    }

    /// Build a CPF from its nine body digits, computing both check digits.
    ///
    /// Returns `None` if any entry is not a decimal digit or the result is a
    /// repeated-digit sequence.
    pub fn from_base(base: &[u8; 9]) -> Option<Self> {
        if base.iter().any(|&d| d > 9) {
            return None;
        }
        let mut digits = [0u8; CPF_LEN];
        digits[..9].copy_from_slice(base);
        digits[9] = check_digit(&digits[..9], 10);
        digits[10] = check_digit(&digits[..10], 11);
        is_valid_cpf(&digits).then_some(Self(digits))
    }

    pub fn digits(&self) -> &[u8; CPF_LEN] {
        &self.0
    }

    /// The 11 digits without punctuation.
    pub fn digits_only(&self) -> String {
        self.0.iter().map(|d| char::from(b'0' + d)).collect()
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.digits_only();
        write!(f, "{}.{}.{}-{}", &s[0..3], &s[3..6], &s[6..9], &s[9..11])
    }
}

impl Serialize for Cpf {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cpf::parse(&s).map_err(serde::de::Error::custom)
    }
}
