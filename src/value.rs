use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use std::fmt;

/// A script value: a plain byte string.
///
/// Text and integers share this representation. Integers are stored as a
/// big-endian unsigned magnitude with no leading zero bytes, so zero is the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Var(Vec<u8>);

impl Var {
    pub fn new(bytes: Vec<u8>) -> Self {
        Var(bytes)
    }

    pub fn empty() -> Self {
        Var(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy UTF-8 view, used wherever a value names a function or variable.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    pub fn is_truthy(&self) -> bool {
        !(self.0.is_empty() || self.0 == b"false")
    }

    pub fn from_uint(value: &BigUint) -> Self {
        if value.is_zero() {
            Var::empty()
        } else {
            Var(value.to_bytes_be())
        }
    }

    /// Encodes the magnitude; the sign is dropped.
    pub fn from_int(value: &BigInt) -> Self {
        Var::from_uint(value.magnitude())
    }

    pub fn to_uint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    pub fn from_bool(value: bool) -> Self {
        Var::from(if value { "true" } else { "false" })
    }
}

/// Falsy means absent, empty, or exactly `false`.
pub fn is_truthy(value: Option<&Var>) -> bool {
    value.is_some_and(Var::is_truthy)
}

impl From<&str> for Var {
    fn from(text: &str) -> Self {
        Var(text.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Var {
    fn from(bytes: Vec<u8>) -> Self {
        Var(bytes)
    }
}

impl From<&[u8]> for Var {
    fn from(bytes: &[u8]) -> Self {
        Var(bytes.to_vec())
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
