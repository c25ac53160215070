#![warn(missing_docs)]

//! This module defines the identifier of a node on the ring.
//!
//! A [NodeId] is a fixed length byte string of [ID_LENGTH] bytes. It is read as a
//! big endian unsigned integer, and it is also a point of the cyclic ring R(P) where
//! P = 2^(8 * ID_LENGTH). Plain comparison ([Ord]) is the integer order, which knows
//! nothing about the ring. Ring aware questions are answered by [NodeId::between]
//! and [NodeId::between_open], and arithmetic (add, sub, neg) is modular.

use std::ops::Add;
use std::ops::Neg;
use std::ops::Sub;
use std::str::FromStr;

use num_bigint::BigUint;
use rand::RngCore;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::consts::ID_BITS;
use crate::consts::ID_LENGTH;
use crate::error::Error;
use crate::error::Result;

/// NodeId is a finite Ring R(P) where P = 2^160, wrap \[u8; 20\].
#[derive(Copy, Clone, Eq, Ord, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
pub struct NodeId([u8; ID_LENGTH]);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "NodeId({})", hex::encode(self.0))
    }
}

impl NodeId {
    /// The all zero id.
    pub const fn zero() -> Self {
        Self([0u8; ID_LENGTH])
    }

    /// Build an id from big endian bytes. Shorter input is left padded with zeros,
    /// so the integer value is kept.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > ID_LENGTH {
            return Err(Error::InvalidNodeIdLength {
                expected: ID_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut inner = [0u8; ID_LENGTH];
        inner[ID_LENGTH - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(inner))
    }

    /// Derive an id by hashing an arbitrary seed with SHA-256.
    /// The leading [ID_LENGTH] bytes of the digest are kept.
    pub fn from_seed(seed: impl AsRef<[u8]>) -> Self {
        let digest = Sha256::digest(seed.as_ref());
        let mut inner = [0u8; ID_LENGTH];
        inner.copy_from_slice(&digest[..ID_LENGTH]);
        Self(inner)
    }

    /// A uniformly random id.
    pub fn random() -> Self {
        let mut inner = [0u8; ID_LENGTH];
        rand::thread_rng().fill_bytes(&mut inner);
        Self(inner)
    }

    /// 2^exp on the ring, `exp` is taken modulo the id bit length.
    pub fn pow2(exp: usize) -> Self {
        (BigUint::from(1u8) << (exp % ID_BITS)).into()
    }

    /// Start of the finger interval `index`, that is `self + 2^index`.
    pub fn finger_start(&self, index: usize) -> Self {
        *self + Self::pow2(index)
    }

    /// Raw bytes, big endian.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }

    /// Returns `true` for the all zero id.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Test self <- (a, b].
    ///
    /// * `a == b` means the whole ring, always true.
    /// * `self == b` is always true, the interval is closed on the right.
    /// * `a < b`: true iff `a < self < b`.
    /// * `a > b`: the interval passes the maximum id and wraps back to zero,
    ///   true iff `self > a` or `self < b`.
    pub fn between(&self, a: Self, b: Self) -> bool {
        if a == b || *self == b {
            return true;
        }
        if a < b {
            a < *self && *self < b
        } else {
            *self > a || *self < b
        }
    }

    /// Test self <- (a, b), the right bound excluded.
    /// With `a == b` this is the whole ring except `a`.
    pub fn between_open(&self, a: Self, b: Self) -> bool {
        *self != b && self.between(a, b)
    }

    /// Clockwise distance from `self` to `other`.
    pub fn distance(&self, other: Self) -> Self {
        other - *self
    }
}

impl From<[u8; ID_LENGTH]> for NodeId {
    fn from(bytes: [u8; ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self::from(BigUint::from(id))
    }
}

impl From<NodeId> for BigUint {
    fn from(id: NodeId) -> BigUint {
        BigUint::from_bytes_be(&id.0)
    }
}

impl From<BigUint> for NodeId {
    fn from(a: BigUint) -> Self {
        let reduced = a % ring_size();
        let bytes = reduced.to_bytes_be();
        let mut inner = [0u8; ID_LENGTH];
        inner[ID_LENGTH - bytes.len()..].copy_from_slice(&bytes);
        Self(inner)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    /// Parse a hex string of exactly `2 * ID_LENGTH` digits, `0x` prefix allowed.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut inner = [0u8; ID_LENGTH];
        hex::decode_to_slice(s, &mut inner)?;
        Ok(Self(inner))
    }
}

fn ring_size() -> BigUint {
    BigUint::from(1u8) << ID_BITS
}

// impl finite ring for NodeId
impl Neg for NodeId {
    type Output = Self;
    fn neg(self) -> Self {
        (ring_size() - BigUint::from(self)).into()
    }
}

impl Add for NodeId {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        (BigUint::from(self) + BigUint::from(rhs)).into()
    }
}

impl Sub for NodeId {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}
