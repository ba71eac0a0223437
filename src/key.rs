// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Key material: salts, salted password hashing and seed derivation.
//!
//! The seed is only 32 bits wide, so the scrambling keyspace is at most
//! 2^32 regardless of how strong the password or hash is.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

pub const SALT_LEN: usize = 16;

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const KEY_CHECK_LABEL: &[u8] = b"mstshuffle-key-check";

/// Seed driving every pseudo-random choice of one image operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(pub u32);

impl Seed {
    /// Takes the first 4 bytes of `digest` as a big-endian integer.
    pub fn from_digest(digest: &[u8]) -> Result<Self> {
        match digest.get(..4) {
            Some(&[a, b, c, d]) => Ok(Self(u32::from_be_bytes([a, b, c, d]))),
            _ => Err(Error::SeedDerivationFailure {
                needed: 4,
                got: digest.len(),
            }),
        }
    }
}

/// Random salt mixed into the password hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt(pub [u8; SALT_LEN]);

impl Salt {
    pub fn generate() -> Self {
        let mut salt = [0; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self(salt)
    }
}

/// `SHA-256(salt || password)`.
pub fn hash_key_with_salt(password: &str, salt: &Salt) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.0);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Tag stored next to the ciphertext to recognize the right password
/// without storing the hash itself.
pub fn key_check(digest: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(KEY_CHECK_LABEL);
    hasher.update(digest);
    hasher.finalize().into()
}

/// Rejects passwords shorter than 8 characters or missing an uppercase
/// letter, a lowercase letter, a digit or a special character.
pub fn check_password_strength(password: &str) -> Result<()> {
    let rules: [(fn(&str) -> bool, &'static str); 5] = [
        (
            |p: &str| p.chars().count() >= 8,
            "must be at least 8 characters",
        ),
        (
            |p: &str| p.chars().any(|c| c.is_ascii_uppercase()),
            "must contain an uppercase letter",
        ),
        (
            |p: &str| p.chars().any(|c| c.is_ascii_lowercase()),
            "must contain a lowercase letter",
        ),
        (
            |p: &str| p.chars().any(|c| c.is_ascii_digit()),
            "must contain a digit",
        ),
        (
            |p: &str| p.chars().any(|c| SPECIAL_CHARS.contains(c)),
            "must contain a special character",
        ),
    ];

    match rules.iter().find(|(ok, _)| !ok(password)) {
        Some(&(_, reason)) => Err(Error::WeakPassword(reason)),
        None => Ok(()),
    }
}
