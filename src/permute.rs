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

//! Seeded start node and shuffle permutation.
//!
//! All range draws use `u64` bounds rather than `usize`, so a seed yields
//! the same start node and shuffle on 32-bit and 64-bit targets.

use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;

use crate::error::{Error, Result};
use crate::key::Seed;

/// Generator for one channel operation.
///
/// Seeded once on construction and never shared. Draw the start node
/// before the shuffle; replaying a seed depends on that order.
pub struct PermutationEngine {
    random: Xoshiro256StarStar,
}

impl PermutationEngine {
    pub fn new(seed: Seed) -> Self {
        Self {
            random: Xoshiro256StarStar::seed_from_u64(seed.0.into()),
        }
    }

    /// Uniform node in `0..size`.
    pub fn start_node(&mut self, size: usize) -> Result<usize> {
        if size == 0 {
            return Err(Error::InvalidDimensions(
                "cannot pick a start node in an empty grid".into(),
            ));
        }
        Ok(self.random.gen_range(0..size as u64) as usize)
    }

    /// Uniform permutation of `0..size` (Fisher-Yates).
    pub fn shuffle(&mut self, size: usize) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..size).collect();
        for i in (1..size).rev() {
            let j = self.random.gen_range(0..=i as u64) as usize;
            perm.swap(i, j);
        }
        perm
    }
}

/// Checks that `perm` is a bijection on `0..size`.
pub fn check_permutation(perm: &[usize], size: usize, what: &str) -> Result<()> {
    if perm.len() != size {
        return Err(Error::PermutationMismatch(format!(
            "{what} has {} entries, expected {size}",
            perm.len()
        )));
    }

    let mut seen = vec![false; size];
    for &p in perm {
        match seen.get_mut(p) {
            None => {
                return Err(Error::PermutationMismatch(format!(
                    "{what} entry {p} out of range for {size} nodes"
                )))
            }
            Some(true) => {
                return Err(Error::PermutationMismatch(format!(
                    "{what} repeats entry {p}"
                )))
            }
            Some(s) => *s = true,
        }
    }
    Ok(())
}

/// Inverse of a permutation that passed [`check_permutation`].
pub fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (k, &p) in perm.iter().enumerate() {
        inv[p] = k;
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let mut a = PermutationEngine::new(Seed(0xdead_beef));
        let mut b = PermutationEngine::new(Seed(0xdead_beef));
        assert_eq!(a.start_node(1000).unwrap(), b.start_node(1000).unwrap());
        assert_eq!(a.shuffle(1000), b.shuffle(1000));
    }

    #[test]
    fn seed_zero_is_pinned() {
        let mut engine = PermutationEngine::new(Seed(0));
        assert_eq!(engine.start_node(4).unwrap(), 2);
        assert_eq!(engine.shuffle(4), [3, 2, 1, 0]);
    }

    #[test]
    fn different_seeds_differ() {
        let a = PermutationEngine::new(Seed(1)).shuffle(256);
        let b = PermutationEngine::new(Seed(2)).shuffle(256);
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_is_permutation() {
        let mut engine = PermutationEngine::new(Seed(42));
        for size in [0, 1, 2, 17, 4096] {
            let perm = engine.shuffle(size);
            check_permutation(&perm, size, "shuffle").unwrap();
        }
    }

    #[test]
    fn start_node_in_range() {
        let mut engine = PermutationEngine::new(Seed(7));
        assert_eq!(engine.start_node(1).unwrap(), 0);
        for _ in 0..100 {
            assert!(engine.start_node(5).unwrap() < 5);
        }
        assert!(matches!(
            engine.start_node(0),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn inverse_undoes_permutation() {
        let perm = PermutationEngine::new(Seed(9)).shuffle(64);
        let inv = invert(&perm);
        for k in 0..64 {
            assert_eq!(inv[perm[k]], k);
            assert_eq!(perm[inv[k]], k);
        }
    }

    #[test]
    fn malformed_permutations_rejected() {
        for (perm, size) in [
            (vec![0, 1], 3),
            (vec![0, 1, 3], 3),
            (vec![0, 1, 1], 3),
        ] {
            assert!(matches!(
                check_permutation(&perm, size, "order"),
                Err(Error::PermutationMismatch(_))
            ));
        }
        check_permutation(&[2, 0, 1], 3, "order").unwrap();
    }
}
