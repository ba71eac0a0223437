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

use log::debug;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, Error, Result};
use crate::graph::grid_edges;
use crate::key::Seed;
use crate::mst::spanning_tree;
use crate::permute::{check_permutation, invert, PermutationEngine};
use crate::traverse::dfs_order;

/// Everything besides the seed needed to decrypt one channel.
///
/// Not secret, but must be stored verbatim with the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    /// Traversal order of grid positions.
    pub order: Vec<usize>,
    /// Shuffle applied to values gathered in traversal order.
    pub shuffle: Vec<usize>,
    pub start_node: usize,
    pub rows: usize,
    pub cols: usize,
}

impl ChannelMetadata {
    /// Number of grid cells, or an error if `rows * cols` overflows.
    pub fn size(&self) -> Result<usize> {
        self.rows.checked_mul(self.cols).ok_or_else(|| {
            Error::InvalidDimensions(format!("{}x{} grid is too large", self.rows, self.cols))
        })
    }

    fn validate(&self) -> Result<()> {
        check_dimensions(self.rows, self.cols)?;
        let size = self.size()?;
        check_permutation(&self.order, size, "order")?;
        check_permutation(&self.shuffle, size, "shuffle")?;
        if self.start_node >= size {
            return Err(Error::PermutationMismatch(format!(
                "start node {} out of range for {size} nodes",
                self.start_node
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedChannel {
    pub cipher: Array2<u8>,
    pub metadata: ChannelMetadata,
}

/// Scrambles one channel.
///
/// Values are gathered along a depth-first walk of the channel's minimum
/// spanning tree, shuffled, and scattered back along the same walk. The
/// output holds exactly the input's values in a different arrangement.
pub fn encrypt_channel(channel: ArrayView2<'_, u8>, seed: Seed) -> Result<EncryptedChannel> {
    let (rows, cols) = channel.dim();
    let size = rows * cols;

    let tree = spanning_tree(grid_edges(channel)?, size)?;
    debug_assert_eq!(tree.edge_count(), size - 1);

    let mut engine = PermutationEngine::new(seed);
    let start_node = engine.start_node(size)?;
    let shuffle = engine.shuffle(size);
    let order = dfs_order(&tree, start_node)?;
    debug!("encrypting {rows}x{cols} channel from node {start_node}");

    let flat: Vec<u8> = channel.iter().copied().collect();
    let mut out = vec![0u8; size];
    for (&dst, &src) in order.iter().zip(&shuffle) {
        out[dst] = flat[order[src]];
    }

    let cipher = Array2::from_shape_vec((rows, cols), out)
        .map_err(|e| Error::InvalidDimensions(e.to_string()))?;
    Ok(EncryptedChannel {
        cipher,
        metadata: ChannelMetadata {
            order,
            shuffle,
            start_node,
            rows,
            cols,
        },
    })
}

/// Restores a channel scrambled by [`encrypt_channel`].
///
/// The cipher shape must match the metadata's `rows` and `cols`
/// ([`Error::InvalidDimensions`]). Metadata is then validated before any
/// work: a short, out-of-range or repeating `order` or `shuffle` is
/// rejected with [`Error::PermutationMismatch`]. The seed is not consulted, since the
/// metadata already carries every draw made at encryption.
pub fn decrypt_channel(
    cipher: ArrayView2<'_, u8>,
    metadata: &ChannelMetadata,
    _seed: Seed,
) -> Result<Array2<u8>> {
    if cipher.dim() != (metadata.rows, metadata.cols) {
        return Err(Error::InvalidDimensions(format!(
            "cipher is {:?}, metadata says {}x{}",
            cipher.dim(),
            metadata.rows,
            metadata.cols
        )));
    }
    metadata.validate()?;
    debug!(
        "decrypting {}x{} channel from node {}",
        metadata.rows, metadata.cols, metadata.start_node
    );

    Ok(unscramble(cipher, &metadata.order, &metadata.shuffle))
}

fn unscramble(cipher: ArrayView2<'_, u8>, order: &[usize], shuffle: &[usize]) -> Array2<u8> {
    let flat: Vec<u8> = cipher.iter().copied().collect();
    let inverse = invert(shuffle);
    let mut out = Array2::zeros(cipher.raw_dim());
    let slots = out
        .as_slice_mut()
        .expect("freshly allocated array is standard-layout");
    for (&dst, &src) in order.iter().zip(&inverse) {
        slots[dst] = flat[order[src]];
    }
    out
}

/// Regenerates `(start_node, shuffle)` for a grid of `size` cells.
///
/// Reproduces what [`encrypt_channel`] drew only while the generator and
/// its sampling stay unchanged between builds.
pub fn replay_shuffle(seed: Seed, size: usize) -> Result<(usize, Vec<usize>)> {
    let mut engine = PermutationEngine::new(seed);
    let start_node = engine.start_node(size)?;
    Ok((start_node, engine.shuffle(size)))
}

/// Decrypts with only the traversal order stored, re-deriving the shuffle
/// from the seed.
#[deprecated(note = "depends on generator replay; store the shuffle and use `decrypt_channel`")]
pub fn decrypt_channel_replayed(
    cipher: ArrayView2<'_, u8>,
    order: &[usize],
    seed: Seed,
) -> Result<Array2<u8>> {
    let (rows, cols) = cipher.dim();
    check_dimensions(rows, cols)?;
    let (start_node, shuffle) = replay_shuffle(seed, rows * cols)?;
    let metadata = ChannelMetadata {
        order: order.to_vec(),
        shuffle,
        start_node,
        rows,
        cols,
    };
    decrypt_channel(cipher, &metadata, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(rows: usize, cols: usize) -> Array2<u8> {
        Array2::from_shape_fn((rows, cols), |(i, j)| ((i * 7 + j * 13) % 256) as u8)
    }

    #[test]
    fn round_trip() {
        let ch = gradient(17, 23);
        let enc = encrypt_channel(ch.view(), Seed(12345)).unwrap();
        assert_ne!(enc.cipher, ch);
        let dec = decrypt_channel(enc.cipher.view(), &enc.metadata, Seed(12345)).unwrap();
        assert_eq!(dec, ch);
    }

    #[test]
    fn single_pixel_is_identity() {
        let ch = array![[200u8]];
        let enc = encrypt_channel(ch.view(), Seed(1)).unwrap();
        assert_eq!(enc.cipher, ch);
        assert_eq!(enc.metadata.order, [0]);
        assert_eq!(enc.metadata.shuffle, [0]);
        assert_eq!(enc.metadata.start_node, 0);
        let dec = decrypt_channel(enc.cipher.view(), &enc.metadata, Seed(1)).unwrap();
        assert_eq!(dec, ch);
    }

    #[test]
    fn values_are_preserved() {
        let ch = gradient(31, 8);
        let enc = encrypt_channel(ch.view(), Seed(99)).unwrap();
        let mut a: Vec<_> = ch.iter().copied().collect();
        let mut b: Vec<_> = enc.cipher.iter().copied().collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn deterministic() {
        let ch = gradient(12, 12);
        let a = encrypt_channel(ch.view(), Seed(5)).unwrap();
        let b = encrypt_channel(ch.view(), Seed(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_changes_cipher() {
        let ch = gradient(16, 16);
        let a = encrypt_channel(ch.view(), Seed(5)).unwrap();
        let b = encrypt_channel(ch.view(), Seed(6)).unwrap();
        assert_ne!(a.cipher, b.cipher);
    }

    #[test]
    fn encrypt_follows_order_and_shuffle() {
        let ch = array![[5u8, 5], [5, 6]];
        let enc = encrypt_channel(ch.view(), Seed(3)).unwrap();
        let flat: Vec<u8> = ch.iter().copied().collect();
        let m = &enc.metadata;
        let out = enc.cipher.as_slice().unwrap();
        for k in 0..4 {
            assert_eq!(out[m.order[k]], flat[m.order[m.shuffle[k]]]);
        }
    }

    #[test]
    fn wrong_order_length_rejected() {
        let ch = gradient(4, 4);
        let mut enc = encrypt_channel(ch.view(), Seed(8)).unwrap();
        enc.metadata.order.pop();
        assert!(matches!(
            decrypt_channel(enc.cipher.view(), &enc.metadata, Seed(8)),
            Err(Error::PermutationMismatch(_))
        ));
    }

    #[test]
    fn repeated_shuffle_entry_rejected() {
        let ch = gradient(4, 4);
        let mut enc = encrypt_channel(ch.view(), Seed(8)).unwrap();
        enc.metadata.shuffle[0] = enc.metadata.shuffle[1];
        assert!(matches!(
            decrypt_channel(enc.cipher.view(), &enc.metadata, Seed(8)),
            Err(Error::PermutationMismatch(_))
        ));
    }

    #[test]
    fn start_node_out_of_range_rejected() {
        let ch = gradient(3, 3);
        let mut enc = encrypt_channel(ch.view(), Seed(8)).unwrap();
        enc.metadata.start_node = 9;
        assert!(matches!(
            decrypt_channel(enc.cipher.view(), &enc.metadata, Seed(8)),
            Err(Error::PermutationMismatch(_))
        ));
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let ch = gradient(4, 6);
        let enc = encrypt_channel(ch.view(), Seed(8)).unwrap();
        let other = gradient(6, 4);
        assert!(matches!(
            decrypt_channel(other.view(), &enc.metadata, Seed(8)),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn oversized_metadata_rejected() {
        let huge = 1usize << (usize::BITS / 2);
        let metadata = ChannelMetadata {
            order: vec![],
            shuffle: vec![],
            start_node: 0,
            rows: huge,
            cols: huge,
        };
        assert!(matches!(metadata.size(), Err(Error::InvalidDimensions(_))));
        assert!(matches!(
            metadata.validate(),
            Err(Error::InvalidDimensions(_))
        ));

        let cipher = Array2::<u8>::zeros((2, 2));
        assert!(matches!(
            decrypt_channel(cipher.view(), &metadata, Seed(0)),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn shape_checked_before_metadata() {
        let ch = gradient(3, 3);
        let mut enc = encrypt_channel(ch.view(), Seed(8)).unwrap();
        enc.metadata.order.clear();
        let other = gradient(2, 2);
        assert!(matches!(
            decrypt_channel(other.view(), &enc.metadata, Seed(8)),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn empty_channel_rejected() {
        let ch = Array2::<u8>::zeros((3, 0));
        assert!(matches!(
            encrypt_channel(ch.view(), Seed(0)),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn replay_matches_stored_draws() {
        let ch = gradient(9, 11);
        let enc = encrypt_channel(ch.view(), Seed(77)).unwrap();
        let (start, shuffle) = replay_shuffle(Seed(77), 99).unwrap();
        assert_eq!(start, enc.metadata.start_node);
        assert_eq!(shuffle, enc.metadata.shuffle);

        #[allow(deprecated)]
        let dec = decrypt_channel_replayed(enc.cipher.view(), &enc.metadata.order, Seed(77));
        assert_eq!(dec.unwrap(), ch);
    }

    #[test]
    fn metadata_serializes() {
        let ch = gradient(3, 5);
        let enc = encrypt_channel(ch.view(), Seed(4)).unwrap();
        let json = serde_json::to_string(&enc.metadata).unwrap();
        let back: ChannelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, enc.metadata);
    }
}
