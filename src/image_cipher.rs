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

use ndarray::parallel::prelude::*;
use ndarray::prelude::*;

use crate::cipher::{decrypt_channel, encrypt_channel, ChannelMetadata};
use crate::error::{Error, Result};
use crate::key::Seed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedImage {
    /// Scrambled pixels, same `(height, width, channels)` shape as the input.
    pub cipher: Array3<u8>,
    /// One entry per channel, in channel order.
    pub channels: Vec<ChannelMetadata>,
}

/// Encrypts every channel (last axis) of `pixels` in parallel.
///
/// All channels share `seed`. If any channel fails the whole image fails
/// and no partial result is returned.
pub fn encrypt_image(pixels: ArrayView3<'_, u8>, seed: Seed) -> Result<EncryptedImage> {
    let count = channel_count(pixels)?;

    let encrypted = (0..count)
        .into_par_iter()
        .map(|c| encrypt_channel(pixels.index_axis(Axis(2), c), seed))
        .collect::<Result<Vec<_>>>()?;

    let mut cipher = Array3::zeros(pixels.raw_dim());
    let mut channels = Vec::with_capacity(count);
    for (c, ch) in encrypted.into_iter().enumerate() {
        cipher.index_axis_mut(Axis(2), c).assign(&ch.cipher);
        channels.push(ch.metadata);
    }

    Ok(EncryptedImage { cipher, channels })
}

/// Reverses [`encrypt_image`]. `metadata` must hold one entry per channel.
pub fn decrypt_image(
    cipher: ArrayView3<'_, u8>,
    metadata: &[ChannelMetadata],
    seed: Seed,
) -> Result<Array3<u8>> {
    let count = channel_count(cipher)?;
    if metadata.len() != count {
        return Err(Error::InvalidDimensions(format!(
            "image has {count} channels, metadata has {}",
            metadata.len()
        )));
    }

    let decrypted = metadata
        .par_iter()
        .enumerate()
        .map(|(c, meta)| decrypt_channel(cipher.index_axis(Axis(2), c), meta, seed))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Array3::zeros(cipher.raw_dim());
    for (c, ch) in decrypted.iter().enumerate() {
        out.index_axis_mut(Axis(2), c).assign(ch);
    }
    Ok(out)
}

fn channel_count(pixels: ArrayView3<'_, u8>) -> Result<usize> {
    match pixels.dim() {
        (_, _, 0) => Err(Error::InvalidDimensions("image has no channels".into())),
        (_, _, c) => Ok(c),
    }
}
