//! Library to reversibly scramble image channels.
//!
//! Each channel is turned into a grid graph weighted by the intensity
//! difference of neighboring pixels. The graph's minimum spanning tree
//! is walked depth-first from a seeded start node, and the values met
//! along the walk are shuffled and written back along the same walk.
//! The result:
//!
//! * Holds exactly the same pixel values, in a different arrangement.
//! * Can be restored exactly with the same [`ChannelMetadata`].
//! * Is reproducible: the same channel and [`Seed`] give the same output.
//!
//! The seed is 32 bits, which caps the keyspace at 2^32 no matter how
//! strong the password it was derived from.
//!
//! Start with [`encrypt_channel`]/[`decrypt_channel`], or
//! [`encrypt_image`]/[`decrypt_image`] for multi-channel images.

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

mod cipher;
mod error;
pub mod graph;
mod image_cipher;
pub mod key;
pub mod metrics;
pub mod mst;
pub mod permute;
pub mod traverse;

#[allow(deprecated)]
#[doc(inline)]
pub use crate::cipher::{
    decrypt_channel, decrypt_channel_replayed, encrypt_channel, replay_shuffle, ChannelMetadata,
    EncryptedChannel,
};
#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::image_cipher::{decrypt_image, encrypt_image, EncryptedImage};
#[doc(inline)]
pub use crate::key::Seed;
