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

//! Metadata file written next to an encrypted image.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Error};
use mstshuffle::key::{key_check, Salt, SALT_LEN};
use mstshuffle::ChannelMetadata;
use serde::{Deserialize, Serialize};

pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    /// Hex-encoded salt of the password hash.
    pub salt: String,
    /// Hex-encoded [`key_check`] of the password hash.
    pub key_check: String,
    pub width: u32,
    pub height: u32,
    pub channels: Vec<ChannelMetadata>,
}

impl Envelope {
    pub fn new(
        salt: &Salt,
        digest: &[u8],
        width: u32,
        height: u32,
        channels: Vec<ChannelMetadata>,
    ) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            salt: hex::encode(salt.0),
            key_check: hex::encode(key_check(digest)),
            width,
            height,
            channels,
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        );
        let envelope: Self = serde_json::from_reader(reader)
            .with_context(|| format!("parsing {}", path.display()))?;
        if envelope.version != ENVELOPE_VERSION {
            bail!(
                "{}: unsupported metadata version {} (expected {})",
                path.display(),
                envelope.version,
                ENVELOPE_VERSION
            );
        }
        Ok(envelope)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut writer = BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );
        serde_json::to_writer(&mut writer, self)
            .with_context(|| format!("writing {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }

    pub fn salt(&self) -> Result<Salt, Error> {
        let bytes = hex::decode(&self.salt).context("salt is not valid hex")?;
        let salt: [u8; SALT_LEN] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| anyhow!("salt has {} bytes, expected {SALT_LEN}", b.len()))?;
        Ok(Salt(salt))
    }

    /// Fails unless `digest` was hashed from the password used to encrypt.
    pub fn verify_key(&self, digest: &[u8]) -> Result<(), Error> {
        if hex::encode(key_check(digest)) != self.key_check {
            bail!("wrong password for this image");
        }
        Ok(())
    }
}
