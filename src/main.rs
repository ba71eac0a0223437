//! Main Program for MST Shuffle
//! Run with `--help` for more instruction

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

mod store;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Error};
use clap::{Parser, Subcommand};
use env_logger::Env;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{save_buffer, save_buffer_with_format, DynamicImage, ImageFormat};
use log::{info, LevelFilter};
use mstshuffle::key::{check_password_strength, hash_key_with_salt, Salt};
use mstshuffle::metrics::{
    adjacent_correlation, correlation, entropy, npcr, psnr, ssim, uaci,
};
use mstshuffle::{decrypt_image, encrypt_image, Seed};
use ndarray::prelude::*;

use crate::store::Envelope;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    /// Print debug logs
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scramble an image
    Encrypt {
        /// Input file
        input: PathBuf,

        /// Output file (always written as PNG)
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Metadata file needed for decryption
        #[arg(short = 'm', long)]
        metadata: PathBuf,

        /// Password
        #[arg(long, env = "MSTSHUFFLE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Resize before encrypting (WIDTHxHEIGHT)
        #[arg(long, value_parser = parse_size)]
        resize: Option<(u32, u32)>,

        /// Print quality metrics of the result
        #[arg(long)]
        report: bool,
    },

    /// Restore a scrambled image
    Decrypt {
        /// Encrypted file
        input: PathBuf,

        /// Metadata file written at encryption
        #[arg(short = 'm', long)]
        metadata: PathBuf,

        /// Password
        #[arg(long, env = "MSTSHUFFLE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Compare two images of the same size
    Metrics {
        /// Reference image
        original: PathBuf,

        /// Image to compare against the reference
        other: PathBuf,
    },
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let parse = |v: &str| match v.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("invalid dimension {v:?}")),
        Ok(v) => Ok(v),
    };
    Ok((parse(w)?, parse(h)?))
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Encrypt {
            input,
            output,
            metadata,
            password,
            resize,
            report,
        } => encrypt(&input, &output, &metadata, &password, resize, report),
        Command::Decrypt {
            input,
            metadata,
            password,
            output,
        } => decrypt(&input, &metadata, &password, &output),
        Command::Metrics { original, other } => {
            let a = load_image(&original)?;
            let b = load_image(&other)?;
            if (a.width(), a.height(), a.color()) != (b.width(), b.height(), b.color()) {
                bail!(
                    "{} and {} differ in size or color type",
                    original.display(),
                    other.display()
                );
            }
            print_report(pixels(&a)?, pixels(&b)?)
        }
    }
}

fn encrypt(
    input: &Path,
    output: &Path,
    metadata: &Path,
    password: &str,
    resize: Option<(u32, u32)>,
    report: bool,
) -> Result<(), Error> {
    check_password_strength(password)?;

    let mut im = load_image(input)?;
    if let Some((w, h)) = resize {
        im = im.resize_exact(w, h, FilterType::Triangle);
    }

    let salt = Salt::generate();
    let digest = hash_key_with_salt(password, &salt);
    let seed = Seed::from_digest(&digest)?;

    let arr = pixels(&im)?;
    let start = Instant::now();
    let out = encrypt_image(arr, seed)?;
    info!(
        "encrypted {}x{} image ({} channels) in {:.2?}",
        im.width(),
        im.height(),
        out.channels.len(),
        start.elapsed()
    );

    save_buffer_with_format(
        output,
        out.cipher.as_slice().expect("Should be standard-layout"),
        im.width(),
        im.height(),
        im.color(),
        ImageFormat::Png,
    )
    .with_context(|| format!("writing {}", output.display()))?;
    Envelope::new(&salt, &digest, im.width(), im.height(), out.channels).save(metadata)?;

    if report {
        print_report(arr, out.cipher.view())?;
    }
    Ok(())
}

fn decrypt(input: &Path, metadata: &Path, password: &str, output: &Path) -> Result<(), Error> {
    let envelope = Envelope::load(metadata)?;
    let im = load_image(input)?;
    let channels = im.color().channel_count() as usize;
    if (im.width(), im.height(), channels)
        != (envelope.width, envelope.height, envelope.channels.len())
    {
        bail!(
            "{} is {}x{} with {} channels, metadata expects {}x{} with {}",
            input.display(),
            im.width(),
            im.height(),
            channels,
            envelope.width,
            envelope.height,
            envelope.channels.len()
        );
    }

    let digest = hash_key_with_salt(password, &envelope.salt()?);
    envelope.verify_key(&digest)?;
    let seed = Seed::from_digest(&digest)?;

    let start = Instant::now();
    let out = decrypt_image(pixels(&im)?, &envelope.channels, seed)?;
    info!("decrypted in {:.2?}", start.elapsed());

    save_buffer(
        output,
        out.as_slice().expect("Should be standard-layout"),
        im.width(),
        im.height(),
        im.color(),
    )
    .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Decodes an image, converting it to 8 bits per channel.
fn load_image(path: &Path) -> Result<DynamicImage, Error> {
    let im = ImageReader::new(BufReader::new(
        File::open(path).with_context(|| format!("opening {}", path.display()))?,
    ))
    .with_guessed_format()?
    .decode()
    .with_context(|| format!("decoding {}", path.display()))?;

    Ok(match im {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => im,
        im if im.color().has_alpha() => DynamicImage::ImageRgba8(im.into_rgba8()),
        im => DynamicImage::ImageRgb8(im.into_rgb8()),
    })
}

fn pixels(im: &DynamicImage) -> Result<ArrayView3<'_, u8>, Error> {
    Ok(ArrayView3::from_shape(
        (
            im.height() as usize,
            im.width() as usize,
            im.color().channel_count() as usize,
        ),
        im.as_bytes(),
    )?)
}

fn print_report(original: ArrayView3<'_, u8>, other: ArrayView3<'_, u8>) -> Result<(), Error> {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.4}"));

    for (c, (a, b)) in original
        .axis_iter(Axis(2))
        .zip(other.axis_iter(Axis(2)))
        .enumerate()
    {
        let adjacent = adjacent_correlation(b);
        println!("Channel {c}:");
        println!("  Entropy: {:.4}", entropy(b));
        println!("  Correlation with original: {}", fmt(correlation(a, b)?));
        println!(
            "  Adjacent correlation (h/v/d): {} / {} / {}",
            fmt(adjacent.horizontal),
            fmt(adjacent.vertical),
            fmt(adjacent.diagonal)
        );
    }

    println!("NPCR: {:.2}%", npcr(original, other)?);
    println!("UACI: {:.2}%", uaci(original, other)?);
    println!("PSNR: {:.2} dB", psnr(original, other)?);
    match ssim(original, other) {
        Ok(v) => println!("SSIM: {v:.4}"),
        Err(e) => println!("SSIM: n/a ({e})"),
    }
    Ok(())
}
