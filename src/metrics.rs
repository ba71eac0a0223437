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

//! Statistics for judging how well a cipher image hides the original.
//!
//! Functions taking two arrays require identical shapes.

use ndarray::prelude::*;
use ndarray::Zip;

use crate::error::{Error, Result};

/// Shannon entropy of the value histogram, in bits (0 to 8).
pub fn entropy<D: Dimension>(arr: ArrayView<'_, u8, D>) -> f64 {
    let mut hist = [0u64; 256];
    for &v in arr.iter() {
        hist[v as usize] += 1;
    }

    let total = arr.len() as f64;
    hist.iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Pearson correlation coefficient of two equally shaped arrays.
///
/// `None` if either array is empty or constant.
pub fn correlation<D: Dimension>(
    a: ArrayView<'_, u8, D>,
    b: ArrayView<'_, u8, D>,
) -> Result<Option<f64>> {
    check_shapes(a.shape(), b.shape())?;
    Ok(pearson(a.iter().copied().zip(b.iter().copied())))
}

fn pearson(pairs: impl Iterator<Item = (u8, u8)> + Clone) -> Option<f64> {
    let (mut n, mut sum_a, mut sum_b) = (0f64, 0f64, 0f64);
    for (a, b) in pairs.clone() {
        n += 1.0;
        sum_a += a as f64;
        sum_b += b as f64;
    }
    if n == 0.0 {
        return None;
    }
    let (mean_a, mean_b) = (sum_a / n, sum_b / n);

    let (mut cov, mut var_a, mut var_b) = (0f64, 0f64, 0f64);
    for (a, b) in pairs {
        let (da, db) = (a as f64 - mean_a, b as f64 - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a * var_b).sqrt())
}

/// Correlation between neighboring pixels of a single channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacentCorrelation {
    pub horizontal: Option<f64>,
    pub vertical: Option<f64>,
    pub diagonal: Option<f64>,
}

pub fn adjacent_correlation(channel: ArrayView2<'_, u8>) -> AdjacentCorrelation {
    if channel.is_empty() {
        return AdjacentCorrelation {
            horizontal: None,
            vertical: None,
            diagonal: None,
        };
    }

    fn pair(a: ArrayView2<'_, u8>, b: ArrayView2<'_, u8>) -> Option<f64> {
        pearson(a.iter().copied().zip(b.iter().copied()))
    }

    AdjacentCorrelation {
        horizontal: pair(channel.slice(s![.., ..-1]), channel.slice(s![.., 1..])),
        vertical: pair(channel.slice(s![..-1, ..]), channel.slice(s![1.., ..])),
        diagonal: pair(channel.slice(s![..-1, ..-1]), channel.slice(s![1.., 1..])),
    }
}

/// Number of pixels change rate, in percent.
pub fn npcr<D: Dimension>(a: ArrayView<'_, u8, D>, b: ArrayView<'_, u8, D>) -> Result<f64> {
    check_nonempty(a.shape(), b.shape())?;
    let changed = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
    Ok(changed as f64 / a.len() as f64 * 100.0)
}

/// Unified average changing intensity, in percent.
pub fn uaci<D: Dimension>(a: ArrayView<'_, u8, D>, b: ArrayView<'_, u8, D>) -> Result<f64> {
    check_nonempty(a.shape(), b.shape())?;
    let total: u64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.abs_diff(y) as u64)
        .sum();
    Ok(total as f64 / 255.0 / a.len() as f64 * 100.0)
}

/// Mean squared error.
pub fn mse<D: Dimension>(a: ArrayView<'_, u8, D>, b: ArrayView<'_, u8, D>) -> Result<f64> {
    check_nonempty(a.shape(), b.shape())?;
    let total: u64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x.abs_diff(y) as u64).pow(2))
        .sum();
    Ok(total as f64 / a.len() as f64)
}

/// Peak signal-to-noise ratio in dB. Infinite for identical arrays.
pub fn psnr<D: Dimension>(a: ArrayView<'_, u8, D>, b: ArrayView<'_, u8, D>) -> Result<f64> {
    let mse = mse(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(20.0 * (255.0 / mse.sqrt()).log10())
}

/// Side of the square SSIM window.
pub const SSIM_WINDOW: usize = 7;
const SSIM_C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const SSIM_C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// Mean structural similarity of one channel, with `data_range` 255.
///
/// Averages the SSIM index of every 7x7 window lying fully inside the
/// channel, with uniform weights and sample (co)variances. Both channels
/// must be at least 7x7.
pub fn ssim_channel(a: ArrayView2<'_, u8>, b: ArrayView2<'_, u8>) -> Result<f64> {
    check_shapes(a.shape(), b.shape())?;
    let (rows, cols) = a.dim();
    if rows < SSIM_WINDOW || cols < SSIM_WINDOW {
        return Err(Error::InvalidDimensions(format!(
            "SSIM needs at least {SSIM_WINDOW}x{SSIM_WINDOW}, got {rows}x{cols}"
        )));
    }

    let window = (SSIM_WINDOW, SSIM_WINDOW);
    let local = Zip::from(a.windows(window))
        .and(b.windows(window))
        .par_map_collect(window_ssim);
    Ok(local.sum() / local.len() as f64)
}

/// Mean of [`ssim_channel`] over the channels (last axis).
pub fn ssim(a: ArrayView3<'_, u8>, b: ArrayView3<'_, u8>) -> Result<f64> {
    check_nonempty(a.shape(), b.shape())?;
    let total = a
        .axis_iter(Axis(2))
        .zip(b.axis_iter(Axis(2)))
        .map(|(x, y)| ssim_channel(x, y))
        .sum::<Result<f64>>()?;
    Ok(total / a.len_of(Axis(2)) as f64)
}

fn window_ssim(a: ArrayView2<'_, u8>, b: ArrayView2<'_, u8>) -> f64 {
    let n = a.len() as f64;
    let (mut sum_a, mut sum_b) = (0f64, 0f64);
    let (mut sum_aa, mut sum_bb, mut sum_ab) = (0f64, 0f64, 0f64);
    Zip::from(&a).and(&b).for_each(|&x, &y| {
        let (x, y) = (x as f64, y as f64);
        sum_a += x;
        sum_b += y;
        sum_aa += x * x;
        sum_bb += y * y;
        sum_ab += x * y;
    });

    let (mean_a, mean_b) = (sum_a / n, sum_b / n);
    let norm = n / (n - 1.0);
    let var_a = norm * (sum_aa / n - mean_a * mean_a);
    let var_b = norm * (sum_bb / n - mean_b * mean_b);
    let cov = norm * (sum_ab / n - mean_a * mean_b);

    ((2.0 * mean_a * mean_b + SSIM_C1) * (2.0 * cov + SSIM_C2))
        / ((mean_a * mean_a + mean_b * mean_b + SSIM_C1) * (var_a + var_b + SSIM_C2))
}

fn check_shapes(a: &[usize], b: &[usize]) -> Result<()> {
    if a != b {
        return Err(Error::InvalidDimensions(format!(
            "shape {a:?} does not match {b:?}"
        )));
    }
    Ok(())
}

fn check_nonempty(a: &[usize], b: &[usize]) -> Result<()> {
    check_shapes(a, b)?;
    if a.iter().product::<usize>() == 0 {
        return Err(Error::InvalidDimensions("empty array".into()));
    }
    Ok(())
}
