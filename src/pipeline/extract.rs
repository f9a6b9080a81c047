use std::path::Path;

use anyhow::{bail, Context, Result};
use image::imageops::FilterType;
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};
use serde::Serialize;
use tracing::{debug, info};

use crate::color::Color;

/// A color extracted from the image with its share of the opaque pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedColor {
    pub color: Color,
    pub weight: f32,
}

pub const DEFAULT_MAX_DIM: u32 = 100;
pub const DEFAULT_SEED: u64 = 42;

const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const RESTARTS: u64 = 10;
/// Cluster indices are stored as u8 by kmeans_colors.
const MAX_CLUSTERS: usize = u8::MAX as usize;
const ALPHA_CUTOFF: u8 = 128;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5

/// Load an image, shrink it to fit within `max_dim` x `max_dim` (preserving
/// aspect ratio), drop transparent pixels and convert the rest to CIELAB.
pub fn load_and_prepare(path: &Path, max_dim: u32) -> Result<Vec<Lab>> {
    let img = image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })?;

    let img = if img.width() > max_dim || img.height() > max_dim {
        img.resize(max_dim, max_dim, FilterType::Lanczos3)
    } else {
        img
    };
    let rgba_img = img.to_rgba8();

    let pixels: Vec<Lab> = rgba_img
        .pixels()
        .filter(|p| p[3] >= ALPHA_CUTOFF)
        .map(|p| {
            let srgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            srgb.into_color()
        })
        .collect();

    if pixels.is_empty() {
        bail!("image has no opaque pixels: {}", path.display());
    }

    info!(
        path = %path.display(),
        width = rgba_img.width(),
        height = rgba_img.height(),
        pixels = pixels.len(),
        "loaded image"
    );

    Ok(pixels)
}

/// Run K-means on LAB pixels to extract dominant colors.
///
/// Runs several restarts from consecutive seeds and keeps the tightest
/// clustering. Returns deduplicated colors sorted by weight (descending).
pub fn extract_colors(pixels: &[Lab], k: usize, seed: u64) -> Vec<ExtractedColor> {
    if pixels.is_empty() {
        return Vec::new();
    }
    let k = k.min(pixels.len()).min(MAX_CLUSTERS).max(1);

    let best = (0..RESTARTS)
        .map(|run| seed.wrapping_add(run))
        .map(|run_seed| {
            let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, run_seed);
            debug!(seed = run_seed, score = result.score, "k-means run");
            result
        })
        .min_by(|a, b| a.score.total_cmp(&b.score));
    let Some(result) = best else {
        return Vec::new();
    };

    let total = pixels.len() as f32;

    // Count pixels per centroid to compute weights
    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, lab)| ExtractedColor {
            color: Color::from_lab(*lab),
            weight: counts[i] as f32 / total,
        })
        .collect();

    // Heaviest first so deduplication keeps the dominant shade
    sort_by_weight(&mut colors);
    deduplicate(&mut colors);
    sort_by_weight(&mut colors);

    info!(k, colors = colors.len(), "extracted dominant colors");
    colors
}

fn sort_by_weight(colors: &mut [ExtractedColor]) {
    colors.sort_by(|a, b| b.weight.total_cmp(&a.weight));
}

/// Merge colors that are too similar (ΔE < 5 in LAB space).
/// Keeps the first color and accumulates the weight.
fn deduplicate(colors: &mut Vec<ExtractedColor>) {
    let mut i = 0;
    while i < colors.len() {
        let lab_i = colors[i].color.to_lab();
        let mut j = i + 1;
        while j < colors.len() {
            let lab_j = colors[j].color.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                colors[i].weight += colors[j].weight;
                colors.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}
