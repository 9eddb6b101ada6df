//! Perceptual block hash over captured screen images.
//!
//! The image is partitioned into an NxN grid of blocks and each block's mean
//! luminance is reduced to a single bit by comparing it against the median
//! of its horizontal band of blocks. Comparing against a band median rather
//! than a global average is what distinguishes this hashing family from
//! naive average-hash and keeps it stable under global brightness shifts.

use image::GrayImage;
use pilot_core_types::CapturedSnapshot;
use tracing::warn;

use crate::algorithm::SnapshotHasher;

/// Default grid dimension (16x16 blocks, 256 bits, 64 hex chars).
pub const DEFAULT_GRID: u32 = 16;

/// Default maximum bit distance at which two hashes count as similar.
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 10;

/// Blocks are grouped into this many horizontal bands; each band supplies
/// the median its blocks are compared against.
const BANDS: usize = 4;

/// Block-median perceptual hash of the screen image channel.
#[derive(Debug, Clone)]
pub struct BlockPerceptualHash {
    grid: u32,
    threshold: u32,
}

impl Default for BlockPerceptualHash {
    fn default() -> Self {
        Self::new(DEFAULT_GRID, DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl BlockPerceptualHash {
    pub fn new(grid: u32, threshold: u32) -> Self {
        Self {
            grid: grid.max(2),
            threshold,
        }
    }

    /// Hash a decoded grayscale image.
    pub fn hash_luma(&self, luma: &GrayImage) -> String {
        let means = self.block_means(luma);
        let bits = band_bits(&means);
        pack_bits_hex(&bits)
    }

    /// Raw bit-difference count between two equal-length hex hashes.
    ///
    /// `None` when the hashes differ in length or contain non-hex input.
    pub fn distance(a: &str, b: &str) -> Option<u32> {
        if a.len() != b.len() {
            return None;
        }
        let mut total = 0u32;
        for (ca, cb) in a.chars().zip(b.chars()) {
            let na = ca.to_digit(16)?;
            let nb = cb.to_digit(16)?;
            total += (na ^ nb).count_ones();
        }
        Some(total)
    }

    /// Mean luminance per block, row-major.
    ///
    /// Evenly divisible dimensions take an exact-block path; otherwise each
    /// pixel's luminance is distributed over the blocks it overlaps,
    /// weighted by the overlap area of fractional block boundaries.
    fn block_means(&self, luma: &GrayImage) -> Vec<f64> {
        let (width, height) = luma.dimensions();
        let grid = self.grid;

        if width % grid == 0 && height % grid == 0 {
            let bw = width / grid;
            let bh = height / grid;
            let mut means = Vec::with_capacity((grid * grid) as usize);
            for by in 0..grid {
                for bx in 0..grid {
                    let mut sum = 0u64;
                    for y in by * bh..(by + 1) * bh {
                        for x in bx * bw..(bx + 1) * bw {
                            sum += u64::from(luma.get_pixel(x, y)[0]);
                        }
                    }
                    means.push(sum as f64 / f64::from(bw * bh));
                }
            }
            return means;
        }

        let bw = f64::from(width) / f64::from(grid);
        let bh = f64::from(height) / f64::from(grid);
        let cells = (grid * grid) as usize;
        let mut sums = vec![0.0f64; cells];
        let mut weights = vec![0.0f64; cells];

        for y in 0..height {
            let (y0, wy0, y1, wy1) = split_span(y, bh, grid);
            for x in 0..width {
                let (x0, wx0, x1, wx1) = split_span(x, bw, grid);
                let value = f64::from(luma.get_pixel(x, y)[0]);

                for &(bx, by, weight) in &[
                    (x0, y0, wx0 * wy0),
                    (x1, y0, wx1 * wy0),
                    (x0, y1, wx0 * wy1),
                    (x1, y1, wx1 * wy1),
                ] {
                    if weight > 0.0 {
                        let idx = (by * grid + bx) as usize;
                        sums[idx] += value * weight;
                        weights[idx] += weight;
                    }
                }
            }
        }

        sums.iter()
            .zip(&weights)
            .map(|(sum, w)| if *w > 0.0 { sum / w } else { 0.0 })
            .collect()
    }
}

/// Which one or two blocks the unit span starting at `p` overlaps, with the
/// overlap length apportioned to each.
fn split_span(p: u32, block_size: f64, grid: u32) -> (u32, f64, u32, f64) {
    let start = f64::from(p);
    let end = start + 1.0;
    let first = ((start / block_size) as u32).min(grid - 1);
    let boundary = f64::from(first + 1) * block_size;
    if boundary >= end {
        (first, 1.0, first, 0.0)
    } else {
        let second = (first + 1).min(grid - 1);
        (first, boundary - start, second, end - boundary)
    }
}

/// One bit per block: mean luminance above the median of the block's band.
fn band_bits(means: &[f64]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(means.len());
    let band_len = (means.len() / BANDS).max(1);
    for band in means.chunks(band_len) {
        let median = median_of(band);
        bits.extend(band.iter().map(|&m| m > median));
    }
    bits
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 && mid > 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Pack row-major bits into a lowercase hexadecimal string, four per digit.
fn pack_bits_hex(bits: &[bool]) -> String {
    let mut out = String::with_capacity(bits.len() / 4 + 1);
    for nibble in bits.chunks(4) {
        let mut value = 0u32;
        for (i, &bit) in nibble.iter().enumerate() {
            if bit {
                value |= 1 << (3 - i);
            }
        }
        out.push(std::char::from_digit(value, 16).unwrap_or('0'));
    }
    out
}

impl SnapshotHasher for BlockPerceptualHash {
    fn name(&self) -> &'static str {
        "block_perceptual"
    }

    fn hash(&self, snapshot: &CapturedSnapshot) -> Option<String> {
        let data = snapshot.image.as_deref()?;
        match image::load_from_memory(data) {
            Ok(img) => Some(self.hash_luma(&img.to_luma8())),
            Err(err) => {
                warn!(error = %err, "failed to decode snapshot image, skipping perceptual hash");
                None
            }
        }
    }

    fn are_similar(&self, a: &str, b: &str) -> bool {
        Self::distance(a, b).is_some_and(|d| d <= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn gradient_image(width: u32, height: u32) -> GrayImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Luma([((x * 255 / width.max(1)) as u8).wrapping_add((y * 3) as u8)])
        })
    }

    fn encode_png(img: &GrayImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageFormat::Png,
        )
        .unwrap();
        buf
    }

    #[test]
    fn test_distance_zero_on_self_and_symmetric() {
        let hasher = BlockPerceptualHash::default();
        let h1 = hasher.hash_luma(&gradient_image(64, 64));
        let h2 = hasher.hash_luma(&gradient_image(64, 128));

        assert_eq!(BlockPerceptualHash::distance(&h1, &h1), Some(0));
        assert_eq!(
            BlockPerceptualHash::distance(&h1, &h2),
            BlockPerceptualHash::distance(&h2, &h1)
        );
    }

    #[test]
    fn test_hash_length_independent_of_dimensions() {
        let hasher = BlockPerceptualHash::default();
        // 16x16 grid -> 256 bits -> 64 hex chars, divisible or not.
        assert_eq!(hasher.hash_luma(&gradient_image(64, 64)).len(), 64);
        assert_eq!(hasher.hash_luma(&gradient_image(100, 70)).len(), 64);
    }

    #[test]
    fn test_uniform_image_hashes_to_zero_bits() {
        let hasher = BlockPerceptualHash::default();
        let flat: GrayImage = ImageBuffer::from_pixel(48, 48, Luma([200u8]));
        let hash = hasher.hash_luma(&flat);
        assert!(hash.chars().all(|c| c == '0'));
    }

    #[test]
    fn test_distance_rejects_length_mismatch() {
        assert_eq!(BlockPerceptualHash::distance("abcd", "abc"), None);
        assert_eq!(BlockPerceptualHash::distance("xyz!", "xyz!"), None);
    }

    #[test]
    fn test_hasher_contract_over_snapshot() {
        let hasher = BlockPerceptualHash::default();
        let png = encode_png(&gradient_image(64, 64));
        let snapshot = CapturedSnapshot::new(Some(png), None);

        let hash = hasher.hash(&snapshot).unwrap();
        assert!(hasher.are_similar(&hash, &hash));

        let imageless = CapturedSnapshot::from_hierarchy("<root/>");
        assert!(hasher.hash(&imageless).is_none());

        let garbage = CapturedSnapshot::new(Some(vec![0, 1, 2, 3]), None);
        assert!(hasher.hash(&garbage).is_none());
    }

    #[test]
    fn test_distinct_layouts_produce_distant_hashes() {
        let hasher = BlockPerceptualHash::default();
        let left_bright: GrayImage = ImageBuffer::from_fn(64, 64, |x, _| {
            Luma([if x < 32 { 255 } else { 0 }])
        });
        let top_bright: GrayImage = ImageBuffer::from_fn(64, 64, |_, y| {
            Luma([if y < 32 { 255 } else { 0 }])
        });

        let d = BlockPerceptualHash::distance(
            &hasher.hash_luma(&left_bright),
            &hasher.hash_luma(&top_bright),
        )
        .unwrap();
        assert!(d > DEFAULT_SIMILARITY_THRESHOLD);
    }
}
