//! Quantization of the adjusted grid buffer to palette indices, with
//! optional error-diffusion dithering.
//!
//! One forward row-major scan over an f32 working copy of the pixels.
//! Quantization error is scaled by the dither amount before being spread, so
//! amount 0 degenerates to plain nearest-color assignment bit-for-bit.

use rgb::RGBA;
use serde::{Deserialize, Serialize};

use crate::palette::{ColorSpace, Palette};

/// Error-diffusion kernel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DitherMode {
    /// Direct nearest-color assignment, no error propagation.
    None,
    /// Floyd-Steinberg: 7/16 right, 3/16 below-left, 5/16 below, 1/16 below-right.
    FloydSteinberg,
    /// Atkinson: six equal 1/8 shares; the remaining 2/8 is discarded,
    /// which is what gives Atkinson its characteristic lower contrast.
    Atkinson,
}

/// Quantize pixels to palette indices.
///
/// `amount` is the dither intensity in 0..100; it scales the residual error
/// before diffusion and is ignored for [`DitherMode::None`].
pub fn quantize_image(
    pixels: &[RGBA<u8>],
    width: usize,
    height: usize,
    palette: &Palette,
    space: ColorSpace,
    mode: DitherMode,
    amount: f32,
) -> Vec<u16> {
    debug_assert_eq!(pixels.len(), width * height);
    debug_assert!(!palette.is_empty());

    if mode == DitherMode::None {
        return pixels
            .iter()
            .map(|p| palette.nearest(p.r, p.g, p.b, space))
            .collect();
    }

    let strength = amount.clamp(0.0, 100.0) / 100.0;

    // Working copy that accumulates diffused error.
    let mut buf: Vec<[f32; 3]> = pixels
        .iter()
        .map(|p| [p.r as f32, p.g as f32, p.b as f32])
        .collect();

    let mut indices = vec![0u16; pixels.len()];

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let r = buf[i][0].round() as u8;
            let g = buf[i][1].round() as u8;
            let b = buf[i][2].round() as u8;

            let idx = palette.nearest(r, g, b, space);
            indices[i] = idx;

            let chosen = palette.entries()[idx as usize].rgb;
            let err = [
                (buf[i][0] - chosen[0] as f32) * strength,
                (buf[i][1] - chosen[1] as f32) * strength,
                (buf[i][2] - chosen[2] as f32) * strength,
            ];

            let mut spread = |dx: isize, dy: isize, fraction: f32| {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || nx >= width as isize || ny >= height as isize {
                    return; // off-grid shares are dropped
                }
                let t = ny as usize * width + nx as usize;
                for c in 0..3 {
                    buf[t][c] = (buf[t][c] + err[c] * fraction).clamp(0.0, 255.0);
                }
            };

            match mode {
                DitherMode::FloydSteinberg => {
                    spread(1, 0, 7.0 / 16.0);
                    spread(-1, 1, 3.0 / 16.0);
                    spread(0, 1, 5.0 / 16.0);
                    spread(1, 1, 1.0 / 16.0);
                }
                DitherMode::Atkinson => {
                    spread(1, 0, 1.0 / 8.0);
                    spread(2, 0, 1.0 / 8.0);
                    spread(-1, 1, 1.0 / 8.0);
                    spread(0, 1, 1.0 / 8.0);
                    spread(1, 1, 1.0 / 8.0);
                    spread(0, 2, 1.0 / 8.0);
                }
                DitherMode::None => unreachable!(),
            }
        }
    }

    indices
}
