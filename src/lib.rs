#![forbid(unsafe_code)]

//! brickplan — turn a photograph into a brick-mosaic build plan.
//!
//! The caller supplies an already-cropped `grid_w × grid_h` RGBA buffer and a
//! palette of physical brick colors; one [`run_plan`] call adjusts the image,
//! quantizes every cell to the nearest palette color (optionally with
//! error-diffusion dithering), smooths isolated outliers, honors per-color
//! stock limits, and returns the cell-to-color index buffer plus a parts
//! list. Decoding image files and rendering previews, PDFs, or CSVs are the
//! host application's job.
//!
//! ```
//! use brickplan::{run_plan, PlanOptions, Palette};
//! use brickplan::catalog::REFERENCE_CATALOG;
//! use rgb::RGBA;
//!
//! let palette = Palette::from_catalog(REFERENCE_CATALOG, false);
//! let pixels = vec![RGBA { r: 128, g: 128, b: 128, a: 255 }; 16];
//! let result = run_plan(&pixels, 4, 4, &palette, &PlanOptions::default()).unwrap();
//! assert_eq!(result.indices.len(), 16);
//! ```
//!
//! A run is synchronous and CPU-bound with freshly-allocated buffers; hosts
//! that need a responsive UI dispatch it to a background task and discard
//! stale results themselves (last request wins).

pub mod adjust;
pub mod catalog;
pub mod colorspace;
pub mod crop;
pub mod dither;
pub mod error;
pub mod palette;
pub mod report;
pub mod smooth;
pub mod stock;
pub mod supplier;

pub use dither::DitherMode;
pub use error::PlanError;
pub use palette::{ColorSpace, NearestCache, Palette, PaletteEntry};
pub use report::ColorUsage;
pub use stock::{StockDeficit, StockStatus};

use rgb::RGBA;
use serde::{Deserialize, Serialize};

/// Options for one plan run.
///
/// Adjustment amounts are clamped to their documented ranges rather than
/// rejected; structural problems (empty palette, bad grid) are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Gray-world white balance before the per-pixel adjustments.
    pub white_balance: bool,
    /// Additive brightness offset, -100..100.
    pub brightness: f32,
    /// Contrast amount, -100..100.
    pub contrast: f32,
    /// Saturation shift, -100..100.
    pub saturation: f32,
    /// Gamma, 0.5..2.5.
    pub gamma: f32,
    /// Unsharp-mask strength, 0..100.
    pub sharpen: f32,
    /// Error-diffusion kernel.
    pub dither: DitherMode,
    /// Dither intensity, 0..100. 0 behaves exactly like `DitherMode::None`.
    pub dither_amount: f32,
    /// Replace isolated single-cell outliers with the neighbor majority.
    pub anti_singleton: bool,
    /// Distance space for nearest-color search.
    pub color_space: ColorSpace,
    /// Trim the working palette to its N most-used colors before quantizing.
    pub max_colors: Option<usize>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            white_balance: false,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            gamma: 1.0,
            sharpen: 0.0,
            dither: DitherMode::FloydSteinberg,
            dither_amount: 100.0,
            anti_singleton: false,
            color_space: ColorSpace::Oklab,
            max_colors: None,
        }
    }
}

impl PlanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn white_balance(mut self, on: bool) -> Self {
        self.white_balance = on;
        self
    }

    pub fn brightness(mut self, amount: f32) -> Self {
        self.brightness = amount;
        self
    }

    pub fn contrast(mut self, amount: f32) -> Self {
        self.contrast = amount;
        self
    }

    pub fn saturation(mut self, amount: f32) -> Self {
        self.saturation = amount;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn sharpen(mut self, amount: f32) -> Self {
        self.sharpen = amount;
        self
    }

    pub fn dither(mut self, mode: DitherMode) -> Self {
        self.dither = mode;
        self
    }

    pub fn dither_amount(mut self, amount: f32) -> Self {
        self.dither_amount = amount;
        self
    }

    pub fn anti_singleton(mut self, on: bool) -> Self {
        self.anti_singleton = on;
        self
    }

    pub fn color_space(mut self, space: ColorSpace) -> Self {
        self.color_space = space;
        self
    }

    pub fn max_colors(mut self, n: usize) -> Self {
        self.max_colors = Some(n);
        self
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    /// The palette snapshot the indices refer to. Differs from the input
    /// palette only when `max_colors` trimmed it.
    pub palette: Vec<PaletteEntry>,
    /// One palette index per grid cell, row-major.
    pub indices: Vec<u16>,
    pub width: usize,
    pub height: usize,
    /// Parts list sorted by descending usage.
    pub counts: Vec<ColorUsage>,
    /// Whether stock caps were fully honored.
    pub stock: StockStatus,
}

/// Run the full image-to-brick pipeline on a grid-sized pixel buffer.
///
/// Stage order: white balance → brightness/contrast/gamma → saturation →
/// sharpen → max-colors trim → quantize (+dither) → anti-singleton →
/// stock reallocation → tally.
pub fn run_plan(
    pixels: &[RGBA<u8>],
    width: usize,
    height: usize,
    palette: &Palette,
    options: &PlanOptions,
) -> Result<PlanResult, PlanError> {
    validate_inputs(pixels.len(), width, height, palette)?;

    tracing::debug!(
        width,
        height,
        colors = palette.len(),
        dither = ?options.dither,
        "starting plan run"
    );

    let mut working = pixels.to_vec();
    if options.white_balance {
        adjust::gray_world_balance(&mut working);
    }
    adjust::apply_tone(&mut working, options.brightness, options.contrast, options.gamma);
    adjust::apply_saturation(&mut working, options.saturation);
    adjust::sharpen(&mut working, width, height, options.sharpen);

    let active = match options.max_colors {
        Some(n) if n > 0 && n < palette.len() => {
            let trimmed = trim_to_most_used(&working, palette, options.color_space, n);
            tracing::debug!(from = palette.len(), to = trimmed.len(), "trimmed palette");
            trimmed
        }
        _ => palette.clone(),
    };

    let mut indices = dither::quantize_image(
        &working,
        width,
        height,
        &active,
        options.color_space,
        options.dither,
        options.dither_amount,
    );

    if options.anti_singleton {
        indices = smooth::anti_singleton(&indices, width, height);
    }

    let stock = stock::reallocate(&mut indices, &active);
    let counts = report::usage_report(&indices, &active);

    tracing::debug!(
        colors_used = counts.len(),
        satisfied = stock.is_satisfied(),
        "plan run finished"
    );

    Ok(PlanResult {
        palette: active.entries().to_vec(),
        indices,
        width,
        height,
        counts,
        stock,
    })
}

/// Pick the `n` most-used palette entries via a quick cached nearest-color
/// count, keeping palette order. Ties keep the earlier entry.
fn trim_to_most_used(
    pixels: &[RGBA<u8>],
    palette: &Palette,
    space: ColorSpace,
    n: usize,
) -> Palette {
    let mut cache = NearestCache::new(palette, space);
    let mut counts = vec![0u32; palette.len()];
    for p in pixels {
        counts[cache.nearest(p.r, p.g, p.b) as usize] += 1;
    }

    let mut order: Vec<usize> = (0..palette.len()).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));
    let keep: Vec<usize> = order.into_iter().take(n).collect();
    palette.subset(&keep)
}

fn validate_inputs(
    pixel_count: usize,
    width: usize,
    height: usize,
    palette: &Palette,
) -> Result<(), PlanError> {
    if width == 0 || height == 0 {
        return Err(PlanError::ZeroGridDimension);
    }
    if pixel_count != width * height {
        return Err(PlanError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
        });
    }
    if palette.is_empty() {
        return Err(PlanError::EmptyPalette);
    }
    Ok(())
}
