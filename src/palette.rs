//! The working brick palette and nearest-color search.
//!
//! A [`Palette`] is an immutable snapshot for one render pass: entries in a
//! fixed order, with their OKLab values precomputed alongside the sRGB ones so
//! perceptual search never re-derives them per pixel.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::colorspace::{srgb_to_oklab, OKLab};

/// Which space squared-distance comparisons run in.
///
/// OKLab is the default: Euclidean RGB over-weights brightness against hue
/// and picks visibly wrong bricks near palette boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Oklab,
    Rgb,
}

/// One candidate output color with its physical-inventory metadata.
///
/// `stock_limit: None` means unlimited supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub label: String,
    pub rgb: [u8; 3],
    pub catalog_code: Option<u32>,
    pub is_translucent: bool,
    pub supplier_code: Option<u32>,
    pub stock_limit: Option<u32>,
}

impl PaletteEntry {
    /// A plain opaque entry with no supplier metadata and unlimited stock.
    pub fn new(label: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            label: label.into(),
            rgb,
            catalog_code: None,
            is_translucent: false,
            supplier_code: None,
            stock_limit: None,
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.catalog_code = Some(code);
        self
    }

    pub fn with_stock_limit(mut self, limit: u32) -> Self {
        self.stock_limit = Some(limit);
        self
    }

    /// The code printed on build sheets: the supplier's own integer when one
    /// was given, falling back to the correlated catalog code.
    pub fn display_code(&self) -> Option<u32> {
        self.supplier_code.or(self.catalog_code)
    }
}

impl From<&CatalogEntry> for PaletteEntry {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            label: entry.name.to_string(),
            rgb: entry.rgb,
            catalog_code: Some(entry.code),
            is_translucent: entry.is_translucent,
            supplier_code: None,
            stock_limit: None,
        }
    }
}

/// The active palette: an ordered snapshot with OKLab-space acceleration.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    entries_oklab: Vec<OKLab>,
}

impl Palette {
    /// Build a palette from explicit entries, precomputing OKLab values.
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        let entries_oklab = entries
            .iter()
            .map(|e| srgb_to_oklab(e.rgb[0], e.rgb[1], e.rgb[2]))
            .collect();
        Self {
            entries,
            entries_oklab,
        }
    }

    /// Build from a catalog, filtering by the translucency flag.
    /// Original catalog order is preserved.
    pub fn from_catalog(catalog: &[CatalogEntry], include_translucent: bool) -> Self {
        let entries = catalog
            .iter()
            .filter(|e| include_translucent || !e.is_translucent)
            .map(PaletteEntry::from)
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn entries_oklab(&self) -> &[OKLab] {
        &self.entries_oklab
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entries at the given indices, preserving palette order.
    /// Used by the max-colors trim; indices outside the palette are ignored.
    pub fn subset(&self, keep: &[usize]) -> Self {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| keep.contains(i))
            .map(|(_, e)| e.clone())
            .collect();
        Self::new(entries)
    }

    /// Find the nearest entry by squared distance in the selected space.
    /// Ties break to the lowest index, so results are reproducible.
    ///
    /// Callers must not invoke this on an empty palette; the pipeline
    /// rejects empty palettes before any per-pixel work.
    pub fn nearest(&self, r: u8, g: u8, b: u8, space: ColorSpace) -> u16 {
        debug_assert!(!self.entries.is_empty());
        match space {
            ColorSpace::Oklab => self.nearest_oklab(srgb_to_oklab(r, g, b)),
            ColorSpace::Rgb => self.nearest_rgb(r, g, b),
        }
    }

    /// Nearest entry to an OKLab color (brute force over the palette).
    pub fn nearest_oklab(&self, color: OKLab) -> u16 {
        let mut best_idx = 0u16;
        let mut best_dist = f32::MAX;
        for (i, lab) in self.entries_oklab.iter().enumerate() {
            let d = color.distance_sq(*lab);
            if d < best_dist {
                best_dist = d;
                best_idx = i as u16;
            }
        }
        best_idx
    }

    fn nearest_rgb(&self, r: u8, g: u8, b: u8) -> u16 {
        let mut best_idx = 0u16;
        let mut best_dist = u32::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let dr = entry.rgb[0] as i32 - r as i32;
            let dg = entry.rgb[1] as i32 - g as i32;
            let db = entry.rgb[2] as i32 - b as i32;
            let d = (dr * dr + dg * dg + db * db) as u32;
            if d < best_dist {
                best_dist = d;
                best_idx = i as u16;
            }
        }
        best_idx
    }

    /// Squared OKLab distance from `color` to entry `index`.
    pub fn distance_sq(&self, color: OKLab, index: u16) -> f32 {
        color.distance_sq(self.entries_oklab[index as usize])
    }
}

/// Memoizing nearest-color cache over coarse color buckets.
///
/// Each channel is quantized to 4 bits (4096 buckets); the first pixel that
/// lands in a bucket decides the answer for the rest of that bucket, so
/// results are approximate but deterministic for a fixed scan order. The
/// cache borrows its palette, which makes reuse across palette snapshots
/// impossible by construction.
pub struct NearestCache<'a> {
    palette: &'a Palette,
    space: ColorSpace,
    buckets: Vec<Option<u16>>,
}

impl<'a> NearestCache<'a> {
    pub fn new(palette: &'a Palette, space: ColorSpace) -> Self {
        Self {
            palette,
            space,
            buckets: vec![None; 4096],
        }
    }

    pub fn nearest(&mut self, r: u8, g: u8, b: u8) -> u16 {
        let key = ((r as usize >> 4) << 8) | ((g as usize >> 4) << 4) | (b as usize >> 4);
        match self.buckets[key] {
            Some(idx) => idx,
            None => {
                let idx = self.palette.nearest(r, g, b, self.space);
                self.buckets[key] = Some(idx);
                idx
            }
        }
    }
}
