//! Source-window arithmetic for the host's crop step.
//!
//! The pipeline itself consumes an already-resized grid buffer; this helper
//! computes *which* region of the native-resolution source the host should
//! resample: a window with the grid's aspect ratio, scaled by `1/zoom`,
//! positioned by relative offsets and clamped inside the image.

/// A crop window in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Compute the source window for a `grid_w : grid_h` target.
///
/// `zoom` values below 1 are treated as 1 (never sample outside the image);
/// `offset_x` / `offset_y` are relative pan amounts in -0.5..0.5, where 0 is
/// centered and the extremes touch the image edges.
pub fn source_rect(
    src_w: u32,
    src_h: u32,
    grid_w: u32,
    grid_h: u32,
    zoom: f32,
    offset_x: f32,
    offset_y: f32,
) -> CropRect {
    let src_w = src_w as f32;
    let src_h = src_h as f32;
    let aspect = grid_w as f32 / grid_h as f32;
    let z = zoom.max(1.0);

    // Try full width at 1/zoom, derive height from the grid ratio;
    // if that overflows the source height, fit on height instead.
    let mut view_w = src_w / z;
    let mut view_h = view_w / aspect;
    if view_h > src_h / z {
        view_h = src_h / z;
        view_w = view_h * aspect;
    }

    let max_x = src_w - view_w;
    let max_y = src_h - view_h;
    let offset_x = offset_x.clamp(-0.5, 0.5);
    let offset_y = offset_y.clamp(-0.5, 0.5);
    let x = (src_w / 2.0 - view_w / 2.0 + offset_x * max_x).clamp(0.0, max_x);
    let y = (src_h / 2.0 - view_h / 2.0 + offset_y * max_y).clamp(0.0, max_y);

    CropRect {
        x,
        y,
        width: view_w,
        height: view_h,
    }
}
