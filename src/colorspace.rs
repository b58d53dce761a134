//! Color space conversions: sRGB transfer curve, OKLab, and HSL.
//!
//! All transforms are pure and total — inputs are pre-clamped by the
//! pipeline, so nothing here returns an error.

/// OKLab color representation.
///
/// Bjorn Ottosson's perceptually uniform color space.
/// L: lightness [0, 1], a: green-red, b: blue-yellow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OKLab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl OKLab {
    /// Squared Euclidean distance in OKLab space.
    /// Approximates perceptual difference since OKLab is perceptually uniform.
    pub fn distance_sq(self, other: Self) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

// --- sRGB transfer function ---

/// sRGB gamma → linear (single channel, 0..255 → 0.0..1.0).
/// Standard piecewise curve: linear segment below 0.04045, 2.4 power above.
#[inline]
pub fn srgb_to_linear(c: u8) -> f32 {
    let v = c as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear → sRGB gamma (single channel, 0.0..1.0 → 0..255).
/// Out-of-range inputs are clamped before encoding.
#[inline]
pub fn linear_to_srgb(c: f32) -> u8 {
    let v = c.clamp(0.0, 1.0);
    let encoded = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

// --- OKLab conversion (Bjorn Ottosson) ---
// Matrix constants are from the OKLab reference implementation — keep author's
// original values, let the compiler truncate to f32.

/// Convert sRGB (0..255 per channel) to OKLab.
#[allow(clippy::excessive_precision)]
pub fn srgb_to_oklab(r: u8, g: u8, b: u8) -> OKLab {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    // Linear sRGB → LMS (Ottosson's M1 matrix)
    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    // Cube root
    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    // LMS → OKLab (Ottosson's M2 matrix)
    OKLab {
        l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
        a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
        b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
    }
}

/// Convert OKLab to sRGB (0..255 per channel).
#[allow(clippy::excessive_precision)]
pub fn oklab_to_srgb(lab: OKLab) -> (u8, u8, u8) {
    // OKLab → LMS (inverse of M2)
    let l_ = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
    let m_ = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
    let s_ = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;

    // Undo cube root
    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    // LMS → linear sRGB (inverse of M1)
    let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
    let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
    let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

// --- HSL conversion ---

/// Convert RGB (0..255) to HSL, each component in 0..1.
/// Achromatic colors come back with `h = 0`, `s = 0`.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, l)
}

/// Convert HSL (each 0..1) back to RGB (0..255).
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    if s <= 0.0 {
        let v = (l * 255.0).round().clamp(0.0, 255.0) as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let to_channel = |t: f32| -> u8 {
        let mut t = t;
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    (
        to_channel(h + 1.0 / 3.0),
        to_channel(h),
        to_channel(h - 1.0 / 3.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_curve_endpoints() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-6);
        assert_eq!(linear_to_srgb(0.0), 0);
        assert_eq!(linear_to_srgb(1.0), 255);
        // Out-of-range linear values clamp instead of wrapping
        assert_eq!(linear_to_srgb(-0.5), 0);
        assert_eq!(linear_to_srgb(2.0), 255);
    }

    #[test]
    fn transfer_curve_roundtrip() {
        for c in [0u8, 1, 12, 64, 128, 200, 254, 255] {
            assert_eq!(linear_to_srgb(srgb_to_linear(c)), c);
        }
    }

    #[test]
    fn black_roundtrip() {
        let lab = srgb_to_oklab(0, 0, 0);
        assert!(lab.l.abs() < 0.001);
        assert!(lab.a.abs() < 0.001);
        assert!(lab.b.abs() < 0.001);
        let (r, g, b) = oklab_to_srgb(lab);
        assert_eq!((r, g, b), (0, 0, 0));
    }

    #[test]
    fn white_roundtrip() {
        let lab = srgb_to_oklab(255, 255, 255);
        assert!((lab.l - 1.0).abs() < 0.001);
        assert!(lab.a.abs() < 0.001);
        assert!(lab.b.abs() < 0.001);
        let (r, g, b) = oklab_to_srgb(lab);
        assert_eq!((r, g, b), (255, 255, 255));
    }

    #[test]
    fn primary_roundtrips() {
        for (r, g, b) in [(255u8, 0u8, 0u8), (0, 255, 0), (0, 0, 255)] {
            let (rr, gg, bb) = oklab_to_srgb(srgb_to_oklab(r, g, b));
            assert!((rr as i16 - r as i16).unsigned_abs() <= 1);
            assert!((gg as i16 - g as i16).unsigned_abs() <= 1);
            assert!((bb as i16 - b as i16).unsigned_abs() <= 1);
        }
    }

    #[test]
    fn distance_symmetric() {
        let a = srgb_to_oklab(255, 0, 0);
        let b = srgb_to_oklab(0, 0, 255);
        assert!((a.distance_sq(b) - b.distance_sq(a)).abs() < 1e-10);
    }

    #[test]
    fn similar_colors_small_distance() {
        let a = srgb_to_oklab(100, 100, 100);
        let b = srgb_to_oklab(101, 100, 100);
        let far = srgb_to_oklab(200, 50, 50);
        assert!(a.distance_sq(b) < a.distance_sq(far));
    }

    #[test]
    fn hsl_achromatic() {
        let (h, s, l) = rgb_to_hsl(128, 128, 128);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((l - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(hsl_to_rgb(0.0, 0.0, l), (128, 128, 128));
    }

    #[test]
    fn hsl_roundtrip_saturated() {
        for (r, g, b) in [
            (255u8, 0u8, 0u8),
            (0, 255, 0),
            (0, 0, 255),
            (255, 255, 0),
            (13, 105, 171),
            (196, 40, 27),
        ] {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let (rr, gg, bb) = hsl_to_rgb(h, s, l);
            assert!((rr as i16 - r as i16).unsigned_abs() <= 1, "r {r} -> {rr}");
            assert!((gg as i16 - g as i16).unsigned_abs() <= 1, "g {g} -> {gg}");
            assert!((bb as i16 - b as i16).unsigned_abs() <= 1, "b {b} -> {bb}");
        }
    }

    #[test]
    fn hsl_hue_sectors() {
        // Pure red sits at h=0, green at 1/3, blue at 2/3
        assert!((rgb_to_hsl(255, 0, 0).0 - 0.0).abs() < 1e-6);
        assert!((rgb_to_hsl(0, 255, 0).0 - 1.0 / 3.0).abs() < 1e-6);
        assert!((rgb_to_hsl(0, 0, 255).0 - 2.0 / 3.0).abs() < 1e-6);
    }
}
