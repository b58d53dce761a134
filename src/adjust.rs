//! Per-pixel image adjustments applied to the grid-sized buffer before
//! quantization: gray-world white balance, brightness, contrast, gamma,
//! saturation, and unsharp-mask sharpening.
//!
//! Each stage clamps its output to 0..255; intermediates run in f32 and may
//! overflow freely within a stage. Alpha passes through untouched.

use rgb::RGBA;

use crate::colorspace::{hsl_to_rgb, rgb_to_hsl};

/// Gray-world white balance: scale each channel so the three channel means
/// converge on their common average.
pub fn gray_world_balance(pixels: &mut [RGBA<u8>]) {
    if pixels.is_empty() {
        return;
    }
    let n = pixels.len() as f64;
    let (mut r_sum, mut g_sum, mut b_sum) = (0.0f64, 0.0f64, 0.0f64);
    for p in pixels.iter() {
        r_sum += p.r as f64;
        g_sum += p.g as f64;
        b_sum += p.b as f64;
    }
    let avg = (r_sum + g_sum + b_sum) / (3.0 * n);
    // A channel that is entirely zero gets gain 1 rather than a division blowup
    let gain = |sum: f64| if sum > 0.0 { (avg / (sum / n)) as f32 } else { 1.0 };
    let (rg, gg, bg) = (gain(r_sum), gain(g_sum), gain(b_sum));

    for p in pixels.iter_mut() {
        p.r = (p.r as f32 * rg).clamp(0.0, 255.0) as u8;
        p.g = (p.g as f32 * gg).clamp(0.0, 255.0) as u8;
        p.b = (p.b as f32 * bg).clamp(0.0, 255.0) as u8;
    }
}

/// Brightness add, contrast scale, and gamma curve, in that order.
///
/// `brightness` is an additive offset in -100..100. `contrast` uses the
/// standard factor `259(C+255) / (255(259-C))` with C in -100..100. `gamma`
/// is clamped to 0.5..2.5 and applied as `255·(v/255)^(1/γ)`.
pub fn apply_tone(pixels: &mut [RGBA<u8>], brightness: f32, contrast: f32, gamma: f32) {
    let c = contrast.clamp(-100.0, 100.0);
    let b = brightness.clamp(-100.0, 100.0);
    let g = gamma.clamp(0.5, 2.5);
    if b == 0.0 && c == 0.0 && (g - 1.0).abs() < 1e-3 {
        return;
    }

    let factor = 259.0 * (c + 255.0) / (255.0 * (259.0 - c));
    let inv_gamma = 1.0 / g;

    for p in pixels.iter_mut() {
        let mut channel = |v: u8| -> u8 {
            let mut f = v as f32 + b;
            f = factor * (f - 128.0) + 128.0;
            f = f.clamp(0.0, 255.0);
            f = 255.0 * (f / 255.0).powf(inv_gamma);
            f.round().clamp(0.0, 255.0) as u8
        };
        p.r = channel(p.r);
        p.g = channel(p.g);
        p.b = channel(p.b);
    }
}

/// Saturation shift in HSL space.
///
/// Positive amounts (0..100) pull saturation multiplicatively toward 1,
/// negative amounts toward 0. Zero is an exact no-op (no HSL round trip).
pub fn apply_saturation(pixels: &mut [RGBA<u8>], amount: f32) {
    let amount = amount.clamp(-100.0, 100.0);
    if amount == 0.0 {
        return;
    }

    for p in pixels.iter_mut() {
        let (h, s, l) = rgb_to_hsl(p.r, p.g, p.b);
        let s = if amount >= 0.0 {
            1.0 - (1.0 - s) * (1.0 - amount / 100.0)
        } else {
            s * (1.0 + amount / 100.0)
        }
        .clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        p.r = r;
        p.g = g;
        p.b = b;
    }
}

/// Unsharp-mask sharpening: subtract a separable 5-tap Gaussian blur from the
/// original and add back the scaled difference, per channel.
///
/// `amount` is 0..100; 0 is a no-op. Edges replicate the border pixel.
pub fn sharpen(pixels: &mut [RGBA<u8>], width: usize, height: usize, amount: f32) {
    let strength = amount.clamp(0.0, 100.0) / 100.0;
    if strength <= 0.0 || pixels.is_empty() {
        return;
    }

    const KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

    let mut horiz = vec![[0.0f32; 3]; pixels.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, w) in KERNEL.iter().enumerate() {
                let sx = (x as isize + k as isize - 2).clamp(0, width as isize - 1) as usize;
                let p = pixels[y * width + sx];
                acc[0] += p.r as f32 * w;
                acc[1] += p.g as f32 * w;
                acc[2] += p.b as f32 * w;
            }
            horiz[y * width + x] = acc;
        }
    }

    let mut blurred = vec![[0.0f32; 3]; pixels.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, w) in KERNEL.iter().enumerate() {
                let sy = (y as isize + k as isize - 2).clamp(0, height as isize - 1) as usize;
                let h = horiz[sy * width + x];
                acc[0] += h[0] * w;
                acc[1] += h[1] * w;
                acc[2] += h[2] * w;
            }
            blurred[y * width + x] = acc;
        }
    }

    for (p, blur) in pixels.iter_mut().zip(&blurred) {
        let sharp = |orig: u8, blurred: f32| -> u8 {
            let o = orig as f32;
            (o + strength * (o - blurred)).clamp(0.0, 255.0).round() as u8
        };
        p.r = sharp(p.r, blur[0]);
        p.g = sharp(p.g, blur[1]);
        p.b = sharp(p.b, blur[2]);
    }
}
