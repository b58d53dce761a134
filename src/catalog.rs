//! Reference brick catalog: the color set physical pieces come in.
//!
//! Codes are the 1..N defaults printed on build sheets; a supplier import can
//! override them per color.

/// One catalog color: display name, approximate sRGB value, build-sheet code,
/// and whether the piece is translucent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub rgb: [u8; 3],
    pub code: u32,
    pub is_translucent: bool,
}

/// The built-in reference catalog, ordered dark to light roughly the way the
/// physical assortments ship.
pub const REFERENCE_CATALOG: &[CatalogEntry] = &[
    CatalogEntry { name: "Black", rgb: [33, 32, 35], code: 1, is_translucent: false },
    CatalogEntry { name: "Very Dark Blue", rgb: [16, 42, 61], code: 2, is_translucent: false },
    CatalogEntry { name: "Dark Bluish Gray", rgb: [99, 95, 98], code: 3, is_translucent: false },
    CatalogEntry { name: "Light Bluish Gray", rgb: [182, 185, 189], code: 4, is_translucent: false },
    CatalogEntry { name: "Nougat", rgb: [204, 142, 105], code: 5, is_translucent: false },
    CatalogEntry { name: "Reddish Brown", rgb: [105, 64, 40], code: 6, is_translucent: false },
    CatalogEntry { name: "Dark Tan", rgb: [162, 140, 117], code: 7, is_translucent: false },
    CatalogEntry { name: "Tan", rgb: [215, 197, 153], code: 8, is_translucent: false },
    CatalogEntry { name: "Dark Orange", rgb: [160, 80, 0], code: 9, is_translucent: false },
    CatalogEntry { name: "Orange", rgb: [218, 133, 65], code: 10, is_translucent: false },
    CatalogEntry { name: "Dark Red", rgb: [123, 46, 47], code: 11, is_translucent: false },
    CatalogEntry { name: "Red", rgb: [196, 40, 27], code: 12, is_translucent: false },
    CatalogEntry { name: "Sand Green", rgb: [120, 144, 130], code: 13, is_translucent: false },
    CatalogEntry { name: "Dark Green", rgb: [0, 69, 26], code: 14, is_translucent: false },
    CatalogEntry { name: "Green", rgb: [40, 127, 70], code: 15, is_translucent: false },
    CatalogEntry { name: "Lime", rgb: [164, 189, 71], code: 16, is_translucent: false },
    CatalogEntry { name: "Dark Blue", rgb: [0, 70, 173], code: 17, is_translucent: false },
    CatalogEntry { name: "Blue", rgb: [13, 105, 171], code: 18, is_translucent: false },
    CatalogEntry { name: "Light Blue", rgb: [180, 210, 228], code: 19, is_translucent: false },
    CatalogEntry { name: "Pink", rgb: [255, 152, 213], code: 20, is_translucent: false },
    CatalogEntry { name: "Yellow", rgb: [245, 205, 47], code: 21, is_translucent: false },
    CatalogEntry { name: "Bright Light Yellow", rgb: [255, 255, 153], code: 22, is_translucent: false },
    CatalogEntry { name: "Beige", rgb: [230, 220, 200], code: 23, is_translucent: false },
    CatalogEntry { name: "White", rgb: [242, 243, 242], code: 24, is_translucent: false },
];

/// Parse a `#rrggbb` or `rrggbb` hex string into an RGB triple.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let s = hex.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some([r, g, b])
}
