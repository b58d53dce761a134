//! Best-effort parsing of free-text supplier color lists, and correlation of
//! the result against the reference catalog.
//!
//! Supplier pastes come in no fixed grammar — "Black #212023 1", "5 Trans
//! Red", bare names — so extraction is heuristic: hex swatch first, then the
//! first short bare integer as the supplier code, the rest as the name.
//! Lines are never dropped and parsing never fails; anything unusable gets a
//! placeholder plus a warning the caller can surface.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{hex_to_rgb, CatalogEntry};
use crate::palette::{Palette, PaletteEntry};

/// Neutral gray used when a line carries no parseable color.
pub const PLACEHOLDER_RGB: [u8; 3] = [128, 128, 128];

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#?\b[0-9A-Fa-f]{6}\b").expect("valid hex pattern"));
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,4}\b").expect("valid code pattern"));
static TRANS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)trans|transparent|satin|neon").expect("valid trans pattern"));

/// One supplier line after extraction, before catalog correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSupplierEntry {
    pub name: String,
    pub rgb: [u8; 3],
    pub supplier_code: Option<u32>,
    pub is_translucent: bool,
}

/// A non-fatal problem with one supplier line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierWarning {
    /// 1-based line number in the pasted text.
    pub line: usize,
    pub message: String,
}

/// Parse result: every non-blank line yields an entry, problems yield warnings.
#[derive(Debug, Clone, Default)]
pub struct ParsedSupplierList {
    pub entries: Vec<RawSupplierEntry>,
    pub warnings: Vec<SupplierWarning>,
}

/// Parse pasted supplier text, one color per non-blank line.
pub fn parse_supplier_list(text: &str) -> ParsedSupplierList {
    let mut result = ParsedSupplierList::default();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut remainder = line.to_string();

        let hex_token = match HEX_RE.find(&remainder) {
            Some(m) => {
                let range = m.range();
                let token = remainder[range.clone()].to_string();
                remainder.replace_range(range, "");
                Some(token)
            }
            None => None,
        };
        let rgb = match hex_token.as_deref().and_then(hex_to_rgb) {
            Some(rgb) => rgb,
            None => {
                result.warnings.push(SupplierWarning {
                    line: line_no,
                    message: format!("no usable color swatch in {raw_line:?}; using neutral gray"),
                });
                PLACEHOLDER_RGB
            }
        };

        let supplier_code = match CODE_RE.find(&remainder) {
            Some(m) => {
                let code = m.as_str().parse::<u32>().ok();
                remainder.replace_range(m.range(), "");
                code
            }
            None => None,
        };

        let name = remainder
            .trim_matches(|c: char| c.is_whitespace() || "-;,:|.()[]".contains(c))
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let name = if name.is_empty() {
            let placeholder = format!("Color {}", result.entries.len() + 1);
            result.warnings.push(SupplierWarning {
                line: line_no,
                message: format!("no usable name in {raw_line:?}; using {placeholder:?}"),
            });
            placeholder
        } else {
            name
        };

        let is_translucent = TRANS_RE.is_match(&name);

        result.entries.push(RawSupplierEntry {
            name,
            rgb,
            supplier_code,
            is_translucent,
        });
    }

    for w in &result.warnings {
        tracing::warn!(line = w.line, "{}", w.message);
    }

    result
}

/// Correlate supplier entries against a reference catalog.
///
/// Each supplier color is matched to the nearest catalog entry by squared
/// RGB distance and its code recorded in `catalog_code`. The supplier's own
/// integer, when the line carried one, stays in `supplier_code`; neither
/// overwrites the other. Which of the two prints on build sheets is decided
/// at display time by [`PaletteEntry::display_code`].
pub fn correlate(entries: &[RawSupplierEntry], catalog: &[CatalogEntry]) -> Palette {
    let palette_entries = entries
        .iter()
        .map(|entry| {
            let nearest = nearest_catalog(entry.rgb, catalog);
            PaletteEntry {
                label: entry.name.clone(),
                rgb: entry.rgb,
                catalog_code: nearest.map(|c| c.code),
                is_translucent: entry.is_translucent,
                supplier_code: entry.supplier_code,
                stock_limit: None,
            }
        })
        .collect();
    Palette::new(palette_entries)
}

fn nearest_catalog(rgb: [u8; 3], catalog: &[CatalogEntry]) -> Option<&CatalogEntry> {
    let mut best: Option<(&CatalogEntry, i32)> = None;
    for entry in catalog {
        let dr = entry.rgb[0] as i32 - rgb[0] as i32;
        let dg = entry.rgb[1] as i32 - rgb[1] as i32;
        let db = entry.rgb[2] as i32 - rgb[2] as i32;
        let d = dr * dr + dg * dg + db * db;
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((entry, d));
        }
    }
    best.map(|(e, _)| e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::REFERENCE_CATALOG;

    #[test]
    fn well_formed_line() {
        let parsed = parse_supplier_list("Dark Red #7B2E2F 11");
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.entries.len(), 1);
        let e = &parsed.entries[0];
        assert_eq!(e.name, "Dark Red");
        assert_eq!(e.rgb, [0x7B, 0x2E, 0x2F]);
        assert_eq!(e.supplier_code, Some(11));
        assert!(!e.is_translucent);
    }

    #[test]
    fn name_only_line_gets_placeholder_color_and_warning() {
        let parsed = parse_supplier_list("Sand Green");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].rgb, PLACEHOLDER_RGB);
        assert_eq!(parsed.entries[0].supplier_code, None);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 1);
    }

    #[test]
    fn nameless_line_gets_generated_placeholder() {
        let parsed = parse_supplier_list("#C4281B 12");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].name, "Color 1");
        assert_eq!(parsed.entries[0].rgb, [196, 40, 27]);
        assert_eq!(parsed.entries[0].supplier_code, Some(12));
        // The placeholder name is itself a warning
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn translucency_is_detected_in_names() {
        let parsed = parse_supplier_list(
            "Trans-Red #C8323C 40\nSatin White #F2F3F2 41\nNeon Green #9AFF4C 42\nRed #C4281B 12",
        );
        let flags: Vec<bool> = parsed.entries.iter().map(|e| e.is_translucent).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn code_only_extracted_once_and_short() {
        // 6-digit runs are hex territory, not codes; only 1-4 digit integers count
        let parsed = parse_supplier_list("Blue 18 special 23");
        let e = &parsed.entries[0];
        assert_eq!(e.supplier_code, Some(18));
        assert_eq!(e.name, "Blue special 23");
    }

    #[test]
    fn blank_and_whitespace_lines_are_skipped() {
        let parsed = parse_supplier_list("\n   \nWhite #F2F3F2 24\n\n");
        assert_eq!(parsed.entries.len(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn empty_text_yields_empty_list() {
        let parsed = parse_supplier_list("");
        assert!(parsed.entries.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn correlate_picks_nearest_catalog_color() {
        let parsed = parse_supplier_list("My Red #C5291C\nMy Blue #0E69AC");
        let palette = correlate(&parsed.entries, REFERENCE_CATALOG);
        assert_eq!(palette.len(), 2);
        // No supplier code on the lines, so the matched catalog codes show
        assert_eq!(palette.entries()[0].catalog_code, Some(12)); // Red
        assert_eq!(palette.entries()[1].catalog_code, Some(18)); // Blue
        // Supplier color is kept, not replaced by the catalog swatch
        assert_eq!(palette.entries()[0].rgb, [0xC5, 0x29, 0x1C]);
    }

    #[test]
    fn supplier_code_displays_without_erasing_catalog_match() {
        let parsed = parse_supplier_list("House Red #C5291C 77");
        let palette = correlate(&parsed.entries, REFERENCE_CATALOG);
        let entry = &palette.entries()[0];
        // The nearest catalog color (Red, code 12) stays recorded even though
        // the supplier's own 77 is what build sheets show
        assert_eq!(entry.catalog_code, Some(12));
        assert_eq!(entry.supplier_code, Some(77));
        assert_eq!(entry.display_code(), Some(77));
    }

    #[test]
    fn correlate_empty_input_yields_empty_palette() {
        let palette = correlate(&[], REFERENCE_CATALOG);
        assert!(palette.is_empty());
    }
}
