//! Per-color usage counts: the parts list behind the legend and build sheets.
//!
//! Counts are always recomputed from the index buffer so they can never
//! drift from the plan they describe.

use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// One line of the parts list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorUsage {
    /// Index into the active palette.
    pub index: u16,
    pub label: String,
    /// The code printed on build sheets, when one exists.
    pub code: Option<u32>,
    pub count: u32,
}

/// Raw usage count per palette entry, in palette order.
pub fn tally(indices: &[u16], palette_len: usize) -> Vec<u32> {
    let mut counts = vec![0u32; palette_len];
    for &i in indices {
        counts[i as usize] += 1;
    }
    counts
}

/// The parts list: per-color usage sorted by descending count, unused colors
/// omitted. Equal counts keep palette order so output is reproducible.
pub fn usage_report(indices: &[u16], palette: &Palette) -> Vec<ColorUsage> {
    let counts = tally(indices, palette.len());
    let mut report: Vec<ColorUsage> = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(i, &count)| ColorUsage {
            index: i as u16,
            label: palette.entries()[i].label.clone(),
            code: palette.entries()[i].display_code(),
            count,
        })
        .collect();
    report.sort_by(|a, b| b.count.cmp(&a.count).then(a.index.cmp(&b.index)));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteEntry;

    fn palette() -> Palette {
        Palette::new(vec![
            PaletteEntry::new("Black", [0, 0, 0]).with_code(1),
            PaletteEntry::new("Red", [196, 40, 27]).with_code(12),
            PaletteEntry::new("White", [242, 243, 242]).with_code(24),
        ])
    }

    #[test]
    fn tally_covers_every_cell() {
        let indices = vec![0u16, 1, 1, 2, 1, 0];
        let counts = tally(&indices, 3);
        assert_eq!(counts, vec![2, 3, 1]);
        assert_eq!(counts.iter().sum::<u32>() as usize, indices.len());
    }

    #[test]
    fn report_sorts_descending_and_skips_unused() {
        let indices = vec![0u16, 1, 1, 1, 0, 1];
        let report = usage_report(&indices, &palette());
        assert_eq!(report.len(), 2); // White unused
        assert_eq!(report[0].label, "Red");
        assert_eq!(report[0].code, Some(12));
        assert_eq!(report[0].count, 4);
        assert_eq!(report[1].label, "Black");
        assert_eq!(report[1].count, 2);
    }

    #[test]
    fn report_code_prefers_supplier_over_catalog() {
        let mut entry = PaletteEntry::new("House Red", [197, 41, 28]).with_code(12);
        entry.supplier_code = Some(77);
        let palette = Palette::new(vec![entry]);
        let report = usage_report(&[0, 0], &palette);
        assert_eq!(report[0].code, Some(77));
    }

    #[test]
    fn equal_counts_keep_palette_order() {
        let indices = vec![2u16, 0, 2, 0];
        let report = usage_report(&indices, &palette());
        assert_eq!(report[0].label, "Black");
        assert_eq!(report[1].label, "White");
    }
}
