//! Stock-constrained reallocation: when a color's demand exceeds the pieces
//! actually on hand, over-cap cells move to the nearest color that still has
//! supply.
//!
//! This is a greedy local heuristic, not a global optimum: it can leave a
//! deficit unmet when every perceptually-near alternative is also exhausted,
//! and that outcome is reported rather than treated as a failure.

use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// Outcome of a reallocation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    /// Every color ended at or under its cap.
    Satisfied,
    /// Some demand could not be placed anywhere; the buffer is best-effort.
    Partial { deficits: Vec<StockDeficit> },
}

impl StockStatus {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, StockStatus::Satisfied)
    }
}

/// Residual demand for one over-cap color after reallocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDeficit {
    pub index: u16,
    pub label: String,
    /// Cells still assigned to this color beyond its cap.
    pub unplaced: u32,
}

/// Reassign over-cap cells in place and report whether caps were honored.
///
/// For each color whose usage exceeds its `stock_limit`, cells are visited in
/// buffer order and moved to the nearest *other* color (OKLab distance) with
/// remaining capacity. Counts are only moved between colors, never created
/// or destroyed.
pub fn reallocate(indices: &mut [u16], palette: &Palette) -> StockStatus {
    let mut usage = vec![0u32; palette.len()];
    for &i in indices.iter() {
        usage[i as usize] += 1;
    }

    let mut deficits = Vec::new();

    for src in 0..palette.len() {
        let Some(cap) = palette.entries()[src].stock_limit else {
            continue;
        };
        if usage[src] <= cap {
            continue;
        }
        let mut deficit = usage[src] - cap;
        let src_lab = palette.entries_oklab()[src];

        for cell in 0..indices.len() {
            if deficit == 0 {
                break;
            }
            if indices[cell] as usize != src {
                continue;
            }

            // Nearest other color with room left; ties go to the lowest index.
            let mut best: Option<(u16, f32)> = None;
            for dst in 0..palette.len() {
                if dst == src {
                    continue;
                }
                let has_room = match palette.entries()[dst].stock_limit {
                    None => true,
                    Some(c) => usage[dst] < c,
                };
                if !has_room {
                    continue;
                }
                let d = palette.distance_sq(src_lab, dst as u16);
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((dst as u16, d));
                }
            }

            let Some((dst, _)) = best else {
                // No destination has capacity; further cells can't fare better.
                break;
            };

            indices[cell] = dst;
            usage[src] -= 1;
            usage[dst as usize] += 1;
            deficit -= 1;
        }

        if deficit > 0 {
            tracing::warn!(
                color = %palette.entries()[src].label,
                unplaced = deficit,
                "stock cap could not be fully honored"
            );
            deficits.push(StockDeficit {
                index: src as u16,
                label: palette.entries()[src].label.clone(),
                unplaced: deficit,
            });
        }
    }

    if deficits.is_empty() {
        StockStatus::Satisfied
    } else {
        StockStatus::Partial { deficits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteEntry;

    fn usage_of(indices: &[u16], n: usize) -> Vec<u32> {
        let mut usage = vec![0u32; n];
        for &i in indices {
            usage[i as usize] += 1;
        }
        usage
    }

    #[test]
    fn caps_at_natural_usage_change_nothing() {
        let palette = Palette::new(vec![
            PaletteEntry::new("Black", [0, 0, 0]).with_stock_limit(3),
            PaletteEntry::new("White", [255, 255, 255]).with_stock_limit(1),
        ]);
        let mut indices = vec![0u16, 0, 1, 0];
        let before = indices.clone();
        let status = reallocate(&mut indices, &palette);
        assert_eq!(status, StockStatus::Satisfied);
        assert_eq!(indices, before);
    }

    #[test]
    fn zero_cap_empties_the_color() {
        let palette = Palette::new(vec![
            PaletteEntry::new("Black", [0, 0, 0]).with_stock_limit(0),
            PaletteEntry::new("Dark Gray", [60, 60, 60]),
            PaletteEntry::new("White", [255, 255, 255]),
        ]);
        let mut indices = vec![0u16, 2, 0, 2];
        let status = reallocate(&mut indices, &palette);
        assert!(status.is_satisfied());
        let usage = usage_of(&indices, 3);
        assert_eq!(usage[0], 0);
        // Black's cells went to the perceptually nearest color, dark gray
        assert_eq!(usage[1], 2);
        assert_eq!(usage[2], 2);
    }

    #[test]
    fn reallocation_preserves_total_count() {
        let palette = Palette::new(vec![
            PaletteEntry::new("Red", [196, 40, 27]).with_stock_limit(2),
            PaletteEntry::new("Dark Red", [123, 46, 47]),
            PaletteEntry::new("Blue", [13, 105, 171]).with_stock_limit(1),
        ]);
        let mut indices = vec![0u16, 0, 0, 0, 2, 2, 1];
        let total = indices.len();
        reallocate(&mut indices, &palette);
        let usage = usage_of(&indices, 3);
        assert_eq!(usage.iter().sum::<u32>() as usize, total);
        assert!(usage[0] <= 2);
        assert!(usage[2] <= 1);
    }

    #[test]
    fn satisfied_pass_is_idempotent() {
        let palette = Palette::new(vec![
            PaletteEntry::new("Red", [196, 40, 27]).with_stock_limit(2),
            PaletteEntry::new("Dark Red", [123, 46, 47]),
        ]);
        let mut indices = vec![0u16, 0, 0, 0];
        let status = reallocate(&mut indices, &palette);
        assert!(status.is_satisfied());
        let settled = indices.clone();
        let second = reallocate(&mut indices, &palette);
        assert!(second.is_satisfied());
        assert_eq!(indices, settled);
    }

    #[test]
    fn exhausted_alternatives_report_partial() {
        let palette = Palette::new(vec![
            PaletteEntry::new("Black", [0, 0, 0]).with_stock_limit(1),
            PaletteEntry::new("White", [255, 255, 255]).with_stock_limit(1),
        ]);
        let mut indices = vec![0u16, 0, 0, 1];
        let status = reallocate(&mut indices, &palette);
        match status {
            StockStatus::Partial { deficits } => {
                assert_eq!(deficits.len(), 1);
                assert_eq!(deficits[0].index, 0);
                assert_eq!(deficits[0].label, "Black");
                assert_eq!(deficits[0].unplaced, 2);
            }
            StockStatus::Satisfied => panic!("expected partial status"),
        }
        // Best-effort buffer still accounts for every cell
        assert_eq!(usage_of(&indices, 2).iter().sum::<u32>(), 4);
    }

    #[test]
    fn uncapped_palette_is_always_satisfied() {
        let palette = Palette::new(vec![
            PaletteEntry::new("A", [10, 10, 10]),
            PaletteEntry::new("B", [200, 200, 200]),
        ]);
        let mut indices = vec![0u16; 100];
        assert!(reallocate(&mut indices, &palette).is_satisfied());
        assert_eq!(indices, vec![0u16; 100]);
    }
}
