//! Anti-singleton smoothing: isolated single-cell color outliers read as
//! noise once built from physical pieces, so a post-pass replaces them with
//! the local majority.

/// One snapshot pass over the index buffer.
///
/// A cell keeps its color only if at least two in-bounds 4-neighbors share
/// it; otherwise it takes the most frequent color among its neighbors, ties
/// broken by first-encountered in scan order right, left, down, up. Reads
/// come entirely from the pre-pass state.
pub fn anti_singleton(indices: &[u16], width: usize, height: usize) -> Vec<u16> {
    debug_assert_eq!(indices.len(), width * height);
    let mut out = indices.to_vec();

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let current = indices[i];

            // Neighbor scan order fixes tie-breaking: right, left, down, up.
            let mut neighbors = [0u16; 4];
            let mut n = 0;
            if x + 1 < width {
                neighbors[n] = indices[i + 1];
                n += 1;
            }
            if x > 0 {
                neighbors[n] = indices[i - 1];
                n += 1;
            }
            if y + 1 < height {
                neighbors[n] = indices[i + width];
                n += 1;
            }
            if y > 0 {
                neighbors[n] = indices[i - width];
                n += 1;
            }
            let neighbors = &neighbors[..n];

            let same = neighbors.iter().filter(|&&c| c == current).count();
            if same >= 2 {
                continue;
            }

            // Majority among present neighbors, first-encountered wins ties.
            let mut best = current;
            let mut best_count = 0;
            for (j, &candidate) in neighbors.iter().enumerate() {
                if neighbors[..j].contains(&candidate) {
                    continue; // already counted
                }
                let count = neighbors.iter().filter(|&&c| c == candidate).count();
                if count > best_count {
                    best_count = count;
                    best = candidate;
                }
            }
            out[i] = best;
        }
    }

    out
}
