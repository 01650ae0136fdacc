//! Per-family min-max scale normalization.
//!
//! Scales are relative to the accepted motifs of one family in one run; the
//! same motif can score differently in another run.

use crate::motif::{Motif, MotifKind};

/// `(size - min) / (max - min)`, or `1.0` when every size is equal.
pub fn normalized_scale(size: usize, min: usize, max: usize) -> f64 {
    if max > min {
        (size.saturating_sub(min)) as f64 / (max - min) as f64
    } else {
        1.0
    }
}

/// Smallest and largest size statistic among `kind`'s motifs.
pub fn family_size_range(motifs: &[Motif], kind: MotifKind) -> Option<(usize, usize)> {
    motifs
        .iter()
        .filter(|m| m.kind() == kind)
        .map(Motif::size)
        .fold(None, |range, size| match range {
            None => Some((size, size)),
            Some((lo, hi)) => Some((lo.min(size), hi.max(size))),
        })
}

/// Set every motif's scale from its family's size range.
pub fn normalize_scales(motifs: &mut [Motif]) {
    for kind in MotifKind::ALL {
        let Some((min, max)) = family_size_range(motifs, kind) else {
            continue;
        };
        for motif in motifs.iter_mut().filter(|m| m.kind() == kind) {
            let scale = normalized_scale(motif.size(), min, max);
            motif.set_scale(scale);
        }
    }
}
