//! Reporting utilities: curve statistics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::DarkEnergy;

/// Range statistics of an evaluated curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSummary {
    pub points: usize,
    pub a_min: f64,
    pub a_max: f64,
    pub w_min: f64,
    pub w_max: f64,
    /// `w` at the largest scale factor on the grid.
    pub w_today: f64,
}

/// Summarise a curve; `None` when it has no finite points.
pub fn summarize_curve(curve: &DarkEnergy) -> Option<CurveSummary> {
    let finite: Vec<(f64, f64)> = curve.points().filter(|(a, w)| a.is_finite() && w.is_finite()).collect();
    let (&first, rest) = finite.split_first()?;

    let mut s = CurveSummary {
        points: curve.len(),
        a_min: first.0,
        a_max: first.0,
        w_min: first.1,
        w_max: first.1,
        w_today: first.1,
    };
    for &(a, w) in rest {
        s.a_min = s.a_min.min(a);
        s.w_min = s.w_min.min(w);
        s.w_max = s.w_max.max(w);
        if a > s.a_max {
            s.a_max = a;
            s.w_today = w;
        }
    }
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_tracks_ranges_and_today() {
        let curve = DarkEnergy {
            a: vec![1.0, 0.5, 0.1],
            w: vec![-0.8, -1.2, -1.0],
        };
        let s = summarize_curve(&curve).unwrap();
        assert_eq!(s.points, 3);
        assert_eq!((s.a_min, s.a_max), (0.1, 1.0));
        assert_eq!((s.w_min, s.w_max), (-1.2, -0.8));
        assert_eq!(s.w_today, -0.8);
    }

    #[test]
    fn empty_curve_has_no_summary() {
        let curve = DarkEnergy { a: vec![], w: vec![] };
        assert!(summarize_curve(&curve).is_none());
    }
}
