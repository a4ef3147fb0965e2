//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output.
//!
//! Plot elements:
//! - curve / posterior median: `-`
//! - 1-sigma band edges: `.`

use crate::plot::posterior::{FunctionalPosterior, PosteriorCurves};

/// Render one curve, given as `(x, w)` points.
pub fn render_ascii_curve(points: &[(f64, f64)], x_label: &str, width: usize, height: usize) -> String {
    render_plot(&[(points, '-')], x_label, width, height)
}

/// Render a functional posterior: median and 1-sigma edges, or every drawn line.
pub fn render_ascii_posterior(posterior: &FunctionalPosterior, width: usize, height: usize) -> String {
    let x = &posterior.x;
    let along = |values: Vec<f64>| -> Vec<(f64, f64)> { x.iter().copied().zip(values).collect() };

    let curves: Vec<(Vec<(f64, f64)>, char)> = match &posterior.curves {
        PosteriorCurves::Bands(bands) => vec![
            (along(bands.iter().map(|b| b.median).collect()), '-'),
            (along(bands.iter().map(|b| b.lower_1sigma).collect()), '.'),
            (along(bands.iter().map(|b| b.upper_1sigma).collect()), '.'),
        ],
        PosteriorCurves::Lines(lines) => lines.iter().map(|l| (along(l.clone()), '-')).collect(),
    };
    let borrowed: Vec<(&[(f64, f64)], char)> = curves.iter().map(|(c, ch)| (c.as_slice(), *ch)).collect();
    render_plot(&borrowed, posterior.x_axis.label(), width, height)
}

fn render_plot(curves: &[(&[(f64, f64)], char)], x_label: &str, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = range(curves.iter().flat_map(|(c, _)| c.iter().map(|p| p.0))).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = match range(curves.iter().flat_map(|(c, _)| c.iter().map(|p| p.1))) {
        Some(r) => r,
        None => flat_range(curves).unwrap_or((0.0, 1.0)),
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    // Earlier curves win where they overlap.
    for (curve, ch) in curves {
        draw_curve(&mut grid, curve, (x_min, x_max), (y_min, y_max), *ch);
    }

    let mut out = format!("Plot: {x_label}=[{x_min:.3}, {x_max:.3}] | w=[{y_min:.2}, {y_max:.2}]\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Finite min/max of `values`, `None` when empty or degenerate.
fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (min.is_finite() && max > min).then_some((min, max))
}

/// Unit window around a constant curve.
fn flat_range(curves: &[(&[(f64, f64)], char)]) -> Option<(f64, f64)> {
    let y = curves.iter().flat_map(|(c, _)| c.iter()).map(|p| p.1).find(|y| y.is_finite())?;
    Some((y - 0.5, y + 0.5))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // max w on row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], xr: (f64, f64), yr: (f64, f64), ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let col = map_x(x, xr.0, xr.1, width);
        let row = map_y(y, yr.0, yr.1, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None if grid[row][col] == ' ' => grid[row][col] = ch,
            None => {}
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleTable;
    use crate::domain::{DarkKnotConfig, PlotConfig};
    use crate::plot::posterior::functional_posterior;

    #[test]
    fn flat_curve_golden_snapshot() {
        let txt = render_ascii_curve(&[(0.0, -1.0), (1.0, -1.0)], "a", 10, 5);
        let expected = concat!(
            "Plot: a=[0.000, 1.000] | w=[-1.55, -0.45]\n",
            "          \n",
            "          \n",
            "----------\n",
            "          \n",
            "          \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn rising_curve_spans_corners() {
        let txt = render_ascii_curve(&[(0.0, -1.0), (1.0, 0.0)], "a", 10, 5);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].ends_with('-'));
        assert!(rows[4].starts_with('-'));
    }

    #[test]
    fn posterior_shows_median_and_band_edges() {
        let table = SampleTable::uniform(
            vec!["wn".into()],
            [-1.3, -1.1, -1.0, -0.9, -0.7].iter().map(|&v| vec![v]).collect(),
        )
        .unwrap();
        let config = PlotConfig {
            resolution: 20,
            ..PlotConfig::default()
        };
        let post = functional_posterior(&table, &DarkKnotConfig::default(), &config).unwrap();
        let txt = render_ascii_posterior(&post, 30, 9);
        assert!(txt.starts_with("Plot: a="));
        assert!(txt.contains('-'));
        assert!(txt.contains('.'));
    }

    #[test]
    fn empty_input_renders_blank_grid() {
        let txt = render_ascii_curve(&[], "z", 10, 5);
        assert!(txt.lines().skip(1).all(|l| l.trim().is_empty()));
    }
}
