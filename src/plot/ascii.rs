//! ASCII plotting of per-step RMSE for the terminal.
//!
//! Fixed-size grid, deterministic output (helpful for golden tests).
//!
//! Plot elements:
//! - one marker per strategy and step (`*`, `o`, `+`, ...)
//! - `.` segments joining the steps of each strategy
//! - step labels under the grid and a legend line

use crate::domain::StrategyScores;

const MARKERS: [char; 6] = ['*', 'o', '+', 'x', '#', '@'];

/// Render the per-step RMSE of every strategy on one chart.
///
/// `step_labels` names the x positions (weekday names); missing labels are
/// left blank.
pub fn render_step_plot(
    scores: &[StrategyScores],
    step_labels: &[String],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let steps = scores
        .iter()
        .map(|s| s.report.per_step.len())
        .max()
        .unwrap_or(0);
    let x_max = steps.saturating_sub(1).max(1) as f64;

    let (y_min, y_max) = y_range(scores).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let positions: Vec<Vec<(usize, usize)>> = scores
        .iter()
        .map(|s| {
            s.report
                .per_step
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    (
                        map_x(i as f64, 0.0, x_max, width),
                        map_y(v, y_min, y_max, height),
                    )
                })
                .collect()
        })
        .collect();

    // Segments first so markers overlay them.
    for pts in &positions {
        for seg in pts.windows(2) {
            draw_line(&mut grid, seg[0].0, seg[0].1, seg[1].0, seg[1].1, '.');
        }
    }
    for (k, pts) in positions.iter().enumerate() {
        let marker = MARKERS[k % MARKERS.len()];
        for &(x, y) in pts {
            grid[y][x] = marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!("Plot: per-step RMSE | y=[{y_min:.2}, {y_max:.2}]\n"));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&axis_labels(step_labels, steps, x_max, width));
    out.push('\n');

    let legend: Vec<String> = scores
        .iter()
        .enumerate()
        .map(|(k, s)| format!("{} {}", MARKERS[k % MARKERS.len()], s.name))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(" | ")));

    out
}

/// Labels placed under their step; a label that would overlap a previous
/// one is dropped.
fn axis_labels(step_labels: &[String], steps: usize, x_max: f64, width: usize) -> String {
    let mut row = vec![' '; width];
    let mut next_free = 0;

    for (i, label) in step_labels.iter().take(steps).enumerate() {
        let len = label.chars().count();
        if len == 0 || len > width {
            continue;
        }
        let x = map_x(i as f64, 0.0, x_max, width).min(width - len);
        if x < next_free {
            continue;
        }
        for (j, ch) in label.chars().enumerate() {
            row[x + j] = ch;
        }
        next_free = x + len + 1;
    }

    row.into_iter().collect::<String>().trim_end().to_string()
}

fn y_range(scores: &[StrategyScores]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for v in scores.iter().flat_map(|s| s.report.per_step.iter()) {
        min_y = min_y.min(*v);
        max_y = max_y.max(*v);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat profile: centre it.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
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
    use crate::domain::ScoreReport;

    fn scores(name: &str, per_step: Vec<f64>) -> StrategyScores {
        StrategyScores {
            name: name.to_string(),
            report: ScoreReport {
                overall: 0.0,
                per_step,
            },
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let input = vec![scores("a", vec![1.0, 2.0, 3.0]), scores("b", vec![3.0, 3.0, 3.0])];
        let txt = render_step_plot(&input, &labels(&["sun", "mon", "tue"]), 21, 5);
        let expected = concat!(
            "Plot: per-step RMSE | y=[0.90, 3.10]\n",
            "o.........o.........o\n",
            "             .....   \n",
            "        ..*..        \n",
            "   .....             \n",
            "*..                  \n",
            "sun       mon     tue\n",
            "Legend: * a | o b\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn overlapping_labels_are_dropped() {
        let row = axis_labels(&labels(&["sun", "mon", "tue"]), 3, 2.0, 10);
        assert_eq!(row, "sun  mon");
    }

    #[test]
    fn flat_profile_is_centred() {
        let input = vec![scores("flat", vec![10.0; 7])];
        let txt = render_step_plot(&input, &[], 14, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Plot: per-step RMSE | y=[8.90, 11.10]");
        assert_eq!(lines[3], "*.*.*..*.*.*.*");
        assert_eq!(lines[7], "Legend: * flat");
    }
}
