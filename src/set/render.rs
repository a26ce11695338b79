//! Textual dumps of fuzzy sets

use std::fmt;

use super::FuzzySet;

impl fmt::Display for FuzzySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for p in &self.points {
            write!(f, " ({}, {})", p.x, p.y)?;
        }
        write!(f, " }}")
    }
}

impl FuzzySet {
    /// ASCII chart of the membership function over its breakpoint range
    pub fn plot(&self, width: usize, height: usize) -> String {
        let (lo, hi) = match self.x_range() {
            Some((lo, hi)) if hi > lo => (lo, hi),
            Some((x, _)) => (x - 1.0, x + 1.0),
            None => (0.0, 1.0),
        };
        self.plot_range(lo, hi, width, height)
    }

    /// ASCII chart of the membership function over `[lo, hi]`
    pub fn plot_range(&self, lo: f64, hi: f64, width: usize, height: usize) -> String {
        let width = width.max(2);
        let height = height.max(2);
        let mut grid = vec![vec![' '; width]; height];

        let step = (hi - lo) / (width - 1) as f64;
        for column in 0..width {
            let x = lo + step * column as f64;
            let y = self.membership(x);
            let row = ((1.0 - y) * (height - 1) as f64).round() as usize;
            grid[row.min(height - 1)][column] = '*';
        }
        // mark breakpoints that fall between sample columns
        for x in self.distinct_xs() {
            if x < lo || x > hi || step <= 0.0 {
                continue;
            }
            let column = (((x - lo) / step).round() as usize).min(width - 1);
            let row = ((1.0 - self.membership(x)) * (height - 1) as f64).round() as usize;
            grid[row.min(height - 1)][column] = '*';
        }

        let mut out = String::with_capacity((width + 8) * (height + 2));
        for (i, row) in grid.iter().enumerate() {
            let label = if i == 0 {
                "1.00"
            } else if i == height - 1 {
                "0.00"
            } else {
                ""
            };
            out.push_str(&format!("{:>4} |", label));
            out.extend(row.iter());
            out.push('\n');
        }
        out.push_str("     +");
        out.push_str(&"-".repeat(width));
        out.push('\n');

        let (left, right) = (format_bound(lo), format_bound(hi));
        let gap = width.saturating_sub(left.len() + right.len()).max(1);
        out.push_str(&format!("      {}{}{}\n", left, " ".repeat(gap), right));
        out
    }
}

fn format_bound(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{:.2}", x)
    }
}
