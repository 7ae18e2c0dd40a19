use std::ops::Range;

/// Degree-1 least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Closed-form ordinary least squares.
    /// Returns `None` with fewer than two distinct `x` values.
    pub fn new(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub range: Range<f64>,
    /// Normalised so the area of all bins sums to one.
    pub density: f64,
}

/// Density histogram with `bins` equal-width bins over the values' own
/// min..max. A constant series spans `v - 0.5 .. v + 0.5`. The last bin is
/// closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let Some(range) = value_range(values.iter().copied()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (low, high) = if range.start == range.end {
        (range.start - 0.5, range.end + 0.5)
    } else {
        (range.start, range.end)
    };
    let width = (high - low) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let idx = (((value - low) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let total = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            range: low + i as f64 * width..low + (i + 1) as f64 * width,
            density: count as f64 / (total * width),
        })
        .collect()
}

pub fn value_range(values: impl Iterator<Item = f64> + Clone) -> Option<Range<f64>> {
    let low = values.clone().min_by(|left, right| left.total_cmp(right))?;
    let high = values.max_by(|left, right| left.total_cmp(right))?;
    Some(low..high)
}

/// Widen `range` by `padding` on both ends.
pub fn padded(range: Range<f64>, padding: f64) -> Range<f64> {
    range.start - padding..range.end + padding
}
