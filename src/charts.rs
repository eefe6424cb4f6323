//! Demonstration data for the charts view, plus the small statistics the charts need.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

pub const TABLE_ROWS: usize = 100;
pub const HISTOGRAM_SAMPLES: usize = 1000;
pub const HISTOGRAM_BINS: usize = 30;
pub const STACKED_ROWS: usize = 10;
pub const BUBBLE_COUNT: usize = 50;

pub const GENRE_SHARES: [(&str, u64); 5] = [
    ("Action", 25),
    ("Comedy", 30),
    ("Drama", 20),
    ("Fantasy", 15),
    ("Sci-Fi", 10),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    GenreShare,
    Histogram,
    BoxPlot,
    Scatter,
    Heatmap,
    Violin,
    Area,
    StackedBar,
    Bubble,
}

impl ChartKind {
    pub const ALL: [ChartKind; 11] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::GenreShare,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Scatter,
        ChartKind::Heatmap,
        ChartKind::Violin,
        ChartKind::Area,
        ChartKind::StackedBar,
        ChartKind::Bubble,
    ];

    pub fn as_display(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart (a, b, c)",
            ChartKind::GenreShare => "Genre Distribution",
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::Scatter => "Scatter Plot (a vs b)",
            ChartKind::Heatmap => "Correlation Heatmap",
            ChartKind::Violin => "Violin (density)",
            ChartKind::Area => "Area Chart",
            ChartKind::StackedBar => "Stacked Bar Chart",
            ChartKind::Bubble => "Bubble Chart",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Three named columns of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct Table3 {
    pub names: [&'static str; 3],
    pub columns: [Vec<f64>; 3],
}

impl Table3 {
    fn normal<R: Rng + ?Sized>(rng: &mut R, names: [&'static str; 3], rows: usize) -> Self {
        let columns = [
            normal_samples(rng, rows),
            normal_samples(rng, rows),
            normal_samples(rng, rows),
        ];
        Self { names, columns }
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoData {
    pub table: Table3,
    pub histogram_samples: Vec<f64>,
    pub area: Vec<f64>,
    pub stacked: Table3,
    pub bubbles: Vec<Bubble>,
}

impl DemoData {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let table = Table3::normal(rng, ["a", "b", "c"], TABLE_ROWS);
        let histogram_samples = normal_samples(rng, HISTOGRAM_SAMPLES);
        let area = normal_samples(rng, TABLE_ROWS);
        let stacked = Table3::normal(rng, ["X", "Y", "Z"], STACKED_ROWS);
        let bubbles = (0..BUBBLE_COUNT)
            .map(|_| Bubble {
                x: rng.random::<f64>(),
                y: rng.random::<f64>(),
                size: rng.random::<f64>() * 1000.0,
            })
            .collect();

        Self {
            table,
            histogram_samples,
            area,
            stacked,
            bubbles,
        }
    }
}

fn normal_samples<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| StandardNormal.sample(rng)).collect()
}

/// Equal-width bins over the sample range, as `(bin_start, count)`
pub fn histogram(samples: &[f64], bins: usize) -> Vec<(f64, u64)> {
    if samples.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut counts = vec![0u64; bins];
    for &s in samples {
        // max lands in the last bin
        let idx = (((s - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (min + i as f64 * width, c))
        .collect()
}

/// Histogram normalised to a density: points at bin centres, area under the curve is 1
pub fn density_curve(samples: &[f64], bins: usize) -> Vec<(f64, f64)> {
    let hist = histogram(samples, bins);
    if hist.len() < 2 {
        return hist.into_iter().map(|(x, _)| (x, 1.0)).collect();
    }
    let width = hist[1].0 - hist[0].0;
    let total = samples.len() as f64;
    hist.into_iter()
        .map(|(start, count)| (start + width / 2.0, count as f64 / (total * width)))
        .collect()
}

/// `[min, max]` of the values, widened when they are all equal
pub fn value_bounds(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        return [min - 0.5, max + 0.5];
    }
    [min, max]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn five_number_summary(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(BoxStats {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear interpolation between closest ranks, `sorted` must be non-empty
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<Option<f64>>> {
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

/// Percent share of each label, rounded to one decimal place
pub fn share_percentages(shares: &[(&'static str, u64)]) -> Vec<(&'static str, f64)> {
    let total: u64 = shares.iter().map(|(_, n)| n).sum();
    shares
        .iter()
        .map(|(label, n)| {
            let pct = if total == 0 {
                0.0
            } else {
                (*n as f64 * 1000.0 / total as f64).round() / 10.0
            };
            (*label, pct)
        })
        .collect()
}
