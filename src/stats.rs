// src/stats.rs

use serde::{Deserialize, Serialize};

use crate::histogram::Histogram;

/// Summary statistics of an accumulated histogram, computed from bin centers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramStats {
    pub bins: usize,
    pub occupied_bins: usize,
    pub total: f64,
    pub min_edge: f64,
    pub max_edge: f64,

    // Moments over bin centers, weighted by counts. NaN when the histogram is empty.
    pub mean: f64,
    pub std_dev: f64,

    /// The fullest bin, as (center, count). The first one wins on ties.
    pub mode: Option<(f64, f64)>,
}

impl HistogramStats {
    pub fn from_histogram(hist: &Histogram) -> Self {
        let counts = hist.counts();
        let centers = hist.centers();
        let total = hist.total();

        let (mean, std_dev) = if total > 0.0 {
            let mean = centers
                .iter()
                .zip(counts)
                .map(|(c, n)| c * n)
                .sum::<f64>()
                / total;
            let var = centers
                .iter()
                .zip(counts)
                .map(|(c, n)| n * (c - mean).powi(2))
                .sum::<f64>()
                / total;
            (mean, var.sqrt())
        } else {
            (f64::NAN, f64::NAN)
        };

        let mode = centers
            .iter()
            .zip(counts)
            .filter(|(_, n)| **n > 0.0)
            .fold(None, |best: Option<(f64, f64)>, (&c, &n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((c, n)),
            });

        Self {
            bins: hist.len(),
            occupied_bins: counts.iter().filter(|&&n| n != 0.0).count(),
            total,
            min_edge: hist.edges().min(),
            max_edge: hist.edges().max(),
            mean,
            std_dev,
            mode,
        }
    }

    /// Multi-line, human readable report.
    pub fn generate_report(&self, label: &str) -> String {
        let mut report = String::new();

        report.push_str(&format!("\n{}\n", label));
        report.push_str(&format!("{}\n", "=".repeat(label.len())));
        report.push_str(&format!(
            "Bins: {} over [{}, {}]\n",
            self.bins, self.min_edge, self.max_edge
        ));
        report.push_str(&format!(
            "- Occupied bins: {} ({:.2}%)\n",
            self.occupied_bins,
            self.occupied_bins as f64 / self.bins as f64 * 100.0
        ));
        report.push_str(&format!("- Total: {}\n", self.total));

        if self.total > 0.0 {
            report.push_str(&format!("- Mean: {:.4}\n", self.mean));
            report.push_str(&format!("- Std dev: {:.4}\n", self.std_dev));
        }
        if let Some((center, count)) = self.mode {
            report.push_str(&format!("- Mode: bin at {} with {}\n", center, count));
        }

        report
    }

    /// Print a condensed summary to stderr.
    pub fn print_summary(&self, label: &str) {
        eprintln!(
            "{}: total {} in {}/{} bins, mean {:.4}, std dev {:.4}",
            label, self.total, self.occupied_bins, self.bins, self.mean, self.std_dev
        );
    }
}
