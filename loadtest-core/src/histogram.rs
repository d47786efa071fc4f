use std::fmt;

const BAR_WIDTH: usize = 50;

/// Equal-width latency histogram. Built once from a sample copy and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    min: f64,
    bin_width: f64,
    counts: Vec<u64>,
}

impl Histogram {
    /// Partitions `samples` (milliseconds) into `bins` equal-width bins.
    ///
    /// Empty input, or zero bins, yields an empty histogram. When every sample is equal the
    /// bin width is zero and all samples land in the first bin.
    pub fn build(samples: &[f64], bins: usize) -> Self {
        if samples.is_empty() || bins == 0 {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (min, max) = match (sorted.first(), sorted.last()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Self::default(),
        };
        let bin_width = (max - min) / bins as f64;

        let mut counts = vec![0u64; bins];
        for v in &sorted {
            let idx = if bin_width > 0.0 {
                // Float rounding at `max` can land one past the last bin.
                (((v - min) / bin_width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }

        Self {
            min,
            bin_width,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// `[low, high)` bounds of bin `i`, in milliseconds.
    pub fn bounds(&self, i: usize) -> (f64, f64) {
        let low = self.min + i as f64 * self.bin_width;
        (low, low + self.bin_width)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No data available for histogram");
        }

        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);

        writeln!(f, "Response Time Histogram:")?;
        for (i, &count) in self.counts.iter().enumerate() {
            let (low, high) = self.bounds(i);
            let bar_len = (count as f64 / peak as f64 * BAR_WIDTH as f64) as usize;
            writeln!(
                f,
                "{low:>8.2} ms - {high:>8.2} ms | {} ({count})",
                "#".repeat(bar_len)
            )?;
        }
        Ok(())
    }
}
