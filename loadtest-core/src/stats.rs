/// Nearest-rank percentile over an ascending-sorted slice: `sorted[floor(p / 100 * (n - 1))]`.
///
/// No interpolation between ranks. `None` on empty input.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let idx = ((p.clamp(0.0, 100.0) / 100.0) * last as f64).floor() as usize;
    sorted.get(idx.min(last)).copied()
}

/// Median of an ascending-sorted slice; averages the two middle samples for even lengths.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Latency distribution summary, all values in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyDistribution {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl LatencyDistribution {
    /// Sorts `samples` and summarizes them. `None` when there are no samples.
    pub fn from_samples(mut samples: Vec<f64>) -> Option<Self> {
        samples.sort_by(f64::total_cmp);

        let count = samples.len();
        let min = *samples.first()?;
        let max = *samples.last()?;
        let mean = samples.iter().sum::<f64>() / count as f64;

        Some(Self {
            count,
            min,
            max,
            mean,
            median: median(&samples)?,
            p50: percentile(&samples, 50.0)?,
            p95: percentile(&samples, 95.0)?,
            p99: percentile(&samples, 99.0)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rank_percentiles() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&sorted, 50.0), Some(30.0));
        assert_eq!(percentile(&sorted, 95.0), Some(40.0));
        assert_eq!(percentile(&sorted, 99.0), Some(40.0));
        assert_eq!(percentile(&sorted, 100.0), Some(50.0));
        assert_eq!(percentile(&sorted, 0.0), Some(10.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn median_of_even_and_odd_lengths() {
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn distribution_sorts_its_input() {
        let d = LatencyDistribution::from_samples(vec![50.0, 10.0, 40.0, 20.0, 30.0]);
        assert_eq!(
            d,
            Some(LatencyDistribution {
                count: 5,
                min: 10.0,
                max: 50.0,
                mean: 30.0,
                median: 30.0,
                p50: 30.0,
                p95: 40.0,
                p99: 40.0,
            })
        );
    }

    #[test]
    fn single_sample_and_empty() {
        let d = LatencyDistribution::from_samples(vec![7.5]);
        assert!(matches!(d, Some(d) if d.min == 7.5 && d.p99 == 7.5 && d.median == 7.5));
        assert_eq!(LatencyDistribution::from_samples(Vec::new()), None);
    }
}
