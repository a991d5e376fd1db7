use ndarray::ArrayView1;
use serde::Serialize;

use crate::adjustment::{PASS_THRESHOLD, SCORE_MAXIMUM, SCORE_MINIMUM};

pub const BIN_COUNT: usize = 10;
pub const BIN_LABELS: [&str; BIN_COUNT] = [
    "0-10", "10-20", "20-30", "30-40", "40-50", "50-60", "60-70", "70-80", "80-90", "90-100",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub mean: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub std_dev: f64,
    pub pass_count: usize,
    pub fail_count: usize,
    /// Percentage of passing scores, 0 to 100.
    pub pass_rate: f64,
    pub histogram: Histogram,
}

impl Statistics {
    /// Summarizes adjusted scores, `None` when there is nothing to summarize.
    pub fn compute(scores: &[f64]) -> Option<Self> {
        let scores_view = ArrayView1::from(scores);

        let mean = scores_view.mean()?;
        let std_dev = scores_view.std(0.0);
        let minimum = scores_view.fold(f64::INFINITY, |minimum, &score| minimum.min(score));
        let maximum = scores_view.fold(f64::NEG_INFINITY, |maximum, &score| maximum.max(score));

        let pass_count = scores.iter().filter(|&&score| score >= PASS_THRESHOLD).count();
        let fail_count = scores.len() - pass_count;

        Some(Statistics {
            count: scores.len(),
            mean,
            minimum,
            maximum,
            std_dev,
            pass_count,
            fail_count,
            pass_rate: pass_count as f64 * 100.0 / scores.len() as f64,
            histogram: Histogram::from_scores(scores),
        })
    }
}

/// Counts over ten bins of width ten, the last bin includes 100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub counts: [usize; BIN_COUNT],
}

impl Histogram {
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut counts = [0; BIN_COUNT];

        for &score in scores {
            // scores outside the range are not counted
            if !(SCORE_MINIMUM..=SCORE_MAXIMUM).contains(&score) {
                continue;
            }
            let bin = ((score / 10.0).floor() as usize).min(BIN_COUNT - 1);
            counts[bin] += 1;
        }

        Histogram { counts }
    }

    pub fn bins(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        BIN_LABELS.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailingStudent {
    pub name: String,
    pub score: f64,
}

/// Every student below the pass threshold, in roster order.
pub fn failing_students<S: AsRef<str>>(names: &[S], scores: &[f64]) -> Vec<FailingStudent> {
    names
        .iter()
        .zip(scores.iter())
        .filter(|(_, score)| **score < PASS_THRESHOLD)
        .map(|(name, &score)| FailingStudent {
            name: name.as_ref().to_owned(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{failing_students, Histogram, Statistics};

    #[test]
    fn statistics_of_adjusted_scores() {
        let statistics = Statistics::compute(&[50.0, 50.0, 50.0, 70.0, 70.0]).unwrap();

        assert_eq!(statistics.count, 5);
        assert_eq!(statistics.mean, 58.0);
        assert_eq!(statistics.minimum, 50.0);
        assert_eq!(statistics.maximum, 70.0);
        assert_eq!(statistics.pass_count, 2);
        assert_eq!(statistics.fail_count, 3);
        assert_eq!(statistics.pass_rate, 40.0);
        assert!((statistics.std_dev - 96.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn no_statistics_for_empty_scores() {
        assert!(Statistics::compute(&[]).is_none());
    }

    #[test]
    fn threshold_counts_as_pass() {
        let statistics = Statistics::compute(&[59.999, 60.0]).unwrap();

        assert_eq!(statistics.pass_count, 1);
        assert_eq!(statistics.fail_count, 1);
        assert_eq!(statistics.pass_rate, 50.0);
    }

    #[test]
    fn histogram_bins_are_half_open_except_last() {
        let histogram = Histogram::from_scores(&[0.0, 9.99, 10.0, 59.9, 60.0, 90.0, 99.5, 100.0]);

        assert_eq!(histogram.counts, [2, 1, 0, 0, 0, 1, 1, 0, 0, 3]);
        assert_eq!(histogram.max_count(), 3);
    }

    #[test]
    fn histogram_ignores_out_of_range_scores() {
        let histogram = Histogram::from_scores(&[-0.5, 100.5, 42.0]);

        assert_eq!(histogram.counts.iter().sum::<usize>(), 1);
        assert_eq!(histogram.counts[4], 1);
    }

    #[test]
    fn histogram_labels_line_up_with_counts() {
        let histogram = Histogram::from_scores(&[65.0]);

        let (label, count) = histogram.bins().nth(6).unwrap();

        assert_eq!(label, "60-70");
        assert_eq!(count, 1);
    }

    #[test]
    fn failing_students_keep_roster_order() {
        let names = ["carla", "ben", "ada", "dan"];
        let scores = [59.0, 75.0, 12.0, 60.0];

        let failing = failing_students(&names, &scores);

        let failing_names: Vec<&str> = failing.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failing_names, vec!["carla", "ada"]);
        assert_eq!(failing[1].score, 12.0);
    }
}
