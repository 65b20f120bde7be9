//! Step-by-step disclosure of a finished test result.
//!
//! A [`Reveal`] walks the diagnostic detail of a [`TestResult`] one element
//! per pull: one chi-square bin, one run-direction marker or one lagged
//! product. Every frame shows a prefix of the final result; nothing is
//! recomputed over a prefix of the samples, so the running totals converge
//! on the final statistic rather than on a sequence of partial statistics.

use serde::Serialize;

use crate::{Direction, TestKind, TestResult};

/// The element revealed by one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevealItem {
    /// One chi-square bin.
    Bin {
        index: usize,
        observed: u64,
        expected: f64,
        contribution: f64,
    },
    /// Direction from sample `index - 1` to sample `index`.
    Direction { index: usize, direction: Direction },
    /// Lagged product for the pair starting at sample `index`.
    Product { index: usize, value: f64 },
}

/// One step of a reveal sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealFrame {
    pub kind: TestKind,
    /// Number of elements visible after this frame (1-based).
    pub visible: usize,
    pub total: usize,
    pub item: RevealItem,
    /// Sum of the revealed chi-square contributions or lagged products.
    /// Runs have no additive statistic, so this is `None` for them.
    pub running_total: Option<f64>,
}

impl RevealFrame {
    pub fn is_last(&self) -> bool {
        self.visible == self.total
    }
}

/// Iterator over the frames of one test result.
#[derive(Debug, Clone)]
pub struct Reveal {
    result: TestResult,
    next: usize,
    running: f64,
}

/// Start revealing `result`.
pub fn reveal(result: TestResult) -> Reveal {
    Reveal::new(result)
}

impl Reveal {
    pub fn new(result: TestResult) -> Self {
        Self {
            result,
            next: 0,
            running: 0.0,
        }
    }

    /// The fixed result being revealed.
    pub fn result(&self) -> &TestResult {
        &self.result
    }

    /// Total number of frames.
    pub fn total(&self) -> usize {
        match &self.result {
            TestResult::ChiSquare(r) => r.contributions.len().min(r.observed.len()),
            TestResult::Runs(r) => r.directions.len(),
            TestResult::Autocorrelation(r) => r.products.len(),
        }
    }

    /// Frames emitted so far.
    pub fn visible(&self) -> usize {
        self.next
    }
}

impl Iterator for Reveal {
    type Item = RevealFrame;

    fn next(&mut self) -> Option<RevealFrame> {
        let total = self.total();
        if self.next >= total {
            return None;
        }
        let i = self.next;
        let (item, running_total) = match &self.result {
            TestResult::ChiSquare(r) => {
                let contribution = *r.contributions.get(i)?;
                let observed = *r.observed.get(i)?;
                self.running += contribution;
                let item = RevealItem::Bin {
                    index: i,
                    observed,
                    expected: r.expected,
                    contribution,
                };
                (item, Some(self.running))
            }
            TestResult::Runs(r) => {
                let item = RevealItem::Direction {
                    index: i + 1,
                    direction: *r.directions.get(i)?,
                };
                (item, None)
            }
            TestResult::Autocorrelation(r) => {
                let value = *r.products.get(i)?;
                self.running += value;
                (RevealItem::Product { index: i, value }, Some(self.running))
            }
        };
        self.next += 1;
        Some(RevealFrame {
            kind: self.result.kind(),
            visible: self.next,
            total,
            item,
            running_total,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Reveal {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{autocorrelation_test, chi_square_test, runs_test};

    fn samples() -> Vec<f64> {
        // two per bin, in an order with some up/down structure
        vec![
            0.05, 0.95, 0.15, 0.85, 0.25, 0.75, 0.35, 0.65, 0.45, 0.55, 0.51, 0.41, 0.61, 0.31,
            0.71, 0.21, 0.81, 0.11, 0.91, 0.01,
        ]
    }

    #[test]
    fn test_chi_square_reveal_one_bin_per_step() {
        let result = chi_square_test(&samples(), 10);
        let frames: Vec<RevealFrame> = reveal(TestResult::ChiSquare(result.clone())).collect();
        assert_eq!(frames.len(), 10);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.visible, i + 1);
            match &frame.item {
                RevealItem::Bin {
                    index, observed, ..
                } => {
                    assert_eq!(*index, i);
                    assert_eq!(*observed, result.observed[i]);
                }
                other => panic!("unexpected item {other:?}"),
            }
        }
        let last = frames.last().unwrap();
        assert!(last.is_last());
        assert!((last.running_total.unwrap() - result.statistic).abs() < 1e-12);
    }

    #[test]
    fn test_reveal_is_not_prefix_recomputation() {
        let data = samples();
        let result = chi_square_test(&data, 10);
        let first = reveal(TestResult::ChiSquare(result.clone())).next().unwrap();
        // The first frame shows the final first-bin contribution (a perfect fit: 0)...
        assert_eq!(first.running_total, Some(result.contributions[0]));
        assert_eq!(first.running_total, Some(0.0));
        // ...while testing only the first sample would report a large deviation.
        let recomputed = chi_square_test(&data[..1], 10).statistic;
        assert!((recomputed - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_runs_reveal_directions() {
        let data = samples();
        let result = runs_test(&data);
        let frames: Vec<RevealFrame> = reveal(TestResult::Runs(result.clone())).collect();
        assert_eq!(frames.len(), data.len() - 1);
        assert!(frames.iter().all(|f| f.running_total.is_none()));
        match frames[0].item {
            RevealItem::Direction { index, direction } => {
                assert_eq!(index, 1);
                assert_eq!(direction, Direction::Up);
            }
            ref other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_autocorrelation_reveal_converges_on_numerator() {
        let result = autocorrelation_test(&samples(), 1);
        let mut r = reveal(TestResult::Autocorrelation(result.clone()));
        assert_eq!(r.len(), 19);
        let last = r.by_ref().last().unwrap();
        assert!((last.running_total.unwrap() - result.numerator).abs() < 1e-12);
        assert_eq!(r.visible(), 19);
        assert!(r.next().is_none());
    }

    #[test]
    fn test_reveal_empty_runs() {
        let result = runs_test(&[]);
        assert_eq!(reveal(TestResult::Runs(result)).count(), 0);
    }

    #[test]
    fn test_reveal_leaves_result_untouched() {
        let result = chi_square_test(&samples(), 10);
        let mut r = reveal(TestResult::ChiSquare(result.clone()));
        r.by_ref().take(3).for_each(drop);
        assert_eq!(r.result().statistic(), result.statistic);
        assert_eq!(r.visible(), 3);
    }

    #[test]
    fn test_reveal_stops_at_shortest_detail_vector() {
        let mut result = chi_square_test(&samples(), 10);
        result.bins = 50;
        result.contributions.truncate(4);
        let frames: Vec<RevealFrame> = reveal(TestResult::ChiSquare(result)).collect();
        assert_eq!(frames.len(), 4);
        assert!(frames.last().unwrap().is_last());
    }
}
