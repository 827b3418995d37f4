use super::types::{Feature, FlagVector, Label, ThresholdVector};

/// Strike-count classifier over flag and threshold vectors
pub struct Classifier;

impl Classifier {
    /// Minimum number of strikes for a spam verdict: a third of the
    /// features, rounded.
    pub fn cutoff() -> usize {
        (Feature::ALL.len() as f64 / 3.0).round() as usize
    }

    /// Number of features whose flag strictly exceeds its threshold
    pub fn strikes(flags: &FlagVector, thresholds: &ThresholdVector) -> usize {
        Feature::ALL
            .iter()
            .filter(|&&feature| flags.get(feature) > thresholds.get(feature))
            .count()
    }

    pub fn classify(flags: &FlagVector, thresholds: &ThresholdVector) -> Label {
        if Self::strikes(flags, thresholds) >= Self::cutoff() {
            Label::Spam
        } else {
            Label::Ok
        }
    }
}
