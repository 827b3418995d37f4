//! Asymmetric quality metric for binary spam verdicts

use tracing::debug;

use super::types::{NEGATIVE_TAG, POSITIVE_TAG};
use crate::corpus::{Classification, Corpus};
use crate::error::{FilterError, Result};

/// Cost of a false positive relative to a false negative
pub const FALSE_POSITIVE_WEIGHT: u64 = 10;

/// Raw confusion counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
}

impl ConfusionCounts {
    pub fn quality(&self) -> f64 {
        quality_score(self.tp, self.tn, self.fp, self.fn_)
    }
}

/// `(tp + tn) / (tp + tn + 10 fp + fn)`; 0 when nothing was counted
pub fn quality_score(tp: u64, tn: u64, fp: u64, fn_: u64) -> f64 {
    let denominator = tp + tn + FALSE_POSITIVE_WEIGHT * fp + fn_;
    if denominator == 0 {
        return 0.0;
    }
    (tp + tn) as f64 / denominator as f64
}

/// Confusion matrix over a designated positive and negative tag
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    pos_tag: String,
    neg_tag: String,
    counts: ConfusionCounts,
}

impl ConfusionMatrix {
    pub fn new(pos_tag: impl Into<String>, neg_tag: impl Into<String>) -> Self {
        Self {
            pos_tag: pos_tag.into(),
            neg_tag: neg_tag.into(),
            counts: ConfusionCounts::default(),
        }
    }

    fn is_known(&self, tag: &str) -> bool {
        tag == self.pos_tag || tag == self.neg_tag
    }

    /// Count one (truth, prediction) pair. Unknown tags are rejected
    /// without touching any counter.
    pub fn update(&mut self, truth: &str, prediction: &str) -> Result<()> {
        if !self.is_known(truth) || !self.is_known(prediction) {
            return Err(FilterError::InvalidLabel {
                truth: truth.to_string(),
                prediction: prediction.to_string(),
            });
        }

        let hit = truth == prediction;
        let counter = match (truth == self.pos_tag, hit) {
            (true, true) => &mut self.counts.tp,
            (true, false) => &mut self.counts.fn_,
            (false, true) => &mut self.counts.tn,
            (false, false) => &mut self.counts.fp,
        };
        *counter += 1;

        Ok(())
    }

    /// Update once per truth entry
    pub fn compute_from_maps(
        &mut self,
        truth: &Classification,
        predictions: &Classification,
    ) -> Result<()> {
        for (id, label) in truth {
            let prediction = predictions
                .get(id)
                .ok_or_else(|| FilterError::MissingPrediction(id.clone()))?;
            self.update(label, prediction)?;
        }
        Ok(())
    }

    pub fn as_counts(&self) -> ConfusionCounts {
        self.counts
    }

    pub fn quality(&self) -> f64 {
        self.counts.quality()
    }
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        Self::new(POSITIVE_TAG, NEGATIVE_TAG)
    }
}

/// Score predictions against ground truth
pub fn compute_quality(truth: &Classification, predictions: &Classification) -> Result<f64> {
    let mut matrix = ConfusionMatrix::default();
    matrix.compute_from_maps(truth, predictions)?;
    Ok(matrix.quality())
}

/// Score a corpus. Without explicit predictions the corpus prediction file
/// is read.
pub fn compute_quality_for_corpus(
    corpus: &Corpus,
    predictions: Option<&Classification>,
) -> Result<f64> {
    let truth = corpus.truth()?;
    let quality = match predictions {
        Some(predictions) => compute_quality(&truth, predictions)?,
        None => compute_quality(&truth, &corpus.read_predictions()?)?,
    };

    debug!("Quality for {}: {:.4}", corpus.path().display(), quality);
    Ok(quality)
}
