//! Trainable filters over corpus directories

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::classifier::Classifier;
use super::features::FeatureExtractor;
use super::optimizer::{OptimizationOutcome, ThresholdOptimizer};
use super::parser::MessageParser;
use super::profile::{LearnedProfile, ProfileBuilder};
use super::types::{FlagVector, Label, ThresholdVector, POSITIVE_TAG};
use crate::config::FilterConfig;
use crate::corpus::{Classification, Corpus, Email};
use crate::error::{FilterError, Result};

/// A filter that can learn from one corpus and label another
pub trait SpamFilter {
    fn name(&self) -> &str;

    /// Learn from the labeled corpus at `dir`
    fn train(&mut self, dir: &Path) -> Result<()>;

    /// Label every message at `dir` and write the prediction file
    fn test(&mut self, dir: &Path) -> Result<()>;
}

/// Profile and thresholds produced by training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub profile: LearnedProfile,
    pub thresholds: ThresholdVector,
}

impl TrainedModel {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            FilterError::Model(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FilterError::Model(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Adaptive flag-threshold filter
pub struct HeuristicFilter {
    config: FilterConfig,
    model: TrainedModel,
    last_outcome: Option<OptimizationOutcome>,
}

impl HeuristicFilter {
    pub fn new(config: FilterConfig) -> Self {
        let profile = LearnedProfile::untrained(&config.subject);
        Self {
            config,
            model: TrainedModel {
                profile,
                thresholds: ThresholdVector::default(),
            },
            last_outcome: None,
        }
    }

    /// Wrap an already trained model
    pub fn with_model(config: FilterConfig, model: TrainedModel) -> Self {
        Self {
            config,
            model,
            last_outcome: None,
        }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn profile(&self) -> &LearnedProfile {
        &self.model.profile
    }

    pub fn thresholds(&self) -> &ThresholdVector {
        &self.model.thresholds
    }

    /// Search history of the most recent training run
    pub fn last_outcome(&self) -> Option<&OptimizationOutcome> {
        self.last_outcome.as_ref()
    }

    fn corpus(&self, dir: &Path) -> Corpus {
        Corpus::with_config(dir, self.config.corpus.clone())
    }

    /// Train with an injected generator for the threshold search
    pub fn train_with_rng<R: Rng + ?Sized>(&mut self, dir: &Path, rng: &mut R) -> Result<()> {
        let corpus = self.corpus(dir);
        info!("Training on {}", dir.display());

        let (spams, hams) = corpus.split_by_truth()?;
        let profile = ProfileBuilder::new(&self.config.subject).build(&spams, &hams);

        let samples = Self::flag_emails(&profile, &corpus.emails()?);
        let truth = corpus.truth()?;
        let outcome = ThresholdOptimizer::from_config(&self.config.training).optimize(
            &samples,
            &truth,
            ThresholdVector::default(),
            rng,
        )?;

        self.model = TrainedModel {
            profile,
            thresholds: outcome.thresholds,
        };
        self.last_outcome = Some(outcome);

        Ok(())
    }

    /// Label messages with the current model
    pub fn predict(&self, emails: &[Email]) -> Classification {
        Self::flag_emails(&self.model.profile, emails)
            .into_iter()
            .map(|(id, flags)| {
                let label = Classifier::classify(&flags, &self.model.thresholds);
                (id, label.as_str().to_string())
            })
            .collect()
    }

    /// Label one raw message
    pub fn classify_raw(&self, raw: &str) -> Label {
        let extractor = FeatureExtractor::new(&self.model.profile);
        let flags = extractor.extract(&MessageParser::parse(raw));
        Classifier::classify(&flags, &self.model.thresholds)
    }

    fn flag_emails(profile: &LearnedProfile, emails: &[Email]) -> Vec<(String, FlagVector)> {
        let extractor = FeatureExtractor::new(profile);
        emails
            .iter()
            .map(|email| {
                let parsed = MessageParser::parse(&email.raw);
                (email.id.clone(), extractor.extract(&parsed))
            })
            .collect()
    }
}

impl Default for HeuristicFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl SpamFilter for HeuristicFilter {
    fn name(&self) -> &str {
        "HeuristicFilter"
    }

    fn train(&mut self, dir: &Path) -> Result<()> {
        let mut rng = match self.config.training.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.train_with_rng(dir, &mut rng)
    }

    fn test(&mut self, dir: &Path) -> Result<()> {
        let corpus = self.corpus(dir);
        let predictions = self.predict(&corpus.emails()?);

        let spam = predictions
            .values()
            .filter(|label| label.as_str() == POSITIVE_TAG)
            .count();
        info!(
            "Classified {} messages in {} ({} spam)",
            predictions.len(),
            dir.display(),
            spam
        );

        corpus.write_predictions(&predictions)
    }
}
