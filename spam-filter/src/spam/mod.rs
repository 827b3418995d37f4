//! Spam filtering module
//!
//! Adaptive flag-threshold classification: suspicious patterns are mined
//! from a labeled corpus, per-feature thresholds are tuned by a randomized
//! hill-climb, and messages are labeled by counting threshold strikes.

pub mod baseline;
pub mod classifier;
pub mod features;
pub mod filter;
pub mod optimizer;
pub mod parser;
pub mod profile;
pub mod quality;
pub mod types;

pub use baseline::{NaiveFilter, ParanoidFilter, RandomFilter};
pub use classifier::Classifier;
pub use features::{extract_links, FeatureExtractor};
pub use filter::{HeuristicFilter, SpamFilter, TrainedModel};
pub use optimizer::{IterationRecord, OptimizationOutcome, ThresholdOptimizer};
pub use parser::{MessageParser, ParsedMessage};
pub use profile::{LearnedProfile, ProfileBuilder, CANDIDATE_CHARS};
pub use quality::{
    compute_quality, compute_quality_for_corpus, quality_score, ConfusionCounts, ConfusionMatrix,
};
pub use types::*;
