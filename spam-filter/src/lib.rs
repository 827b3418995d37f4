//! spam-filter: adaptive flag-threshold spam filter
//!
//! Classifies mail as spam or legitimate with learned heuristic thresholds
//! rather than a statistical model.
//!
//! # Pipeline
//!
//! - **Training**: mine suspicious headers, sender domains, links and
//!   character baselines from a labeled corpus, then tune one threshold per
//!   feature with a randomized hill-climb scored by corpus quality
//! - **Testing**: flag every message against the frozen profile and label
//!   it spam when enough features exceed their thresholds
//!
//! # Example
//!
//! ```no_run
//! use spam_filter::spam::{compute_quality_for_corpus, HeuristicFilter, SpamFilter};
//! use spam_filter::corpus::Corpus;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut filter = HeuristicFilter::default();
//!     filter.train(Path::new("data/1"))?;
//!     filter.test(Path::new("data/2"))?;
//!
//!     let quality = compute_quality_for_corpus(&Corpus::new("data/2"), None)?;
//!     println!("Score: {:.2} %", quality * 100.0);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`corpus`]: Corpus directories and truth/prediction files
//! - [`error`]: Error types and handling
//! - [`spam`]: Parsing, features, training and classification

pub mod config;
pub mod corpus;
pub mod error;
pub mod spam;

// Re-export commonly used types
pub use config::FilterConfig;
pub use error::{FilterError, Result};
