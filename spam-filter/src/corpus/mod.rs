//! Labeled mail corpora
//!
//! A corpus is a directory of raw messages plus reserved control files:
//! - [`classification`]: two-column `id label` truth/prediction files
//! - [`directory`]: message enumeration and ground-truth lookup

pub mod classification;
pub mod directory;

pub use classification::{read_classification, write_classification, Classification};
pub use directory::{Corpus, Email};
