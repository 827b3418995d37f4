//! Reference filters that ignore message content

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use super::filter::SpamFilter;
use super::types::Label;
use crate::config::CorpusConfig;
use crate::corpus::{Classification, Corpus};
use crate::error::Result;

fn write_constant<F>(dir: &Path, corpus: &CorpusConfig, mut label: F) -> Result<()>
where
    F: FnMut() -> Label,
{
    let corpus = Corpus::with_config(dir, corpus.clone());
    let predictions: Classification = corpus
        .emails()?
        .into_iter()
        .map(|email| (email.id, label().as_str().to_string()))
        .collect();
    corpus.write_predictions(&predictions)
}

/// Labels everything as legitimate
#[derive(Default)]
pub struct NaiveFilter {
    pub corpus: CorpusConfig,
}

impl SpamFilter for NaiveFilter {
    fn name(&self) -> &str {
        "NaiveFilter"
    }

    fn train(&mut self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn test(&mut self, dir: &Path) -> Result<()> {
        write_constant(dir, &self.corpus, || Label::Ok)
    }
}

/// Labels everything as spam
#[derive(Default)]
pub struct ParanoidFilter {
    pub corpus: CorpusConfig,
}

impl SpamFilter for ParanoidFilter {
    fn name(&self) -> &str {
        "ParanoidFilter"
    }

    fn train(&mut self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn test(&mut self, dir: &Path) -> Result<()> {
        write_constant(dir, &self.corpus, || Label::Spam)
    }
}

/// Flips a fair coin per message
pub struct RandomFilter {
    pub corpus: CorpusConfig,
    rng: StdRng,
}

impl RandomFilter {
    pub fn new(corpus: CorpusConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { corpus, rng }
    }
}

impl SpamFilter for RandomFilter {
    fn name(&self) -> &str {
        "RandomFilter"
    }

    fn train(&mut self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn test(&mut self, dir: &Path) -> Result<()> {
        let rng = &mut self.rng;
        write_constant(dir, &self.corpus, || {
            if rng.gen_bool(0.5) {
                Label::Spam
            } else {
                Label::Ok
            }
        })
    }
}
