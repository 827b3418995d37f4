use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::classification::{read_classification, write_classification, Classification};
use crate::config::CorpusConfig;
use crate::error::{FilterError, Result};
use crate::spam::Label;

/// A raw message loaded from a corpus directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// File name, unique within the corpus
    pub id: String,
    /// Full message text, headers included
    pub raw: String,
}

/// A directory of messages with reserved truth and prediction files
pub struct Corpus {
    dir: PathBuf,
    config: CorpusConfig,
}

impl Corpus {
    /// Open a corpus using the default reserved file names
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_config(dir, CorpusConfig::default())
    }

    pub fn with_config<P: Into<PathBuf>>(dir: P, config: CorpusConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn truth_path(&self) -> PathBuf {
        self.dir.join(&self.config.truth_file)
    }

    pub fn prediction_path(&self) -> PathBuf {
        self.dir.join(&self.config.prediction_file)
    }

    /// Every non-reserved regular file in the directory, sorted by id
    pub fn emails(&self) -> Result<Vec<Email>> {
        let mut emails = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let id = entry.file_name().to_string_lossy().to_string();
            if id.starts_with(&self.config.reserved_prefix) {
                continue;
            }

            let bytes = fs::read(entry.path())?;
            emails.push(Email {
                id,
                raw: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        emails.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Loaded {} messages from {}", emails.len(), self.dir.display());

        Ok(emails)
    }

    /// Ground-truth labels keyed by message id
    pub fn truth(&self) -> Result<Classification> {
        let path = self.truth_path();
        match read_classification(&path) {
            Err(FilterError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(FilterError::MissingTruthFile(path))
            }
            other => other,
        }
    }

    /// Split the corpus into (spams, hams) by ground truth.
    ///
    /// Messages without a recognised label land in neither list.
    pub fn split_by_truth(&self) -> Result<(Vec<Email>, Vec<Email>)> {
        let truth = self.truth()?;
        let mut spams = Vec::new();
        let mut hams = Vec::new();

        for email in self.emails()? {
            match truth.get(&email.id).and_then(|label| label.parse::<Label>().ok()) {
                Some(Label::Spam) => spams.push(email),
                Some(Label::Ok) => hams.push(email),
                None => warn!("Message {} has no usable label, skipping", email.id),
            }
        }

        Ok((spams, hams))
    }

    pub fn spams(&self) -> Result<Vec<Email>> {
        Ok(self.split_by_truth()?.0)
    }

    pub fn hams(&self) -> Result<Vec<Email>> {
        Ok(self.split_by_truth()?.1)
    }

    /// Ground-truth label of one message
    pub fn label_of(&self, id: &str) -> Result<Option<String>> {
        Ok(self.truth()?.remove(id))
    }

    pub fn write_predictions(&self, predictions: &Classification) -> Result<()> {
        write_classification(self.prediction_path(), predictions)
    }

    pub fn read_predictions(&self) -> Result<Classification> {
        read_classification(self.prediction_path())
    }

    /// Delete the prediction file if it exists
    pub fn remove_predictions(&self) -> Result<()> {
        match fs::remove_file(self.prediction_path()) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_corpus() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("b.eml"), "Subject: ham\n\nhello").unwrap();
        fs::write(dir.join("a.eml"), "Subject: spam\n\nBUY").unwrap();
        fs::write(dir.join("c.eml"), "Subject: unknown\n\n?").unwrap();
        fs::write(dir.join("!truth.txt"), "a.eml SPAM\nb.eml OK\nc.eml MAYBE\n").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        temp_dir
    }

    #[test]
    fn test_emails_skip_reserved_files_and_dirs() {
        let temp_dir = sample_corpus();
        let corpus = Corpus::new(temp_dir.path());

        let ids: Vec<String> = corpus.emails().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a.eml", "b.eml", "c.eml"]);
    }

    #[test]
    fn test_split_by_truth() {
        let temp_dir = sample_corpus();
        let corpus = Corpus::new(temp_dir.path());

        let (spams, hams) = corpus.split_by_truth().unwrap();
        assert_eq!(spams.len(), 1);
        assert_eq!(spams[0].id, "a.eml");
        assert_eq!(hams.len(), 1);
        assert_eq!(hams[0].raw, "Subject: ham\n\nhello");
        assert_eq!(corpus.label_of("c.eml").unwrap().as_deref(), Some("MAYBE"));
    }

    #[test]
    fn test_missing_truth_file() {
        let temp_dir = TempDir::new().unwrap();
        let corpus = Corpus::new(temp_dir.path());

        let err = corpus.truth().unwrap_err();
        assert!(matches!(err, FilterError::MissingTruthFile(_)));
    }

    #[test]
    fn test_prediction_file_lifecycle() {
        let temp_dir = sample_corpus();
        let corpus = Corpus::new(temp_dir.path());

        let mut predictions = Classification::new();
        predictions.insert("a.eml".to_string(), "SPAM".to_string());
        corpus.write_predictions(&predictions).unwrap();

        // Prediction file is reserved, never a message
        assert_eq!(corpus.emails().unwrap().len(), 3);
        assert_eq!(corpus.read_predictions().unwrap(), predictions);

        corpus.remove_predictions().unwrap();
        assert!(!corpus.prediction_path().exists());
        corpus.remove_predictions().unwrap();
    }
}
