//! Spam types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag written for messages classified as spam
pub const POSITIVE_TAG: &str = "SPAM";
/// Tag written for legitimate messages
pub const NEGATIVE_TAG: &str = "OK";

/// Binary classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Spam,
    Ok,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => POSITIVE_TAG,
            Label::Ok => NEGATIVE_TAG,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            POSITIVE_TAG => Ok(Label::Spam),
            NEGATIVE_TAG => Ok(Label::Ok),
            other => Err(format!("Unknown label: {}", other)),
        }
    }
}

/// The six message features the filter scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Headers,
    Domains,
    Subject,
    UppercaseRatio,
    CharOcc,
    Links,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Headers,
        Feature::Domains,
        Feature::Subject,
        Feature::UppercaseRatio,
        Feature::CharOcc,
        Feature::Links,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Headers => "headers",
            Feature::Domains => "domains",
            Feature::Subject => "subject",
            Feature::UppercaseRatio => "uppercase_ratio",
            Feature::CharOcc => "char_occ",
            Feature::Links => "links",
        }
    }
}

/// One non-negative integer per feature.
///
/// Used both for per-message flag counts and for learned thresholds, so the
/// two always share the same key set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub headers: u32,
    pub domains: u32,
    pub subject: u32,
    pub uppercase_ratio: u32,
    pub char_occ: u32,
    pub links: u32,
}

/// Per-message feature counts
pub type FlagVector = FeatureVector;

/// Per-feature limits above which a flag counts as a strike
pub type ThresholdVector = FeatureVector;

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> u32 {
        match feature {
            Feature::Headers => self.headers,
            Feature::Domains => self.domains,
            Feature::Subject => self.subject,
            Feature::UppercaseRatio => self.uppercase_ratio,
            Feature::CharOcc => self.char_occ,
            Feature::Links => self.links,
        }
    }

    pub fn get_mut(&mut self, feature: Feature) -> &mut u32 {
        match feature {
            Feature::Headers => &mut self.headers,
            Feature::Domains => &mut self.domains,
            Feature::Subject => &mut self.subject,
            Feature::UppercaseRatio => &mut self.uppercase_ratio,
            Feature::CharOcc => &mut self.char_occ,
            Feature::Links => &mut self.links,
        }
    }

    pub fn set(&mut self, feature: Feature, value: u32) {
        *self.get_mut(feature) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, u32)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.get(f)))
    }
}
