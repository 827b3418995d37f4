//! Suspicious-pattern mining over a labeled training corpus

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use super::features::{count_char, extract_links, sender_domain, uppercase_ratio};
use super::parser::MessageParser;
use crate::config::SubjectConfig;
use crate::corpus::Email;

/// Characters whose per-message frequency is tracked
pub const CANDIDATE_CHARS: [char; 10] = ['!', '.', '=', '^', '~', ':', '%', '|', '\n', '\t'];

/// Patterns and baselines learned from training data.
///
/// Built once per training run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedProfile {
    pub suspicious_headers: BTreeSet<String>,
    pub suspicious_domains: BTreeSet<String>,
    pub suspicious_links: BTreeSet<String>,
    /// Lower-case subject keywords, from configuration
    pub subject_keywords: BTreeSet<String>,
    /// Lower-case subject phrases, from configuration
    pub subject_phrases: BTreeSet<String>,
    /// Mean body upper-case ratio over spam
    pub uppercase_ratio: f64,
    /// Allowed occurrences per candidate character
    pub char_baseline: BTreeMap<char, u32>,
}

impl LearnedProfile {
    /// Profile of a filter that has not been trained yet
    pub fn untrained(subject: &SubjectConfig) -> Self {
        Self {
            suspicious_headers: BTreeSet::new(),
            suspicious_domains: BTreeSet::new(),
            suspicious_links: BTreeSet::new(),
            subject_keywords: subject.keywords.iter().map(|k| k.to_lowercase()).collect(),
            subject_phrases: subject.phrases.iter().map(|p| p.to_lowercase()).collect(),
            uppercase_ratio: 1.0,
            char_baseline: CANDIDATE_CHARS.iter().map(|&c| (c, 0)).collect(),
        }
    }
}

impl Default for LearnedProfile {
    fn default() -> Self {
        Self::untrained(&SubjectConfig::default())
    }
}

/// Aggregates collected over one side (spam or ham) of the corpus
#[derive(Default)]
struct SideStats {
    messages: usize,
    header_names: BTreeSet<String>,
    char_totals: HashMap<char, u64>,
    uppercase_ratios: Vec<f64>,
    domains: BTreeSet<String>,
    links: BTreeSet<String>,
}

impl SideStats {
    fn collect(emails: &[Email]) -> Self {
        let mut stats = Self::default();

        for email in emails {
            let parsed = MessageParser::parse(&email.raw);

            stats.messages += 1;
            stats.header_names.extend(parsed.headers.keys().cloned());
            for c in CANDIDATE_CHARS {
                *stats.char_totals.entry(c).or_insert(0) += count_char(&email.raw, c) as u64;
            }
            stats.uppercase_ratios.push(uppercase_ratio(&parsed.body));
            stats
                .links
                .extend(extract_links(&email.raw).into_iter().map(str::to_string));
            if let Some(domain) = sender_domain(&parsed.headers) {
                stats.domains.insert(domain.to_string());
            }
        }

        stats
    }

    fn char_total(&self, c: char) -> u64 {
        self.char_totals.get(&c).copied().unwrap_or(0)
    }
}

/// Builds a [`LearnedProfile`] from spam and ham samples
pub struct ProfileBuilder<'a> {
    subject: &'a SubjectConfig,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(subject: &'a SubjectConfig) -> Self {
        Self { subject }
    }

    pub fn build(&self, spams: &[Email], hams: &[Email]) -> LearnedProfile {
        let spam = SideStats::collect(spams);
        let ham = SideStats::collect(hams);

        let mut profile = LearnedProfile::untrained(self.subject);
        profile.char_baseline = Self::char_baseline(&spam, &ham);

        if !spam.uppercase_ratios.is_empty() {
            profile.uppercase_ratio =
                spam.uppercase_ratios.iter().sum::<f64>() / spam.uppercase_ratios.len() as f64;
        }

        // Any header ever seen in ham is considered benign
        profile.suspicious_headers = spam
            .header_names
            .difference(&ham.header_names)
            .cloned()
            .collect();
        profile.suspicious_domains = spam.domains;
        profile.suspicious_links = spam.links;

        info!(
            "Profile built from {} spam / {} ham: {} headers, {} domains, {} links, uppercase baseline {:.3}",
            spam.messages,
            ham.messages,
            profile.suspicious_headers.len(),
            profile.suspicious_domains.len(),
            profile.suspicious_links.len(),
            profile.uppercase_ratio
        );
        debug!("Character baseline: {:?}", profile.char_baseline);

        profile
    }

    /// Spam-dominant characters get a zero allowance; the rest get the
    /// floored ham average.
    fn char_baseline(spam: &SideStats, ham: &SideStats) -> BTreeMap<char, u32> {
        let spam_dominant: BTreeSet<char> = CANDIDATE_CHARS
            .iter()
            .copied()
            .filter(|&c| spam.char_total(c) > ham.char_total(c))
            .collect();

        let ham_average: BTreeMap<char, u32> = CANDIDATE_CHARS
            .iter()
            .copied()
            .filter(|c| !spam_dominant.contains(c))
            .map(|c| {
                let average = match ham.messages {
                    0 => 0,
                    n => ham.char_total(c) / n as u64,
                };
                (c, u32::try_from(average).unwrap_or(u32::MAX))
            })
            .collect();

        spam_dominant
            .into_iter()
            .map(|c| (c, 0))
            .chain(ham_average)
            .collect()
    }
}
