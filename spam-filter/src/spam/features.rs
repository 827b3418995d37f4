//! Per-message feature extraction

use std::collections::HashMap;

use super::parser::ParsedMessage;
use super::profile::LearnedProfile;
use super::types::FlagVector;

/// Whitespace-delimited tokens starting with an http(s) scheme
pub fn extract_links(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|word| word.starts_with("http://") || word.starts_with("https://"))
        .collect()
}

/// True when upper-casing `c` leaves it unchanged. Digits, punctuation and
/// whitespace therefore count as upper-case.
pub fn is_uppercase_invariant(c: char) -> bool {
    let mut upper = c.to_uppercase();
    upper.next() == Some(c) && upper.next().is_none()
}

pub fn count_uppercase(text: &str) -> usize {
    text.chars().filter(|&c| is_uppercase_invariant(c)).count()
}

/// Share of upper-case characters; an empty text has ratio 0
pub fn uppercase_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    count_uppercase(text) as f64 / total as f64
}

pub fn count_char(text: &str, c: char) -> usize {
    text.chars().filter(|&x| x == c).count()
}

/// Text after the last `@` of the From header, trimmed
pub fn sender_domain(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .get("From")
        .and_then(|from| from.rsplit('@').next())
        .map(str::trim)
}

fn is_all_caps_word(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Computes a [`FlagVector`] for messages against a learned profile
pub struct FeatureExtractor<'a> {
    profile: &'a LearnedProfile,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(profile: &'a LearnedProfile) -> Self {
        Self { profile }
    }

    pub fn extract(&self, message: &ParsedMessage) -> FlagVector {
        FlagVector {
            headers: self.check_headers(message),
            domains: self.check_domains(message),
            subject: self.check_subject(message),
            uppercase_ratio: self.check_uppercase_ratio(message),
            char_occ: self.check_char_occ(message),
            links: self.check_links(message),
        }
    }

    fn check_headers(&self, message: &ParsedMessage) -> u32 {
        message
            .headers
            .keys()
            .filter(|name| self.profile.suspicious_headers.contains(*name))
            .count() as u32
    }

    fn check_domains(&self, message: &ParsedMessage) -> u32 {
        match sender_domain(&message.headers) {
            Some(domain) if self.profile.suspicious_domains.contains(domain) => 1,
            _ => 0,
        }
    }

    fn check_subject(&self, message: &ParsedMessage) -> u32 {
        let Some(subject) = message.header("Subject") else {
            return 0;
        };
        let lowered = subject.to_lowercase();
        let mut flags = 0;

        if self
            .profile
            .subject_phrases
            .iter()
            .any(|phrase| lowered.contains(phrase.as_str()))
        {
            flags += 1;
        }

        // Each keyword scores on its own
        flags += self
            .profile
            .subject_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .count() as u32;

        // Vacuously true when the subject has no alphabetic words
        if subject
            .split_whitespace()
            .filter(|word| word.chars().all(char::is_alphabetic))
            .all(is_all_caps_word)
        {
            flags += 1;
        }

        flags
    }

    fn check_uppercase_ratio(&self, message: &ParsedMessage) -> u32 {
        u32::from(uppercase_ratio(&message.body) > self.profile.uppercase_ratio)
    }

    fn check_char_occ(&self, message: &ParsedMessage) -> u32 {
        self.profile
            .char_baseline
            .iter()
            .filter(|&(&c, &limit)| count_char(&message.body, c) > limit as usize)
            .count() as u32
    }

    fn check_links(&self, message: &ParsedMessage) -> u32 {
        extract_links(&message.body)
            .into_iter()
            .filter(|link| self.profile.suspicious_links.contains(*link))
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spam::parser::MessageParser;

    fn profile() -> LearnedProfile {
        let mut profile = LearnedProfile::default();
        profile.suspicious_headers.insert("X-Promo".to_string());
        profile.suspicious_headers.insert("X-Bulk".to_string());
        profile.suspicious_domains.insert("cheap.example".to_string());
        profile.suspicious_links.insert("http://cheap.example/buy".to_string());
        profile.uppercase_ratio = 0.5;
        profile
    }

    #[test]
    fn test_extract_links() {
        assert_eq!(
            extract_links("visit http://x.com now https://y.org end"),
            vec!["http://x.com", "https://y.org"]
        );
        assert!(extract_links("www.x.com ftp://y.org xhttp://z").is_empty());
    }

    #[test]
    fn test_uppercase_counts_non_letters() {
        assert_eq!(count_uppercase("Ab1!"), 3);
        assert_eq!(count_uppercase("ß"), 0);
        assert!((uppercase_ratio("aB") - 0.5).abs() < 1e-9);
        assert_eq!(uppercase_ratio(""), 0.0);
    }

    #[test]
    fn test_sender_domain() {
        let mut headers = HashMap::new();
        assert_eq!(sender_domain(&headers), None);

        headers.insert("From".to_string(), "a@relay@ Host.example ".to_string());
        assert_eq!(sender_domain(&headers), Some("Host.example"));

        headers.insert("From".to_string(), "no-at-sign".to_string());
        assert_eq!(sender_domain(&headers), Some("no-at-sign"));
    }

    #[test]
    fn test_headers_and_domains() {
        let profile = profile();
        let extractor = FeatureExtractor::new(&profile);
        let message = MessageParser::parse(
            "X-Promo: 1\nX-Bulk: 1\nX-Other: 1\nFrom: deals@cheap.example\n\nhi",
        );

        let flags = extractor.extract(&message);
        assert_eq!(flags.headers, 2);
        assert_eq!(flags.domains, 1);
    }

    #[test]
    fn test_subject_flags() {
        let profile = profile();
        let extractor = FeatureExtractor::new(&profile);

        // phrase + "free" + "cash"; mixed case
        let message = MessageParser::parse("Subject: Act now for free cash\n\n");
        assert_eq!(extractor.extract(&message).subject, 3);

        // two keywords, all caps
        let message = MessageParser::parse("Subject: WINNER LOTTERY 2024!\n\n");
        assert_eq!(extractor.extract(&message).subject, 3);

        let message = MessageParser::parse("Subject: Meeting notes\n\n");
        assert_eq!(extractor.extract(&message).subject, 0);

        let message = MessageParser::parse("From: a@b.c\n\n");
        assert_eq!(extractor.extract(&message).subject, 0);
    }

    #[test]
    fn test_body_flags() {
        let mut profile = profile();
        profile.uppercase_ratio = 0.2;
        let extractor = FeatureExtractor::new(&profile);
        let message = MessageParser::parse(
            "Subject: x\n\nBUY NOW!! http://cheap.example/buy http://cheap.example/buy http://other",
        );

        let flags = extractor.extract(&message);
        assert_eq!(flags.uppercase_ratio, 1);
        assert_eq!(flags.links, 2);
        // '!', '.' and ':' appear, every baseline is zero
        assert_eq!(flags.char_occ, 3);
    }

    #[test]
    fn test_empty_body_is_not_flagged() {
        let mut profile = profile();
        profile.uppercase_ratio = 0.0;
        let extractor = FeatureExtractor::new(&profile);
        let message = MessageParser::parse("Subject: meeting\n\n");

        let flags = extractor.extract(&message);
        assert_eq!(flags.uppercase_ratio, 0);
        assert_eq!(flags.char_occ, 0);
        assert_eq!(flags.links, 0);
    }
}
