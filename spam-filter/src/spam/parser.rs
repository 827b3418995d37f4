use std::collections::HashMap;

/// A message split into headers and body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Header name to value; names keep their original case
    pub headers: HashMap<String, String>,
    /// Everything after the first blank line, trimmed
    pub body: String,
}

impl ParsedMessage {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Lenient header/body splitter
pub struct MessageParser;

impl MessageParser {
    /// Parse raw message text. Never fails; lines that are neither headers
    /// nor continuations are skipped.
    pub fn parse(raw: &str) -> ParsedMessage {
        ParsedMessage {
            headers: Self::parse_headers(raw),
            body: Self::extract_body(raw),
        }
    }

    fn parse_headers(raw: &str) -> HashMap<String, String> {
        let mut headers: HashMap<String, String> = HashMap::new();
        let mut current: Option<String> = None;

        for line in raw.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with([' ', '\t']) {
                if let Some(value) = current.as_ref().and_then(|name| headers.get_mut(name)) {
                    value.push(' ');
                    value.push_str(line.trim());
                    continue;
                }
            }

            if let Some((name, value)) = line.split_once(": ") {
                headers.insert(name.to_string(), value.trim().to_string());
                current = Some(name.to_string());
            }
        }

        headers
    }

    fn extract_body(raw: &str) -> String {
        let mut lines = raw.lines();
        if !lines.any(|line| line.is_empty()) {
            return String::new();
        }

        lines.collect::<Vec<_>>().join("\n").trim().to_string()
    }
}
