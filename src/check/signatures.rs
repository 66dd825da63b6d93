//! Soft-failure signatures.
//!
//! Phrases that, found in the body of a 200 response, mean the site is
//! serving a maintenance or error page. Matching is case-insensitive and
//! word-bounded. Order matters: the first matching phrase is the one
//! reported.

use std::path::Path;

use regex::Regex;
use thiserror::Error;

/// Built-in signatures, in reporting priority order.
pub const DEFAULT_SIGNATURES: &[&str] = &[
    "sitio en mantenimiento",
    "en mantenimiento",
    "fuera de servicio",
    "página no encontrada",
    "under maintenance",
    "temporarily unavailable",
    "temporalmente fuera",
    "service unavailable",
    "maintenance",
];

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("failed to read signatures from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("empty signature phrase")]
    Empty,
    #[error("invalid signature {phrase:?}: {source}")]
    Pattern {
        phrase: String,
        source: regex::Error,
    },
}

/// One compiled phrase.
#[derive(Debug, Clone)]
pub struct Signature {
    phrase: String,
    regex: Regex,
}

impl Signature {
    pub fn new(phrase: &str) -> Result<Self, SignatureError> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return Err(SignatureError::Empty);
        }

        // \b next to punctuation would never match, so only bound word edges
        let lead = if phrase.starts_with(is_word_char) { r"\b" } else { "" };
        let tail = if phrase.ends_with(is_word_char) { r"\b" } else { "" };
        let pattern = format!("(?i){}{}{}", lead, regex::escape(&phrase), tail);

        let regex = Regex::new(&pattern).map_err(|source| SignatureError::Pattern {
            phrase: phrase.clone(),
            source,
        })?;

        Ok(Self { phrase, regex })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn is_match(&self, body: &str) -> bool {
        self.regex.is_match(body)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Ordered signature list handed to the classifier.
#[derive(Debug, Clone, Default)]
pub struct SignatureSet {
    signatures: Vec<Signature>,
}

impl SignatureSet {
    pub fn new<I, S>(phrases: I) -> Result<Self, SignatureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let signatures = phrases
            .into_iter()
            .map(|p| Signature::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { signatures })
    }

    /// The built-in list.
    pub fn builtin() -> Self {
        Self {
            signatures: DEFAULT_SIGNATURES
                .iter()
                .filter_map(|p| Signature::new(p).ok())
                .collect(),
        }
    }

    /// Parse one phrase per line. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, SignatureError> {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignatureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SignatureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// First signature, in list order, found in `body`.
    pub fn first_match(&self, body: &str) -> Option<&str> {
        self.signatures
            .iter()
            .find(|s| s.is_match(body))
            .map(Signature::phrase)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keeps_order() {
        let set = SignatureSet::builtin();
        assert_eq!(set.len(), DEFAULT_SIGNATURES.len());
        assert_eq!(set.signatures[0].phrase(), "sitio en mantenimiento");
        assert_eq!(set.signatures[8].phrase(), "maintenance");
    }

    #[test]
    fn test_first_match_uses_list_order() {
        let set = SignatureSet::builtin();
        // Both "sitio en mantenimiento" and "en mantenimiento" match
        assert_eq!(
            set.first_match("<h1>sitio en mantenimiento</h1>"),
            Some("sitio en mantenimiento")
        );
        // "under maintenance" wins over the bare "maintenance"
        assert_eq!(
            set.first_match("we are under maintenance"),
            Some("under maintenance")
        );
        assert_eq!(
            set.first_match("<title>página no encontrada</title>"),
            Some("página no encontrada")
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let set = SignatureSet::builtin();
        assert_eq!(
            set.first_match("SITE UNDER MAINTENANCE"),
            Some("under maintenance")
        );
    }

    #[test]
    fn test_match_is_word_bounded() {
        let set = SignatureSet::new(["maintenance"]).unwrap();
        assert_eq!(set.first_match("scheduled maintenance."), Some("maintenance"));
        assert_eq!(set.first_match("maintenances"), None);
        assert_eq!(set.first_match("premaintenance"), None);
    }

    #[test]
    fn test_phrases_are_literal() {
        let set = SignatureSet::new(["down (again)"]).unwrap();
        assert_eq!(set.first_match("we are down (again) today"), Some("down (again)"));
        assert_eq!(set.first_match("down again"), None);
    }

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let set = SignatureSet::parse("# outages\n\n  Closed For Repairs  \nbe right back\n").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.first_match("closed for repairs"), Some("closed for repairs"));
    }

    #[test]
    fn test_empty_phrase_is_rejected() {
        assert!(matches!(
            SignatureSet::new(["ok", "   "]),
            Err(SignatureError::Empty)
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.txt");
        std::fs::write(&path, "out of order\n").unwrap();

        let set = SignatureSet::from_file(&path).unwrap();
        assert_eq!(set.first_match("printer out of order"), Some("out of order"));

        let missing = SignatureSet::from_file(dir.path().join("nope.txt"));
        assert!(matches!(missing, Err(SignatureError::Io { .. })));
    }
}
