use unicode_normalization::UnicodeNormalization;

/// Keyword filter over card text.
///
/// The raw filter value is split on whitespace into keywords; a card matches
/// when every keyword is a case-insensitive substring of its text. Cards
/// without text never match an active filter.
#[derive(Debug, Clone)]
pub struct CardFilter {
    active: bool,
    keywords: Vec<String>,
}

impl CardFilter {
    pub fn compile(raw: &str) -> Self {
        Self {
            active: !raw.is_empty(),
            keywords: raw.split_whitespace().map(normalize_for_search).collect(),
        }
    }

    /// A filter is active whenever its raw value is non-empty, even if the
    /// value is only whitespace.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn matches(&self, text: Option<&str>) -> bool {
        if !self.active {
            return true;
        }
        let Some(text) = text else {
            return false;
        };
        let haystack = normalize_for_search(text);
        self.keywords.iter().all(|keyword| haystack.contains(keyword.as_str()))
    }
}

/// Lowercase and NFC-compose so that canonically equivalent spellings
/// compare equal.
fn normalize_for_search(value: &str) -> String {
    value.to_lowercase().nfc().collect()
}
