//! Response cleanup: boilerplate filtering and quote trimming.
//!
//! Small instruction-tuned models like to preface their answer with a
//! framing phrase or wrap it in quotes. Both get stripped before a
//! response is stitched into the final output.

/// Boilerplate preambles known to show up in correction responses.
pub const DEFAULT_FILTERS: &[&str] = &[
    "Here is the corrected text:",
    "Here is the corrected transcription:",
];

/// Cleans generation responses. The filter list is fixed at construction.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    filters: Vec<String>,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_FILTERS.iter().map(|s| s.to_string()))
    }
}

impl PostProcessor {
    /// Create a post-processor with a custom filter list.
    pub fn new(filters: impl IntoIterator<Item = String>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
        }
    }

    /// Remove every occurrence of each filter phrase.
    pub fn strip_boilerplate(&self, text: &str) -> String {
        let mut out = text.to_string();
        for filter in &self.filters {
            out = out.replace(filter.as_str(), "");
        }
        out
    }

    /// If the text both starts and ends with a double quote, remove every
    /// double quote in it, not just the outer pair.
    pub fn trim_quotes(&self, text: &str) -> String {
        if text.starts_with('"') && text.ends_with('"') {
            text.replace('"', "")
        } else {
            text.to_string()
        }
    }

    /// Full cleanup applied to each generation response, in the order the
    /// pipeline uses: boilerplate first, then quotes.
    pub fn apply(&self, text: &str) -> String {
        self.trim_quotes(&self.strip_boilerplate(text))
    }
}
