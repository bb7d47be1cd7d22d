//! Cleanup of raw model output into a comma-separated keyword string.
//!
//! Normalization is an ordered list of pure string rules. The default chain
//! strips known boilerplate first and then fixes known phrasing artifacts;
//! further fixes are appended with [`TextNormalizer::with_rule`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Category label some models prepend to the answer ("product category:").
pub const CATEGORY_MARKER: &str = "제품 카테고리:";

/// Numbered list markers such as `1.` or `12. `.
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\s?").unwrap());

/// One normalization step.
#[derive(Debug, Clone)]
pub enum NormalizeRule {
    /// Drop everything up to and including the last occurrence of the marker,
    /// plus the whitespace that follows it. No-op when the marker is absent.
    StripThroughMarker(String),
    /// Delete every match of the pattern.
    RemovePattern(Regex),
    /// Replace every occurrence of `from` with `to`.
    ///
    /// With `until_stable`, the replacement is repeated while `from` still
    /// occurs, so overlapping runs like `"a and and b"` are fully rewritten.
    Replace {
        from: String,
        to: String,
        until_stable: bool,
    },
    /// Trim leading and trailing whitespace.
    Trim,
}

impl NormalizeRule {
    pub fn apply(&self, text: &str) -> String {
        match self {
            NormalizeRule::StripThroughMarker(marker) => match text.rfind(marker.as_str()) {
                Some(pos) => text[pos + marker.len()..].trim_start().to_string(),
                None => text.to_string(),
            },
            NormalizeRule::RemovePattern(re) => re.replace_all(text, "").into_owned(),
            NormalizeRule::Replace {
                from,
                to,
                until_stable,
            } => {
                if from.is_empty() {
                    return text.to_string();
                }
                let mut out = text.replace(from.as_str(), to);
                if *until_stable && !to.contains(from.as_str()) {
                    while out.contains(from.as_str()) {
                        out = out.replace(from.as_str(), to);
                    }
                }
                out
            }
            NormalizeRule::Trim => text.trim().to_string(),
        }
    }
}

/// Ordered chain of normalization rules.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<NormalizeRule>,
}

impl TextNormalizer {
    /// A normalizer with no rules (identity).
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule to the end of the chain.
    pub fn with_rule(mut self, rule: NormalizeRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[NormalizeRule] {
        &self.rules
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.rules
            .iter()
            .fold(raw.to_string(), |text, rule| rule.apply(&text))
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::empty()
            .with_rule(NormalizeRule::StripThroughMarker(CATEGORY_MARKER.into()))
            .with_rule(NormalizeRule::RemovePattern((*LIST_MARKER).clone()))
            .with_rule(NormalizeRule::Replace {
                from: " and ".into(),
                to: ", ".into(),
                until_stable: true,
            })
            .with_rule(NormalizeRule::Replace {
                from: "\n".into(),
                to: ", ".into(),
                until_stable: false,
            })
            .with_rule(NormalizeRule::Trim)
            .with_rule(NormalizeRule::Replace {
                from: " technology".into(),
                to: "technology".into(),
                until_stable: false,
            })
    }
}

static DEFAULT_NORMALIZER: Lazy<TextNormalizer> = Lazy::new(TextNormalizer::default);

/// Normalize with the default rule chain.
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}
