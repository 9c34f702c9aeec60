use regex::{NoExpand, Regex, RegexBuilder};

use crate::{Error, Result, normalize::normalize};

/// Substitutions applied when no rules are configured, in order.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("Denkai", "Kyron"),
    ("Thanh?Lamdwcute", "xvshady and _gg"),
];

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    replacement: String,
}

/// Ordered list of case-insensitive substitutions run over normalized text.
///
/// Rules apply left to right over the whole string; each rule sees the output
/// of the previous one. Replacements are literal (`$1` is not expanded).
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: Vec<CompiledRule>,
}

impl Rewriter {
    /// Compile `(pattern, replacement)` pairs, keeping their order.
    pub fn new<I, P, R>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| {
                let pattern = pattern.as_ref();
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| Error::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })?;
                Ok(CompiledRule {
                    regex,
                    replacement: replacement.into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Normalize `text`, then apply every rule in declared order.
    #[must_use]
    pub fn rewrite(&self, text: &str) -> String {
        let mut out = normalize(text).into_owned();
        for rule in &self.rules {
            let replaced = rule
                .regex
                .replace_all(&out, NoExpand(&rule.replacement))
                .into_owned();
            out = replaced;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
