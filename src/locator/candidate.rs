use serde::{Deserialize, Serialize};

/// Which heuristic produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocatorKind {
    Id,
    Css,
    Xpath,
    DataAttribute,
    Text,
}

/// Expression language of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    Css,
    Xpath,
}

impl Syntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Css => "css",
            Syntax::Xpath => "xpath",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorCandidate {
    pub kind: LocatorKind,
    pub syntax: Syntax,
    pub expression: String,
}

impl LocatorCandidate {
    pub fn css(kind: LocatorKind, expression: impl Into<String>) -> Self {
        Self {
            kind,
            syntax: Syntax::Css,
            expression: expression.into(),
        }
    }

    pub fn xpath(kind: LocatorKind, expression: impl Into<String>) -> Self {
        Self {
            kind,
            syntax: Syntax::Xpath,
            expression: expression.into(),
        }
    }
}

/// Every locator synthesized for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorSet {
    /// All candidates, most robust first. Never empty.
    pub candidates: Vec<LocatorCandidate>,
    pub primary_css: String,
    pub xpath: String,
    /// Currently produced by the same climb as `xpath`, so always equal to it.
    pub full_xpath: String,
    /// Ranked, de-duplicated subset recommended for automation. Never empty.
    pub reliable: Vec<LocatorCandidate>,
}

impl LocatorSet {
    /// Highest ranked candidate.
    pub fn best(&self) -> Option<&LocatorCandidate> {
        self.candidates.first()
    }

    pub fn text_xpath(&self) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.kind == LocatorKind::Text)
            .map(|c| c.expression.as_str())
    }
}
