//! Fun facts and documentation pages read from the docs directory
//!
//! Missing files are never fatal: callers get a placeholder instead.

use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::error::MorseError;

pub const FUN_FACTS_FILE: &str = "fun_facts.txt";
/// Lines starting with this marker are facts
pub const FACT_MARKER: char = '✅';
pub const MISSING_FACTS: &str = "🚨 Could not load fun facts. Please check docs/fun_facts.txt";
pub const MISSING_PAGE: &str = "🚨 Not found.";

/// Documentation pages shipped with the app
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DocTopic {
    WhatIsMorse,
    HowToUse,
    FeatureGuide,
    FunFacts,
}

impl DocTopic {
    pub const ALL: [DocTopic; 4] = [
        DocTopic::WhatIsMorse,
        DocTopic::HowToUse,
        DocTopic::FeatureGuide,
        DocTopic::FunFacts,
    ];

    pub const fn file_name(&self) -> &'static str {
        match self {
            DocTopic::WhatIsMorse => "what_is_morse.txt",
            DocTopic::HowToUse => "how_to_use.txt",
            DocTopic::FeatureGuide => "feature_guide.txt",
            DocTopic::FunFacts => FUN_FACTS_FILE,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            DocTopic::WhatIsMorse => "What is Morse Code?",
            DocTopic::HowToUse => "How to Use the App",
            DocTopic::FeatureGuide => "Feature Guide",
            DocTopic::FunFacts => "Fun Facts",
        }
    }
}

impl fmt::Display for DocTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for DocTopic {
    type Err = MorseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "what-is-morse" | "morse" => Ok(DocTopic::WhatIsMorse),
            "how-to-use" | "usage" => Ok(DocTopic::HowToUse),
            "feature-guide" | "features" => Ok(DocTopic::FeatureGuide),
            "fun-facts" | "facts" => Ok(DocTopic::FunFacts),
            other => Err(MorseError::UnknownTopic(other.to_string())),
        }
    }
}

/// Extract marker-prefixed lines as facts
pub fn parse_fun_facts(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.starts_with(FACT_MARKER))
        .map(|line| {
            line.trim_matches(|c: char| c == FACT_MARKER || c == ' ')
                .trim()
                .to_string()
        })
        .collect()
}

/// Read-only access to the docs directory
#[derive(Clone, Debug)]
pub struct DocLibrary {
    dir: PathBuf,
}

impl DocLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Page contents, or the not-found placeholder
    pub fn read(&self, topic: DocTopic) -> String {
        let path = self.dir.join(topic.file_name());
        match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Documentation page unavailable");
                MISSING_PAGE.to_string()
            }
        }
    }

    /// All fun facts; a single placeholder when the file is missing or has none
    pub fn fun_facts(&self) -> Vec<String> {
        let path = self.dir.join(FUN_FACTS_FILE);
        let facts = match std::fs::read_to_string(&path) {
            Ok(content) => parse_fun_facts(&content),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Fun facts unavailable");
                Vec::new()
            }
        };
        if facts.is_empty() {
            vec![MISSING_FACTS.to_string()]
        } else {
            facts
        }
    }

    /// One fact picked at random
    pub fn random_fact<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.fun_facts()
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| MISSING_FACTS.to_string())
    }
}
