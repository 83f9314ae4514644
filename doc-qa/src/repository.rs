//! Repository selection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::QaError;

/// Documentation corpus the user searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryChoice {
    /// General guides, data models, standards, best practices.
    #[default]
    Documentation,
    /// Code examples, technical implementation, configuration.
    StandardPipeline,
}

impl RepositoryChoice {
    pub const ALL: [RepositoryChoice; 2] = [
        RepositoryChoice::Documentation,
        RepositoryChoice::StandardPipeline,
    ];

    /// Identifier used by the retrieval service and on the wire.
    pub fn slug(self) -> &'static str {
        match self {
            RepositoryChoice::Documentation => "documentation",
            RepositoryChoice::StandardPipeline => "standard-pipeline",
        }
    }

    /// Human-readable name: dashes become spaces, words title-cased.
    pub fn display_name(self) -> String {
        self.slug()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn description(self) -> &'static str {
        match self {
            RepositoryChoice::Documentation => {
                "General guides, data models, standards, best practices"
            }
            RepositoryChoice::StandardPipeline => {
                "Code examples, technical implementation, configuration"
            }
        }
    }
}

impl fmt::Display for RepositoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RepositoryChoice {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.slug() == wanted)
            .ok_or_else(|| QaError::InvalidRepository(s.trim().to_string()))
    }
}
