use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Promise assessment of a state: `impossible` discards it, the others keep it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Sure,
    Maybe,
    Impossible,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sure => "sure",
            Self::Maybe => "maybe",
            Self::Impossible => "impossible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sure" => Some(Self::Sure),
            "maybe" => Some(Self::Maybe),
            "impossible" => Some(Self::Impossible),
            _ => None,
        }
    }

    pub fn keeps(&self) -> bool {
        !matches!(self, Self::Impossible)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
