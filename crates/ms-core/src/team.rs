use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// The two competing alliances.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    pub fn as_str(self) -> &'static str {
        match self {
            Alliance::Red  => "red",
            Alliance::Blue => "blue",
        }
    }

    pub fn opponent(self) -> Alliance {
        match self {
            Alliance::Red  => Alliance::Blue,
            Alliance::Blue => Alliance::Red,
        }
    }

    /// Name of the per-alliance score cell in the global state.
    pub fn score_key(self) -> &'static str {
        match self {
            Alliance::Red  => "red_score",
            Alliance::Blue => "blue_score",
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alliance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red"  => Ok(Alliance::Red),
            "blue" => Ok(Alliance::Blue),
            other  => Err(CoreError::Parse(format!("unknown alliance {other:?}"))),
        }
    }
}
