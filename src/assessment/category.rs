use std::fmt;

use serde::{Deserialize, Serialize};

/// The six academic/career streams the assessment scores against. The
/// declaration order doubles as the tie-break order when ranking streams
/// with equal percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Science,
    Engineering,
    Medical,
    Commerce,
    Arts,
    Vocational,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Science,
        Category::Engineering,
        Category::Medical,
        Category::Commerce,
        Category::Arts,
        Category::Vocational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Science => "science",
            Category::Engineering => "engineering",
            Category::Medical => "medical",
            Category::Commerce => "commerce",
            Category::Arts => "arts",
            Category::Vocational => "vocational",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
