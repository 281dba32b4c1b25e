//! How two shapes relate

use serde::{Deserialize, Serialize};

/// How one shape relates to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialRelation {
    /// The shapes share at least one point, with neither inside the other
    Intersects,
    /// This shape lies inside the other
    Within,
    /// The other shape lies inside this one
    Contains,
    Disjoint,
}

impl SpatialRelation {
    /// The relation seen from the other shape
    pub fn transpose(self) -> Self {
        match self {
            Self::Within => Self::Contains,
            Self::Contains => Self::Within,
            other => other,
        }
    }

    /// Whether the shapes share any point
    pub fn intersects(self) -> bool {
        self != Self::Disjoint
    }
}
