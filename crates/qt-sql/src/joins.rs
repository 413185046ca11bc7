//! Join locality, strictness and kind

use serde::{Deserialize, Serialize};

/// Placement of a join in distributed execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinLocality {
    /// No placement requested
    #[default]
    Unspecified,
    /// Right side is broadcast to every shard (GLOBAL JOIN)
    Global,
    /// Right side is read locally on each shard
    Local,
}

impl std::fmt::Display for JoinLocality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinLocality::Unspecified => write!(f, "UNSPECIFIED"),
            JoinLocality::Global => write!(f, "GLOBAL"),
            JoinLocality::Local => write!(f, "LOCAL"),
        }
    }
}

/// How many matching rows participate in the join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStrictness {
    /// Use the session default
    #[default]
    Unspecified,
    /// Every matching pair (cartesian within equal keys)
    All,
    /// A single matching row
    Any,
    /// Closest match by an inequality condition
    Asof,
    /// Rows that have a match, right side columns taken from one match
    Semi,
    /// Rows without a match
    Anti,
}

impl JoinStrictness {
    /// Semi and anti joins only filter rows of one side
    pub fn is_filtering(&self) -> bool {
        matches!(self, JoinStrictness::Semi | JoinStrictness::Anti)
    }
}

impl std::fmt::Display for JoinStrictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinStrictness::Unspecified => write!(f, "UNSPECIFIED"),
            JoinStrictness::All => write!(f, "ALL"),
            JoinStrictness::Any => write!(f, "ANY"),
            JoinStrictness::Asof => write!(f, "ASOF"),
            JoinStrictness::Semi => write!(f, "SEMI"),
            JoinStrictness::Anti => write!(f, "ANTI"),
        }
    }
}

/// Join topology
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Inner join
    #[default]
    Inner,
    /// Left outer join
    Left,
    /// Right outer join
    Right,
    /// Full outer join
    Full,
    /// Cross join (cartesian product)
    Cross,
    /// Comma-separated FROM list, a cross join without the keyword
    Comma,
    /// Row-by-row positional join
    Paste,
}

impl JoinKind {
    /// Kinds that never carry a join condition
    pub fn is_unconditional(&self) -> bool {
        matches!(self, JoinKind::Cross | JoinKind::Comma | JoinKind::Paste)
    }

    /// Left, right and full joins
    pub fn is_outer(&self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Right | JoinKind::Full)
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER"),
            JoinKind::Left => write!(f, "LEFT"),
            JoinKind::Right => write!(f, "RIGHT"),
            JoinKind::Full => write!(f, "FULL"),
            JoinKind::Cross => write!(f, "CROSS"),
            JoinKind::Comma => write!(f, "COMMA"),
            JoinKind::Paste => write!(f, "PASTE"),
        }
    }
}
