use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Who completes a deliverable.
///
/// Values other than `Individual` and `Team` are kept verbatim so that they
/// flow through aggregation and end up drawn with a fallback color instead of
/// being rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliverableType {
    Individual,
    Team,
    Other(String),
}

impl DeliverableType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Individual => "Individual",
            Self::Team => "Team",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for DeliverableType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Individual" => Self::Individual,
            "Team" => Self::Team,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for DeliverableType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<DeliverableType> for String {
    fn from(kind: DeliverableType) -> Self {
        match kind {
            DeliverableType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DeliverableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed line of the weights file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub deliverable: String,
    pub component: Option<String>,
    pub kind: DeliverableType,
    /// Fraction of the course grade. `NaN` when the source cell was not numeric.
    pub weight: f64,
    /// Author order. `None` when the source cell was not an integer.
    pub sequence: Option<i64>,
}

impl Row {
    #[must_use]
    pub fn new(
        deliverable: impl Into<String>,
        component: Option<&str>,
        kind: DeliverableType,
        weight: f64,
        sequence: i64,
    ) -> Self {
        Self {
            deliverable: deliverable.into(),
            component: component.map(str::to_owned),
            kind,
            weight,
            sequence: Some(sequence),
        }
    }

    /// Grouping key used by the table and the horizontal chart.
    ///
    /// Rows without a component share the empty key.
    #[must_use]
    pub fn component_key(&self) -> &str {
        self.component.as_deref().unwrap_or("")
    }

    /// Sequence used for ordering; missing values order as `0`.
    #[must_use]
    pub fn sequence_or_zero(&self) -> i64 {
        self.sequence.unwrap_or(0)
    }
}
