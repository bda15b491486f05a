use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::core::primitives::decimal_to_f64;
use crate::core::{DeliverableType, Row};
use crate::error::{CardError, CardResult};

const INDIVIDUAL_SUFFIX: &str = " (Ind)";
const TEAM_SUFFIX: &str = " (Team)";

/// Column layout of the weights file. Cells are read as text and converted
/// leniently so malformed values surface in the output instead of failing
/// the whole load.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Deliverable")]
    deliverable: String,
    #[serde(rename = "Component", default)]
    component: Option<String>,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Weight", default)]
    weight: String,
    #[serde(rename = "Sequence", default)]
    sequence: String,
}

impl RawRow {
    fn into_row(self) -> Row {
        Row {
            deliverable: self.deliverable,
            component: self.component.filter(|value| !value.is_empty()),
            kind: DeliverableType::from(self.kind),
            weight: parse_percentage(&self.weight),
            sequence: parse_leading_integer(&self.sequence),
        }
    }
}

/// Immutable set of deliverable rows loaded once at startup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    has_component_data: bool,
}

impl Dataset {
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let has_component_data = rows
            .iter()
            .any(|row| row.component.as_deref().is_some_and(|c| !c.is_empty()));
        Self {
            rows,
            has_component_data,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> CardResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.deserialize::<RawRow>() {
            rows.push(record?.into_row());
        }

        let dataset = Self::from_rows(rows);
        debug!(
            rows = dataset.rows.len(),
            has_component_data = dataset.has_component_data,
            total_weight = dataset.total_weight(),
            "parsed weights dataset"
        );
        Ok(dataset)
    }

    pub fn from_csv_str(input: &str) -> CardResult<Self> {
        Self::from_reader(input.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| CardError::Load {
            source_name: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_reader(file)
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row names a component. Without it the stacked-by-component
    /// chart is skipped during navigation.
    #[must_use]
    pub fn has_component_data(&self) -> bool {
        self.has_component_data
    }

    /// Stacking needs at least one individual and one team row.
    #[must_use]
    pub fn can_stack(&self) -> bool {
        let has_individual = self
            .rows
            .iter()
            .any(|row| row.kind == DeliverableType::Individual);
        let has_team = self.rows.iter().any(|row| row.kind == DeliverableType::Team);
        has_individual && has_team
    }

    /// Sum of all parsed weights; `NaN` cells are skipped.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        sum_weights(self.rows.iter().map(|row| row.weight))
    }

    /// Sequence of the first row whose base deliverable matches `base`, or `0`.
    #[must_use]
    pub fn sequence_for_base(&self, base: &str) -> i64 {
        self.rows
            .iter()
            .find(|row| base_deliverable(&row.deliverable) == base)
            .map_or(0, Row::sequence_or_zero)
    }
}

/// Sums weights the way the chart aggregations do: `NaN` entries are ignored.
pub fn sum_weights(weights: impl IntoIterator<Item = f64>) -> f64 {
    weights.into_iter().filter(|weight| !weight.is_nan()).sum()
}

/// Strips a trailing " (Ind)" or " (Team)" marker.
#[must_use]
pub fn base_deliverable(deliverable: &str) -> &str {
    deliverable
        .strip_suffix(INDIVIDUAL_SUFFIX)
        .or_else(|| deliverable.strip_suffix(TEAM_SUFFIX))
        .unwrap_or(deliverable)
}

/// Parses the leading number of a percentage cell ("15%", " 7.5 %") into a
/// fraction. Cells without a leading number yield `NaN`.
#[must_use]
pub fn parse_percentage(raw: &str) -> f64 {
    let prefix = leading_number(raw.trim(), true);
    if prefix.is_empty() {
        return f64::NAN;
    }
    let (negative, magnitude) = match prefix.as_bytes()[0] {
        b'-' => (true, &prefix[1..]),
        b'+' => (false, &prefix[1..]),
        _ => (false, prefix),
    };
    let normalized = format!(
        "{}{}{magnitude}",
        if negative { "-" } else { "" },
        if magnitude.starts_with('.') { "0" } else { "" },
    );
    Decimal::from_str(&normalized)
        .ok()
        .and_then(|percent| percent.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|fraction| decimal_to_f64(fraction, "weight").ok())
        .unwrap_or(f64::NAN)
}

#[must_use]
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let prefix = leading_number(raw.trim(), false);
    prefix.parse().ok()
}

fn leading_number(input: &str, allow_fraction: bool) -> &str {
    let bytes = input.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        if fraction_end > fraction_start {
            end = fraction_end;
            has_digits = true;
        }
    }
    if has_digits { &input[..end] } else { "" }
}
