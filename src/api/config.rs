use serde::{Deserialize, Serialize};

use crate::core::{HorizontalMetrics, Viewport};
use crate::error::{CardError, CardResult};
use crate::render::Palette;

/// Pixel margins around a chart plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Layout constants of the horizontal bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalChartConfig {
    #[serde(default = "default_horizontal_margins")]
    pub margins: Margins,
    #[serde(default)]
    pub metrics: HorizontalMetrics,
    /// Per-character width used to decide whether a segment label fits.
    #[serde(default = "default_horizontal_char_width")]
    pub label_char_width_px: f64,
}

impl Default for HorizontalChartConfig {
    fn default() -> Self {
        Self {
            margins: default_horizontal_margins(),
            metrics: HorizontalMetrics::default(),
            label_char_width_px: default_horizontal_char_width(),
        }
    }
}

/// Layout constants of the stacked-by-component chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackedChartConfig {
    /// Top, right and bottom margin. The left margin follows the labels.
    #[serde(default = "default_stacked_margin")]
    pub margin: f64,
    #[serde(default = "default_stacked_min_left_margin")]
    pub min_left_margin: f64,
    #[serde(default = "default_stacked_char_width")]
    pub label_char_width_px: f64,
    #[serde(default = "default_stacked_label_gap")]
    pub label_gap_px: f64,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    /// Segments at or below this value carry no label.
    #[serde(default = "default_min_labeled_value")]
    pub min_labeled_value: f64,
}

impl Default for StackedChartConfig {
    fn default() -> Self {
        Self {
            margin: default_stacked_margin(),
            min_left_margin: default_stacked_min_left_margin(),
            label_char_width_px: default_stacked_char_width(),
            label_gap_px: default_stacked_label_gap(),
            band_padding: default_band_padding(),
            min_labeled_value: default_min_labeled_value(),
        }
    }
}

impl StackedChartConfig {
    /// Left margin wide enough for the longest component label.
    #[must_use]
    pub fn left_margin(&self, longest_label_chars: usize) -> f64 {
        (longest_label_chars as f64 * self.label_char_width_px + self.label_gap_px)
            .max(self.min_left_margin)
    }
}

/// Donut radii as ratios. The base radius is `min(width, height) / 2 * radius_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonutChartConfig {
    #[serde(default = "default_donut_radius_ratio")]
    pub radius_ratio: f64,
    #[serde(default = "default_donut_inner_ratio")]
    pub inner_ratio: f64,
    #[serde(default = "default_donut_outer_ratio")]
    pub outer_ratio: f64,
}

impl Default for DonutChartConfig {
    fn default() -> Self {
        Self {
            radius_ratio: default_donut_radius_ratio(),
            inner_ratio: default_donut_inner_ratio(),
            outer_ratio: default_donut_outer_ratio(),
        }
    }
}

/// Public widget bootstrap configuration.
///
/// Serializable so hosts can keep card setup next to the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_card")]
    pub card: Viewport,
    #[serde(default = "default_title")]
    pub title: String,
    /// Name shown in the load failure message.
    #[serde(default = "default_data_source")]
    pub data_source: String,
    /// Minimum card height; charts other than the horizontal one use it as is.
    #[serde(default = "default_card_height")]
    pub default_card_height: f64,
    /// Top plus bottom padding of a card face.
    #[serde(default = "default_face_padding")]
    pub face_padding: f64,
    #[serde(default = "default_row_height")]
    pub title_height: f64,
    #[serde(default = "default_row_height")]
    pub subtitle_height: f64,
    #[serde(default = "default_table_row_height")]
    pub table_row_height: f64,
    #[serde(default = "default_table_extra_height")]
    pub table_extra_height: f64,
    /// Share of the card width given to a chart.
    #[serde(default = "default_chart_width_ratio")]
    pub chart_width_ratio: f64,
    /// Upper x domain used when no positive weight exists.
    #[serde(default = "default_fallback_domain_max")]
    pub fallback_domain_max: f64,
    #[serde(default)]
    pub horizontal: HorizontalChartConfig,
    #[serde(default)]
    pub stacked: StackedChartConfig,
    #[serde(default)]
    pub donut: DonutChartConfig,
    #[serde(default)]
    pub palette: Palette,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::new(default_card())
    }
}

impl WidgetConfig {
    #[must_use]
    pub fn new(card: Viewport) -> Self {
        Self {
            card,
            title: default_title(),
            data_source: default_data_source(),
            default_card_height: default_card_height(),
            face_padding: default_face_padding(),
            title_height: default_row_height(),
            subtitle_height: default_row_height(),
            table_row_height: default_table_row_height(),
            table_extra_height: default_table_extra_height(),
            chart_width_ratio: default_chart_width_ratio(),
            fallback_domain_max: default_fallback_domain_max(),
            horizontal: HorizontalChartConfig::default(),
            stacked: StackedChartConfig::default(),
            donut: DonutChartConfig::default(),
            palette: Palette::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = data_source.into();
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Message shown on the table face when the dataset cannot be loaded.
    #[must_use]
    pub fn load_error_message(&self) -> String {
        format!(
            "Error loading data. Please ensure '{}' is available.",
            self.data_source
        )
    }

    pub fn from_json_str(input: &str) -> CardResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| CardError::InvalidData(format!("failed to parse widget config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> CardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CardError::InvalidData(format!("failed to serialize widget config: {e}")))
    }

    pub fn validate(&self) -> CardResult<()> {
        if !self.card.is_valid() {
            return Err(CardError::InvalidViewport {
                width: self.card.width,
                height: self.card.height,
            });
        }

        for (name, value) in [
            ("default_card_height", self.default_card_height),
            ("title_height", self.title_height),
            ("subtitle_height", self.subtitle_height),
            ("table_row_height", self.table_row_height),
            ("fallback_domain_max", self.fallback_domain_max),
            ("horizontal.label_char_width_px", self.horizontal.label_char_width_px),
            ("horizontal.metrics.bar_height", self.horizontal.metrics.bar_height),
            ("stacked.label_char_width_px", self.stacked.label_char_width_px),
        ] {
            ensure_positive(name, value)?;
        }

        for (name, value) in [
            ("face_padding", self.face_padding),
            ("table_extra_height", self.table_extra_height),
            ("horizontal.metrics.bar_padding", self.horizontal.metrics.bar_padding),
            ("horizontal.metrics.heading_height", self.horizontal.metrics.heading_height),
            ("horizontal.metrics.category_spacing", self.horizontal.metrics.category_spacing),
            ("horizontal.margins.top", self.horizontal.margins.top),
            ("horizontal.margins.right", self.horizontal.margins.right),
            ("horizontal.margins.bottom", self.horizontal.margins.bottom),
            ("horizontal.margins.left", self.horizontal.margins.left),
            ("stacked.margin", self.stacked.margin),
            ("stacked.min_left_margin", self.stacked.min_left_margin),
            ("stacked.label_gap_px", self.stacked.label_gap_px),
            ("stacked.min_labeled_value", self.stacked.min_labeled_value),
        ] {
            ensure_non_negative(name, value)?;
        }

        if !(0.0..=1.0).contains(&self.chart_width_ratio) || self.chart_width_ratio == 0.0 {
            return Err(CardError::InvalidData("chart_width_ratio must be in (0, 1]".to_owned()));
        }
        if !(0.0..1.0).contains(&self.stacked.band_padding) {
            return Err(CardError::InvalidData("stacked.band_padding must be in [0, 1)".to_owned()));
        }
        let donut = self.donut;
        if !(donut.radius_ratio > 0.0
            && donut.inner_ratio >= 0.0
            && donut.inner_ratio <= donut.outer_ratio
            && donut.outer_ratio <= 1.0)
        {
            return Err(CardError::InvalidData(
                "donut ratios must satisfy 0 <= inner <= outer <= 1 and radius > 0".to_owned(),
            ));
        }

        self.palette.resolve().map(|_| ())
    }
}

fn ensure_positive(name: &str, value: f64) -> CardResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CardError::InvalidData(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn ensure_non_negative(name: &str, value: f64) -> CardResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CardError::InvalidData(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn default_card() -> Viewport {
    Viewport::new(800, 600)
}

fn default_title() -> String {
    "Course Weights".to_owned()
}

fn default_data_source() -> String {
    "weights.csv".to_owned()
}

fn default_card_height() -> f64 {
    600.0
}

fn default_face_padding() -> f64 {
    48.0
}

fn default_row_height() -> f64 {
    40.0
}

fn default_table_row_height() -> f64 {
    33.0
}

fn default_table_extra_height() -> f64 {
    20.0
}

fn default_chart_width_ratio() -> f64 {
    0.8
}

fn default_fallback_domain_max() -> f64 {
    0.2
}

fn default_horizontal_margins() -> Margins {
    Margins::new(40.0, 80.0, 20.0, 250.0)
}

fn default_horizontal_char_width() -> f64 {
    7.0
}

fn default_stacked_margin() -> f64 {
    20.0
}

fn default_stacked_min_left_margin() -> f64 {
    80.0
}

fn default_stacked_char_width() -> f64 {
    7.5
}

fn default_stacked_label_gap() -> f64 {
    20.0
}

fn default_band_padding() -> f64 {
    0.2
}

fn default_min_labeled_value() -> f64 {
    0.01
}

fn default_donut_radius_ratio() -> f64 {
    0.9
}

fn default_donut_inner_ratio() -> f64 {
    0.6
}

fn default_donut_outer_ratio() -> f64 {
    0.9
}

#[cfg(test)]
mod tests {
    use super::WidgetConfig;

    #[test]
    fn empty_json_yields_defaults() {
        let config = WidgetConfig::from_json_str("{}").expect("config");
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.horizontal.margins.left, 250.0);
        assert_eq!(config.stacked.left_margin(2), 80.0);
        assert_eq!(config.stacked.left_margin(20), 170.0);
    }

    #[test]
    fn rejects_bad_palette() {
        let err = WidgetConfig::from_json_str(r#"{"palette": {"team": "orange"}}"#);
        assert!(err.is_err());
    }
}
