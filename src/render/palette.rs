use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::DeliverableType;
use crate::error::CardResult;
use crate::render::Color;

/// Hex colors of the card. Kept as text so configs stay human-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_individual")]
    pub individual: String,
    #[serde(default = "default_team")]
    pub team: String,
    #[serde(default = "default_selected")]
    pub selected: String,
    #[serde(default = "default_dimmed")]
    pub dimmed: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_heading_fill")]
    pub heading_fill: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            individual: default_individual(),
            team: default_team(),
            selected: default_selected(),
            dimmed: default_dimmed(),
            text: default_text(),
            heading_fill: default_heading_fill(),
        }
    }
}

fn default_individual() -> String {
    "#008dff".to_owned()
}

fn default_team() -> String {
    "#ff9d3a".to_owned()
}

fn default_selected() -> String {
    "#c701ff".to_owned()
}

fn default_dimmed() -> String {
    "#364560".to_owned()
}

fn default_text() -> String {
    "#1f2937".to_owned()
}

fn default_heading_fill() -> String {
    "#f8fafc".to_owned()
}

impl Palette {
    pub fn resolve(&self) -> CardResult<ResolvedPalette> {
        Ok(ResolvedPalette {
            individual: Color::from_hex(&self.individual)?,
            team: Color::from_hex(&self.team)?,
            selected: Color::from_hex(&self.selected)?,
            dimmed: Color::from_hex(&self.dimmed)?,
            text: Color::from_hex(&self.text)?,
            heading_fill: Color::from_hex(&self.heading_fill)?,
        })
    }
}

/// Parsed palette used while building frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPalette {
    pub individual: Color,
    pub team: Color,
    pub selected: Color,
    pub dimmed: Color,
    pub text: Color,
    pub heading_fill: Color,
}

impl ResolvedPalette {
    /// Natural color of a category, `fallback` for unexpected type values.
    #[must_use]
    pub fn category(&self, kind: &DeliverableType, fallback: Color) -> Color {
        match kind {
            DeliverableType::Individual => self.individual,
            DeliverableType::Team => self.team,
            DeliverableType::Other(_) => fallback,
        }
    }

    /// Highlight rule shared by every chart: natural color with nothing
    /// selected, otherwise selected or dimmed.
    #[must_use]
    pub fn element(
        &self,
        selection: &IndexSet<String>,
        id: &str,
        kind: &DeliverableType,
        fallback: Color,
    ) -> Color {
        if selection.contains(id) {
            self.selected
        } else if !selection.is_empty() {
            self.dimmed
        } else {
            self.category(kind, fallback)
        }
    }
}
