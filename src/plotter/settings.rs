use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// How the outermost gridline value is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSnap {
    /// The largest intensity of the plotted curves.
    MaxValue,
    /// Smallest value of the 3 / 4.8 / 6 / 9 / 10 ladder not below the maximum.
    #[default]
    RoundNumber,
    /// A caller-supplied candela value.
    Fixed(f64),
}

impl FromStr for ValueSnap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" | "max-value" => Ok(ValueSnap::MaxValue),
            "round" | "round-number" => Ok(ValueSnap::RoundNumber),
            other => match other.parse::<f64>() {
                Ok(value) if value > 0.0 && value.is_finite() => Ok(ValueSnap::Fixed(value)),
                _ => Err(format!(
                    "Invalid snap mode '{}': expected 'max', 'round' or a positive number",
                    s
                )),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramStyle {
    #[default]
    Simple,
    Detailed,
}

impl DiagramStyle {
    pub fn gridline_count(self) -> usize {
        match self {
            DiagramStyle::Simple => 4,
            DiagramStyle::Detailed => 6,
        }
    }

    pub fn spoke_count(self) -> usize {
        match self {
            DiagramStyle::Simple => 8,
            DiagramStyle::Detailed => 16,
        }
    }
}

impl FromStr for DiagramStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(DiagramStyle::Simple),
            "detailed" => Ok(DiagramStyle::Detailed),
            other => Err(format!("Unknown diagram style: {}", other)),
        }
    }
}

/// Colours used by the plotter, as CSS colour strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: String,
    pub grid: String,
    pub text: String,
    pub c0_c180: String,
    pub c90_c270: String,
    pub fill_opacity: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            grid: "#b0b0b0".to_string(),
            text: "#404040".to_string(),
            c0_c180: "#d62728".to_string(),
            c90_c270: "#1f77b4".to_string(),
            fill_opacity: 0.15,
        }
    }
}

/// Plotter configuration, passed to every draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterSettings {
    /// Always center the diagram and draw both hemispheres.
    pub show_both_half_spaces: bool,
    pub snap: ValueSnap,
    pub style: DiagramStyle,
    pub draw_background: bool,
    pub draw_legend: bool,
    pub fill_curves: bool,
    pub theme: Theme,
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self {
            show_both_half_spaces: false,
            snap: ValueSnap::default(),
            style: DiagramStyle::default(),
            draw_background: true,
            draw_legend: true,
            fill_curves: false,
            theme: Theme::default(),
        }
    }
}

impl PlotterSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: PlotterSettings = serde_json::from_str(json)?;
        if let ValueSnap::Fixed(value) = settings.snap {
            if value <= 0.0 {
                return Err(AppError::Other(format!(
                    "Fixed snap value must be positive, got {}",
                    value
                )));
            }
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading plotter settings from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
