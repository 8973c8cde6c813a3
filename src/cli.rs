use clap::Parser;
use std::path::PathBuf;
use crate::error::{AppError, Result};
use crate::plotter::{DiagramStyle, PlotterSettings, ValueSnap};
use crate::units::LengthUnits;

#[derive(Parser, Debug)]
#[command(name = "lumiview")]
#[command(version = "0.3.2")]
#[command(about = "IES/EULUMDAT photometric file viewer, converter and polar plotter", long_about = None)]
pub struct Cli {
    /// Photometric file to read (.ies or .ldt)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Write a polar diagram SVG to this path
    #[arg(long, value_name = "SVG")]
    pub plot: Option<PathBuf>,

    /// Diagram width in pixels
    #[arg(long, default_value = "600")]
    pub width: f64,

    /// Diagram height in pixels
    #[arg(long, default_value = "600")]
    pub height: f64,

    /// Re-export as IES to this path
    #[arg(long, value_name = "FILE")]
    pub export_ies: Option<PathBuf>,

    /// Re-export as EULUMDAT to this path
    #[arg(long, value_name = "FILE")]
    pub export_ldt: Option<PathBuf>,

    /// Plotter settings JSON file
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    /// Center the diagram and show both half-spaces
    #[arg(long)]
    pub both_half_spaces: bool,

    /// Outer gridline value: max, round or a candela value
    #[arg(long, value_name = "MODE")]
    pub snap: Option<ValueSnap>,

    /// Diagram style: simple or detailed
    #[arg(long)]
    pub style: Option<DiagramStyle>,

    /// Length units for the dimension summary (m, cm, mm, ft, in)
    #[arg(long, default_value = "m")]
    pub units: LengthUnits,

    /// Operating hours per day for the energy estimate
    #[arg(long, value_name = "HOURS")]
    pub daily_hours: Option<f64>,

    /// Electricity price per kWh for the energy cost
    #[arg(long, value_name = "PRICE", requires = "daily_hours")]
    pub price_per_kwh: Option<f64>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Logger filter: `--debug` lowers it to Debug, otherwise Info.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.file.is_file() {
            return Err(AppError::Other(format!(
                "Input file not found: {}",
                self.file.display()
            )));
        }

        if self.plot.is_some() && (self.width <= 0.0 || self.height <= 0.0) {
            return Err(AppError::Other(format!(
                "Diagram size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if let Some(hours) = self.daily_hours {
            if !(0.0..=24.0).contains(&hours) {
                return Err(AppError::Other(format!(
                    "--daily-hours must be between 0 and 24, got {}",
                    hours
                )));
            }
        }

        if let Some(price) = self.price_per_kwh {
            if price < 0.0 {
                return Err(AppError::Other(format!(
                    "--price-per-kwh must not be negative, got {}",
                    price
                )));
            }
        }

        Ok(())
    }

    /// Settings from `--settings`, with individual flags applied on top.
    pub fn plotter_settings(&self) -> Result<PlotterSettings> {
        let mut settings = match &self.settings {
            Some(path) => PlotterSettings::load(path)?,
            None => PlotterSettings::default(),
        };

        if self.both_half_spaces {
            settings.show_both_half_spaces = true;
        }
        if let Some(snap) = self.snap {
            settings.snap = snap;
        }
        if let Some(style) = self.style {
            settings.style = style;
        }

        log::debug!("Plotter settings: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lumiview").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["lamp.ies"]);
        assert_eq!(cli.file, PathBuf::from("lamp.ies"));
        assert_eq!(cli.units, LengthUnits::Meters);
        assert_eq!(cli.width, 600.0);
        assert!(cli.snap.is_none());
    }

    #[test]
    fn test_value_parsers() {
        let cli = parse(&["lamp.ldt", "--snap", "1500", "--style", "detailed", "--units", "mm"]);
        assert_eq!(cli.snap, Some(ValueSnap::Fixed(1500.0)));
        assert_eq!(cli.style, Some(DiagramStyle::Detailed));
        assert_eq!(cli.units, LengthUnits::Millimeters);
        assert!(Cli::try_parse_from(["lumiview", "x.ies", "--snap", "huge"]).is_err());
    }

    #[test]
    fn test_debug_flag_sets_log_level() {
        assert_eq!(parse(&["lamp.ies"]).log_level(), log::LevelFilter::Info);
        assert_eq!(parse(&["lamp.ies", "--debug"]).log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_price_requires_hours() {
        assert!(Cli::try_parse_from(["lumiview", "x.ies", "--price-per-kwh", "0.3"]).is_err());
    }

    #[test]
    fn test_validate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "IESNA:LM-63-2002").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(parse(&[&path]).validate().is_ok());
        assert!(parse(&[&path, "--daily-hours", "30"]).validate().is_err());
        assert!(parse(&[&path, "--plot", "out.svg", "--width", "0"]).validate().is_err());
        assert!(parse(&["/nonexistent/lamp.ies"]).validate().is_err());
    }

    #[test]
    fn test_flags_override_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"style": "detailed", "snap": "max_value"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["lamp.ies", "--settings", &path, "--snap", "round", "--both-half-spaces"]);
        let settings = cli.plotter_settings().unwrap();
        assert_eq!(settings.style, DiagramStyle::Detailed);
        assert_eq!(settings.snap, ValueSnap::RoundNumber);
        assert!(settings.show_both_half_spaces);
    }
}
