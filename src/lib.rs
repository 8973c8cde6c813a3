pub mod cli;
pub mod error;
pub mod ies;
pub mod importer;
pub mod ldt;
pub mod parse;
pub mod photometry;
pub mod plotter;
pub mod report;
pub mod units;

pub use cli::Cli;
pub use error::{AppError, CalculationError, PhotometryError, Result};
pub use ies::{IesExporter, IesExtractor};
pub use importer::{import_from_file, import_from_path};
pub use ldt::{LdtExporter, LdtExtractor};
pub use photometry::{calculate_photometry, Luminaire, Photometry};
pub use plotter::{LightDistributionPlotter, PlotterSettings, SvgCanvas};
pub use report::PhotometricSummary;
pub use units::LengthUnits;
