pub mod converter;
pub mod exporter;
pub mod extractor;
pub mod opening;

pub use converter::convert_content;
pub use exporter::IesExporter;
pub use extractor::{IesContent, IesExtractor};
pub use opening::{luminous_opening, signed_dimensions, IesStandard};
