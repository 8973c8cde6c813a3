pub mod converter;
pub mod exporter;
pub mod extractor;
pub mod symmetry;

pub use converter::{convert_content, ROOM_INDICES};
pub use exporter::LdtExporter;
pub use extractor::{LdtContent, LdtExtractor, LdtLampSet};
pub use symmetry::Symmetry;
