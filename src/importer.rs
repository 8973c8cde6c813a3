use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;
use crate::ies::{self, IesExtractor};
use crate::ldt::{self, LdtExtractor};
use crate::parse::decode_text;
use crate::photometry::{FileFormat, Luminaire};

/// Detect the format from the first non-blank line.
pub fn detect_format(text: &str) -> FileFormat {
    if IesExtractor::is_ies(text) {
        FileFormat::Ies
    } else {
        FileFormat::Ldt
    }
}

/// Read a whole photometric stream and build a [`Luminaire`].
///
/// The stream is rewound first, so a reader that was already peeked at can
/// be passed in directly.
pub fn import_from_file<R: Read + Seek>(reader: &mut R) -> Result<Luminaire> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = decode_text(&bytes);

    let luminaire = match detect_format(&text) {
        FileFormat::Ies => {
            log::debug!("Detected IES file ({} bytes)", bytes.len());
            ies::convert_content(IesExtractor::new().extract(&text)?)?
        }
        FileFormat::Ldt => {
            log::debug!("Detected EULUMDAT file ({} bytes)", bytes.len());
            ldt::convert_content(LdtExtractor::extract(&text)?)?
        }
    };
    Ok(luminaire)
}

pub fn import_from_path(path: &Path) -> Result<Luminaire> {
    log::info!("Importing {}", path.display());
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    import_from_file(&mut reader)
}
