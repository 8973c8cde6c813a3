use regex::Regex;
use std::collections::BTreeMap;

use crate::error::PhotometryError;
use crate::ies::opening::IesStandard;
use crate::parse::Tokens;

/// Raw contents of an IES file before unit conversion and scaling.
///
/// Numeric fields that could not be read are `None`; array slots keep their
/// position so that intensities still line up with their angles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IesContent {
    pub header: String,
    pub standard: IesStandard,
    pub keywords: BTreeMap<String, String>,
    pub tilt: Option<String>,
    pub number_of_lamps: Option<i64>,
    pub lumens_per_lamp: Option<f64>,
    pub multiplying_factor: Option<f64>,
    pub n_v_angles: Option<i64>,
    pub n_h_angles: Option<i64>,
    pub photometer_type: Option<i64>,
    pub units_type: Option<i64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub ballast_factor: Option<f64>,
    pub photometric_factor: Option<f64>,
    pub input_watts: Option<f64>,
    pub gamma_angles: Vec<Option<f64>>,
    pub c_planes: Vec<Option<f64>>,
    /// Intensities in C-plane-major, gamma-minor order.
    pub raw_values: Vec<Option<f64>>,
    pub source: String,
}

impl IesContent {
    pub fn n_v(&self) -> usize {
        self.n_v_angles.unwrap_or(0).max(0) as usize
    }

    pub fn n_h(&self) -> usize {
        self.n_h_angles.unwrap_or(0).max(0) as usize
    }
}

pub struct IesExtractor {
    keyword_re: Regex,
}

impl IesExtractor {
    pub fn new() -> Self {
        Self {
            keyword_re: Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("keyword pattern is valid"),
        }
    }

    /// Check whether a file starts with an IESNA header line.
    pub fn is_ies(text: &str) -> bool {
        text.lines()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_uppercase().starts_with("IESNA"))
            .unwrap_or(false)
    }

    pub fn extract(&self, text: &str) -> Result<IesContent, PhotometryError> {
        let lines: Vec<&str> = text.lines().collect();
        let mut idx = 0;

        // Header: first non-blank line
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
        let header = lines.get(idx).map(|l| l.trim()).unwrap_or_default();
        if !header.to_uppercase().starts_with("IESNA") {
            return Err(PhotometryError::InvalidFormat(format!(
                "expected an IESNA header, found '{}'",
                header
            )));
        }
        idx += 1;

        let mut content = IesContent {
            header: header.to_string(),
            standard: IesStandard::from_header(header),
            source: text.to_string(),
            ..Default::default()
        };

        // Keyword block
        let mut last_key: Option<String> = None;
        while idx < lines.len() {
            let line = lines[idx].trim();
            if line.is_empty() {
                idx += 1;
                continue;
            }
            let Some(caps) = self.keyword_re.captures(line) else {
                break;
            };
            let key = caps[1].trim().to_uppercase();
            let value = caps[2].trim().to_string();

            let target = if key == "MORE" {
                last_key.clone()
            } else {
                last_key = Some(key.clone());
                Some(key)
            };

            match target {
                Some(target) => match content.keywords.get_mut(&target) {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(&value);
                    }
                    None => {
                        content.keywords.insert(target, value);
                    }
                },
                None => log::warn!("[MORE] line without a preceding keyword: {}", value),
            }
            idx += 1;
        }

        log::debug!("IES keywords: {:?}", content.keywords.keys().collect::<Vec<_>>());

        // The first non-keyword line ends the block; numeric data starts after TILT=
        let data_start = match lines[idx.min(lines.len())..]
            .iter()
            .position(|l| l.trim().to_uppercase().starts_with("TILT"))
        {
            Some(offset) => {
                let tilt_line = lines[idx + offset].trim();
                if offset > 0 {
                    log::warn!("Skipped {} line(s) between keywords and TILT", offset);
                }
                content.tilt = tilt_line
                    .split_once('=')
                    .map(|(_, v)| v.trim().to_string())
                    .or_else(|| Some(String::new()));
                idx + offset + 1
            }
            None => {
                log::warn!("No TILT line found, reading numeric data directly");
                idx
            }
        };

        let rest = lines
            .get(data_start..)
            .map(|l| l.join("\n"))
            .unwrap_or_default();
        let mut tokens = Tokens::new(&rest);

        if content
            .tilt
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("INCLUDE"))
        {
            Self::skip_tilt_block(&mut tokens);
        }

        content.number_of_lamps = tokens.next_int();
        content.lumens_per_lamp = tokens.next_float();
        content.multiplying_factor = tokens.next_float();
        content.n_v_angles = tokens.next_int();
        content.n_h_angles = tokens.next_int();
        content.photometer_type = tokens.next_int();
        content.units_type = tokens.next_int();
        content.width = tokens.next_float();
        content.length = tokens.next_float();
        content.height = tokens.next_float();

        content.ballast_factor = tokens.next_float();
        content.photometric_factor = tokens.next_float();
        content.input_watts = tokens.next_float();

        let n_v = content.n_v();
        let n_h = content.n_h();
        content.gamma_angles = tokens.take_floats(n_v);
        content.c_planes = tokens.take_floats(n_h);
        content.raw_values = tokens.take_floats(n_v * n_h);

        if content.raw_values.len() < n_v * n_h {
            log::warn!(
                "IES intensity data is short: expected {} values, found {}",
                n_v * n_h,
                content.raw_values.len()
            );
        }

        log::debug!(
            "Extracted IES data: {} gamma angles, {} C-planes, {} values",
            content.gamma_angles.len(),
            content.c_planes.len(),
            content.raw_values.len()
        );

        Ok(content)
    }

    /// Consume an inline tilt table: geometry code, pair count, angles, factors.
    fn skip_tilt_block(tokens: &mut Tokens<'_>) {
        let _lamp_geometry = tokens.next_int();
        let pairs = tokens.next_int().unwrap_or(0).max(0) as usize;
        let skipped = tokens.take_floats(2 * pairs).len();
        log::debug!("Skipped TILT=INCLUDE block with {} values", skipped);
    }
}

impl Default for IesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
