use crate::error::PhotometryError;
use crate::ldt::symmetry::Symmetry;
use crate::parse::{parse_float, parse_int, parse_text};

/// Number of direct-ratio lines in every EULUMDAT file.
pub const DIRECT_RATIO_COUNT: usize = 10;

/// One standard lamp set (lines 26a-26f).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LdtLampSet {
    /// Negative when the file carries absolute photometry.
    pub number_of_lamps: Option<i64>,
    pub lamp_type: Option<String>,
    pub total_luminous_flux: Option<f64>,
    pub color_appearance: Option<String>,
    pub color_rendering: Option<String>,
    pub wattage: Option<f64>,
}

/// Raw field values of an EULUMDAT file, in file units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LdtContent {
    pub identification: Option<String>,
    pub type_indicator: Option<i64>,
    pub symmetry_indicator: Option<i64>,
    pub n_c: Option<i64>,
    pub c_spacing: Option<f64>,
    pub n_g: Option<i64>,
    pub g_spacing: Option<f64>,
    pub measurement_report: Option<String>,
    pub luminaire_name: Option<String>,
    pub luminaire_number: Option<String>,
    pub file_name: Option<String>,
    pub date_user: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub luminous_length: Option<f64>,
    pub luminous_width: Option<f64>,
    pub height_c0: Option<f64>,
    pub height_c90: Option<f64>,
    pub height_c180: Option<f64>,
    pub height_c270: Option<f64>,
    pub downward_flux_fraction: Option<f64>,
    pub light_output_ratio: Option<f64>,
    pub conversion_factor: Option<f64>,
    pub tilt: Option<f64>,
    pub lamp_sets: Vec<LdtLampSet>,
    pub direct_ratios: Vec<Option<f64>>,
    pub c_angles: Vec<Option<f64>>,
    pub gamma_angles: Vec<Option<f64>>,
    /// Stored intensities in cd/klm, C-major, gamma-minor.
    pub values: Vec<Option<f64>>,
    pub source: String,
}

impl LdtContent {
    /// Unknown or missing indicators read as no symmetry.
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry_indicator
            .and_then(Symmetry::from_code)
            .unwrap_or_default()
    }
}

/// Line-by-line EULUMDAT reader.
///
/// Every field sits on its own line. A line that does not parse leaves its
/// field `None`, and reading past the end of the file yields `None` for
/// every remaining field, so truncated files decode to short arrays.
pub struct LdtExtractor;

impl LdtExtractor {
    pub fn extract(text: &str) -> Result<LdtContent, PhotometryError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.iter().all(|line| line.trim().is_empty()) {
            log::warn!("EULUMDAT stream is empty, no photometric data read");
        }

        let mut reader = LineReader { lines: &lines, idx: 0 };

        let mut content = LdtContent {
            source: text.to_string(),
            ..Default::default()
        };

        // Lines 1-7: identification, indicators and angle counts
        content.identification = reader.next_text();
        content.type_indicator = reader.next_int();
        content.symmetry_indicator = reader.next_int();
        content.n_c = reader.next_int();
        content.c_spacing = reader.next_float();
        content.n_g = reader.next_int();
        content.g_spacing = reader.next_float();

        // Lines 8-12: free text
        content.measurement_report = reader.next_text();
        content.luminaire_name = reader.next_text();
        content.luminaire_number = reader.next_text();
        content.file_name = reader.next_text();
        content.date_user = reader.next_text();

        // Lines 13-21: geometry in millimeters
        content.length = reader.next_float();
        content.width = reader.next_float();
        content.height = reader.next_float();
        content.luminous_length = reader.next_float();
        content.luminous_width = reader.next_float();
        content.height_c0 = reader.next_float();
        content.height_c90 = reader.next_float();
        content.height_c180 = reader.next_float();
        content.height_c270 = reader.next_float();

        // Lines 22-25
        content.downward_flux_fraction = reader.next_float();
        content.light_output_ratio = reader.next_float();
        content.conversion_factor = reader.next_float();
        content.tilt = reader.next_float();

        // Line 26: lamp sets, six lines each
        let n_sets = reader.next_int().unwrap_or(0).max(0) as usize;
        for _ in 0..n_sets {
            let Some(first) = reader.next_line() else {
                break;
            };
            content.lamp_sets.push(LdtLampSet {
                number_of_lamps: parse_int(first),
                lamp_type: reader.next_text(),
                total_luminous_flux: reader.next_float(),
                color_appearance: reader.next_text(),
                color_rendering: reader.next_text(),
                wattage: reader.next_float(),
            });
        }

        // Line 27: direct ratios
        content.direct_ratios = (0..DIRECT_RATIO_COUNT).map(|_| reader.next_float()).collect();

        // Lines 28-29: angles
        let n_c = content.n_c.unwrap_or(0).max(0) as usize;
        let n_g = content.n_g.unwrap_or(0).max(0) as usize;
        content.c_angles = reader.take_floats(n_c);
        content.gamma_angles = reader.take_floats(n_g);

        // Line 30+: only the planes the symmetry stores are present
        let count = content.symmetry().value_count(n_c, n_g);
        content.values = reader.take_floats(count);

        if content.values.len() < count {
            log::warn!(
                "EULUMDAT intensity data is short: expected {} values, found {}",
                count,
                content.values.len()
            );
        }

        log::debug!(
            "Extracted EULUMDAT data: symmetry {:?}, {} C-planes, {} gamma angles, {} values, {} lamp sets",
            content.symmetry(),
            content.c_angles.len(),
            content.gamma_angles.len(),
            content.values.len(),
            content.lamp_sets.len()
        );

        Ok(content)
    }
}

/// Cursor over file lines; reads past the end give `None`.
struct LineReader<'a> {
    lines: &'a [&'a str],
    idx: usize,
}

impl<'a> LineReader<'a> {
    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.idx).copied();
        self.idx += 1;
        line
    }

    fn next_float(&mut self) -> Option<f64> {
        self.next_line().and_then(parse_float)
    }

    fn next_int(&mut self) -> Option<i64> {
        self.next_line().and_then(parse_int)
    }

    fn next_text(&mut self) -> Option<String> {
        self.next_line().and_then(parse_text)
    }

    /// Up to `count` one-per-line floats, stopping at end of file.
    fn take_floats(&mut self, count: usize) -> Vec<Option<f64>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            match self.next_line() {
                Some(line) => values.push(parse_float(line)),
                None => break,
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> String {
        let mut lines: Vec<String> = vec![
            "RUCO Licht GmbH",
            "1",
            "4",
            "4",
            "90",
            "3",
            "45",
            "REP-42",
            "Downlight 150",
            "DL150-840",
            "dl150.ldt",
            "2020-05-01 / jd",
            "150",
            "0",
            "80",
            "120",
            "0",
            "10",
            "10",
            "10",
            "10",
            "99,5",
            "85",
            "1",
            "0",
            "1",
            "2",
            "LED 840",
            "2000",
            "4000 K",
            "1B",
            "18.5",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        lines.extend(
            ["0.5", "0.6", "0.7", "0.75", "0.8", "0.85", "0.9", "0.92", "0.95", "0.97"]
                .iter()
                .map(|s| s.to_string()),
        );
        lines.extend(["0", "90", "180", "270"].iter().map(|s| s.to_string()));
        lines.extend(["0", "45", "90"].iter().map(|s| s.to_string()));
        // C0 and C90 only
        lines.extend(["400", "300", "20", "380", "290", "15"].iter().map(|s| s.to_string()));
        lines.join("\r\n") + "\r\n"
    }

    #[test]
    fn test_extract_fields() {
        let content = LdtExtractor::extract(&sample()).unwrap();
        assert_eq!(content.identification.as_deref(), Some("RUCO Licht GmbH"));
        assert_eq!(content.type_indicator, Some(1));
        assert_eq!(content.symmetry(), Symmetry::BothPlanes);
        assert_eq!(content.n_c, Some(4));
        assert_eq!(content.measurement_report.as_deref(), Some("REP-42"));
        assert_eq!(content.date_user.as_deref(), Some("2020-05-01 / jd"));
        assert_eq!(content.length, Some(150.0));
        assert_eq!(content.width, Some(0.0));
        assert_eq!(content.downward_flux_fraction, Some(99.5));
        assert_eq!(content.light_output_ratio, Some(85.0));
    }

    #[test]
    fn test_lamp_set_and_arrays() {
        let content = LdtExtractor::extract(&sample()).unwrap();
        assert_eq!(content.lamp_sets.len(), 1);
        let lamp = &content.lamp_sets[0];
        assert_eq!(lamp.number_of_lamps, Some(2));
        assert_eq!(lamp.lamp_type.as_deref(), Some("LED 840"));
        assert_eq!(lamp.total_luminous_flux, Some(2000.0));
        assert_eq!(lamp.wattage, Some(18.5));
        assert_eq!(content.direct_ratios.len(), 10);
        assert_eq!(content.direct_ratios[3], Some(0.75));
        assert_eq!(content.c_angles.len(), 4);
        assert_eq!(content.gamma_angles, vec![Some(0.0), Some(45.0), Some(90.0)]);
        assert_eq!(content.values.len(), 6);
        assert_eq!(content.values[3], Some(380.0));
    }

    #[test]
    fn test_bad_line_degrades_to_none() {
        let text = sample().replacen("\r\n150\r\n", "\r\nabc\r\n", 1);
        let content = LdtExtractor::extract(&text).unwrap();
        assert_eq!(content.length, None);
        assert_eq!(content.height, Some(80.0));
    }

    #[test]
    fn test_value_count_follows_plane_count() {
        // One unreadable C-angle must not shrink the intensity list
        let text = sample().replacen("\r\n0.97\r\n0\r\n90\r\n", "\r\n0.97\r\n0\r\nx90\r\n", 1);
        let content = LdtExtractor::extract(&text).unwrap();
        assert_eq!(content.c_angles, vec![Some(0.0), None, Some(180.0), Some(270.0)]);
        assert_eq!(content.values.len(), 6);
        assert_eq!(content.values[5], Some(15.0));
    }

    #[test]
    fn test_truncated_file() {
        let text: String = sample().lines().take(20).collect::<Vec<_>>().join("\n");
        let content = LdtExtractor::extract(&text).unwrap();
        assert_eq!(content.luminous_length, Some(120.0));
        assert_eq!(content.height_c180, Some(10.0));
        assert_eq!(content.height_c270, None);
        assert!(content.lamp_sets.is_empty());
        assert!(content.c_angles.is_empty());
        assert!(content.values.is_empty());
        assert_eq!(content.direct_ratios, vec![None; 10]);
    }

    #[test]
    fn test_empty_file_yields_empty_content() {
        let content = LdtExtractor::extract("\n \n").unwrap();
        assert_eq!(content.identification, None);
        assert_eq!(content.symmetry(), Symmetry::None);
        assert!(content.lamp_sets.is_empty());
        assert!(content.c_angles.is_empty());
        assert!(content.gamma_angles.is_empty());
        assert!(content.values.is_empty());
    }
}
