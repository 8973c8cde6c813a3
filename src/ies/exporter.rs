use crate::ies::opening::{signed_dimensions, IesStandard};
use crate::parse::format_number;
use crate::photometry::Luminaire;

const LINE_END: &str = "\r\n";
const VALUES_PER_LINE: usize = 12;

/// Writes a [`Luminaire`] as IESNA LM-63 text.
///
/// Only the first lamp set is written. Relative intensities are scaled back
/// to candela with that lamp set's flux, and absolute data is flagged with
/// `-1` lumens per lamp.
pub struct IesExporter;

impl IesExporter {
    pub fn export(luminaire: &Luminaire) -> String {
        let mut output = String::new();
        let lamp = luminaire.lamps.first().cloned().unwrap_or_default();
        let metadata = &luminaire.metadata;

        let standard = luminaire
            .luminous_opening
            .as_ref()
            .map(IesStandard::for_opening)
            .unwrap_or_default();
        output.push_str(standard.header());
        output.push_str(LINE_END);

        // Fixed keyword block
        let keywords = [
            ("TEST", metadata.measurement_report.as_deref()),
            ("MANUFAC", metadata.manufacturer.as_deref()),
            ("LUMCAT", metadata.luminaire_catalog_number.as_deref()),
            ("LUMINAIRE", metadata.luminaire.as_deref()),
            ("LAMP", lamp.description.as_deref()),
            ("LAMPCAT", lamp.catalog_number.as_deref()),
            ("LAMPPOSITION", lamp.position.as_deref()),
            ("BALLAST", lamp.ballast_description.as_deref()),
            ("BALLASTCAT", lamp.ballast_catalog_number.as_deref()),
            ("COLORTEMP", lamp.color.as_deref()),
            ("CRI", lamp.cri.as_deref()),
            ("ISSUEDATE", metadata.date_and_user.as_deref()),
        ];
        for (key, value) in keywords {
            if let Some(value) = value {
                Self::write_keyword(&mut output, key, value);
            }
        }
        for (key, value) in &metadata.additional_properties {
            // TEST is already part of the fixed block
            if key == "TEST" && metadata.measurement_report.is_some() {
                continue;
            }
            Self::write_keyword(&mut output, key, value);
        }

        output.push_str("TILT=NONE");
        output.push_str(LINE_END);

        let number_of_lamps = lamp.number_of_lamps.max(1);
        let (lumens_per_lamp, scale) = if luminaire.is_absolute() {
            (-1.0, 1.0)
        } else {
            match lamp.lumens_per_lamp.filter(|lumens| *lumens > 0.0) {
                Some(lumens) => (lumens, lumens * f64::from(number_of_lamps) / 1000.0),
                None => {
                    log::warn!("Relative photometry without lamp flux, exporting per 1000 lm");
                    (1000.0 / f64::from(number_of_lamps), 1.0)
                }
            }
        };

        let (width, length, height) = luminaire
            .luminous_opening
            .as_ref()
            .map(signed_dimensions)
            .unwrap_or((0.0, 0.0, 0.0));

        let photometry = &luminaire.photometry;
        let attributes = [
            f64::from(number_of_lamps),
            lumens_per_lamp,
            1.0,
            photometry.gamma_angles.len() as f64,
            photometry.c_planes.len() as f64,
            1.0,
            2.0,
            width,
            length,
            height,
        ];
        output.push_str(&Self::join(&attributes));
        output.push_str(LINE_END);
        output.push_str(&Self::join(&[1.0, 1.0, lamp.wattage.unwrap_or(0.0)]));
        output.push_str(LINE_END);

        Self::write_values(&mut output, &photometry.gamma_angles);
        Self::write_values(&mut output, &photometry.c_planes);

        for &c_plane in &photometry.c_planes {
            let row: Vec<f64> = photometry
                .gamma_angles
                .iter()
                .map(|&gamma| photometry.intensity(c_plane, gamma).unwrap_or(0.0) * scale)
                .collect();
            Self::write_values(&mut output, &row);
        }

        log::info!(
            "Exported IES file ({}, {} C-planes)",
            standard.header(),
            photometry.c_planes.len()
        );
        output
    }

    /// Multi-line values continue on `[MORE]` lines.
    fn write_keyword(output: &mut String, key: &str, value: &str) {
        for (i, line) in value.split('\n').enumerate() {
            let key = if i == 0 { key } else { "MORE" };
            output.push_str(&format!("[{}] {}", key, line.trim_end()));
            output.push_str(LINE_END);
        }
    }

    fn write_values(output: &mut String, values: &[f64]) {
        if values.is_empty() {
            output.push_str(LINE_END);
            return;
        }
        for chunk in values.chunks(VALUES_PER_LINE) {
            output.push_str(&Self::join(chunk));
            output.push_str(LINE_END);
        }
    }

    fn join(values: &[f64]) -> String {
        values
            .iter()
            .map(|&v| format_number(v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
