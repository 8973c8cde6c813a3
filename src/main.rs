use anyhow::Context;
use clap::Parser;
use lumiview::*;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args = Cli::parse();

    // Initialize logger with custom format to hide module paths.
    // RUST_LOG directives are parsed last so they still override the flag level.
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} lumiview] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    args.validate()?;

    let luminaire = import_from_path(&args.file)
        .with_context(|| format!("Failed to import {}", args.file.display()))?
        .with_calculated_photometry();
    log::info!(
        "Loaded {} C-planes x {} gamma angles",
        luminaire.photometry.c_planes.len(),
        luminaire.photometry.gamma_angles.len()
    );

    let mut summary = PhotometricSummary::new(&luminaire, args.units);
    if let Some(hours) = args.daily_hours {
        summary = summary.with_energy(hours, args.price_per_kwh)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }

    if let Some(path) = &args.plot {
        let plotter = LightDistributionPlotter::new(args.plotter_settings()?);
        let mut canvas = SvgCanvas::new(args.width, args.height);
        plotter.draw(&mut canvas, &luminaire);
        write_output(path, &canvas.finish())?;
        println!("✓ Polar diagram written to {}", path.display());
    }

    if let Some(path) = &args.export_ies {
        write_output(path, &IesExporter::export(&luminaire))?;
        println!("✓ IES export written to {}", path.display());
    }

    if let Some(path) = &args.export_ldt {
        write_output(path, &LdtExporter::export(&luminaire))?;
        println!("✓ EULUMDAT export written to {}", path.display());
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
