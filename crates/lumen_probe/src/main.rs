//! Report Monte-Carlo scatter statistics for every material in a library.
//!
//! Run with: cargo run -p lumen_probe -- crates/lumen_probe/assets/materials.json [samples] [seed] [incidence_degrees]

use std::env;

use anyhow::{bail, Context, Result};
use lumen_scatter::{Material, MaterialLibrary, ScatterKind};

mod probe;

use probe::{probe_material, ProbeConfig, ProbeStats, Side};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: lumen_probe <library.json> [samples] [seed] [incidence_degrees]");
        println!("\nExample:");
        println!("  cargo run -p lumen_probe -- crates/lumen_probe/assets/materials.json 100000 7 45");
        return Ok(());
    }

    let path = &args[1];
    let config = parse_config(&args[2..])?;
    let library = MaterialLibrary::load(path)
        .with_context(|| format!("Failed to load material library {}", path))?;

    if library.is_empty() {
        log::warn!("Material library {} is empty", path);
        return Ok(());
    }

    log::info!(
        "Probing {} materials: {} samples, seed {}, {} workers, {} degrees",
        library.len(),
        config.samples,
        config.seed,
        config.workers,
        config.incidence_degrees
    );

    println!(
        "{:<16} {:<10} {:<8} {:>9} {:>9} {:>9} {:>9}  {:<24} {:>10}",
        "material", "type", "side", "scatter", "diffuse", "reflect", "refract", "mean attenuation", "non-finite"
    );

    for (name, material) in library.iter() {
        report(name, material, Side::Outside, &probe_material(material, Side::Outside, &config));

        // Only dielectrics are meant to be hit from inside
        if let Material::Dielectric(_) = material {
            report(name, material, Side::Inside, &probe_material(material, Side::Inside, &config));
        }
    }

    Ok(())
}

fn parse_config(args: &[String]) -> Result<ProbeConfig> {
    let mut config = ProbeConfig::default();

    if let Some(s) = args.first() {
        config.samples = s
            .parse()
            .with_context(|| format!("Invalid sample count '{}'", s))?;
        if config.samples == 0 {
            bail!("Sample count must be positive");
        }
    }

    if let Some(s) = args.get(1) {
        config.seed = s.parse().with_context(|| format!("Invalid seed '{}'", s))?;
    }

    if let Some(s) = args.get(2) {
        let degrees: f32 = s
            .parse()
            .with_context(|| format!("Invalid incidence angle '{}'", s))?;
        if !(0.0..=90.0).contains(&degrees) {
            bail!("Incidence angle must be within [0, 90] degrees, got {}", degrees);
        }
        config.incidence_degrees = degrees;
    }

    Ok(config)
}

fn report(name: &str, material: &Material, side: Side, stats: &ProbeStats) {
    let attenuation = stats.mean_attenuation();

    println!(
        "{:<16} {:<10} {:<8} {:>9.4} {:>9.4} {:>9.4} {:>9.4}  ({:.3}, {:.3}, {:.3})    {:>10}",
        name,
        material.kind_name(),
        side.label(),
        stats.scatter_fraction(),
        stats.fraction(ScatterKind::Diffuse),
        stats.fraction(ScatterKind::Reflected),
        stats.fraction(ScatterKind::Refracted),
        attenuation.r(),
        attenuation.g(),
        attenuation.b(),
        stats.non_finite
    );

    if stats.non_finite > 0 {
        log::warn!("{}: {} scattered rays had non-finite directions", name, stats.non_finite);
    }
}
