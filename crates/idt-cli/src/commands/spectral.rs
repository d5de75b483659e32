//! Spectral-path IDT solving command.

use super::{matrix_rows, print_matrix};
use crate::SpectralArgs;
use anyhow::{bail, Context, Result};
use idt_solver::SpectralSolver;
use tracing::{debug, info};

/// Parses "r,g,b" into white-balance multipliers.
fn parse_wb(text: &str) -> Result<[f64; 3]> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("cannot parse white-balance multipliers from '{text}'"))?;

    if parts.len() != 3 {
        bail!("expected three comma-separated multipliers, got {}", parts.len());
    }
    Ok([parts[0], parts[1], parts[2]])
}

pub fn run(args: SpectralArgs) -> Result<()> {
    let mut solver = SpectralSolver::new(args.database.data_paths);

    info!(make = %args.make, model = %args.model, "looking up camera");
    solver
        .find_camera(&args.make, &args.model)
        .with_context(|| format!("no spectral data for {} {}", args.make, args.model))?;

    solver
        .load_observer(&args.observer)
        .with_context(|| format!("cannot load observer '{}'", args.observer))?;
    solver
        .load_training(&args.training)
        .with_context(|| format!("cannot load training data '{}'", args.training))?;

    match (&args.illuminant, &args.wb) {
        (Some(name), _) => {
            debug!(illuminant = %name, "using named illuminant");
            solver
                .find_illuminant(name)
                .with_context(|| format!("unknown illuminant '{name}'"))?;
            solver.calculate_wb()?;
        }
        (None, Some(wb_text)) => {
            let wb = parse_wb(wb_text)?;
            solver.find_illuminant_by_wb(wb)?;
        }
        (None, None) => bail!("one of --illuminant or --wb is required"),
    }

    solver.calculate_idt_matrix().context("IDT fit failed")?;

    let illuminant_tag = solver
        .illuminant()
        .map(|illuminant| illuminant.tag().to_string())
        .unwrap_or_default();
    let wb = solver.wb_multipliers();
    let idt = solver.idt_matrix();

    if args.json {
        let output = serde_json::json!({
            "camera": { "make": args.make, "model": args.model },
            "illuminant": illuminant_tag,
            "wb_multipliers": wb,
            "idt_matrix": matrix_rows(&idt),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("camera:     {} {}", args.make, args.model);
        println!("illuminant: {illuminant_tag}");
        println!("wb:         {:.6} {:.6} {:.6}", wb[0], wb[1], wb[2]);
        print_matrix("idt", &idt);
    }

    Ok(())
}
