//! Metadata-path IDT solving command.

use super::{matrix_rows, print_matrix};
use crate::MetadataArgs;
use anyhow::{Context, Result};
use idt_solver::{Metadata, MetadataSolver};
use tracing::info;

pub fn run(args: MetadataArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read '{}'", args.input.display()))?;
    let metadata: Metadata = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not valid DNG metadata", args.input.display()))?;

    info!(
        baseline_exposure = metadata.baseline_exposure,
        illuminant_1 = metadata.calibration[0].illuminant,
        illuminant_2 = metadata.calibration[1].illuminant,
        "solving from DNG metadata"
    );

    let solver = MetadataSolver::new(metadata);
    let cat = solver.calculate_cat_matrix()?;
    let idt = solver.calculate_idt_matrix()?;

    if args.json {
        let output = serde_json::json!({
            "cat_matrix": matrix_rows(&cat),
            "idt_matrix": matrix_rows(&idt),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_matrix("cat", &cat);
        print_matrix("idt", &idt);
    }

    Ok(())
}
