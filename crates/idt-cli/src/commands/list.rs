//! Database listing commands.

use crate::DatabaseArgs;
use anyhow::Result;
use idt_solver::SpectralSolver;
use tracing::info;

pub fn run_cameras(args: DatabaseArgs) -> Result<()> {
    let solver = SpectralSolver::new(args.data_paths);
    let cameras = solver.supported_cameras();

    info!(count = cameras.len(), "camera records found");
    for (make, model) in cameras {
        println!("{make} {model}");
    }
    Ok(())
}

pub fn run_illuminants(args: DatabaseArgs) -> Result<()> {
    let solver = SpectralSolver::new(args.data_paths);
    let illuminants = solver.supported_illuminants();

    info!(count = illuminants.len(), "illuminant records found");
    for tag in illuminants {
        println!("{tag}");
    }
    Ok(())
}
