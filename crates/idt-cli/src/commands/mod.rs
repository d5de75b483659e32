//! Subcommand implementations.

pub mod list;
pub mod metadata;
pub mod spectral;

use idt_math::Mat3;

/// Prints a labelled 3x3 matrix in aligned rows.
fn print_matrix(label: &str, matrix: &Mat3) {
    println!("{label}:");
    for row in &matrix.m {
        println!("  {:>13.10} {:>13.10} {:>13.10}", row[0], row[1], row[2]);
    }
}

/// Flattens a matrix for JSON output.
fn matrix_rows(matrix: &Mat3) -> Vec<Vec<f64>> {
    matrix.m.iter().map(|row| row.to_vec()).collect()
}
