/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fs::File,
    io::{stdin, BufWriter},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use num_complex::{Complex32, Complex64};
use tcm_tools::utils::{init_subscriber, solve_stream, ElementType, StreamFormat};

/// Command Usage:
///
/// Description:
/// Reads a Hermitian Hamiltonian from stdin, diagonalizes it and saves the ascending
/// eigenenergies (an `N x 1` column) and the eigenstates (as columns) in the binary
/// format. Only the upper triangle of the Hamiltonian is read.
///
/// Example Command:
/// cargo run --bin solve_system -- --type cdouble --energies e.bin --states psi.bin < h.bin
fn main() -> anyhow::Result<()> {
    init_subscriber();
    let args = SolveSystemArgs::parse();

    let create = |path: &PathBuf| {
        File::create(path)
            .map(BufWriter::new)
            .with_context(|| format!("could not open `{}` for writing", path.display()))
    };
    let mut energies = create(&args.energies)?;
    let mut states = create(&args.states)?;

    let input = stdin().lock();
    let format = args.format;
    match args.element_type {
        ElementType::Float => solve_stream::<f32, _, _, _>(input, format, &mut energies, &mut states),
        ElementType::Double => {
            solve_stream::<f64, _, _, _>(input, format, &mut energies, &mut states)
        }
        ElementType::Cfloat => {
            solve_stream::<Complex32, _, _, _>(input, format, &mut energies, &mut states)
        }
        ElementType::Cdouble => {
            solve_stream::<Complex64, _, _, _>(input, format, &mut energies, &mut states)
        }
    }
    .context("failed to solve the system")?;
    Ok(())
}

#[derive(Debug, Parser)]
struct SolveSystemArgs {
    /// Type of an element of the Hamiltonian.
    #[arg(long = "type", value_enum)]
    pub element_type: ElementType,

    /// File where to save the eigenenergies of the system.
    #[arg(long)]
    pub energies: PathBuf,

    /// File where to save the eigenstates of the system.
    #[arg(long)]
    pub states: PathBuf,

    /// Format of the Hamiltonian on stdin. The text format is a square matrix in
    /// row-major order.
    #[arg(long, value_enum, default_value = "bin")]
    pub format: StreamFormat,
}
