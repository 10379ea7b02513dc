/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tcm_linalg::RealField;
use tcm_physics::{timing::TimingSink, Constants};
use tcm_tools::utils::{
    assign_frequencies, init_subscriber, run_sweep, ComplexElementType, ConstantsArgs,
    DielectricInputs, FrequencySweep,
};
use tracing::info;

/// Command Usage:
///
/// Description:
/// Computes the dielectric matrix `ε(ω) = I - V χ(ω)` and its spectrum for every
/// frequency `ω = start + i * step` up to and including `stop`, with the `tau` constant
/// as the imaginary part. For each frequency three binary files are written:
/// `<output>.<ω>.matrix.bin`, `<output>.<ω>.eigenvalues.bin` and
/// `<output>.<ω>.eigenstates.bin`.
///
/// The sweep can be split over several processes with `--rank` and `--world-size`;
/// process `rank` handles every `world-size`-th frequency starting at index `rank`.
///
/// Example Command:
/// cargo run --bin dielectric_function -- --type cdouble --energies e.bin
/// --states psi.bin --potential v.bin --start 0 --stop 2 --step 0.01 --output eps
fn main() -> anyhow::Result<()> {
    init_subscriber();
    let args = DielectricFunctionArgs::parse();
    let constants = args.constants.load().context("failed to load constants")?;

    match args.element_type {
        ComplexElementType::Cfloat => run::<f32>(&args, &constants),
        ComplexElementType::Cdouble => run::<f64>(&args, &constants),
    }
}

fn run<R: RealField>(args: &DielectricFunctionArgs, constants: &Constants) -> anyhow::Result<()> {
    let sweep = FrequencySweep::new(args.start, args.stop, args.step)?;
    let indices = assign_frequencies(sweep.len(), args.rank, args.world_size)?;
    info!(
        "Process {}/{} handles {} of {} frequencies",
        args.rank,
        args.world_size,
        indices.len(),
        sweep.len()
    );

    let inputs = DielectricInputs::<R>::load(&args.energies, &args.states, &args.potential)
        .context("failed to load the inputs")?;
    let sink = TimingSink::new();
    run_sweep(&inputs, &sweep, &indices, constants, &args.output, &sink)
        .context("failed to compute the dielectric function")?;

    info!("Timings:\n{}", sink.report_string());
    Ok(())
}

#[derive(Debug, Parser)]
struct DielectricFunctionArgs {
    /// Type of an element of the states, potential and dielectric matrices.
    #[arg(long = "type", value_enum, default_value = "cdouble")]
    pub element_type: ComplexElementType,

    /// Binary file with the single-particle energies as a column.
    #[arg(long)]
    pub energies: PathBuf,

    /// Binary file with the single-particle states as columns.
    #[arg(long)]
    pub states: PathBuf,

    /// Binary file with the Coulomb matrix.
    #[arg(long)]
    pub potential: PathBuf,

    /// First frequency of the sweep.
    #[arg(long)]
    pub start: f64,

    /// Last frequency of the sweep.
    #[arg(long)]
    pub stop: f64,

    /// Distance between consecutive frequencies.
    #[arg(long)]
    pub step: f64,

    /// Index of this process.
    #[arg(long, default_value = "0")]
    pub rank: usize,

    /// Number of processes sharing the sweep.
    #[arg(long = "world-size", default_value = "1")]
    pub world_size: usize,

    /// Prefix of the output files.
    #[arg(long, default_value = "epsilon")]
    pub output: String,

    #[command(flatten)]
    pub constants: ConstantsArgs,
}
