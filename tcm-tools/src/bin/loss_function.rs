/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::path::PathBuf;

use clap::Parser;
use num_complex::Complex64;
use tcm_tools::utils::{compute_loss_from_files, init_subscriber, ComplexElementType};

/// Command Usage:
///
/// Description:
/// Projects the spectrum of the dielectric matrix onto the plane wave with wave vector
/// `q` and prints `Re ε`, `Im ε`, `Re ε⁻¹` and `Im ε⁻¹` separated by TABs.
///
/// Example Command:
/// cargo run --bin loss_function -- --type cdouble --eigenvalues eps.0.100000.eigenvalues.bin
/// --eigenstates eps.0.100000.eigenstates.bin --positions positions.txt --q "(1, 0, 0)"
fn main() -> anyhow::Result<()> {
    init_subscriber();
    let args = LossFunctionArgs::parse();

    let (eps, inv) = match args.element_type {
        ComplexElementType::Cfloat => {
            let (e, i) = compute_loss_from_files::<f32>(
                &args.q,
                &args.positions,
                &args.eigenvalues,
                &args.eigenstates,
            )?;
            (
                Complex64::new(e.re.into(), e.im.into()),
                Complex64::new(i.re.into(), i.im.into()),
            )
        }
        ComplexElementType::Cdouble => compute_loss_from_files::<f64>(
            &args.q,
            &args.positions,
            &args.eigenvalues,
            &args.eigenstates,
        )?,
    };
    println!("{:.20}\t{:.20}\t{:.20}\t{:.20}", eps.re, eps.im, inv.re, inv.im);
    Ok(())
}

#[derive(Debug, Parser)]
struct LossFunctionArgs {
    /// Type of an element of the eigenvalues and eigenstates.
    #[arg(long = "type", value_enum)]
    pub element_type: ComplexElementType,

    /// Binary file with the eigenvalues of the dielectric matrix.
    #[arg(long)]
    pub eigenvalues: PathBuf,

    /// Binary file with the eigenstates of the dielectric matrix.
    #[arg(long)]
    pub eigenstates: PathBuf,

    /// Text file with the site positions as `x y z` triples.
    #[arg(long)]
    pub positions: PathBuf,

    /// Wave vector as `(qx, qy, qz)`.
    #[arg(long)]
    pub q: String,
}
