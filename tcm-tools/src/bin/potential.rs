/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::io::{stdin, stdout, BufWriter};

use anyhow::Context;
use clap::Parser;
use num_complex::{Complex32, Complex64};
use tcm_tools::utils::{init_subscriber, make_potential, ConstantsArgs, ElementType};

/// Command Usage:
///
/// Description:
/// Reads site positions as `x y z` triples from stdin and writes the Coulomb matrix
/// between the sites to stdout in the binary format.
///
/// Example Command:
/// cargo run --bin potential -- --type cdouble < positions.txt > potential.bin
fn main() -> anyhow::Result<()> {
    init_subscriber();
    let args = PotentialArgs::parse();
    let constants = args.constants.load().context("failed to load constants")?;

    let input = stdin().lock();
    let mut output = BufWriter::new(stdout().lock());
    match args.element_type {
        ElementType::Float => make_potential::<f32, _, _>(input, &mut output, &constants),
        ElementType::Double => make_potential::<f64, _, _>(input, &mut output, &constants),
        ElementType::Cfloat => make_potential::<Complex32, _, _>(input, &mut output, &constants),
        ElementType::Cdouble => make_potential::<Complex64, _, _>(input, &mut output, &constants),
    }
    .context("failed to compute the Coulomb matrix")?;
    Ok(())
}

#[derive(Debug, Parser)]
struct PotentialArgs {
    /// Type of an element of the matrix.
    #[arg(long = "type", value_enum)]
    pub element_type: ElementType,

    #[command(flatten)]
    pub constants: ConstantsArgs,
}
