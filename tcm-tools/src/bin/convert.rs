/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::io::{stdin, stdout, BufWriter};

use clap::Parser;
use num_complex::{Complex32, Complex64};
use tcm_tools::utils::{convert, init_subscriber, CMDResult, ElementType, StreamFormat};

/// Command Usage:
///
/// Description:
/// Reads one matrix from stdin and writes it to stdout, converting between the text
/// format (TAB separated columns, newline separated rows) and the binary format.
///
/// Example Command:
/// cargo run --bin convert -- --type cdouble --from text --to bin < h.txt > h.bin
fn main() -> anyhow::Result<()> {
    init_subscriber();
    let args = ConvertArgs::parse();

    let mut input = stdin().lock();
    let mut output = BufWriter::new(stdout().lock());
    let result: CMDResult<()> = match args.element_type {
        ElementType::Float => convert::<f32, _, _>(&mut input, &mut output, args.from, args.to),
        ElementType::Double => convert::<f64, _, _>(&mut input, &mut output, args.from, args.to),
        ElementType::Cfloat => {
            convert::<Complex32, _, _>(&mut input, &mut output, args.from, args.to)
        }
        ElementType::Cdouble => {
            convert::<Complex64, _, _>(&mut input, &mut output, args.from, args.to)
        }
    };

    if let Err(err) = &result {
        tracing::error!("Error: {}", err);
    }
    Ok(result?)
}

#[derive(Debug, Parser)]
struct ConvertArgs {
    /// Type of an element of the matrix.
    #[arg(long = "type", value_enum)]
    pub element_type: ElementType,

    /// Format of the input stream.
    #[arg(long, value_enum)]
    pub from: StreamFormat,

    /// Format of the output stream.
    #[arg(long, value_enum)]
    pub to: StreamFormat,
}
