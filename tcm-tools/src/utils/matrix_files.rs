/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use tcm_matrix::{
    io::{deserialize, serialize, Version},
    DenseMatrix,
};

use super::CMDResult;

/// Version of the binary format every driver reads and writes.
pub const BINARY_VERSION: Version = Version::Strided;

/// Read a binary matrix from the file at `path`.
pub fn load_matrix<T: bytemuck::Pod>(path: &Path) -> CMDResult<DenseMatrix<T>> {
    let mut reader = BufReader::new(File::open(path)?);
    let matrix = deserialize(&mut reader, BINARY_VERSION)?;
    tracing::debug!(
        "Loaded a {}x{} matrix from {}",
        matrix.height(),
        matrix.width(),
        path.display()
    );
    Ok(matrix)
}

/// Write `matrix` in binary form to the file at `path`, replacing any existing file.
pub fn save_matrix<T: bytemuck::Pod>(path: &Path, matrix: &DenseMatrix<T>) -> CMDResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let bytes = serialize(matrix, &mut writer, BINARY_VERSION)?;
    writer.flush()?;
    tracing::debug!("Wrote {} bytes to {}", bytes, path.display());
    Ok(())
}
