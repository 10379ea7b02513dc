/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use tcm_linalg::LapackError;
use tcm_matrix::{
    io::{ReadBinError, SaveBinError},
    text::ReadTextError,
    MatrixError,
};
use tcm_physics::{io::InputError, ConstantsError, PhysicsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Constants(#[from] ConstantsError),

    #[error(transparent)]
    Lapack(#[from] LapackError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("failed to read binary matrix: {0}")]
    ReadBin(#[from] ReadBinError),

    #[error("failed to write binary matrix: {0}")]
    SaveBin(#[from] SaveBinError),

    #[error("failed to read text matrix: {0}")]
    ReadText(#[from] ReadTextError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
