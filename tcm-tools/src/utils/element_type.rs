/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Element type of the matrices a driver works on.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 32 bit float.
    Float,

    /// 64 bit float.
    Double,

    /// Complex number made of two 32 bit floats.
    Cfloat,

    /// Complex number made of two 64 bit floats.
    Cdouble,
}

impl ElementType {
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Cfloat | Self::Cdouble)
    }
}

/// Element type of drivers that only work on complex matrices.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexElementType {
    /// Complex number made of two 32 bit floats.
    Cfloat,

    /// Complex number made of two 64 bit floats.
    Cdouble,
}

impl From<ComplexElementType> for ElementType {
    fn from(value: ComplexElementType) -> Self {
        match value {
            ComplexElementType::Cfloat => Self::Cfloat,
            ComplexElementType::Cdouble => Self::Cdouble,
        }
    }
}

/// Encoding of a matrix stream.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    /// TAB separated columns and newline separated rows.
    Text,

    /// Version 1 of the binary matrix format.
    Bin,
}
