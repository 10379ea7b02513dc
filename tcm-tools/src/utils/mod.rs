/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
pub mod constants_args;
pub use constants_args::ConstantsArgs;

pub mod convert;
pub use convert::*;

pub mod dielectric_function;
pub use dielectric_function::*;

pub mod element_type;
pub use element_type::*;

pub mod loss_function;
pub use loss_function::*;

pub mod matrix_files;
pub use matrix_files::*;

pub mod potential;
pub use potential::*;

pub mod solve_system;
pub use solve_system::*;

pub mod sweep;
pub use sweep::*;

pub mod tool_error;
pub use tool_error::*;

pub type CMDResult<T> = Result<T, ToolError>;

pub mod tracing;
pub use tracing::{init_subscriber, init_test_subscriber};
