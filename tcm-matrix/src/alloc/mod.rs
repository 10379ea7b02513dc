/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Aligned, fixed-size heap storage.

mod aligned;
mod buffer;

pub use aligned::AlignedAllocator;
pub use buffer::AlignedBuffer;

use thiserror::Error;

use crate::num::PowerOfTwo;

/// The default alignment (in bytes) of every matrix allocation.
///
/// This matches a cache line on the platforms we care about and is wide enough for
/// AVX-512 loads.
pub const DEFAULT_ALIGNMENT: PowerOfTwo = PowerOfTwo::alignment_of::<CacheLine>();

#[repr(align(64))]
struct CacheLine;

/// Indicate that an allocation error has occurred.
///
/// This type is limited in what it can contain because additional context
/// inevitably requires more memory allocation, which is what we're trying to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown allocation error")]
pub struct AllocatorError;
