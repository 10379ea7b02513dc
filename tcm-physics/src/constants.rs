/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Named physical constants.
//!
//! Every routine in this crate that needs a physical constant looks it up by name in a
//! [`Constants`] table and fails with a [`ConstantsError`] if the key is missing. The
//! default table ([`Constants::default`]) uses electron-volts for energies:
//!
//! | key                          | value                 |
//! |------------------------------|-----------------------|
//! | `pi`                         | π                     |
//! | `boltzmann-constant`         | 8.6173303e-5 eV/K     |
//! | `chemical-potential`         | 0.4 eV                |
//! | `elementary-charge`          | 1.6021766208e-19 C    |
//! | `planck-constant`            | 6.582119514e-16 eV·s  |
//! | `self-interaction-potential` | 15.78 eV              |
//! | `temperature`                | 300 K                 |
//! | `vacuum-permittivity`        | 8.854187817e-12 F/m   |
//! | `tau`                        | 6.0e-3                |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tcm_linalg::RealField;
use thiserror::Error;

pub const PI: &str = "pi";
pub const BOLTZMANN_CONSTANT: &str = "boltzmann-constant";
pub const CHEMICAL_POTENTIAL: &str = "chemical-potential";
pub const ELEMENTARY_CHARGE: &str = "elementary-charge";
pub const PLANCK_CONSTANT: &str = "planck-constant";
pub const SELF_INTERACTION_POTENTIAL: &str = "self-interaction-potential";
pub const TEMPERATURE: &str = "temperature";
pub const VACUUM_PERMITTIVITY: &str = "vacuum-permittivity";
pub const TAU: &str = "tau";

const DEFAULTS: [(&str, f64); 9] = [
    (PI, std::f64::consts::PI),
    (BOLTZMANN_CONSTANT, 8.6173303E-5),
    (CHEMICAL_POTENTIAL, 0.4),
    (ELEMENTARY_CHARGE, 1.6021766208E-19),
    (PLANCK_CONSTANT, 6.582119514E-16),
    (SELF_INTERACTION_POTENTIAL, 15.78),
    (TEMPERATURE, 300.0),
    (VACUUM_PERMITTIVITY, 8.854187817E-12),
    (TAU, 6.0E-3),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Constant `{key}` is required to run `{func}`!")]
pub struct ConstantsError {
    pub func: String,
    pub key: String,
}

/// A table of named constants. Serializes as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constants(BTreeMap<String, f64>);

impl Constants {
    /// Construct an empty table.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Return the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    /// Iterate over all `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Return the value stored under `key`, or an error naming `func` as the routine that
    /// needed it.
    pub fn require(&self, func: &str, key: &str) -> Result<f64, ConstantsError> {
        self.get(key).ok_or_else(|| ConstantsError {
            func: func.to_owned(),
            key: key.to_owned(),
        })
    }

    /// [`Self::require`] followed by a conversion to the real field `R`.
    pub fn require_as<R: RealField>(&self, func: &str, key: &str) -> Result<R, ConstantsError> {
        self.require(func, key).map(R::from_f64)
    }

    /// Overwrite the entries of `self` with every entry of `other`.
    pub fn merge(&mut self, other: &Constants) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    /// Read a table from a JSON object such as `{"temperature": 4.0}`.
    pub fn from_json<R: std::io::Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self(
            DEFAULTS
                .iter()
                .map(|(k, v)| ((*k).to_owned(), *v))
                .collect(),
        )
    }
}

///////////
// Tests //
///////////
