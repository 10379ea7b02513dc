/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Args;
use tcm_physics::{constants, Constants};

use super::CMDResult;

/// Command-line overrides of the physical constants. Flatten into a driver's arguments.
///
/// Values are applied in order: built-in defaults, then `--constants-file`, then the
/// individual flags.
#[derive(Debug, Clone, Default, Args)]
pub struct ConstantsArgs {
    /// JSON object of constants, e.g. `{"temperature": 4.0}`.
    #[arg(long = "constants-file")]
    pub constants_file: Option<PathBuf>,

    /// PI [default: 3.141592653589793]
    #[arg(long)]
    pub pi: Option<f64>,

    /// Boltzmann constant in eV/K [default: 8.6173303e-5]
    #[arg(long)]
    pub boltzmann_constant: Option<f64>,

    /// Chemical potential in eV [default: 0.4]
    #[arg(long)]
    pub chemical_potential: Option<f64>,

    /// Elementary charge in C [default: 1.6021766208e-19]
    #[arg(long)]
    pub elementary_charge: Option<f64>,

    /// Planck constant in eV s [default: 6.582119514e-16]
    #[arg(long)]
    pub planck_constant: Option<f64>,

    /// Self interaction Coulomb potential in eV [default: 15.78]
    #[arg(long)]
    pub self_interaction_potential: Option<f64>,

    /// Temperature in K [default: 300]
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Vacuum permittivity in F/m [default: 8.854187817e-12]
    #[arg(long)]
    pub vacuum_permittivity: Option<f64>,

    /// Relaxation time, used as the imaginary part of the frequency [default: 6e-3]
    #[arg(long)]
    pub tau: Option<f64>,
}

impl ConstantsArgs {
    fn overrides(&self) -> [(&'static str, Option<f64>); 9] {
        [
            (constants::PI, self.pi),
            (constants::BOLTZMANN_CONSTANT, self.boltzmann_constant),
            (constants::CHEMICAL_POTENTIAL, self.chemical_potential),
            (constants::ELEMENTARY_CHARGE, self.elementary_charge),
            (constants::PLANCK_CONSTANT, self.planck_constant),
            (
                constants::SELF_INTERACTION_POTENTIAL,
                self.self_interaction_potential,
            ),
            (constants::TEMPERATURE, self.temperature),
            (constants::VACUUM_PERMITTIVITY, self.vacuum_permittivity),
            (constants::TAU, self.tau),
        ]
    }

    /// Resolve the final table of constants.
    pub fn load(&self) -> CMDResult<Constants> {
        let mut cs = Constants::default();
        if let Some(path) = &self.constants_file {
            let file = File::open(path)?;
            cs.merge(&Constants::from_json(BufReader::new(file))?);
        }
        for (key, value) in self.overrides() {
            if let Some(value) = value {
                cs.insert(key, value);
            }
        }
        tracing::debug!("Using constants {:?}", cs);
        Ok(cs)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        constants: ConstantsArgs,
    }

    #[test]
    fn test_defaults() {
        let args = TestArgs::parse_from(["test"]);
        assert_eq!(args.constants.load().unwrap(), Constants::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = TestArgs::parse_from([
            "test",
            "--temperature",
            "4.2",
            "--chemical-potential=0.1",
            "--self-interaction-potential",
            "10",
        ]);
        let cs = args.constants.load().unwrap();
        assert_eq!(cs.get(constants::TEMPERATURE), Some(4.2));
        assert_eq!(cs.get(constants::CHEMICAL_POTENTIAL), Some(0.1));
        assert_eq!(cs.get(constants::SELF_INTERACTION_POTENTIAL), Some(10.0));
        assert_eq!(cs.get(constants::TAU), Some(6.0E-3));
    }

    #[test]
    fn test_file_then_flags() {
        let path = std::env::temp_dir().join(format!(
            "tcm-tools-constants-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"temperature": 10.0, "tau": 0.5}"#).unwrap();

        let args = TestArgs::parse_from([
            "test".to_owned(),
            "--constants-file".to_owned(),
            path.display().to_string(),
            "--tau".to_owned(),
            "0.25".to_owned(),
        ]);
        let cs = args.constants.load().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cs.get(constants::TEMPERATURE), Some(10.0));
        assert_eq!(cs.get(constants::TAU), Some(0.25));
    }

    #[test]
    fn test_missing_file() {
        let args = TestArgs::parse_from(["test", "--constants-file", "/nonexistent/tcm.json"]);
        assert!(args.constants.load().is_err());
    }
}
