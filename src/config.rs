use std::{env, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::DEFAULT_MODEL,
    codegen::GeneratorOptions,
    simulate::{DEFAULT_STEP_DELAY, SimulatorOptions},
};

/// Environment variable overriding `simulator.step_delay_ms`.
pub const STEP_DELAY_ENV: &str = "CREW_FLOW_STEP_DELAY_MS";

/// Tunables for the simulator and generator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulator: SimulatorSettings,
    pub generator: GeneratorSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub step_delay_ms: u64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        SimulatorSettings {
            step_delay_ms: DEFAULT_STEP_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub default_model: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from disk, accepting JSON by default and TOML when the `toml` feature is enabled.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let txt = fs::read_to_string(path_ref)
            .with_context(|| format!("unable to read settings at {}", path_ref.display()))?;
        if let Ok(value) = serde_json::from_str::<Self>(&txt) {
            return Ok(value);
        }

        #[cfg(feature = "toml")]
        {
            if let Ok(value) = toml::from_str::<Self>(&txt) {
                return Ok(value);
            }
        }

        #[cfg(feature = "toml")]
        {
            anyhow::bail!(
                "unsupported settings format in {}: expected JSON or TOML",
                path_ref.display()
            );
        }

        #[cfg(not(feature = "toml"))]
        {
            anyhow::bail!(
                "unsupported settings format in {}: expected JSON (enable `toml` feature for TOML support)",
                path_ref.display()
            );
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> anyhow::Result<Self> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(raw) = lookup(STEP_DELAY_ENV) {
            self.simulator.step_delay_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{STEP_DELAY_ENV} must be a whole number of milliseconds"))?;
        }
        Ok(self)
    }

    pub fn simulator_options(&self) -> SimulatorOptions {
        SimulatorOptions {
            step_delay: Duration::from_millis(self.simulator.step_delay_ms),
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            default_model: self.generator.default_model.clone(),
        }
    }
}
