use serde::Deserialize;
use std::env;

use aeroclub_scheduling::FieldPolicyEntry;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub scheduling: SchedulingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulingRules {
    /// Slot alignment for the booking form's time pickers
    #[serde(default = "default_granularity")]
    pub slot_granularity_minutes: u32,
    /// Per-role form policy overrides; empty means the built-in table applies
    #[serde(default)]
    pub field_policies: Vec<FieldPolicyEntry>,
}

fn default_granularity() -> u32 {
    15
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of AEROCLUB)
            .add_source(config::Environment::with_prefix("AEROCLUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
