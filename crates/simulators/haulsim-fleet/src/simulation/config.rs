use std::path::PathBuf;

use serde::Deserialize;

use haulsim_core::bucket::TimeMS;
use haulsim_models::roads::SpaceSettings;
use haulsim_models::status::DwellSettings;
use haulsim_output::logger::LogSettings;
use haulsim_output::positions::OutputSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct BaseConfig {
    pub simulation_settings: SimSettings,
    pub space_settings: SpaceSettings,
    pub dwell_settings: DwellSettings,
    pub input_settings: InputSettings,
    pub log_settings: LogSettings,
    pub output_settings: OutputSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SimSettings {
    pub scenario: String,
    pub duration: TimeMS,
    pub step_size: TimeMS,
    pub seed: u64,
    /// Route legs matched against the road network per tick while the path
    /// cache is warming up.
    pub path_build_budget: u32,
}

/// Input files, relative to the directory of the scenario config.
#[derive(Deserialize, Debug, Clone)]
pub struct InputSettings {
    pub roads_file: String,
    pub routes_file: String,
    pub fleet_file: String,
}

pub struct BaseConfigReader {
    file_path: PathBuf,
}

impl BaseConfigReader {
    pub fn new(file_name: &str) -> Self {
        let file_path = PathBuf::from(file_name);
        Self { file_path }
    }

    pub fn parse(&self) -> Result<BaseConfig, Box<dyn std::error::Error>> {
        let parsing_result = std::fs::read_to_string(&self.file_path)?;
        let config: BaseConfig = toml::from_str(&parsing_result)?;
        Ok(config)
    }
}
