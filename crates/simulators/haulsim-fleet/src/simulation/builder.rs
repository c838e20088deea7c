use std::path::{Path, PathBuf};

use log::info;

use haulsim_core::bucket::TimeMS;
use haulsim_input::fleet::read_fleet;
use haulsim_input::roads::read_road_network;
use haulsim_input::routes::read_route_stops;
use haulsim_models::paths::PathCache;
use haulsim_models::status::DwellModel;
use haulsim_output::logger::initiate_logger;
use haulsim_output::positions::PositionWriter;

use crate::fleet::scheduler::FleetScheduler;
use crate::fleet::session::FleetSession;
use crate::simulation::config::{BaseConfig, BaseConfigReader};

pub struct SimulationBuilder {
    base_config: BaseConfig,
    config_path: PathBuf,
}

impl SimulationBuilder {
    pub(crate) fn new(base_config_file: &str) -> Self {
        if !Path::new(base_config_file).exists() {
            panic!("Configuration file is not found.");
        }
        let config_path = Path::new(base_config_file)
            .parent()
            .unwrap_or_else(|| {
                panic!("Invalid directory for the configuration file");
            })
            .to_path_buf();

        let config_reader = BaseConfigReader::new(base_config_file);
        match config_reader.parse() {
            Ok(base_config) => Self {
                base_config,
                config_path,
            },
            Err(e) => {
                panic!("Error while parsing the base configuration file: {}", e);
            }
        }
    }

    pub(crate) fn build(&self) -> FleetScheduler {
        initiate_logger(&self.config_path, &self.base_config.log_settings);

        info!("Reading the road network, route stops and fleet roster...");
        let inputs = &self.base_config.input_settings;
        let network = read_road_network(
            &self.config_path.join(&inputs.roads_file),
            self.base_config.space_settings,
        );
        let waypoints = read_route_stops(&self.config_path.join(&inputs.routes_file));
        let roster = read_fleet(&self.config_path.join(&inputs.fleet_file));

        info!("Building the fleet session...");
        let path_cache = PathCache::for_routes(&waypoints);
        let dwell = DwellModel::new(
            self.base_config.dwell_settings,
            self.base_config.simulation_settings.seed,
        );
        let session = FleetSession::builder()
            .roster(roster)
            .waypoints(waypoints)
            .network(network)
            .path_cache(path_cache)
            .dwell(dwell)
            .step_size(self.step_size())
            .build();

        let position_file = self
            .base_config
            .output_settings
            .position_file_path(&self.config_path);

        info!("Building the scheduler...");
        FleetScheduler::builder()
            .session(session)
            .duration(self.duration())
            .step_size(self.step_size())
            .path_build_budget(self.base_config.simulation_settings.path_build_budget)
            .positions(PositionWriter::new(&position_file))
            .build()
    }

    fn duration(&self) -> TimeMS {
        self.base_config.simulation_settings.duration
    }

    fn step_size(&self) -> TimeMS {
        self.base_config.simulation_settings.step_size
    }
}
