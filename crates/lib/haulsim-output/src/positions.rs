use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use haulsim_core::bucket::TimeMS;
use haulsim_core::truck::TruckDisplay;

#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    pub output_path: String,
    pub position_file: String,
}

impl OutputSettings {
    pub fn position_file_path(&self, config_path: &Path) -> PathBuf {
        config_path.join(&self.output_path).join(&self.position_file)
    }
}

/// Writes the per-tick truck positions to a csv trace, one row per truck per
/// tick. The trace is what the rendering layer replays.
#[derive(Debug)]
pub struct PositionWriter {
    writer: csv::Writer<File>,
}

impl PositionWriter {
    pub fn new(file_path: &PathBuf) -> Self {
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .unwrap_or_else(|_| panic!("Error while creating the output directory"));
            }
        }
        if file_path.exists() {
            match std::fs::remove_file(file_path) {
                Ok(_) => {}
                Err(e) => panic!("Error deleting file: {}", e),
            }
        }
        let mut writer = match csv::Writer::from_path(file_path) {
            Ok(writer) => writer,
            Err(e) => panic!("Failed to create position file writer: {}", e),
        };
        writer
            .write_record([
                "time_ms",
                "truck_id",
                "lat",
                "lon",
                "heading",
                "speed_kmph",
                "status",
            ])
            .expect("Failed to write position file header");
        Self { writer }
    }

    pub fn add_snapshot(&mut self, now: TimeMS, trucks: &[TruckDisplay]) {
        for truck in trucks.iter() {
            self.writer
                .serialize((
                    now.as_u64(),
                    truck.id.as_u64(),
                    truck.position.lat,
                    truck.position.lon,
                    truck.heading,
                    truck.speed_kmph,
                    truck.status.to_string(),
                ))
                .expect("Failed to write position row");
        }
    }

    pub fn close(mut self) {
        self.writer.flush().expect("Failed to flush position file");
    }
}
