use rand::Rng;
use rand_pcg::Pcg64Mcg;
use serde::Deserialize;

use haulsim_core::truck::TruckStatus;

fn default_dwell_probability() -> f64 {
    0.10
}

fn default_resume_probability() -> f64 {
    0.40
}

fn default_dwell_split() -> f64 {
    0.5
}

fn default_moving_hold_min() -> u32 {
    5
}

fn default_moving_hold_max() -> u32 {
    10
}

fn default_dwell_hold_min() -> u32 {
    2
}

fn default_dwell_hold_max() -> u32 {
    4
}

/// Probabilities and hold ranges of the dwell state machine. Hold ranges are
/// half-open tick counts, `[min, max)`.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct DwellSettings {
    #[serde(default = "default_dwell_probability")]
    pub dwell_probability: f64,
    #[serde(default = "default_resume_probability")]
    pub resume_probability: f64,
    /// Chance that a dwell is an idle stop rather than an unloading one.
    #[serde(default = "default_dwell_split")]
    pub dwell_split: f64,
    #[serde(default = "default_moving_hold_min")]
    pub moving_hold_min: u32,
    #[serde(default = "default_moving_hold_max")]
    pub moving_hold_max: u32,
    #[serde(default = "default_dwell_hold_min")]
    pub dwell_hold_min: u32,
    #[serde(default = "default_dwell_hold_max")]
    pub dwell_hold_max: u32,
}

impl Default for DwellSettings {
    fn default() -> Self {
        Self {
            dwell_probability: default_dwell_probability(),
            resume_probability: default_resume_probability(),
            dwell_split: default_dwell_split(),
            moving_hold_min: default_moving_hold_min(),
            moving_hold_max: default_moving_hold_max(),
            dwell_hold_min: default_dwell_hold_min(),
            dwell_hold_max: default_dwell_hold_max(),
        }
    }
}

/// Biased random walk over the truck statuses: long moving stretches,
/// short idle/unloading dwells. The random source is a seeded PCG so a
/// scenario seed reproduces the exact status timeline.
#[derive(Clone, Debug)]
pub struct DwellModel {
    settings: DwellSettings,
    rng: Pcg64Mcg,
}

impl DwellModel {
    pub fn new(settings: DwellSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: Pcg64Mcg::new(seed as u128),
        }
    }

    /// Hold assigned to a freshly initialized truck, before its first
    /// transition decision.
    pub fn initial_hold(&mut self) -> u32 {
        self.moving_hold()
    }

    /// Advances the state machine by one tick. The hold decrements towards
    /// zero; a transition is only evaluated once it reaches zero.
    pub fn step(&mut self, status: TruckStatus, hold_ticks: u32) -> (TruckStatus, u32) {
        let hold_ticks = hold_ticks.saturating_sub(1);
        if hold_ticks > 0 {
            return (status, hold_ticks);
        }
        match status {
            TruckStatus::Moving => {
                if self.rng.gen_bool(self.settings.dwell_probability) {
                    let next = if self.rng.gen_bool(self.settings.dwell_split) {
                        TruckStatus::Idle
                    } else {
                        TruckStatus::Dumping
                    };
                    (next, self.dwell_hold())
                } else {
                    (TruckStatus::Moving, self.moving_hold())
                }
            }
            TruckStatus::Idle | TruckStatus::Dumping => {
                if self.rng.gen_bool(self.settings.resume_probability) {
                    (TruckStatus::Moving, self.moving_hold())
                } else {
                    (status, self.dwell_hold())
                }
            }
            // Offline/breakdown trucks are never ticked; keep them inert if
            // one slips through.
            other => (other, 0),
        }
    }

    fn moving_hold(&mut self) -> u32 {
        self.rng
            .gen_range(self.settings.moving_hold_min..self.settings.moving_hold_max)
    }

    fn dwell_hold(&mut self) -> u32 {
        self.rng
            .gen_range(self.settings.dwell_hold_min..self.settings.dwell_hold_max)
    }
}
