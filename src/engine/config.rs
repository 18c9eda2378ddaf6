//! Simulation parameter bundle and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::{MazeConfig, MazeError};

/// Errors from configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number of particles must be positive")]
    NoParticles,
    #[error("sensor limit ratio must be in [0, 1], got {0}")]
    SensorLimitRatio(f64),
    #[error("robot speed must be positive, got {0}")]
    RobotSpeed(f64),
    #[error("kernel sigma must be positive, got {0}")]
    KernelSigma(f64),
    #[error("particle show frequency must be positive")]
    ShowFrequency,
    #[error("window dimensions must be positive, got {width} x {height}")]
    WindowSize { width: u32, height: u32 },
    #[error("{name} must be in [0, 1], got {value}")]
    NoiseFraction { name: &'static str, value: f64 },
    #[error("resample heading noise must be non-negative, got {0}")]
    HeadingNoise(f64),
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Immutable parameter bundle for one simulation run.
///
/// Defaults reproduce the reference tuning: a 25 x 25 maze of 100-unit
/// cells, 3000 particles, and a forgiving kernel. All fields are plain
/// data so a configuration source can supply them from any serde format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Renderer window width hint in pixels. Default: 800
    pub window_width: u32,
    /// Renderer window height hint in pixels. Default: 800
    pub window_height: u32,

    /// Particle population size. Default: 3000
    pub num_particles: usize,

    /// Sensor range as a fraction of the larger maze dimension.
    /// 0 blinds the sensor, 1 never clips. Default: 0.3
    pub sensor_limit_ratio: f64,

    /// Maze shape and generation parameters.
    pub maze: MazeConfig,

    /// Seed for the whole run; 0 draws one from OS entropy. Default: 100
    pub random_seed: u64,

    /// Robot speed in world units per step. Must stay below one cell
    /// dimension. Default: 10.0
    pub robot_speed: f64,

    /// Gaussian kernel spread for importance weighting. Default: 500.0
    pub kernel_sigma: f64,

    /// Draw every n-th particle only. Default: 10
    pub particle_show_frequency: usize,

    /// Robot sensor noise as a fraction of each reading. Default: 0.05
    pub sensor_noise_fraction: f64,

    /// Resampling position jitter as a fraction of the larger cell
    /// dimension. Default: 0.2
    pub resample_position_noise_fraction: f64,

    /// Resampling heading jitter in degrees. Default: 18.0
    pub resample_heading_noise_deg: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 800,
            num_particles: 3000,
            sensor_limit_ratio: 0.3,
            maze: MazeConfig::default(),
            random_seed: 100,
            robot_speed: 10.0,
            kernel_sigma: 500.0,
            particle_show_frequency: 10,
            sensor_noise_fraction: 0.05,
            resample_position_noise_fraction: 0.2,
            resample_heading_noise_deg: 18.0,
        }
    }
}

impl SimulationConfig {
    /// Small preset for tests and benchmarks: an 8 x 8 maze with a light
    /// particle population.
    pub fn small() -> Self {
        Self {
            num_particles: 200,
            maze: MazeConfig {
                num_rows: 8,
                num_cols: 8,
                ..MazeConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate every field before the simulation is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }
        if self.num_particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if !(0.0..=1.0).contains(&self.sensor_limit_ratio) {
            return Err(ConfigError::SensorLimitRatio(self.sensor_limit_ratio));
        }
        self.maze.validate()?;
        if self.robot_speed <= 0.0 {
            return Err(ConfigError::RobotSpeed(self.robot_speed));
        }
        if self.kernel_sigma <= 0.0 {
            return Err(ConfigError::KernelSigma(self.kernel_sigma));
        }
        if self.particle_show_frequency == 0 {
            return Err(ConfigError::ShowFrequency);
        }
        if !(0.0..=1.0).contains(&self.sensor_noise_fraction) {
            return Err(ConfigError::NoiseFraction {
                name: "sensor noise fraction",
                value: self.sensor_noise_fraction,
            });
        }
        if !(0.0..=1.0).contains(&self.resample_position_noise_fraction) {
            return Err(ConfigError::NoiseFraction {
                name: "resample position noise fraction",
                value: self.resample_position_noise_fraction,
            });
        }
        if self.resample_heading_noise_deg < 0.0 {
            return Err(ConfigError::HeadingNoise(self.resample_heading_noise_deg));
        }
        Ok(())
    }
}
