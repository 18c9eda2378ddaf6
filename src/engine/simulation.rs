//! Step-driven Monte Carlo localization engine.
//!
//! One step runs the full SIR cycle:
//!
//! ```text
//! sense robot -> weight particles -> render -> normalize ->
//! resample (with pose jitter) -> move robot -> move particles
//! ```
//!
//! Everything random flows through one seeded generator, so a run
//! replays exactly from its seed.

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::Pose;
use crate::engine::config::{ConfigError, SimulationConfig};
use crate::engine::renderer::MazeRenderer;
use crate::localization::{
    normalize_weights, perturb_pose, weight_gaussian_kernel, NoisePolicy, Particle, Robot,
    WeightedDistribution,
};
use crate::world::Maze;

/// Diagnostics for one completed simulation step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based step index.
    pub step: u64,
    /// Population weight total before normalization.
    pub weight_total: f64,
    /// Fresh uniform particles spawned by draws that found no mass.
    pub fresh_particles: usize,
    /// Headings the robot tried before its move was accepted.
    pub robot_move_attempts: u32,
    /// Particles whose displacement was accepted this step.
    pub particles_moved: usize,
}

/// Monte Carlo localization simulation.
///
/// Owns the maze, the robot, the particle population, and the run's
/// random source. Single-threaded and synchronous: each [`step`] runs to
/// completion before the next begins.
///
/// [`step`]: Simulation::step
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    maze: Maze,
    robot: Robot,
    particles: Vec<Particle>,
    rng: SimRng,
    /// Sensor clip range derived from the actual maze dimensions.
    sensor_limit: f64,
    /// Resampling position jitter derived from the actual cell size.
    position_noise_std: f64,
    steps: u64,
    maze_drawn: bool,
}

impl Simulation {
    /// Build a simulation with a randomly generated maze.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SimRng::new(config.random_seed);
        let maze = Maze::random(&config.maze, &mut rng)?;
        Ok(Self::build(config, maze, rng))
    }

    /// Build a simulation on a prepared maze.
    ///
    /// The `config.maze` generation parameters are ignored; the derived
    /// quantities (sensor limit, resampling jitter) follow the provided
    /// maze instead.
    pub fn with_maze(config: SimulationConfig, maze: Maze) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SimRng::new(config.random_seed);
        Ok(Self::build(config, maze, rng))
    }

    fn build(config: SimulationConfig, maze: Maze, mut rng: SimRng) -> Self {
        let sensor_limit = config.sensor_limit_ratio * maze.height().max(maze.width());
        let position_noise_std = config.resample_position_noise_fraction
            * maze.grid_height().max(maze.grid_width());

        // The robot starts anywhere in the maze, jittered like a
        // resampled particle.
        let start = Pose::new(
            rng.range(0.0, maze.width()),
            rng.range(0.0, maze.height()),
            rng.range(0.0, 360.0),
        );
        let start = perturb_pose(
            &start,
            position_noise_std,
            config.resample_heading_noise_deg,
            &maze,
            &mut rng,
        );
        let robot = Robot::new(
            start,
            config.robot_speed,
            NoisePolicy::Gaussian {
                fraction: config.sensor_noise_fraction,
            },
        );

        let particles: Vec<Particle> = (0..config.num_particles)
            .map(|_| Particle::random(&maze, &mut rng))
            .collect();

        log::info!(
            "Simulation ready: {} particles, sensor limit {:.1}, robot speed {}, seed {}",
            particles.len(),
            sensor_limit,
            config.robot_speed,
            config.random_seed,
        );

        Self {
            config,
            maze,
            robot,
            particles,
            rng,
            sensor_limit,
            position_noise_std,
            steps: 0,
            maze_drawn: false,
        }
    }

    /// The configuration this simulation runs with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The maze the agents live in.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// The simulated robot.
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// Current particle population.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Sensor clip range for this run.
    pub fn sensor_limit(&self) -> f64 {
        self.sensor_limit
    }

    /// Completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Weighted-mean pose estimate over the current population.
    ///
    /// `None` when the weights sum to zero. The heading is the plain
    /// weighted mean of degree values, which is what the renderer
    /// contract expects; headings spread across the 0/360 seam average
    /// accordingly.
    pub fn estimate(&self) -> Option<Pose> {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_heading = 0.0;
        let mut total = 0.0;
        for p in &self.particles {
            sum_x += p.weight * p.pose.x;
            sum_y += p.weight * p.pose.y;
            sum_heading += p.weight * p.pose.heading;
            total += p.weight;
        }
        if total == 0.0 {
            None
        } else {
            Some(Pose::new(sum_x / total, sum_y / total, sum_heading / total))
        }
    }

    /// Run one full sense / weight / resample / move cycle.
    pub fn step<R: MazeRenderer + ?Sized>(&mut self, renderer: &mut R) -> StepReport {
        if !self.maze_drawn {
            renderer.draw_maze(&self.maze);
            self.maze_drawn = true;
        }
        self.steps += 1;

        // Sense: the robot's noisy reading is the reference every
        // particle is scored against.
        let robot_reading =
            self.robot
                .read_sensor(&self.maze, Some(self.sensor_limit), &mut self.rng);
        for particle in &mut self.particles {
            let reading = particle.read_sensor(&self.maze, Some(self.sensor_limit));
            particle.weight =
                weight_gaussian_kernel(&robot_reading, &reading, self.config.kernel_sigma);
        }

        renderer.draw_particles(&self.particles, self.config.particle_show_frequency);
        renderer.draw_robot(&self.robot);
        renderer.draw_estimate(self.estimate());
        renderer.end_frame();

        let weight_total = normalize_weights(&mut self.particles);

        // Resample: draw the next generation, jittering survivors and
        // spawning fresh particles where no mass was found.
        let distribution = WeightedDistribution::new(&self.particles);
        let mut next = Vec::with_capacity(self.particles.len());
        let mut fresh_particles = 0;
        for _ in 0..self.particles.len() {
            match distribution.sample(&mut self.rng) {
                Some(idx) => next.push(self.particles[idx].perturbed_clone(
                    self.position_noise_std,
                    self.config.resample_heading_noise_deg,
                    &self.maze,
                    &mut self.rng,
                )),
                None => {
                    fresh_particles += 1;
                    next.push(Particle::random(&self.maze, &mut self.rng));
                }
            }
        }
        self.particles = next;

        // Move the robot, then propagate its heading change to every
        // particle before their own displacement attempt.
        let heading_old = self.robot.heading();
        let robot_move_attempts = self.robot.move_with_retries(&self.maze, &mut self.rng);
        let dh = self.robot.heading() - heading_old;

        let mut particles_moved = 0;
        for particle in &mut self.particles {
            particle.pose = particle.pose.with_heading(particle.pose.heading + dh);
            if particle.try_move(self.config.robot_speed, &self.maze) {
                particles_moved += 1;
            }
        }

        log::debug!(
            "step {}: weight total {:.6}, {} fresh, robot attempts {}, {} particles moved",
            self.steps,
            weight_total,
            fresh_particles,
            robot_move_attempts,
            particles_moved,
        );

        StepReport {
            step: self.steps,
            weight_total,
            fresh_particles,
            robot_move_attempts,
            particles_moved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::renderer::NullRenderer;
    use approx::assert_relative_eq;

    /// Records the engine's draw calls for call-order assertions.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<&'static str>,
        last_particle_count: usize,
    }

    impl MazeRenderer for RecordingRenderer {
        fn draw_maze(&mut self, _maze: &Maze) {
            self.calls.push("maze");
        }
        fn draw_particles(&mut self, particles: &[Particle], _show_frequency: usize) {
            self.last_particle_count = particles.len();
            self.calls.push("particles");
        }
        fn draw_robot(&mut self, _robot: &Robot) {
            self.calls.push("robot");
        }
        fn draw_estimate(&mut self, _estimate: Option<Pose>) {
            self.calls.push("estimate");
        }
        fn end_frame(&mut self) {
            self.calls.push("end");
        }
    }

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            random_seed: seed,
            ..SimulationConfig::small()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            num_particles: 0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_initial_population() {
        let sim = Simulation::new(small_config(42)).unwrap();
        assert_eq!(sim.particles().len(), 200);
        assert_eq!(sim.steps(), 0);
        assert!(sim.maze().contains(sim.robot().pose().x, sim.robot().pose().y));
        for p in sim.particles() {
            assert!(sim.maze().contains(p.pose.x, p.pose.y));
            assert_eq!(p.weight, 1.0);
        }
    }

    #[test]
    fn test_sensor_limit_follows_maze_dimensions() {
        let sim = Simulation::new(small_config(42)).unwrap();
        // 8 x 8 cells of 100 units, ratio 0.3
        assert_relative_eq!(sim.sensor_limit(), 240.0);
    }

    #[test]
    fn test_step_preserves_population_size() {
        let mut sim = Simulation::new(small_config(42)).unwrap();
        let mut renderer = NullRenderer;
        for expected_step in 1..=5 {
            let report = sim.step(&mut renderer);
            assert_eq!(report.step, expected_step);
            assert_eq!(sim.particles().len(), 200);
            assert!(report.weight_total >= 0.0);
            assert!(report.robot_move_attempts >= 1);
        }
        assert_eq!(sim.steps(), 5);
    }

    #[test]
    fn test_step_keeps_agents_inside_maze() {
        let mut sim = Simulation::new(small_config(7)).unwrap();
        let mut renderer = NullRenderer;
        for _ in 0..20 {
            sim.step(&mut renderer);
            let robot = sim.robot().pose();
            assert!(sim.maze().contains(robot.x, robot.y));
            for p in sim.particles() {
                assert!(sim.maze().contains(p.pose.x, p.pose.y));
                assert!((0.0..360.0).contains(&p.pose.heading));
            }
        }
    }

    #[test]
    fn test_run_is_deterministic_per_seed() {
        let mut a = Simulation::new(small_config(42)).unwrap();
        let mut b = Simulation::new(small_config(42)).unwrap();
        let mut renderer = NullRenderer;

        for _ in 0..10 {
            a.step(&mut renderer);
            b.step(&mut renderer);
        }

        assert_eq!(a.robot().pose(), b.robot().pose());
        assert_eq!(a.estimate(), b.estimate());
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.pose, pb.pose);
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Simulation::new(small_config(42)).unwrap();
        let mut b = Simulation::new(small_config(43)).unwrap();
        let mut renderer = NullRenderer;
        a.step(&mut renderer);
        b.step(&mut renderer);
        assert_ne!(a.robot().pose(), b.robot().pose());
    }

    #[test]
    fn test_renderer_call_order() {
        let mut sim = Simulation::new(small_config(42)).unwrap();
        let mut renderer = RecordingRenderer::default();

        sim.step(&mut renderer);
        sim.step(&mut renderer);

        assert_eq!(
            renderer.calls,
            vec![
                "maze", "particles", "robot", "estimate", "end", // step 1
                "particles", "robot", "estimate", "end", // step 2: maze not redrawn
            ]
        );
        assert_eq!(renderer.last_particle_count, 200);
    }

    #[test]
    fn test_estimate_is_weighted_mean() {
        let maze = Maze::from_grid(vec![vec![0x0F]], 100.0, 100.0).unwrap();
        let config = SimulationConfig {
            num_particles: 2,
            ..small_config(42)
        };
        let mut sim = Simulation::with_maze(config, maze).unwrap();

        sim.particles[0] = Particle::new(Pose::new(10.0, 20.0, 40.0));
        sim.particles[1] = Particle::new(Pose::new(30.0, 40.0, 80.0));
        sim.particles[1].weight = 3.0;

        let estimate = sim.estimate().expect("weights are positive");
        assert_relative_eq!(estimate.x, 25.0);
        assert_relative_eq!(estimate.y, 35.0);
        assert_relative_eq!(estimate.heading, 70.0);
    }

    #[test]
    fn test_estimate_none_when_weights_collapse() {
        let maze = Maze::from_grid(vec![vec![0x0F]], 100.0, 100.0).unwrap();
        let config = SimulationConfig {
            num_particles: 3,
            ..small_config(42)
        };
        let mut sim = Simulation::with_maze(config, maze).unwrap();
        for p in &mut sim.particles {
            p.weight = 0.0;
        }
        assert!(sim.estimate().is_none());
    }

    #[test]
    fn test_collapsed_weights_spawn_fresh_population() {
        // Open 1 x 3 corridor; a needle-sharp kernel underflows to zero
        // whenever a particle's reading disagrees with the robot's.
        let maze = Maze::from_grid(vec![vec![0, 0, 0]], 100.0, 100.0).unwrap();
        let config = SimulationConfig {
            num_particles: 2,
            kernel_sigma: 1e-6,
            ..small_config(42)
        };
        let mut sim = Simulation::with_maze(config, maze).unwrap();
        sim.robot = Robot::new(Pose::new(10.0, 50.0, 90.0), 10.0, NoisePolicy::None);
        for p in &mut sim.particles {
            *p = Particle::new(Pose::new(290.0, 50.0, 90.0));
        }

        let mut renderer = NullRenderer;
        let report = sim.step(&mut renderer);

        assert_eq!(report.weight_total, 0.0);
        assert_eq!(report.fresh_particles, 2, "every draw finds no mass");
        assert_eq!(sim.particles().len(), 2);
        for p in sim.particles() {
            assert_eq!(p.weight, 1.0);
            assert!(sim.maze().contains(p.pose.x, p.pose.y));
        }
    }
}
