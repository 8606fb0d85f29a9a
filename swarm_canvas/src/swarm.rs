use crate::canvas::{Canvas, Segment};
use crate::error::{StatsError, SwarmError};
use crate::noise::NoiseSampler;
use crate::robot::{MotionNoise, Pose, Robot};
use crate::stats::{summarize, SwarmStatistic};

/// Fixed-size population of robots sharing one command stream.
#[derive(Clone, Debug)]
pub struct Swarm {
    robots: Vec<Robot>,
}

impl Swarm {
    pub fn new(num: usize, initial_pose: Pose, noise: MotionNoise) -> Self {
        let mut robots = Vec::with_capacity(num);
        for _ in 0..num {
            let mut robot = Robot::with_noise(noise);
            robot.pose = initial_pose;
            robots.push(robot);
        }
        Swarm { robots }
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn poses(&self) -> Vec<Pose> {
        self.robots.iter().map(Robot::pose).collect()
    }

    /// Advances every robot by one step, in order.
    pub fn one_step(&mut self, nu: f64, omega: f64, time: f64, sampler: &mut NoiseSampler) {
        self.robots
            .iter_mut()
            .for_each(|r| r.one_step(nu, omega, time, sampler));
    }

    pub fn plot(&self, canvas: &mut Canvas) -> usize {
        canvas.plot_points(&self.robots)
    }

    pub fn summarize(&self) -> Result<SwarmStatistic, StatsError> {
        summarize(&self.robots)
    }

    /// Draws the uncertainty indicator for the current spread.
    pub fn draw_statistic(
        &self,
        canvas: &mut Canvas,
    ) -> Result<(SwarmStatistic, Option<Segment>), SwarmError> {
        let stat = self.summarize()?;
        let segment = canvas.draw_statistic(&stat)?;
        Ok((stat, segment))
    }

    /// `None` for an empty swarm. Use `summarize` for the typed error.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        self.summarize().ok().map(|s| (s.xg, s.yg))
    }
}
