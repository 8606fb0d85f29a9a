use std::fmt;

use crate::noise::NoiseSampler;

/// Smallest angular velocity the arc integration divides by.
pub const MIN_OMEGA: f64 = 1e-6;

/// Anything that can be placed on the canvas by its world position.
pub trait Locate {
    fn position(&self) -> (f64, f64);
}

impl Locate for (f64, f64) {
    fn position(&self) -> (f64, f64) {
        *self
    }
}

impl<T: Locate> Locate for &T {
    fn position(&self) -> (f64, f64) {
        (**self).position()
    }
}

/// Robot pose in metres and radians. The heading is never wrapped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }
}

impl Locate for Pose {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.theta)
    }
}

/// Coefficients mapping commanded (nu, omega) to process-noise variances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionNoise {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    pub a5: f64,
    pub a6: f64,
}

impl Default for MotionNoise {
    fn default() -> Self {
        MotionNoise {
            a1: 0.1,
            a2: 0.01,
            a3: 0.001,
            a4: 0.01,
            a5: 0.05,
            a6: 0.01,
        }
    }
}

impl MotionNoise {
    pub fn zero() -> Self {
        MotionNoise {
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            a4: 0.0,
            a5: 0.0,
            a6: 0.0,
        }
    }

    /// Noise on the translational velocity.
    pub fn set_nu(mut self, a1: f64, a2: f64) -> Self {
        self.a1 = a1;
        self.a2 = a2;
        self
    }

    /// Noise on the rotational velocity.
    pub fn set_omega(mut self, a3: f64, a4: f64) -> Self {
        self.a3 = a3;
        self.a4 = a4;
        self
    }

    /// Noise on the final heading rate.
    pub fn set_heading(mut self, a5: f64, a6: f64) -> Self {
        self.a5 = a5;
        self.a6 = a6;
        self
    }

    /// Advances `pose` by one step of the velocity motion model.
    ///
    /// Draws three noise terms, then integrates along the exact circular arc.
    /// A near-zero noisy omega is replaced by `+MIN_OMEGA`, dropping its sign.
    pub fn advance(
        &self,
        pose: Pose,
        nu: f64,
        omega: f64,
        time: f64,
        sampler: &mut NoiseSampler,
    ) -> Pose {
        let nu2 = nu * nu;
        let omega2 = omega * omega;
        let noised_nu = nu + sampler.sample(self.a1 * nu2 + self.a2 * omega2);
        let mut noised_omega = omega + sampler.sample(self.a3 * nu2 + self.a4 * omega2);
        let heading_rate = sampler.sample(self.a5 * nu2 + self.a6 * omega2);

        if noised_omega.abs() < MIN_OMEGA {
            noised_omega = MIN_OMEGA;
        }

        let theta = pose.theta;
        let radius = noised_nu / noised_omega;
        Pose {
            x: pose.x - radius * theta.sin() + radius * (theta + noised_omega * time).sin(),
            y: pose.y + radius * theta.cos() - radius * (theta + noised_omega * time).cos(),
            theta: theta + noised_omega * time + heading_rate * time,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Robot {
    pub pose: Pose,
    pub noise: MotionNoise,
}

impl Robot {
    pub fn new() -> Self {
        Robot::default()
    }

    pub fn with_noise(noise: MotionNoise) -> Self {
        Robot {
            pose: Pose::default(),
            noise,
        }
    }

    pub fn set(&mut self, x: f64, y: f64, theta: f64) {
        self.pose = Pose::new(x, y, theta);
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn one_step(&mut self, nu: f64, omega: f64, time: f64, sampler: &mut NoiseSampler) {
        self.pose = self.noise.advance(self.pose, nu, omega, time, sampler);
    }
}

impl Locate for Robot {
    fn position(&self) -> (f64, f64) {
        self.pose.position()
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pose.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_create_robot() {
        let robot = Robot::new();
        assert_eq!(robot.pose(), Pose::new(0.0, 0.0, 0.0));
        assert_eq!(robot.noise, MotionNoise::default());
    }

    #[test]
    fn test_set_pose() {
        let mut robot = Robot::new();
        robot.set(1.0, -2.0, 0.5);
        assert_eq!(robot.position(), (1.0, -2.0));
        assert_eq!(robot.pose().theta, 0.5);
    }

    #[test]
    fn test_straight_without_noise() {
        let mut robot = Robot::with_noise(MotionNoise::zero());
        let mut sampler = NoiseSampler::new(0);
        robot.one_step(1.0, 0.0, 0.01, &mut sampler);

        let pose = robot.pose();
        assert!(approx(pose.x, 0.01), "x = {}", pose.x);
        assert!(approx(pose.y, 0.0), "y = {}", pose.y);
        assert!(approx(pose.theta, 0.0), "theta = {}", pose.theta);
    }

    #[test]
    fn test_quarter_turn_without_noise() {
        let noise = MotionNoise::zero();
        let mut sampler = NoiseSampler::new(0);
        let pose = noise.advance(Pose::default(), 1.0, PI / 2.0, 1.0, &mut sampler);

        let radius = 2.0 / PI;
        assert!(approx(pose.x, radius));
        assert!(approx(pose.y, radius));
        assert!(approx(pose.theta, PI / 2.0));
    }

    #[test]
    fn test_heading_is_not_wrapped() {
        let noise = MotionNoise::zero();
        let mut sampler = NoiseSampler::new(0);
        let mut pose = Pose::default();
        for _ in 0..10 {
            pose = noise.advance(pose, 0.0, PI, 1.0, &mut sampler);
        }
        assert!(approx(pose.theta, 10.0 * PI));
    }

    #[test]
    fn test_advance_is_deterministic_under_seed() {
        let noise = MotionNoise::default();
        let start = Pose::new(0.3, -0.2, 0.1);

        let mut a = NoiseSampler::new(99);
        let mut b = NoiseSampler::new(99);
        let first = noise.advance(start, 0.5, 0.2, 0.1, &mut a);
        let second = noise.advance(start, 0.5, 0.2, 0.1, &mut b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_noise_spreads_poses() {
        let noise = MotionNoise::default();
        let mut sampler = NoiseSampler::new(5);
        let first = noise.advance(Pose::default(), 1.0, 0.0, 0.1, &mut sampler);
        let second = noise.advance(Pose::default(), 1.0, 0.0, 0.1, &mut sampler);
        assert_ne!(first, second);
    }

    #[test]
    fn test_display_pose() {
        assert_eq!(format!("{}", Pose::new(1.0, 2.5, -0.5)), "1 2.5 -0.5");
    }

    #[test]
    fn test_noise_builder() {
        let noise = MotionNoise::zero().set_nu(0.2, 0.3).set_heading(0.4, 0.5);
        assert_eq!(noise.a1, 0.2);
        assert_eq!(noise.a2, 0.3);
        assert_eq!(noise.a3, 0.0);
        assert_eq!(noise.a6, 0.5);
    }
}
