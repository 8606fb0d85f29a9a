use ndarray::{arr1, arr2, Array1, Array2};
use tracing::debug;

use crate::error::StatsError;
use crate::robot::Locate;

const POWER_ITERATIONS: usize = 10;

/// Spread of a robot population: centroid, covariance and dominant axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwarmStatistic {
    pub xg: f64,
    pub yg: f64,
    pub sxx: f64,
    pub sxy: f64,
    pub syy: f64,
    pub u: f64,
    pub v: f64,
    pub lambda: f64,
}

impl SwarmStatistic {
    pub fn covariance(&self) -> Array2<f64> {
        arr2(&[[self.sxx, self.sxy], [self.sxy, self.syy]])
    }

    /// Norm of `C e` for the dominant unit vector `e`.
    ///
    /// `lambda` is kept exactly as the power iteration has always reported it,
    /// which uses `sxy` in place of `syy` for the second component.
    pub fn rayleigh_eigenvalue(&self) -> f64 {
        let e = arr1(&[self.u, self.v]);
        let ce = self.covariance().dot(&e);
        ce.dot(&ce).sqrt()
    }

    /// Tip of the uncertainty indicator drawn from the centroid.
    pub fn indicator_end(&self) -> (f64, f64) {
        (self.xg + self.lambda * self.u, self.yg + self.lambda * self.v)
    }
}

/// Population statistics over `population`, dividing by N.
pub fn summarize<T: Locate>(population: &[T]) -> Result<SwarmStatistic, StatsError> {
    if population.is_empty() {
        return Err(StatsError::EmptyPopulation);
    }
    let n = population.len() as f64;

    let (sum_x, sum_y) = population.iter().fold((0.0, 0.0), |(sx, sy), p| {
        let (x, y) = p.position();
        (sx + x, sy + y)
    });
    let xg = sum_x / n;
    let yg = sum_y / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for p in population {
        let (x, y) = p.position();
        let dx = x - xg;
        let dy = y - yg;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    sxx /= n;
    sxy /= n;
    syy /= n;

    let cov = arr2(&[[sxx, sxy], [sxy, syy]]);
    let e = dominant_axis(&cov);
    let (u, v) = (e[0], e[1]);

    let a = sxx * u + sxy * v;
    let b = sxy * u + sxy * v;
    let lambda = (a * a + b * b).sqrt();

    debug!(xg, yg, "centroid");
    debug!(sxx, sxy, syy, "covariance");
    debug!(u, v, lambda, "dominant axis");

    Ok(SwarmStatistic {
        xg,
        yg,
        sxx,
        sxy,
        syy,
        u,
        v,
        lambda,
    })
}

/// Power iteration from (1, 0). Stops early if the iterate vanishes.
fn dominant_axis(cov: &Array2<f64>) -> Array1<f64> {
    let mut e = arr1(&[1.0, 0.0]);
    for _ in 0..POWER_ITERATIONS {
        let next = cov.dot(&e);
        let k = next.dot(&next).sqrt();
        if !(k > 0.0) {
            break;
        }
        e = next / k;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_population() {
        let empty: Vec<(f64, f64)> = Vec::new();
        assert_eq!(summarize(&empty), Err(StatsError::EmptyPopulation));
    }

    #[test]
    fn test_symmetric_pair() {
        let pts: [(f64, f64); 2] = [(1.0, 0.0), (-1.0, 0.0)];
        let stat = summarize(&pts).unwrap();
        assert_eq!((stat.xg, stat.yg), (0.0, 0.0));
        assert_eq!(stat.sxx, 1.0);
        assert_eq!(stat.sxy, 0.0);
        assert_eq!(stat.syy, 0.0);
        assert!((stat.u.abs() - 1.0).abs() < 1e-12);
        assert!(stat.v.abs() < 1e-12);
        assert!((stat.lambda - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_keeps_start_axis() {
        let pts: [(f64, f64); 1] = [(2.0, 3.0)];
        let stat = summarize(&pts).unwrap();
        assert_eq!((stat.xg, stat.yg), (2.0, 3.0));
        assert_eq!((stat.u, stat.v), (1.0, 0.0));
        assert_eq!(stat.lambda, 0.0);
    }

    #[test]
    fn test_diagonal_spread() {
        let pts: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, -1.0), (2.0, 2.0), (-2.0, -2.0)];
        let stat = summarize(&pts).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((stat.u - s).abs() < 1e-9);
        assert!((stat.v - s).abs() < 1e-9);
        // sxx = sxy = syy so both eigenvalue formulas agree here
        assert!((stat.lambda - stat.rayleigh_eigenvalue()).abs() < 1e-9);
        assert!((stat.lambda - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_lambda_uses_observed_formula() {
        let pts: [(f64, f64); 4] = [(0.1, 2.0), (-0.1, -2.0), (1.0, 0.0), (-1.0, 0.0)];
        let stat = summarize(&pts).unwrap();
        assert!((stat.sxy - 0.1).abs() < 1e-12);
        // dominant axis is close to y, but the second component reuses sxy
        assert!(stat.v.abs() > 0.99);
        assert!(stat.lambda < 0.2, "lambda = {}", stat.lambda);
        assert!((stat.rayleigh_eigenvalue() - 2.00666).abs() < 1e-3);
    }

    #[test]
    fn test_indicator_end() {
        let pts: [(f64, f64); 2] = [(1.0, 0.0), (-1.0, 0.0)];
        let stat = summarize(&pts).unwrap();
        let (x, y) = stat.indicator_end();
        assert!((x.abs() - 1.0).abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }
}
