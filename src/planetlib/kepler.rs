//! Kepler's equation and orbital-plane geometry shared by the planet,
//! Moon and satellite models

use nalgebra::{Rotation3, Vector3};
use thiserror::Error;

/// Error type for the Kepler solver
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeplerError {
    #[error(
        "Kepler solve did not converge (e={eccentricity}, M={mean_anomaly} rad) \
         after {iterations} iterations, residual {residual:e}"
    )]
    NoConvergence {
        eccentricity: f64,
        mean_anomaly: f64,
        iterations: usize,
        residual: f64,
    },

    #[error("Eccentricity {0} is outside the elliptic range [0, 1)")]
    InvalidEccentricity(f64),
}

/// Newton iteration on `E - e sin E = M`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    /// Convergence threshold on the residual, radians
    pub tolerance: f64,
    /// Newton step budget
    pub max_iterations: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 10,
        }
    }
}

impl KeplerSolver {
    /// Solve for the eccentric anomaly (radians) given the mean anomaly
    /// (radians) and eccentricity.
    ///
    /// Uses Danby's starting value `M + 0.85 e sign(sin M)`, which converges
    /// in a handful of steps even for e = 0.99. A circular orbit returns `M`
    /// unchanged.
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(KeplerError::InvalidEccentricity(eccentricity));
        }

        let residual = |e_anom: f64| e_anom - eccentricity * e_anom.sin() - mean_anomaly;

        let mut e_anom = mean_anomaly + 0.85 * eccentricity * mean_anomaly.sin().signum();

        for _ in 0..self.max_iterations {
            let f = residual(e_anom);
            if f.abs() < self.tolerance {
                return Ok(e_anom);
            }
            e_anom -= f / (1.0 - eccentricity * e_anom.cos());
        }

        let f = residual(e_anom);
        if f.abs() < self.tolerance {
            Ok(e_anom)
        } else {
            Err(KeplerError::NoConvergence {
                eccentricity,
                mean_anomaly,
                iterations: self.max_iterations,
                residual: f.abs(),
            })
        }
    }
}

/// Solve Kepler's equation with the default tolerance and budget
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
    KeplerSolver::default().solve(mean_anomaly, eccentricity)
}

/// Position in the orbital plane (X toward periapsis) in the units of `a`
pub fn orbital_plane_position(semi_major_axis: f64, eccentricity: f64, eccentric_anomaly: f64) -> Vector3<f64> {
    let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
    Vector3::new(
        semi_major_axis * (cos_e - eccentricity),
        semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt() * sin_e,
        0.0,
    )
}

/// Rotation from the orbital plane to the reference plane:
/// `Rz(Ω) · Rx(i) · Rz(ω)`, all angles in radians
pub fn orbit_to_reference(
    ascending_node: f64,
    inclination: f64,
    argument_of_periapsis: f64,
) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), ascending_node)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), inclination)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), argument_of_periapsis)
}
