//! Kepler orbit solver.
//!
//! Positions are a pure function of the orbital elements and simulated time;
//! nothing else ever writes a planet's position.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::components::Planet;

pub const MAX_KEPLER_ITERATIONS: u32 = 6;
pub const KEPLER_TOLERANCE: f64 = 1e-10;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub eccentric_anomaly: f64,
    pub iterations: u32,
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub period_seconds: f64,
    pub initial_angle_rad: f64,
}

/// Solves `M = E - e·sin(E)` by Newton-Raphson starting at `E = M`.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    let mut e_anom = mean_anomaly;
    for iteration in 1..=MAX_KEPLER_ITERATIONS {
        let f = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
        let f_prime = 1.0 - eccentricity * e_anom.cos();
        let delta = f / f_prime;
        e_anom -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return KeplerSolution {
                eccentric_anomaly: e_anom,
                iterations: iteration,
                converged: true,
            };
        }
    }
    KeplerSolution {
        eccentric_anomaly: e_anom,
        iterations: MAX_KEPLER_ITERATIONS,
        converged: false,
    }
}

/// True anomaly from eccentric anomaly via the half-angle form.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * f64::atan2(
        (1.0 + eccentricity).sqrt() * half.sin(),
        (1.0 - eccentricity).sqrt() * half.cos(),
    )
}

pub fn mean_anomaly(elements: &OrbitalElements, time_seconds: f64) -> f64 {
    if elements.period_seconds <= 0.0 {
        return elements.initial_angle_rad.rem_euclid(TAU);
    }
    (elements.initial_angle_rad + TAU * time_seconds / elements.period_seconds).rem_euclid(TAU)
}

pub fn position_at(elements: &OrbitalElements, time_seconds: f64) -> Position {
    let m = mean_anomaly(elements, time_seconds);
    let e = elements.eccentricity.clamp(0.0, 0.99);
    let theta = if e == 0.0 {
        m
    } else {
        let solution = solve_kepler(m, e);
        debug_assert!(
            solution.converged,
            "kepler solver did not converge for e={e}, M={m}"
        );
        true_anomaly(solution.eccentric_anomaly, e)
    };
    let radius = elements.semi_major_axis * (1.0 - e * e) / (1.0 + e * theta.cos());
    Position {
        x: radius * theta.cos(),
        y: radius * theta.sin(),
    }
}

/// Moves every planet to its position at `simulated_time` seconds.
pub fn update_planet_positions(planets: &mut [Planet], simulated_time: u64) {
    let t = simulated_time as f64;
    for planet in planets.iter_mut() {
        planet.position = position_at(&planet.elements(), t);
    }
}
