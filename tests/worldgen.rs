use std::collections::HashSet;
use std::f64::consts::TAU;

use trappist::{
    components::InsolationBand,
    config::WorldConfig,
    generate_trappist1_system,
    orbit::{position_at, solve_kepler, KEPLER_TOLERANCE, MAX_KEPLER_ITERATIONS},
    update_planet_positions,
    worldgen::{analysis, generate_system},
};

#[test]
fn generation_is_deterministic() {
    let first = generate_trappist1_system();
    let second = generate_trappist1_system();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(analysis::planet_signatures(a), analysis::planet_signatures(b));
    }
}

#[test]
fn another_seed_changes_the_layout() {
    let canonical = generate_trappist1_system();
    let reseeded = generate_system(&WorldConfig {
        seed: 99,
        ..WorldConfig::default()
    });
    assert_ne!(
        analysis::planet_signatures(&canonical[3]),
        analysis::planet_signatures(&reseeded[3])
    );
}

#[test]
fn every_planet_is_one_connected_region() {
    for planet in generate_trappist1_system() {
        assert!(
            analysis::is_contiguous(&planet),
            "{} reachable fraction {}",
            planet.id,
            analysis::reachable_fraction(&planet)
        );
        assert!(analysis::neighbors_symmetric(&planet), "{} has one-way links", planet.id);
    }
}

#[test]
fn atmospheres_are_normalized() {
    for planet in generate_trappist1_system() {
        for zone in &planet.zones {
            assert!((zone.gas_composition.sum() - 1.0).abs() < 1e-6, "{}", zone.id);
            assert!((zone.atmosphere_mix().sum() - 1.0).abs() < 1e-6, "{}", zone.id);
            assert!(zone.atmospheric_mass > 0.0, "{}", zone.id);
        }
        assert!((planet.aggregate_gas_composition().sum() - 1.0).abs() < 1e-6);
        assert!(planet.total_atmospheric_mass() > 0.0);
    }
}

#[test]
fn every_planet_spans_all_insolation_bands() {
    for planet in generate_trappist1_system() {
        let bands: HashSet<InsolationBand> =
            planet.zones.iter().map(|z| z.insolation_band).collect();
        assert!(bands.contains(&InsolationBand::Light), "{}", planet.id);
        assert!(bands.contains(&InsolationBand::Terminator), "{}", planet.id);
        assert!(bands.contains(&InsolationBand::Dark), "{}", planet.id);
    }
}

#[test]
fn biomes_cluster_spatially() {
    for planet in generate_trappist1_system() {
        let clustering = analysis::biome_clustering(&planet);
        assert!(clustering > 0.35, "{} clustering {clustering}", planet.id);
    }
}

#[test]
fn zones_spread_out_from_the_centroid() {
    for planet in generate_trappist1_system() {
        let irregularity = analysis::silhouette_irregularity(&planet);
        assert!(irregularity > 0.2, "{} irregularity {irregularity}", planet.id);
    }
}

#[test]
fn zone_environment_is_sane() {
    for planet in generate_trappist1_system() {
        let ids: HashSet<&str> = planet.zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids.len(), planet.zones.len());
        for zone in &planet.zones {
            assert_eq!(zone.planet_id, planet.id);
            assert!(zone.temperature_k > 0.0);
            assert!(zone.biomass_rate > 0.0);
            assert_eq!(zone.biomass_available, zone.biomass_cap());
            assert_eq!(zone.progress, 0.0);
        }
    }
}

#[test]
fn kepler_solver_converges_across_the_system_range() {
    for e_step in 0..=20 {
        let e = e_step as f64 * 0.005;
        for m_step in 0..360 {
            let m = TAU * m_step as f64 / 360.0;
            let solution = solve_kepler(m, e);
            assert!(solution.converged);
            assert!(solution.iterations <= MAX_KEPLER_ITERATIONS);
            let residual = solution.eccentric_anomaly - e * solution.eccentric_anomaly.sin() - m;
            assert!(residual.abs() < KEPLER_TOLERANCE * 10.0);
        }
    }
}

#[test]
fn positions_follow_the_orbit_equation() {
    let mut planets = generate_trappist1_system();
    for planet in &planets {
        assert_eq!(planet.position, position_at(&planet.elements(), 0.0));
    }
    update_planet_positions(&mut planets, 123_456);
    for planet in &planets {
        assert_eq!(planet.position, position_at(&planet.elements(), 123_456.0));
        let r = (planet.position.x.powi(2) + planet.position.y.powi(2)).sqrt();
        let a = planet.semi_major_axis_au;
        let e = planet.eccentricity;
        assert!(r >= a * (1.0 - e) - 1e-12 && r <= a * (1.0 + e) + 1e-12);
    }
}
