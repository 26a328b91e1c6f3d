//! Structural checks over generated planets.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::components::{Planet, Zone};

/// Stable per-zone fingerprint used to compare two generations.
pub fn zone_signature(zone: &Zone) -> String {
    format!(
        "{}|{},{},{}|{:?}|{:?}|{:?}|{:.4}",
        zone.id,
        zone.hex_q,
        zone.hex_r,
        zone.hex_s,
        zone.biome,
        zone.insolation_band,
        zone.terrain,
        zone.atmospheric_mass
    )
}

pub fn planet_signatures(planet: &Planet) -> Vec<String> {
    planet.zones.iter().map(zone_signature).collect()
}

/// Share of zones reachable from the first zone over `neighbor_ids`.
pub fn reachable_fraction(planet: &Planet) -> f64 {
    let Some(start) = planet.zones.first() else {
        return 1.0;
    };
    let by_id: HashMap<&str, &Zone> = planet.zones.iter().map(|z| (z.id.as_str(), z)).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    seen.insert(start.id.as_str());
    queue.push_back(start.id.as_str());
    while let Some(id) = queue.pop_front() {
        if let Some(zone) = by_id.get(id) {
            for neighbor in &zone.neighbor_ids {
                if by_id.contains_key(neighbor.as_str()) && seen.insert(neighbor.as_str()) {
                    queue.push_back(neighbor.as_str());
                }
            }
        }
    }
    seen.len() as f64 / planet.zones.len() as f64
}

pub fn is_contiguous(planet: &Planet) -> bool {
    reachable_fraction(planet) >= 1.0
}

/// Fraction of undirected neighbour edges that join two zones of the same biome.
pub fn biome_clustering(planet: &Planet) -> f64 {
    let by_id: HashMap<&str, &Zone> = planet.zones.iter().map(|z| (z.id.as_str(), z)).collect();
    let mut edges = 0_usize;
    let mut same = 0_usize;
    for zone in &planet.zones {
        for neighbor_id in &zone.neighbor_ids {
            if zone.id.as_str() >= neighbor_id.as_str() {
                continue;
            }
            if let Some(neighbor) = by_id.get(neighbor_id.as_str()) {
                edges += 1;
                if neighbor.biome == zone.biome {
                    same += 1;
                }
            }
        }
    }
    if edges == 0 {
        return 0.0;
    }
    same as f64 / edges as f64
}

/// Coefficient of variation of zone distance from the layout centroid.
pub fn silhouette_irregularity(planet: &Planet) -> f64 {
    if planet.zones.is_empty() {
        return 0.0;
    }
    let points: Vec<(f64, f64)> = planet.zones.iter().map(|z| z.hex().to_cartesian()).collect();
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
    let distances: Vec<f64> = points
        .iter()
        .map(|(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
        .collect();
    let mean = distances.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// True when every neighbour link is mirrored and points at an existing zone.
pub fn neighbors_symmetric(planet: &Planet) -> bool {
    let by_id: HashMap<&str, &Zone> = planet.zones.iter().map(|z| (z.id.as_str(), z)).collect();
    planet.zones.iter().all(|zone| {
        zone.neighbor_ids.iter().all(|n| {
            by_id
                .get(n.as_str())
                .map(|other| other.neighbor_ids.iter().any(|back| back == &zone.id))
                .unwrap_or(false)
        })
    })
}
