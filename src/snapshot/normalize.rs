//! Reconciles persisted planets with the freshly generated canonical world.
//!
//! Structure and environment always come from the canonical template. Player
//! progress (`state`, `progress`, `biomassAvailable`, `predatorDefeated`) and
//! unknown runtime fields are kept from the save when present and valid.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    components::{Moon, Planet, Zone, ZoneState},
    lifecycle::PROGRESS_COMPLETE,
    worldgen::generate_trappist1_system,
};

/// Normalizes against the built-in world.
pub fn normalize_planets_from_save(loaded: &Value) -> Vec<Planet> {
    normalize_planets_against(loaded, generate_trappist1_system())
}

pub fn normalize_planets_against(loaded: &Value, canonical: Vec<Planet>) -> Vec<Planet> {
    let saved: HashMap<&str, &Map<String, Value>> = loaded
        .as_array()
        .map(|planets| planets.iter().filter_map(keyed_object).collect())
        .unwrap_or_default();

    let mut restored_zones = 0_usize;
    let planets: Vec<Planet> = canonical
        .into_iter()
        .map(|mut planet| {
            if let Some(record) = saved.get(planet.id.as_str()) {
                restored_zones += merge_planet(&mut planet, record);
            }
            planet
        })
        .collect();

    tracing::info!(
        target: "trappist::save",
        saved_planets = saved.len(),
        planets = planets.len(),
        restored_zones,
        "save.normalized"
    );
    planets
}

fn keyed_object(value: &Value) -> Option<(&str, &Map<String, Value>)> {
    let object = value.as_object()?;
    let id = object.get("id")?.as_str()?;
    Some((id, object))
}

/// Merges one saved planet; returns how many zones carried saved progress.
fn merge_planet(planet: &mut Planet, saved: &Map<String, Value>) -> usize {
    let known = serialized_keys(&*planet);
    planet.extra = extra_fields(saved, &known);

    if let Some(moons) = saved.get("moons").and_then(Value::as_array) {
        for (index, moon) in planet.moons.iter_mut().enumerate() {
            if let Some(record) = moons.get(index).and_then(Value::as_object) {
                merge_moon(moon, record);
            }
        }
    }

    let saved_zones: HashMap<&str, &Map<String, Value>> = saved
        .get("zones")
        .and_then(Value::as_array)
        .map(|zones| zones.iter().filter_map(keyed_object).collect())
        .unwrap_or_default();
    let Some(zone_keys) = planet.zones.first().map(serialized_keys) else {
        return 0;
    };

    let mut merged = 0;
    for zone in planet.zones.iter_mut() {
        if let Some(record) = saved_zones.get(zone.id.as_str()) {
            merge_zone(zone, record, &zone_keys);
            merged += 1;
        }
    }
    merged
}

fn merge_zone(zone: &mut Zone, saved: &Map<String, Value>, known: &BTreeSet<String>) {
    if let Some(state) = saved
        .get("state")
        .and_then(|v| serde_json::from_value::<ZoneState>(v.clone()).ok())
    {
        zone.state = state;
    }
    if let Some(progress) = finite(saved.get("progress")) {
        zone.progress = progress.clamp(0.0, PROGRESS_COMPLETE);
    }
    if let Some(biomass) = finite(saved.get("biomassAvailable")) {
        zone.biomass_available = biomass.max(0.0);
    }
    if let Some(defeated) = saved.get("predatorDefeated").and_then(Value::as_bool) {
        zone.predator_defeated = defeated;
    }
    zone.extra = extra_fields(saved, known);
}

fn merge_moon(moon: &mut Moon, saved: &Map<String, Value>) {
    if let Some(id) = non_empty(saved.get("id")) {
        moon.id = id;
    }
    if let Some(name) = non_empty(saved.get("name")) {
        moon.name = name;
    }
    if let Some(distance) = finite(saved.get("distanceKm")).filter(|d| *d > 0.0) {
        moon.distance_km = distance;
    }
}

fn finite(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Field names a value of this type serializes to.
fn serialized_keys<T: Serialize>(value: &T) -> BTreeSet<String> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map.keys().cloned().collect(),
        _ => BTreeSet::new(),
    }
}

fn extra_fields(saved: &Map<String, Value>, known: &BTreeSet<String>) -> BTreeMap<String, Value> {
    saved
        .iter()
        .filter(|(key, _)| !known.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn garbage_input_yields_canonical_world() {
        let planets = normalize_planets_from_save(&json!("not a save"));
        assert_eq!(planets.len(), 7);
        let planets = normalize_planets_from_save(&json!([{ "zones": 3 }, null]));
        assert!(planets.iter().all(|p| p.zones.len() == 331));
    }

    #[test]
    fn moons_fall_back_per_field() {
        let canonical = generate_trappist1_system();
        let mut saved = serde_json::to_value(&canonical).unwrap();
        let f = saved
            .as_array_mut()
            .unwrap()
            .iter_mut()
            .find(|p| p["id"] == "trappist-1f")
            .unwrap();
        f["moons"] = json!([{ "id": "", "name": "Renamed", "distanceKm": -4 }, "broken"]);

        let planets = normalize_planets_from_save(&saved);
        let f_canon = canonical.iter().find(|p| p.id == "trappist-1f").unwrap();
        let f_out = planets.iter().find(|p| p.id == "trappist-1f").unwrap();
        assert_eq!(f_out.moons[0].id, f_canon.moons[0].id);
        assert_eq!(f_out.moons[0].name, "Renamed");
        assert_eq!(f_out.moons[0].distance_km, f_canon.moons[0].distance_km);
        assert_eq!(f_out.moons[1], f_canon.moons[1]);
    }

    #[test]
    fn unknown_planet_fields_survive() {
        let mut saved = serde_json::to_value(generate_trappist1_system()).unwrap();
        saved[0]["colonizedAt"] = json!(1234);
        let planets = normalize_planets_from_save(&saved);
        assert_eq!(planets[0].extra.get("colonizedAt"), Some(&json!(1234)));
        assert!(planets[1].extra.is_empty());
    }

    #[test]
    fn invalid_progress_keeps_template() {
        let mut saved = serde_json::to_value(generate_trappist1_system()).unwrap();
        saved[2]["zones"][5]["state"] = json!("teleporting");
        saved[2]["zones"][5]["progress"] = json!("lots");
        saved[2]["zones"][6]["progress"] = json!(250.0);
        let planets = normalize_planets_from_save(&saved);
        assert_eq!(planets[2].zones[5].state, ZoneState::Unexplored);
        assert_eq!(planets[2].zones[5].progress, 0.0);
        assert_eq!(planets[2].zones[6].progress, 100.0);
    }
}
