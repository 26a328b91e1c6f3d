use serde_json::{json, Value};
use tempfile::tempdir;
use trappist::{
    components::ZoneState,
    config::SimConfig,
    found_colony, generate_trappist1_system, normalize_planets_from_save,
    snapshot::{load_game, save_game},
};

fn canonical_save() -> Value {
    serde_json::to_value(generate_trappist1_system()).unwrap()
}

#[test]
fn progress_survives_and_coordinates_are_repaired() {
    let mut saved = canonical_save();
    {
        let zone = &mut saved[4]["zones"][17];
        zone["state"] = json!("harvesting");
        zone["progress"] = json!(72);
        zone["biomassAvailable"] = json!(4321);
        zone["hexQ"] = json!(f64::NAN);
        zone["customTag"] = json!({ "note": "first harvest" });
    }

    let planets = normalize_planets_from_save(&saved);
    let canonical = generate_trappist1_system();
    let zone = &planets[4].zones[17];
    assert_eq!(zone.state, ZoneState::Harvesting);
    assert_eq!(zone.progress, 72.0);
    assert_eq!(zone.biomass_available, 4321.0);
    assert_eq!(zone.hex_q, canonical[4].zones[17].hex_q);
    assert_eq!(zone.hex_q + zone.hex_r + zone.hex_s, 0);
    assert_eq!(zone.extra.get("customTag"), Some(&json!({ "note": "first harvest" })));
}

#[test]
fn missing_structure_is_backfilled() {
    let mut saved = canonical_save();
    {
        let zone = saved[0]["zones"][3].as_object_mut().unwrap();
        zone.remove("neighborIds");
        zone.remove("temperatureK");
        zone.insert("hexR".into(), json!("oops"));
    }
    saved[1]["zones"] = json!([]);
    saved.as_array_mut().unwrap().remove(6);

    let planets = normalize_planets_from_save(&saved);
    let canonical = generate_trappist1_system();
    assert_eq!(planets.len(), 7);
    assert_eq!(planets[0].zones[3].neighbor_ids, canonical[0].zones[3].neighbor_ids);
    assert_eq!(planets[0].zones[3].temperature_k, canonical[0].zones[3].temperature_k);
    assert_eq!(planets[0].zones[3].hex_r, canonical[0].zones[3].hex_r);
    assert_eq!(planets[1].zones.len(), 331);
    assert_eq!(planets[6].id, "trappist-1h");
}

#[test]
fn damaged_save_file_loads_with_progress_intact() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("colony.json");
    let config = SimConfig::default();
    let mut data = found_colony(generate_trappist1_system(), &config, 42_000).unwrap();
    data.simulated_time = 500;
    data.planets[3].zones[0].state = ZoneState::Converting;
    data.planets[3].zones[0].progress = 40.0;
    save_game(&path, &data, config.time.ticks_per_day).unwrap();

    let mut file: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(file["metadata"]["savedAt"].is_string());
    file["game"]["planets"][3]["zones"][0]["hexS"] = Value::Null;
    file["game"]["planets"][3]["zones"][0].as_object_mut().unwrap().remove("gasComposition");
    std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

    let restored = load_game(&path, &config.world).unwrap();
    let zone = &restored.planets[3].zones[0];
    assert_eq!(zone.state, ZoneState::Converting);
    assert_eq!(zone.progress, 40.0);
    assert_eq!(zone.hex_s, data.planets[3].zones[0].hex_s);
    assert!((zone.gas_composition.sum() - 1.0).abs() < 1e-6);
    assert_eq!(restored.simulated_time, 500);
    assert_eq!(restored.last_wall_clock_ms, 42_000);
    assert_eq!(restored.swarm.workers.len(), 6);
    assert_eq!(restored.next_entity_id, data.next_entity_id);
}

#[test]
fn unreadable_save_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_game(&path, &SimConfig::default().world).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}
