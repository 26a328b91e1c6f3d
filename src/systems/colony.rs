//! Queen and worker behaviour.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::{
    components::{Planet, Zone, ZoneState},
    config::{ColonyConfig, SimConfig},
    engine::{System, SystemContext, TickReport},
    lifecycle,
    progression,
    world::{Directive, GameData, LogLevel, Order, OrderKind, Queen, Swarm, Worker, WorkerState},
};

/// Sets the directive; a change rebuilds the command queue.
pub fn set_directive(queen: &mut Queen, directive: Directive) -> bool {
    if queen.directive == directive {
        return false;
    }
    queen.directive = directive;
    regenerate_command_queue(queen);
    true
}

pub fn regenerate_command_queue(queen: &mut Queen) {
    let order = match queen.directive {
        Directive::GatherBiomass => Order::gather(),
        Directive::Idle => Order::idle(),
    };
    queen.command_queue = vec![order; queen.neural_capacity as usize];
}

/// Greedy skill-first assignment of the queen's queue to her idle workers.
/// Returns how many workers were handed a queue order.
pub fn assign_orders(queen: &Queen, workers: &mut [Worker]) -> usize {
    let mut idle: Vec<usize> = workers
        .iter()
        .enumerate()
        .filter(|(_, w)| w.queen_id == queen.id && w.state.is_idle())
        .map(|(index, _)| index)
        .collect();
    // stable: equal skill keeps collection order
    idle.sort_by(|&a, &b| workers[b].foraging_skill.total_cmp(&workers[a].foraging_skill));

    let mut from_queue = 0;
    for (rank, &index) in idle.iter().enumerate() {
        let order = match queen.command_queue.get(rank) {
            Some(order) => {
                from_queue += 1;
                *order
            }
            None => Order::idle(),
        };
        let worker = &mut workers[index];
        worker.order = Some(order);
        worker.state = match order.kind {
            OrderKind::GatherBiomass => WorkerState::Gathering,
            _ => WorkerState::Idle,
        };
    }
    from_queue
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggEvent {
    Laid,
    Hatched,
}

pub fn advance_egg_production(queen: &mut Queen, config: &ColonyConfig) -> Option<EggEvent> {
    let eggs = &mut queen.egg_production;
    if !eggs.enabled {
        return None;
    }
    if !eggs.in_progress {
        if queen.energy >= config.egg_cost {
            queen.energy -= config.egg_cost;
            eggs.in_progress = true;
            eggs.ticks_remaining = config.total_spawn_ticks;
            eggs.progress_percent = 0.0;
            return Some(EggEvent::Laid);
        }
        return None;
    }

    let total = config.total_spawn_ticks.max(1);
    eggs.ticks_remaining = eggs.ticks_remaining.saturating_sub(1).min(total);
    eggs.progress_percent =
        ((total - eggs.ticks_remaining) as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
    if eggs.ticks_remaining == 0 {
        eggs.in_progress = false;
        eggs.progress_percent = 0.0;
        return Some(EggEvent::Hatched);
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkerOutcome {
    Died,
    Idle,
    Gathered {
        amount: f64,
        transition: Option<ZoneState>,
    },
    Delivered(f64),
    CargoFull,
}

/// Biomass per gathering tick before the cargo clamp.
pub fn gather_rate(worker: &Worker, zone: &Zone, config: &ColonyConfig) -> f64 {
    config.base_gather_rate
        * progression::gather_multiplier(worker.foraging_skill, worker.mastery_xp(zone.food_type))
}

/// One worker's tick: upkeep first, then its order.
pub fn resolve_worker_tick(
    worker: &mut Worker,
    queen: &mut Queen,
    zone: Option<&mut Zone>,
    config: &SimConfig,
) -> WorkerOutcome {
    let colony = &config.colony;
    // delivery is decided on the cargo carried into the tick
    let arrived_full = worker.cargo >= worker.cargo_max;
    if worker.cargo >= colony.worker_upkeep {
        worker.cargo -= colony.worker_upkeep;
        worker.state = WorkerState::SelfMaintenance;
    } else {
        worker.health = (worker.health - colony.starvation_damage).max(0.0);
        if worker.health <= 0.0 {
            return WorkerOutcome::Died;
        }
    }

    let Some(order) = worker.order else {
        worker.state = WorkerState::IdleEmpty;
        return WorkerOutcome::Idle;
    };

    match order.kind {
        OrderKind::GatherBiomass if arrived_full => deliver(worker, queen),
        OrderKind::GatherBiomass => gather(worker, zone, config),
        OrderKind::Idle
        | OrderKind::Combat
        | OrderKind::ExploreZone
        | OrderKind::BuildStructure => {
            worker.state = WorkerState::Idle;
            WorkerOutcome::Idle
        }
    }
}

fn gather(worker: &mut Worker, zone: Option<&mut Zone>, config: &SimConfig) -> WorkerOutcome {
    worker.state = WorkerState::Gathering;
    let Some(zone) = zone else {
        return WorkerOutcome::Gathered {
            amount: 0.0,
            transition: None,
        };
    };
    let room = (worker.cargo_max - worker.cargo).max(0.0);
    let wanted = gather_rate(worker, zone, &config.colony).min(room);
    let draw = lifecycle::deplete_biomass(zone, wanted);
    worker.cargo = if draw.taken >= room {
        worker.cargo_max
    } else {
        worker.cargo + draw.taken
    };

    let mut transition = draw.transition;
    if draw.taken > 0.0 {
        if let Some(next) = lifecycle::contribute_work(zone, config.colony.work_per_gather_tick) {
            transition = Some(next);
        }
        worker.foraging_skill =
            progression::apply_skill_gain(worker.foraging_skill, draw.taken, &config.progression);
        *worker.mastery.entry(zone.food_type).or_insert(0.0) +=
            progression::mastery_xp_for(draw.taken, &config.progression);
    }
    WorkerOutcome::Gathered {
        amount: draw.taken,
        transition,
    }
}

fn deliver(worker: &mut Worker, queen: &mut Queen) -> WorkerOutcome {
    let accepted = queen.add_energy(worker.cargo);
    if accepted <= 0.0 {
        worker.state = WorkerState::IdleCargoFull;
        return WorkerOutcome::CargoFull;
    }
    worker.cargo = (worker.cargo - accepted).max(0.0);
    worker.state = WorkerState::Gathering;
    WorkerOutcome::Delivered(accepted)
}

/// Zone the queen's workers draw from: home while it can feed a gathering
/// tick, otherwise the richest usable zone in the nearest ring of the
/// neighbour graph around home. Falls back to home when nothing is usable.
/// Returns (planet index, zone index).
pub fn forage_zone(
    planets: &[Planet],
    queen: &Queen,
    config: &ColonyConfig,
) -> Option<(usize, usize)> {
    let planet_index = planets.iter().position(|p| p.id == queen.planet_id)?;
    let planet = &planets[planet_index];
    let home = planet.zones.iter().position(|z| z.id == queen.home_zone_id)?;
    let usable = |zone: &Zone| {
        zone.state != ZoneState::Saturated && zone.biomass_available >= config.base_gather_rate
    };
    if usable(&planet.zones[home]) {
        return Some((planet_index, home));
    }

    let index_of: HashMap<&str, usize> = planet
        .zones
        .iter()
        .enumerate()
        .map(|(index, zone)| (zone.id.as_str(), index))
        .collect();
    let mut seen: HashSet<usize> = HashSet::from([home]);
    let mut ring = vec![home];
    while !ring.is_empty() {
        let mut next = Vec::new();
        for &index in &ring {
            for id in &planet.zones[index].neighbor_ids {
                if let Some(&n) = index_of.get(id.as_str()) {
                    if seen.insert(n) {
                        next.push(n);
                    }
                }
            }
        }
        let best = next
            .iter()
            .copied()
            .filter(|&n| usable(&planet.zones[n]))
            .max_by(|&a, &b| {
                planet.zones[a]
                    .biomass_available
                    .total_cmp(&planet.zones[b].biomass_available)
            });
        if let Some(best) = best {
            return Some((planet_index, best));
        }
        ring = next;
    }
    Some((planet_index, home))
}

/// Queen upkeep, egg production and periodic order reassignment.
pub struct QueenSystem;

impl QueenSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for QueenSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for QueenSystem {
    fn name(&self) -> &str {
        "queens"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        data: &mut GameData,
        report: &mut TickReport,
    ) -> Result<()> {
        let colony = &ctx.config.colony;
        let mut starved = Vec::new();
        let mut hatching = Vec::new();
        let mut reassign = Vec::new();

        for queen in data.swarm.queens.iter_mut() {
            if queen.energy < colony.queen_upkeep {
                starved.push(queen.id.clone());
                continue;
            }
            queen.energy -= colony.queen_upkeep;

            match advance_egg_production(queen, colony) {
                Some(EggEvent::Laid) => report.laid += 1,
                Some(EggEvent::Hatched) => hatching.push(queen.id.clone()),
                None => {}
            }

            if queen.ticks_until_reassign == 0 {
                reassign.push(queen.id.clone());
                queen.ticks_until_reassign = colony.order_reevaluation_interval.saturating_sub(1);
            } else {
                queen.ticks_until_reassign -= 1;
            }
        }

        if !starved.is_empty() {
            let gone: HashSet<&str> = starved.iter().map(String::as_str).collect();
            data.swarm.queens.retain(|q| !gone.contains(q.id.as_str()));
            for queen_id in &starved {
                tracing::info!(target: "trappist::colony", queen = %queen_id, "queen.starved");
                let entry = data.push_log(
                    LogLevel::Warning,
                    format!("Queen {queen_id} ran out of energy and died"),
                );
                report.logs.push(entry);
            }
        }

        for queen_id in &hatching {
            let worker_id = data.spawn_worker(queen_id, colony.worker_cargo_max);
            tracing::debug!(
                target: "trappist::colony",
                queen = %queen_id,
                worker = %worker_id,
                "egg.hatched"
            );
            report.hatched += 1;
        }

        let Swarm { queens, workers } = &mut data.swarm;
        for queen_id in &reassign {
            if let Some(queen) = queens.iter().find(|q| &q.id == queen_id) {
                assign_orders(queen, workers);
            }
        }
        Ok(())
    }
}

/// Health decay, order execution and removal of dead or orphaned workers.
pub struct WorkerSystem;

impl WorkerSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorkerSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for WorkerSystem {
    fn name(&self) -> &str {
        "workers"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        data: &mut GameData,
        report: &mut TickReport,
    ) -> Result<()> {
        let config = ctx.config;
        let mut transitions: Vec<(String, ZoneState)> = Vec::new();
        let mut dead: HashSet<String> = HashSet::new();
        let mut orphans = 0_u64;

        {
            let GameData { planets, swarm, .. } = &mut *data;
            let Swarm { queens, workers } = swarm;
            let forage: HashMap<String, (usize, usize)> = queens
                .iter()
                .filter_map(|q| {
                    forage_zone(planets, q, &config.colony).map(|loc| (q.id.clone(), loc))
                })
                .collect();

            for worker in workers.iter_mut() {
                worker.health = (worker.health - config.colony.health_decay_per_tick).max(0.0);
                if worker.health <= 0.0 {
                    dead.insert(worker.id.clone());
                    continue;
                }
                let Some(queen) = queens.iter_mut().find(|q| q.id == worker.queen_id) else {
                    orphans += 1;
                    dead.insert(worker.id.clone());
                    continue;
                };
                let zone = match forage.get(&worker.queen_id) {
                    Some(&(p, z)) => Some(&mut planets[p].zones[z]),
                    None => None,
                };
                match resolve_worker_tick(worker, queen, zone, config) {
                    WorkerOutcome::Died => {
                        dead.insert(worker.id.clone());
                    }
                    WorkerOutcome::Gathered { amount, transition } => {
                        report.biomass_gathered += amount;
                        if let (Some(next), Some(&(p, z))) =
                            (transition, forage.get(&worker.queen_id))
                        {
                            transitions.push((planets[p].zones[z].id.clone(), next));
                        }
                    }
                    WorkerOutcome::Idle
                    | WorkerOutcome::Delivered(_)
                    | WorkerOutcome::CargoFull => {}
                }
            }

            if !dead.is_empty() {
                workers.retain(|w| !dead.contains(&w.id));
            }
        }

        report.died += dead.len() as u64;
        if orphans > 0 {
            tracing::debug!(target: "trappist::colony", orphans, "workers.orphaned");
        }
        for (zone_id, state) in transitions {
            tracing::info!(
                target: "trappist::colony",
                zone = %zone_id,
                state = ?state,
                "zone.transition"
            );
            let entry = data.push_log(
                LogLevel::Info,
                format!("Zone {zone_id} is now {}", zone_state_label(state)),
            );
            report.logs.push(entry);
        }
        Ok(())
    }
}

fn zone_state_label(state: ZoneState) -> &'static str {
    match state {
        ZoneState::Unexplored => "unexplored",
        ZoneState::Exploring => "being explored",
        ZoneState::Combating => "under attack by predators",
        ZoneState::Converting => "being converted",
        ZoneState::Harvesting => "ready for harvest",
        ZoneState::Saturated => "saturated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{found_colony, EggProduction, MAX_HEALTH};
    use crate::worldgen::generate_trappist1_system;

    fn queen(capacity: u32) -> Queen {
        Queen {
            id: "queen-1".into(),
            planet_id: "trappist-1e".into(),
            home_zone_id: "trappist-1e-z000".into(),
            energy: 100.0,
            energy_max: 200.0,
            directive: Directive::Idle,
            command_queue: Vec::new(),
            neural_capacity: capacity,
            egg_production: EggProduction {
                enabled: true,
                ..EggProduction::default()
            },
            ticks_until_reassign: 0,
        }
    }

    fn worker(id: &str, skill: f64) -> Worker {
        let mut w = Worker::hatchling(id.into(), "queen-1".into(), 10.0);
        w.foraging_skill = skill;
        w
    }

    #[test]
    fn directive_change_rebuilds_queue() {
        let mut q = queen(4);
        assert!(set_directive(&mut q, Directive::GatherBiomass));
        assert_eq!(q.command_queue, vec![Order::gather(); 4]);
        assert!(!set_directive(&mut q, Directive::GatherBiomass));
        assert!(set_directive(&mut q, Directive::Idle));
        assert!(q.command_queue.iter().all(|o| o.priority == 1));
    }

    #[test]
    fn best_foragers_get_queue_orders_first() {
        let mut q = queen(2);
        set_directive(&mut q, Directive::GatherBiomass);
        let mut workers = vec![
            worker("worker-a", 5.0),
            worker("worker-b", 40.0),
            worker("worker-c", 5.0),
            worker("worker-d", 20.0),
        ];
        assert_eq!(assign_orders(&q, &mut workers), 2);
        let gathering: Vec<&str> = workers
            .iter()
            .filter(|w| w.state == WorkerState::Gathering)
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(gathering, vec!["worker-b", "worker-d"]);
        assert_eq!(workers[0].order, Some(Order::idle()));
        assert_eq!(workers[2].state, WorkerState::Idle);
    }

    #[test]
    fn egg_cycle_lays_then_hatches() {
        let config = ColonyConfig {
            total_spawn_ticks: 4,
            ..ColonyConfig::default()
        };
        let mut q = queen(4);
        assert_eq!(advance_egg_production(&mut q, &config), Some(EggEvent::Laid));
        assert_eq!(q.energy, 75.0);
        assert_eq!(advance_egg_production(&mut q, &config), None);
        assert_eq!(q.egg_production.progress_percent, 25.0);
        advance_egg_production(&mut q, &config);
        advance_egg_production(&mut q, &config);
        assert_eq!(advance_egg_production(&mut q, &config), Some(EggEvent::Hatched));
        assert!(!q.egg_production.in_progress);
    }

    #[test]
    fn no_egg_without_energy() {
        let mut q = queen(4);
        q.energy = 10.0;
        assert_eq!(advance_egg_production(&mut q, &ColonyConfig::default()), None);
        assert_eq!(q.energy, 10.0);
    }

    #[test]
    fn starving_worker_takes_damage_and_can_die() {
        let config = SimConfig::default();
        let mut q = queen(4);
        let mut w = worker("worker-a", 0.0);
        w.health = 0.5;
        assert_eq!(resolve_worker_tick(&mut w, &mut q, None, &config), WorkerOutcome::Died);
    }

    #[test]
    fn worker_without_order_is_idle_empty() {
        let config = SimConfig::default();
        let mut q = queen(4);
        let mut w = worker("worker-a", 0.0);
        w.cargo = 1.0;
        assert_eq!(resolve_worker_tick(&mut w, &mut q, None, &config), WorkerOutcome::Idle);
        assert_eq!(w.state, WorkerState::IdleEmpty);
        assert!((w.cargo - 0.98).abs() < 1e-12);
        assert_eq!(w.health, MAX_HEALTH);
    }

    #[test]
    fn placeholder_orders_resolve_to_idle() {
        let config = SimConfig::default();
        let mut q = queen(4);
        for kind in [OrderKind::Combat, OrderKind::ExploreZone, OrderKind::BuildStructure] {
            let mut w = worker("worker-a", 0.0);
            w.order = Some(Order { kind, priority: 5 });
            assert_eq!(resolve_worker_tick(&mut w, &mut q, None, &config), WorkerOutcome::Idle);
            assert_eq!(w.state, WorkerState::Idle);
        }
    }

    #[test]
    fn cargo_filled_by_gathering_is_delivered_next_tick() {
        let config = SimConfig::default();
        let mut planets = generate_trappist1_system();
        let mut q = queen(4);
        let (p, z) = forage_zone(&planets, &q, &config.colony).unwrap();
        let mut w = worker("worker-a", 0.0);
        w.order = Some(Order::gather());
        w.cargo = 9.9;

        let outcome = resolve_worker_tick(&mut w, &mut q, Some(&mut planets[p].zones[z]), &config);
        let WorkerOutcome::Gathered { amount, .. } = outcome else {
            panic!("expected gathering, got {outcome:?}");
        };
        assert!((amount - 0.12).abs() < 1e-9);
        assert_eq!(w.cargo, w.cargo_max);

        let outcome = resolve_worker_tick(&mut w, &mut q, Some(&mut planets[p].zones[z]), &config);
        let WorkerOutcome::Delivered(accepted) = outcome else {
            panic!("expected delivery, got {outcome:?}");
        };
        assert!((accepted - 9.98).abs() < 1e-9);
        assert!((q.energy - 109.98).abs() < 1e-9);
        assert_eq!(w.cargo, 0.0);
        assert_eq!(w.state, WorkerState::Gathering);
    }

    #[test]
    fn full_queen_parks_the_worker_until_it_can_gather_again() {
        let config = SimConfig::default();
        let mut planets = generate_trappist1_system();
        let mut q = queen(4);
        q.energy = q.energy_max;
        let (p, z) = forage_zone(&planets, &q, &config.colony).unwrap();
        let mut w = worker("worker-a", 0.0);
        w.order = Some(Order::gather());
        w.cargo = w.cargo_max;

        let outcome = resolve_worker_tick(&mut w, &mut q, Some(&mut planets[p].zones[z]), &config);
        assert_eq!(outcome, WorkerOutcome::CargoFull);
        assert_eq!(w.state, WorkerState::IdleCargoFull);
        assert!((w.cargo - 9.98).abs() < 1e-12);

        let outcome = resolve_worker_tick(&mut w, &mut q, Some(&mut planets[p].zones[z]), &config);
        assert!(matches!(outcome, WorkerOutcome::Gathered { .. }));
        assert_eq!(w.cargo, w.cargo_max);
    }

    #[test]
    fn gathering_draws_biomass_and_trains() {
        let config = SimConfig::default();
        let mut planets = generate_trappist1_system();
        let mut q = queen(4);
        let (p, z) = forage_zone(&planets, &q, &config.colony).unwrap();
        let zone = &mut planets[p].zones[z];
        let before = zone.biomass_available;
        let mut w = worker("worker-a", 0.0);
        w.order = Some(Order::gather());
        let outcome = resolve_worker_tick(&mut w, &mut q, Some(zone), &config);
        let WorkerOutcome::Gathered { amount, .. } = outcome else {
            panic!("expected gathering, got {outcome:?}");
        };
        assert!((amount - config.colony.base_gather_rate).abs() < 1e-12);
        assert!(w.foraging_skill > 0.0);
        let zone = &planets[p].zones[z];
        assert!(w.mastery_xp(zone.food_type) > 0.0);
        assert!(zone.progress > 0.0 || zone.state != ZoneState::Unexplored);
        assert!(zone.biomass_available <= before);
        assert_eq!(w.health, MAX_HEALTH - config.colony.starvation_damage);
    }

    #[test]
    fn mastery_xp_raises_the_rate_up_to_double() {
        let config = ColonyConfig::default();
        let planets = generate_trappist1_system();
        let zone = &planets[3].zones[0];
        let mut w = worker("worker-a", 0.0);
        assert_eq!(gather_rate(&w, zone, &config), config.base_gather_rate);
        w.mastery.insert(zone.food_type, 100.0);
        assert!((gather_rate(&w, zone, &config) - config.base_gather_rate * 1.5).abs() < 1e-12);
        w.mastery.insert(zone.food_type, 1.0e6);
        assert!((gather_rate(&w, zone, &config) - config.base_gather_rate * 2.0).abs() < 1e-12);
    }

    #[test]
    fn spent_home_falls_back_to_richest_neighbour() {
        let config = ColonyConfig::default();
        let mut planets = generate_trappist1_system();
        let q = queen(4);
        let (p, home) = forage_zone(&planets, &q, &config).unwrap();

        planets[p].zones[home].state = ZoneState::Saturated;
        let (_, chosen) = forage_zone(&planets, &q, &config).unwrap();
        assert_ne!(chosen, home);
        let neighbours = planets[p].zones[home].neighbor_ids.clone();
        assert!(neighbours.contains(&planets[p].zones[chosen].id));
        let richest = neighbours
            .iter()
            .map(|id| planets[p].zone(id).unwrap().biomass_available)
            .fold(0.0, f64::max);
        assert_eq!(planets[p].zones[chosen].biomass_available, richest);

        planets[p].zones[home].state = ZoneState::Combating;
        planets[p].zones[home].biomass_available = 0.05;
        let (_, chosen) = forage_zone(&planets, &q, &config).unwrap();
        assert!(neighbours.contains(&planets[p].zones[chosen].id));
    }

    #[test]
    fn exhausted_neighbourhood_moves_one_ring_out() {
        let config = ColonyConfig::default();
        let mut planets = generate_trappist1_system();
        let q = queen(4);
        let (p, home) = forage_zone(&planets, &q, &config).unwrap();
        let neighbours = planets[p].zones[home].neighbor_ids.clone();
        planets[p].zones[home].biomass_available = 0.0;
        for id in &neighbours {
            planets[p].zones.iter_mut().find(|z| &z.id == id).unwrap().state =
                ZoneState::Saturated;
        }
        let (_, chosen) = forage_zone(&planets, &q, &config).unwrap();
        let origin = planets[p].zones[home].hex();
        assert_eq!(planets[p].zones[chosen].hex().distance(&origin), 2);
    }

    #[test]
    fn idle_hatchlings_wait_for_the_reassignment_interval() {
        let config = SimConfig::default();
        let interval = config.colony.order_reevaluation_interval;
        let mut data = found_colony(generate_trappist1_system(), &config, 0).unwrap();
        let mut queens = QueenSystem::new();
        let mut report = TickReport::default();
        let run = |data: &mut GameData,
                   queens: &mut QueenSystem,
                   report: &mut TickReport,
                   tick: u64| {
            let ctx = SystemContext {
                tick,
                config: &config,
            };
            queens.run(&ctx, data, report).unwrap();
        };

        run(&mut data, &mut queens, &mut report, 0);
        assert!(data.swarm.workers.iter().all(|w| w.order.is_some()));
        let queen_id = data.swarm.queens[0].id.clone();
        let hatchling = data.spawn_worker(&queen_id, config.colony.worker_cargo_max);
        let order_of = |data: &GameData| {
            data.swarm
                .workers
                .iter()
                .find(|w| w.id == hatchling)
                .and_then(|w| w.order)
        };

        for tick in 1..interval {
            run(&mut data, &mut queens, &mut report, tick);
            assert_eq!(order_of(&data), None, "assigned early at tick {tick}");
        }
        run(&mut data, &mut queens, &mut report, interval);
        assert_eq!(order_of(&data), Some(Order::gather()));
        assert_eq!(data.swarm.queens[0].ticks_until_reassign, interval - 1);
    }

    #[test]
    fn orphaned_workers_are_removed() {
        let config = SimConfig::default();
        let mut data = found_colony(generate_trappist1_system(), &config, 0).unwrap();
        data.swarm.queens.clear();
        let mut report = TickReport::default();
        let ctx = SystemContext {
            tick: 0,
            config: &config,
        };
        WorkerSystem::new().run(&ctx, &mut data, &mut report).unwrap();
        assert!(data.swarm.workers.is_empty());
        assert_eq!(report.died, 6);
    }

    #[test]
    fn broke_queen_dies_and_is_removed() {
        let config = SimConfig::default();
        let mut data = found_colony(generate_trappist1_system(), &config, 0).unwrap();
        data.swarm.queens[0].energy = 0.05;
        let mut report = TickReport::default();
        let ctx = SystemContext {
            tick: 0,
            config: &config,
        };
        QueenSystem::new().run(&ctx, &mut data, &mut report).unwrap();
        assert!(data.swarm.queens.is_empty());
        assert_eq!(report.logs.len(), 1);
        assert_eq!(report.logs[0].level, LogLevel::Warning);
    }
}
