//! Tests for the engine: the tick pipeline, motion, energy, collisions,
//! sensors, weapons, damage, and the agent operation set.

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;
use hecs::Entity;

use warbots_core::components::{Chassis, PowerCore, WeaponMounts};
use warbots_core::constants::*;
use warbots_core::enums::{GameState, RobotColor, SensorKind, SoundId, SystemKind, WeaponKind};

use crate::api::{Api, Bot};
use crate::engine::{Engine, SetupError, SimConfig};

/// A bot that does nothing, for tests that drive the robot directly.
struct Idle;

impl Bot for Idle {
    fn actions(&mut self, _api: &mut Api<'_>, _elapsed_ms: u32) {}
}

fn quiet_config(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        emit_particles: false,
    }
}

/// Engine with idle robots at fixed poses: (name, x, y, heading).
fn engine_with(robots: &[(&str, f64, f64, f64)]) -> (Engine, Vec<Entity>) {
    let mut engine = Engine::new(quiet_config(7));
    let ids = robots
        .iter()
        .map(|&(name, x, y, heading)| {
            engine
                .register_robot(
                    name,
                    RobotColor::Red,
                    Box::new(Idle),
                    None,
                    Some(DVec2::new(x, y)),
                    Some(heading),
                )
                .expect("registration should succeed")
        })
        .collect();
    (engine, ids)
}

fn chassis(engine: &Engine, robot: Entity) -> Chassis {
    (*engine.world().get::<&Chassis>(robot).unwrap()).clone()
}

fn core(engine: &Engine, robot: Entity) -> PowerCore {
    (*engine.world().get::<&PowerCore>(robot).unwrap()).clone()
}

fn set_treads(engine: &mut Engine, robot: Entity, left: i32, right: i32) {
    let ch = engine
        .world_mut()
        .query_one_mut::<&mut Chassis>(robot)
        .unwrap();
    ch.left_tread = left;
    ch.right_tread = right;
}

fn set_shields(engine: &mut Engine, robot: Entity, shields: f64) {
    engine
        .world_mut()
        .query_one_mut::<&mut PowerCore>(robot)
        .unwrap()
        .shields = shields;
}

fn set_laser_charge(engine: &mut Engine, robot: Entity, charge: f64) {
    engine
        .world_mut()
        .query_one_mut::<&mut WeaponMounts>(robot)
        .unwrap()
        .mounts[LASER_PORT]
        .charge_energy = charge;
}

// ---- Motion ----

#[test]
fn test_equal_treads_translate_along_heading() {
    let (mut engine, ids) = engine_with(&[("mover", 100.0, 100.0, 0.0)]);
    set_treads(&mut engine, ids[0], 100, 100);
    engine.start_fight();

    for _ in 0..60 {
        engine.tick();
    }

    let ch = chassis(&engine, ids[0]);
    assert!(
        (ch.pos.x - (100.0 + MAX_SPEED_CM_S)).abs() < 1e-6,
        "1 s at full throttle should cover MAX_SPEED cm, got x = {}",
        ch.pos.x
    );
    assert!((ch.pos.y - 100.0).abs() < 1e-9, "y should be unchanged");
    assert_eq!(ch.heading, 0.0, "translation must not touch the heading");
}

#[test]
fn test_opposite_treads_rotate_in_place() {
    let (mut engine, ids) = engine_with(&[("spinner", 100.0, 100.0, 0.0)]);
    set_treads(&mut engine, ids[0], -100, 100);
    engine.start_fight();

    for _ in 0..60 {
        engine.tick();
    }

    let ch = chassis(&engine, ids[0]);
    assert!(
        (ch.pos.x - 100.0).abs() < 1e-9 && (ch.pos.y - 100.0).abs() < 1e-9,
        "opposite equal treads must pivot about the centre, got {:?}",
        ch.pos
    );
    let expected = 360.0 * MAX_SPEED_CM_S / (std::f64::consts::PI * TREAD_DISTANCE_CM);
    assert!(
        (ch.heading - expected).abs() < 0.05,
        "expected ~{expected:.2}° of counter-clockwise rotation, got {}",
        ch.heading
    );
}

#[test]
fn test_single_tread_pivots_around_it() {
    let (mut engine, ids) = engine_with(&[("pivot", 100.0, 100.0, 0.0)]);
    set_treads(&mut engine, ids[0], 100, 0);
    engine.start_fight();

    for _ in 0..60 {
        engine.tick();
    }

    let ch = chassis(&engine, ids[0]);
    // Left tread driving, right stopped: the robot swings clockwise and the
    // midpoint orbits a circle of radius TREAD_DISTANCE / 2.
    assert!(ch.heading > 180.0, "heading should have wrapped clockwise");
    let travelled = (ch.pos - DVec2::new(100.0, 100.0)).length();
    assert!(
        travelled <= TREAD_DISTANCE_CM + 1e-6,
        "midpoint must stay on its pivot circle, moved {travelled}"
    );
}

#[test]
fn test_turbo_boost_drains_shields_and_expires() {
    let (mut engine, ids) = engine_with(&[("booster", 100.0, 100.0, 0.0)]);
    engine.start_fight();

    let fired = Api::new(&mut engine, ids[0]).turbo_boost();
    assert!(fired, "600 shield points cover the turbo cost");
    assert_eq!(core(&engine, ids[0]).shields, START_SHIELD_ENERGY - TURBO_COST);
    assert!(Api::new(&mut engine, ids[0]).is_turbo_on());
    assert!(engine.sound_requests().is_requested(SoundId::TurboBoost));

    // Stationary treads plus the turbo bonus still move the robot.
    for _ in 0..60 {
        engine.tick();
    }
    let ch = chassis(&engine, ids[0]);
    assert!(
        ch.pos.x > 100.0 + MAX_SPEED_CM_S,
        "the turbo bonus outruns full throttle, got x = {}",
        ch.pos.x
    );

    for _ in 0..(TURBO_TIME_SECS * CALCS_PER_SEC) as usize {
        engine.tick();
    }
    assert!(
        !Api::new(&mut engine, ids[0]).is_turbo_on(),
        "the boost must expire after its burn time"
    );

    set_shields(&mut engine, ids[0], TURBO_COST);
    assert!(
        !Api::new(&mut engine, ids[0]).turbo_boost(),
        "shields at exactly the cost are not enough"
    );
}

// ---- Walls and collisions ----

#[test]
fn test_wall_clamp_sets_bump_bit() {
    let (mut engine, ids) = engine_with(&[("rammer", 16.0, 200.0, 180.0)]);
    set_treads(&mut engine, ids[0], 100, 100);
    engine.start_fight();

    engine.tick();

    let ch = chassis(&engine, ids[0]);
    assert_eq!(ch.pos.x, SHIELD_RAD_CM, "centre clamps to the wall margin");

    let mut api = Api::new(&mut engine, ids[0]);
    assert_eq!(api.get_bump_info() & BUMP_WALL, BUMP_WALL);
    assert_eq!(
        api.get_bump_info(),
        BUMP_NONE,
        "a second read with no new events returns nothing"
    );
}

#[test]
fn test_shield_cross_shoves_and_damages_both() {
    let (mut engine, ids) =
        engine_with(&[("left", 100.0, 100.0, 0.0), ("right", 120.0, 100.0, 0.0)]);
    engine.start_fight();

    engine.tick();

    // 20 cm apart is inside the combined shield radius: both take the
    // crossing damage (no leak at the threshold) and both feel the bump.
    for &robot in &ids {
        assert_eq!(
            core(&engine, robot).shields,
            START_SHIELD_ENERGY - SHIELD_CROSS_DAMAGE
        );
        let mut api = Api::new(&mut engine, robot);
        assert_eq!(api.get_bump_info() & BUMP_ROBOT, BUMP_ROBOT);
    }
    assert!(engine.sound_requests().is_requested(SoundId::RobotsCollide));

    // The impulses point the two robots apart: left of the pair gets shoved
    // further left, right further right. (They keep grinding — and taking
    // crossing damage — every tick until the impulses separate them.)
    let separation_before = chassis(&engine, ids[0])
        .pos
        .distance(chassis(&engine, ids[1]).pos);
    for _ in 0..4 {
        engine.tick();
    }
    let a = chassis(&engine, ids[0]).pos;
    let b = chassis(&engine, ids[1]).pos;
    assert!(a.x < 100.0 && b.x > 120.0, "impulses must push the pair apart");
    assert!(
        a.distance(b) > separation_before,
        "separation should grow every tick under the impulses"
    );
}

#[test]
#[should_panic(expected = "same point")]
fn test_coincident_robots_are_fatal() {
    let (mut engine, _ids) =
        engine_with(&[("one", 100.0, 100.0, 0.0), ("two", 100.0, 100.0, 90.0)]);
    engine.start_fight();
    engine.tick();
}

// ---- Weapons ----

#[test]
fn test_laser_hits_standing_target() {
    let (mut engine, ids) =
        engine_with(&[("gunner", 100.0, 100.0, 0.0), ("target", 140.0, 100.0, 0.0)]);
    set_laser_charge(&mut engine, ids[0], MIN_LASER_ENERGY);
    engine.start_fight();

    assert!(Api::new(&mut engine, ids[0]).fire_weapon(WeaponKind::Laser, 0));
    assert_eq!(engine.weapons_in_flight().len(), 1);
    assert!(engine.sound_requests().is_requested(SoundId::LaserFire));

    // 40 cm at 200 cm/s is well under 12 ticks to impact.
    for _ in 0..12 {
        engine.tick();
    }

    assert!(
        engine.weapons_in_flight().is_empty(),
        "the bolt must be gone in the tick it impacts"
    );
    assert_eq!(
        core(&engine, ids[1]).shields,
        START_SHIELD_ENERGY - MIN_LASER_ENERGY * (1.0 + LASER_ENERGY_BONUS),
        "the target absorbs the delivered energy on its shields"
    );
    assert_eq!(
        core(&engine, ids[0]).shields,
        START_SHIELD_ENERGY,
        "the shooter is never hurt by its own weapon"
    );
    assert_eq!(core(&engine, ids[1]).structure, MAX_GENERATOR_STRUCTURE);
    assert!(engine.sound_requests().is_requested(SoundId::LaserHit));
    assert_eq!(
        Api::new(&mut engine, ids[1]).get_bump_info() & BUMP_LASER,
        BUMP_LASER
    );
}

#[test]
fn test_fire_under_min_energy_dumps_charge() {
    let (mut engine, ids) = engine_with(&[("gunner", 100.0, 100.0, 0.0)]);
    set_laser_charge(&mut engine, ids[0], MIN_LASER_ENERGY - 1.0);
    engine.start_fight();

    let mut api = Api::new(&mut engine, ids[0]);
    assert!(!api.fire_weapon(WeaponKind::Laser, 0));
    assert_eq!(
        api.get_system_energy(SystemKind::Lasers),
        0.0,
        "an under-charged trigger pull wastes the charge"
    );
    assert!(engine.weapons_in_flight().is_empty());
}

#[test]
fn test_fire_outside_arc_is_refused_without_penalty() {
    let (mut engine, ids) = engine_with(&[("gunner", 100.0, 100.0, 0.0)]);
    engine
        .world_mut()
        .query_one_mut::<&mut WeaponMounts>(ids[0])
        .unwrap()
        .mounts[MISSILE_PORT]
        .charge_energy = MIN_MISSILE_ENERGY;
    engine.start_fight();

    let mut api = Api::new(&mut engine, ids[0]);
    assert!(!api.fire_weapon(WeaponKind::Missile, 120));
    assert_eq!(
        api.get_system_energy(SystemKind::Missiles),
        MIN_MISSILE_ENERGY,
        "a bad aim refuses without touching the charge"
    );

    // Aim is normalised before the arc check, so a full turn plus a legal
    // offset fires.
    assert!(api.fire_weapon(WeaponKind::Missile, 360 + 45));
}

#[test]
fn test_missile_splash_spares_owner_and_hits_bystander() {
    let (mut engine, ids) = engine_with(&[
        ("shooter", 340.0, 100.0, 0.0),
        ("bystander", 350.0, 135.0, 0.0),
    ]);
    engine
        .world_mut()
        .query_one_mut::<&mut WeaponMounts>(ids[0])
        .unwrap()
        .mounts[MISSILE_PORT]
        .charge_energy = MIN_MISSILE_ENERGY;
    engine.start_fight();

    assert!(Api::new(&mut engine, ids[0]).fire_weapon(WeaponKind::Missile, 0));
    for _ in 0..45 {
        engine.tick();
    }

    assert!(engine.weapons_in_flight().is_empty(), "missile hit the wall");
    assert!(engine.sound_requests().is_requested(SoundId::MissileHit));
    assert_eq!(
        core(&engine, ids[1]).shields,
        START_SHIELD_ENERGY - MISSILE_SPLASH_DAMAGE,
        "the bystander inside the blast radius takes splash damage"
    );
    assert_eq!(
        core(&engine, ids[0]).shields,
        START_SHIELD_ENERGY,
        "the owner stands inside the blast radius unharmed"
    );
}

// ---- Damage ----

#[test]
fn test_shield_leak_below_threshold() {
    let (mut engine, ids) = engine_with(&[("victim", 100.0, 100.0, 0.0)]);
    set_shields(&mut engine, ids[0], 300.0);
    engine
        .world_mut()
        .query_one_mut::<&mut PowerCore>(ids[0])
        .unwrap()
        .damage_bank = 100.0;
    engine.start_fight();

    engine.tick();

    let power = core(&engine, ids[0]);
    // Half the threshold leaks half the damage inside.
    assert_eq!(power.shields, 250.0);
    assert_eq!(power.structure as i32, 450);
}

#[test]
fn test_overflow_damage_spills_into_structure() {
    let (mut engine, ids) = engine_with(&[("victim", 100.0, 100.0, 0.0)]);
    set_shields(&mut engine, ids[0], 100.0);
    engine
        .world_mut()
        .query_one_mut::<&mut PowerCore>(ids[0])
        .unwrap()
        .damage_bank = 300.0;
    engine.start_fight();

    engine.tick();

    let power = core(&engine, ids[0]);
    // Five sixths leak inside, and the shields just barely hold the rest.
    assert!((power.shields - 50.0).abs() < 1e-9);
    assert!((power.structure - 250.0).abs() < 1e-9);
}

#[test]
fn test_destroyed_robot_migrates_and_goes_dark() {
    let (mut engine, ids) =
        engine_with(&[("survivor", 100.0, 100.0, 0.0), ("doomed", 300.0, 300.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[1]);
        assert!(api.add_sensor(0, SensorKind::Radar, 0, 20, 80));
    }
    set_shields(&mut engine, ids[1], 0.0);
    engine
        .world_mut()
        .query_one_mut::<&mut PowerCore>(ids[1])
        .unwrap()
        .damage_bank = 1000.0;
    engine.start_fight();

    engine.tick();

    assert_eq!(engine.live_robots(), &ids[..1]);
    assert_eq!(engine.destroyed_robots(), &ids[1..]);
    assert!(engine.sound_requests().is_requested(SoundId::RobotExplode));

    let body = engine.body_mask(ids[1]).expect("wreck state is retained");
    assert_eq!(body.mask.opaque_cells(), 0, "a wreck has no collision mask");
    let suite = engine.sensor_suite(ids[1]).unwrap();
    let sensor = suite.slots[0].as_ref().unwrap();
    assert!(!sensor.on && !sensor.powered, "wreck sensors are dead");
    assert_eq!(core(&engine, ids[1]).structure, 0.0);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.robots.len(), 1);
    assert_eq!(snapshot.destroyed.len(), 1);
    assert_eq!(snapshot.destroyed[0].name, "doomed");
}

// ---- Energy ----

#[test]
fn test_energy_follows_priority_order() {
    let (mut engine, ids) = engine_with(&[("charger", 100.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        api.set_system_charge_rate(SystemKind::Shields, 600);
        api.set_system_charge_rate(SystemKind::Lasers, 500);
        api.set_system_charge_rate(SystemKind::Missiles, 600);
    }
    set_shields(&mut engine, ids[0], 0.0);
    engine.start_fight();

    engine.tick();

    // Pool 1400 against requests of 600 + 0 + 500 + 600 in default order:
    // the missiles, last in line, get only the 300 left over.
    let per_min = CALCS_PER_MIN as f64;
    let power = core(&engine, ids[0]);
    assert!((power.shields - 600.0 / per_min).abs() < 1e-9);
    let api = Api::new(&mut engine, ids[0]);
    assert!((api.get_system_energy(SystemKind::Lasers) - 500.0 / per_min).abs() < 1e-9);
    assert!((api.get_system_energy(SystemKind::Missiles) - 300.0 / per_min).abs() < 1e-9);
}

#[test]
fn test_priority_change_reorders_allocation() {
    let (mut engine, ids) = engine_with(&[("charger", 100.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        api.set_system_charge_rate(SystemKind::Shields, 600);
        api.set_system_charge_rate(SystemKind::Missiles, 600);
        api.set_system_charge_rate(SystemKind::Lasers, 500);
        assert!(api.set_system_charge_priorities([
            SystemKind::Missiles,
            SystemKind::Lasers,
            SystemKind::Shields,
            SystemKind::Sensors,
        ]));
    }
    set_shields(&mut engine, ids[0], 0.0);
    engine.start_fight();

    engine.tick();

    // Missiles first in line now get their full request; shields, third,
    // get what remains of the pool (1400 - 600 - 500 = 300).
    let per_min = CALCS_PER_MIN as f64;
    let api = Api::new(&mut engine, ids[0]);
    assert!((api.get_system_energy(SystemKind::Missiles) - 600.0 / per_min).abs() < 1e-9);
    assert!((core(&engine, ids[0]).shields - 300.0 / per_min).abs() < 1e-9);
}

#[test]
fn test_bad_priority_permutation_is_rejected() {
    let (mut engine, ids) = engine_with(&[("charger", 100.0, 100.0, 0.0)]);
    let mut api = Api::new(&mut engine, ids[0]);
    assert!(!api.set_system_charge_priorities([
        SystemKind::Shields,
        SystemKind::Shields,
        SystemKind::Lasers,
        SystemKind::Missiles,
    ]));

    let power = core(&engine, ids[0]);
    assert_eq!(
        power.priorities,
        SystemKind::DEFAULT_PRIORITIES,
        "a rejected permutation leaves the order untouched"
    );
}

#[test]
fn test_sensor_powering_browns_out_in_port_order() {
    let (mut engine, ids) = engine_with(&[("dim", 100.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Radar, 0, 20, 80));
        assert!(api.add_sensor(1, SensorKind::Radar, 90, 20, 80));
        assert!(api.add_sensor(2, SensorKind::Range, 0, 0, 0));
    }
    // Structure 50 yields a pool of 140: enough for the first radar (75),
    // not for the second (150) or the rangefinder (200).
    engine
        .world_mut()
        .query_one_mut::<&mut PowerCore>(ids[0])
        .unwrap()
        .structure = 50.0;
    engine.start_fight();

    engine.tick();

    let suite = engine.sensor_suite(ids[0]).unwrap();
    let powered: Vec<bool> = suite
        .slots
        .iter()
        .flatten()
        .map(|sensor| sensor.powered)
        .collect();
    assert_eq!(powered, vec![true, false, false]);
    drop(suite);

    let api = Api::new(&mut engine, ids[0]);
    assert_eq!(api.get_sensor(1), -1, "an unpowered sensor reads -1");
    assert_eq!(api.get_sensor(3), -1, "an empty port reads -1");
}

// ---- Sensors ----

#[test]
fn test_radar_sees_robot_in_fan() {
    let (mut engine, ids) =
        engine_with(&[("watcher", 100.0, 100.0, 0.0), ("blip", 150.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Radar, 0, 20, 80));
    }
    engine.start_fight();

    engine.tick();

    assert_eq!(
        Api::new(&mut engine, ids[0]).get_sensor(0),
        1,
        "a robot 50 cm dead ahead sits inside the fan"
    );
}

#[test]
fn test_radar_misses_robot_outside_fan() {
    let (mut engine, ids) =
        engine_with(&[("watcher", 100.0, 100.0, 0.0), ("blip", 100.0, 180.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Radar, 0, 20, 80));
    }
    engine.start_fight();

    engine.tick();

    assert_eq!(
        Api::new(&mut engine, ids[0]).get_sensor(0),
        0,
        "a robot due north is nowhere near an east-facing fan"
    );
}

#[test]
fn test_range_sensor_reads_distance_to_robot() {
    let (mut engine, ids) =
        engine_with(&[("ranger", 100.0, 100.0, 0.0), ("wall-of-meat", 150.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Range, 0, 0, 0));
    }
    engine.start_fight();

    engine.tick();

    // The target's shield rim starts 34 cm out (50 minus the 16 cm radius).
    assert_eq!(Api::new(&mut engine, ids[0]).get_sensor(0), 34);
}

#[test]
fn test_range_sensor_full_range_when_clear() {
    let (mut engine, ids) = engine_with(&[("ranger", 100.0, 100.0, 90.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Range, 0, 0, 0));
    }
    engine.start_fight();

    engine.tick();

    assert_eq!(
        Api::new(&mut engine, ids[0]).get_sensor(0),
        RANGE_MAX_RANGE_CM,
        "a clear ray reads the fixed maximum range"
    );
}

#[test]
fn test_range_sensor_sees_the_wall() {
    let (mut engine, ids) = engine_with(&[("ranger", 350.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Range, 0, 0, 0));
    }
    engine.start_fight();

    engine.tick();

    let reading = Api::new(&mut engine, ids[0]).get_sensor(0);
    assert!(
        (24..=26).contains(&reading),
        "the east wall is ~25 cm out, read {reading}"
    );
}

#[test]
fn test_sensor_off_reads_minus_one_and_saves_power() {
    let (mut engine, ids) =
        engine_with(&[("watcher", 100.0, 100.0, 0.0), ("blip", 150.0, 100.0, 0.0)]);
    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.add_sensor(0, SensorKind::Radar, 0, 20, 80));
    }
    engine.start_fight();
    engine.tick();
    assert_eq!(Api::new(&mut engine, ids[0]).get_sensor(0), 1);

    Api::new(&mut engine, ids[0]).set_sensor_status(0, false);
    engine.tick();
    assert_eq!(Api::new(&mut engine, ids[0]).get_sensor(0), -1);
}

// ---- GPS, messaging, status ----

#[test]
fn test_gps_costs_shield_energy() {
    let (mut engine, ids) = engine_with(&[("navigator", 123.0, 45.0, 270.0)]);
    engine.start_fight();

    let fix = Api::new(&mut engine, ids[0]).gps().expect("shields can pay");
    assert_eq!((fix.x, fix.y, fix.heading), (123.0, 45.0, 270.0));
    assert_eq!(core(&engine, ids[0]).shields, START_SHIELD_ENERGY - GPS_COST);

    set_shields(&mut engine, ids[0], GPS_COST);
    assert!(
        Api::new(&mut engine, ids[0]).gps().is_none(),
        "shields at exactly the cost refuse the fix"
    );
    assert_eq!(
        core(&engine, ids[0]).shields,
        GPS_COST,
        "a refused fix deducts nothing"
    );
}

#[test]
fn test_messages_deliver_fifo_by_name() {
    let (mut engine, ids) =
        engine_with(&[("alpha", 100.0, 100.0, 0.0), ("bravo", 300.0, 300.0, 0.0)]);
    engine.start_fight();

    {
        let mut api = Api::new(&mut engine, ids[0]);
        assert!(api.send_message("bravo", 11));
        assert!(api.send_message("bravo", 22));
        assert!(!api.send_message("nobody", 33), "unknown names bounce");
    }

    let mut api = Api::new(&mut engine, ids[1]);
    assert_eq!(api.get_message(), Some(11));
    assert_eq!(api.get_message(), Some(22));
    assert_eq!(api.get_message(), None);
}

#[test]
fn test_messages_to_destroyed_robot_bounce() {
    let (mut engine, ids) =
        engine_with(&[("alpha", 100.0, 100.0, 0.0), ("bravo", 300.0, 300.0, 0.0)]);
    set_shields(&mut engine, ids[1], 0.0);
    engine
        .world_mut()
        .query_one_mut::<&mut PowerCore>(ids[1])
        .unwrap()
        .damage_bank = 1000.0;
    engine.start_fight();
    engine.tick();

    assert!(
        !Api::new(&mut engine, ids[0]).send_message("bravo", 1),
        "the dead receive no mail"
    );
}

#[test]
fn test_status_message_appears_in_snapshot() {
    let (mut engine, ids) = engine_with(&[("talker", 100.0, 100.0, 0.0)]);
    Api::new(&mut engine, ids[0]).set_status_message("hunting");
    assert_eq!(engine.snapshot().robots[0].status, "hunting");
}

#[test]
#[should_panic(expected = "status message")]
fn test_oversized_status_message_is_fatal() {
    let (mut engine, ids) = engine_with(&[("talker", 100.0, 100.0, 0.0)]);
    let huge = "x".repeat(STATUS_MSG_LEN);
    Api::new(&mut engine, ids[0]).set_status_message(&huge);
}

// ---- Setup gating ----

#[test]
fn test_register_after_start_is_refused() {
    let (mut engine, _ids) = engine_with(&[("early", 100.0, 100.0, 0.0)]);
    engine.start_fight();
    let result = engine.register_robot("late", RobotColor::Blue, Box::new(Idle), None, None, None);
    assert!(matches!(result, Err(SetupError::NotInSetup)));
}

#[test]
fn test_roster_is_capped() {
    let (mut engine, _ids) = engine_with(&[
        ("one", 50.0, 50.0, 0.0),
        ("two", 50.0, 300.0, 0.0),
        ("three", 300.0, 50.0, 0.0),
        ("four", 300.0, 300.0, 0.0),
    ]);
    let result = engine.register_robot("five", RobotColor::White, Box::new(Idle), None, None, None);
    assert!(matches!(result, Err(SetupError::RosterFull)));
}

#[test]
#[should_panic(expected = "add_sensor")]
fn test_add_sensor_after_start_is_fatal() {
    let (mut engine, ids) = engine_with(&[("late", 100.0, 100.0, 0.0)]);
    engine.start_fight();
    Api::new(&mut engine, ids[0]).add_sensor(0, SensorKind::Radar, 0, 20, 80);
}

#[test]
fn test_add_sensor_validates_geometry_and_ports() {
    let (mut engine, ids) = engine_with(&[("fitter", 100.0, 100.0, 0.0)]);
    let mut api = Api::new(&mut engine, ids[0]);
    assert!(!api.add_sensor(4, SensorKind::Radar, 0, 20, 80), "bad port");
    assert!(!api.add_sensor(0, SensorKind::Radar, 0, 5, 80), "arc too thin");
    assert!(!api.add_sensor(0, SensorKind::Radar, 0, 60, 80), "arc too wide");
    assert!(!api.add_sensor(0, SensorKind::Radar, 0, 20, 20), "too short");
    assert!(!api.add_sensor(0, SensorKind::Radar, 0, 20, 200), "too long");
    assert!(api.add_sensor(0, SensorKind::Radar, -15, 20, 80));
    assert!(
        !api.add_sensor(0, SensorKind::Range, 0, 0, 0),
        "occupied port"
    );
}

#[test]
fn test_auto_placement_keeps_robots_apart() {
    let mut engine = Engine::new(quiet_config(99));
    for name in ["a", "b", "c", "d"] {
        engine
            .register_robot(name, RobotColor::Green, Box::new(Idle), None, None, None)
            .expect("the arena has room for four");
    }
    let live = engine.live_robots().to_vec();
    for i in 0..live.len() {
        for j in i + 1..live.len() {
            let a = chassis(&engine, live[i]).pos;
            let b = chassis(&engine, live[j]).pos;
            assert!(
                a.distance(b) >= SHIELD_RAD_CM * 2.0 + MIN_RANDOM_DIST_CM,
                "auto-placed robots must respect the spacing minimum"
            );
        }
    }
}

// ---- Dispatch ----

/// Counts its action calls and checks the reported turn time.
struct Counter {
    calls: Rc<Cell<u32>>,
}

impl Bot for Counter {
    fn actions(&mut self, _api: &mut Api<'_>, elapsed_ms: u32) {
        assert_eq!(elapsed_ms, TURN_TIME_MS);
        self.calls.set(self.calls.get() + 1);
    }
}

#[test]
fn test_actions_run_every_order_period() {
    let calls = Rc::new(Cell::new(0));
    let mut engine = Engine::new(quiet_config(7));
    engine
        .register_robot(
            "metronome",
            RobotColor::Yellow,
            Box::new(Counter {
                calls: Rc::clone(&calls),
            }),
            None,
            Some(DVec2::new(100.0, 100.0)),
            Some(0.0),
        )
        .unwrap();
    engine.start_fight();

    for _ in 0..(CALCS_PER_SEC as usize) {
        engine.tick();
    }
    assert_eq!(
        calls.get(),
        CALCS_PER_SEC / ORDER_FREQ,
        "one second of ticks dispatches at the order frequency"
    );
}

#[test]
fn test_no_ticks_outside_fighting_state() {
    let (mut engine, _ids) = engine_with(&[("idler", 100.0, 100.0, 0.0)]);
    engine.tick();
    assert_eq!(engine.tick_count(), 0, "setup does not tick");

    engine.start_fight();
    engine.tick();
    assert_eq!(engine.tick_count(), 1);

    engine.end_fight();
    engine.tick();
    assert_eq!(engine.tick_count(), 1, "a finished match does not tick");
    assert_eq!(engine.state(), GameState::Over);
}

// ---- Determinism ----

/// A deliberately busy bot: drives, charges, sweeps its radar, fires.
struct Brawler;

impl Bot for Brawler {
    fn configure(&mut self, api: &mut Api<'_>) {
        api.add_sensor(0, SensorKind::Radar, 0, 20, 90);
        api.set_system_charge_priorities([
            SystemKind::Lasers,
            SystemKind::Shields,
            SystemKind::Sensors,
            SystemKind::Missiles,
        ]);
    }

    fn actions(&mut self, api: &mut Api<'_>, _elapsed_ms: u32) {
        api.set_system_charge_rate(SystemKind::Shields, 300);
        api.set_system_charge_rate(SystemKind::Lasers, 500);
        if api.get_sensor(0) == 1 {
            api.set_motor_speeds(0, 0);
            if api.get_system_energy(SystemKind::Lasers) >= MIN_LASER_ENERGY {
                api.fire_weapon(WeaponKind::Laser, 0);
            }
        } else {
            api.set_motor_speeds(90, 40);
        }
    }
}

fn brawl_engine(seed: u64) -> Engine {
    let mut engine = Engine::new(SimConfig {
        seed,
        emit_particles: true,
    });
    engine
        .register_robot("red", RobotColor::Red, Box::new(Brawler), None, None, None)
        .unwrap();
    engine
        .register_robot("blue", RobotColor::Blue, Box::new(Brawler), None, None, None)
        .unwrap();
    engine.start_fight();
    engine
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = brawl_engine(12345);
    let mut engine_b = brawl_engine(12345);

    for tick in 0..300 {
        engine_a.tick();
        engine_b.tick();
        let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
        assert_eq!(json_a, json_b, "matches diverged at tick {tick}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let engine_a = brawl_engine(111);
    let engine_b = brawl_engine(222);

    // Different seeds place the robots differently before the first tick.
    let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
    let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
    assert_ne!(json_a, json_b, "different seeds should differ from placement");
}

#[test]
fn test_invariants_hold_through_a_brawl() {
    let mut engine = brawl_engine(424242);

    for _ in 0..1200 {
        engine.tick();
        for &robot in engine.live_robots() {
            let ch = engine.world().get::<&Chassis>(robot).unwrap();
            let power = engine.world().get::<&PowerCore>(robot).unwrap();
            assert!((0.0..360.0).contains(&ch.heading), "heading wraps");
            assert!(
                (0.0..=MAX_SHIELD_ENERGY).contains(&power.shields),
                "shields stay in range"
            );
            assert!(
                (0.0..=MAX_GENERATOR_STRUCTURE).contains(&power.structure),
                "structure stays in range"
            );
            assert!(
                ch.pos.x >= SHIELD_RAD_CM
                    && ch.pos.x <= ARENA_WIDTH_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM
                    && ch.pos.y >= SHIELD_RAD_CM
                    && ch.pos.y <= ARENA_HEIGHT_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM,
                "robots never leave the arena interior"
            );
            let mounts = engine.world().get::<&WeaponMounts>(robot).unwrap();
            assert!(
                (0.0..=MAX_LASER_ENERGY).contains(&mounts.mounts[LASER_PORT].charge_energy)
            );
            assert!(
                (0.0..=MAX_MISSILE_ENERGY).contains(&mounts.mounts[MISSILE_PORT].charge_energy)
            );
        }
    }
}

// ---- Scatter ----

#[test]
fn test_scatter_moves_and_separates_robots() {
    let (mut engine, ids) =
        engine_with(&[("one", 100.0, 100.0, 0.0), ("two", 120.0, 100.0, 0.0)]);
    engine.scatter_robots().expect("plenty of room for two");

    let a = chassis(&engine, ids[0]).pos;
    let b = chassis(&engine, ids[1]).pos;
    assert!(
        a.distance(b) >= SHIELD_RAD_CM * 2.0 + MIN_RANDOM_DIST_CM,
        "scattered robots respect the spacing minimum"
    );
}

// ---- Sound contract ----

#[test]
fn test_mixer_clears_requests() {
    let (mut engine, _ids) = engine_with(&[("noisy", 100.0, 100.0, 0.0)]);
    engine.start_fight();
    assert!(engine.sound_requests().is_requested(SoundId::FightStart));

    engine.sound_requests_mut().clear(SoundId::FightStart);
    assert!(engine.sound_requests().pending().is_empty());
}

// ---- Suite bump register ----

#[test]
fn test_bump_bits_accumulate_until_read() {
    let (mut engine, ids) = engine_with(&[("bumped", 16.0, 16.0, 180.0)]);
    set_treads(&mut engine, ids[0], 100, 100);
    engine.start_fight();

    // Driving into the corner clamps both axes across several ticks; the
    // register keeps accumulating until someone reads it.
    for _ in 0..5 {
        engine.tick();
    }
    let suite = engine.sensor_suite(ids[0]).unwrap();
    assert_eq!(suite.bump_register & BUMP_WALL, BUMP_WALL);
}
