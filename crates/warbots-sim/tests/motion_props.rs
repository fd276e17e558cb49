//! Property tests for the motion and energy subsystems.
//!
//! These drive the subsystem functions directly over hand-built worlds with
//! randomised commands and verify the arena-containment and
//! energy-conservation invariants hold for every case.

use glam::DVec2;
use hecs::{Entity, World};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warbots_core::components::{
    BodyMask, Chassis, Mailbox, Nameplate, PowerCore, Sensor, SensorSuite, WeaponMounts,
};
use warbots_core::constants::*;
use warbots_core::enums::{RobotColor, SystemKind};
use warbots_core::events::SoundRequests;
use warbots_sim::masks::default_chassis_glyph;
use warbots_sim::particles::ParticleField;
use warbots_sim::systems::{collision, energy, motion};

fn spawn_robot(world: &mut World, number: usize, pos: DVec2, heading: f64) -> Entity {
    let color = RobotColor::Green.rgb();
    world.spawn((
        Chassis::new(pos, heading),
        PowerCore::new(),
        SensorSuite::default(),
        WeaponMounts::new(),
        Mailbox::default(),
        Nameplate {
            name: format!("prop-{number}"),
            number,
            color,
            status: String::new(),
        },
        BodyMask::new(default_chassis_glyph(color)),
    ))
}

/// The four-kind permutations, indexable by a proptest integer.
fn nth_priority_permutation(index: usize) -> [SystemKind; NUM_ENERGY_SYSTEMS] {
    let mut pool = vec![
        SystemKind::Shields,
        SystemKind::Sensors,
        SystemKind::Lasers,
        SystemKind::Missiles,
    ];
    let mut order = [SystemKind::Shields; NUM_ENERGY_SYSTEMS];
    let mut rest = index % 24;
    for slot in &mut order {
        let divisor = pool.len();
        *slot = pool.remove(rest % divisor);
        rest /= divisor;
    }
    order
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Whatever the treads and heading do, the wall clamp keeps the robot's
    /// centre inside the arena interior on every tick.
    #[test]
    fn random_driving_stays_inside_the_arena(
        x in SHIELD_RAD_CM..(ARENA_WIDTH_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM),
        y in SHIELD_RAD_CM..(ARENA_HEIGHT_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM),
        heading in 0.0..360.0f64,
        left in -100i32..=100,
        right in -100i32..=100,
        impulse_heading in 0.0..360.0f64,
        impulse_speed in 0.0..SHIELD_CROSS_SPEED,
    ) {
        let mut world = World::new();
        let robot = spawn_robot(&mut world, 0, DVec2::new(x, y), heading);
        {
            let chassis = world.query_one_mut::<&mut Chassis>(robot).unwrap();
            chassis.left_tread = left;
            chassis.right_tread = right;
            chassis.impulse_heading = impulse_heading;
            chassis.impulse_speed = impulse_speed;
        }
        let live = [robot];
        let mut sounds = SoundRequests::new();
        let mut particles = ParticleField::new(false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for _ in 0..120 {
            motion::run(&mut world, &live, &mut particles, &mut rng);
            collision::robots(&mut world, &live, &mut sounds, &mut particles, &mut rng);

            let chassis = world.get::<&Chassis>(robot).unwrap();
            prop_assert!(chassis.pos.x >= SHIELD_RAD_CM);
            prop_assert!(chassis.pos.x <= ARENA_WIDTH_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM);
            prop_assert!(chassis.pos.y >= SHIELD_RAD_CM);
            prop_assert!(chassis.pos.y <= ARENA_HEIGHT_CM - SHIELD_RAD_CM - WALL_HIT_CORRECT_CM);
            prop_assert!((0.0..360.0).contains(&chassis.heading));
        }
    }

    /// Under any priority permutation, charge rates, and generator health,
    /// one tick never hands out more energy than the pool holds, and no
    /// store ever leaves its bounds.
    #[test]
    fn energy_allocation_conserves_the_pool(
        perm_index in 0usize..24,
        shield_rate in 0i32..=MAX_SHIELD_CHARGE_RATE,
        laser_rate in 0i32..=MAX_LASER_CHARGE_RATE,
        missile_rate in 0i32..=MAX_MISSILE_CHARGE_RATE,
        structure in 1.0..=MAX_GENERATOR_STRUCTURE,
        shields in 0.0..=MAX_SHIELD_ENERGY,
    ) {
        let mut world = World::new();
        let robot = spawn_robot(&mut world, 0, DVec2::new(100.0, 100.0), 0.0);
        {
            let (core, suite, mounts) = world
                .query_one_mut::<(&mut PowerCore, &mut SensorSuite, &mut WeaponMounts)>(robot)
                .unwrap();
            core.priorities = nth_priority_permutation(perm_index);
            core.shield_charge_rate = shield_rate;
            core.structure = structure;
            core.shields = shields;
            mounts.mounts[LASER_PORT].charge_rate = laser_rate;
            mounts.mounts[MISSILE_PORT].charge_rate = missile_rate;
            suite.slots[0] = Some(Sensor::radar(0, 20, 80));
            suite.slots[1] = Some(Sensor::range(90));
        }

        let pool = structure * GENERATOR_CAPACITY / MAX_GENERATOR_STRUCTURE;
        let live = [robot];
        energy::run(&mut world, &live);

        let (core, suite, mounts) = world
            .query_one_mut::<(&mut PowerCore, &mut SensorSuite, &mut WeaponMounts)>(robot)
            .unwrap();

        let per_min = CALCS_PER_MIN as f64;
        let mut handed_out = (core.shields - shields).max(0.0) * per_min
            + mounts.mounts[LASER_PORT].charge_energy * per_min
            + mounts.mounts[MISSILE_PORT].charge_energy * per_min;
        for sensor in suite.slots.iter().flatten() {
            if sensor.powered {
                handed_out += match sensor.kind {
                    warbots_core::enums::SensorKind::Radar => RADAR_SENSOR_ENERGY_COST,
                    warbots_core::enums::SensorKind::Range => RANGE_SENSOR_ENERGY_COST,
                };
            }
        }
        prop_assert!(
            handed_out <= pool + 1e-6,
            "handed out {handed_out} from a pool of {pool}"
        );

        prop_assert!(core.shields >= 0.0 && core.shields <= MAX_SHIELD_ENERGY);
        prop_assert!(mounts.mounts[LASER_PORT].charge_energy <= MAX_LASER_ENERGY);
        prop_assert!(mounts.mounts[MISSILE_PORT].charge_energy <= MAX_MISSILE_ENERGY);
    }
}

#[test]
fn priority_permutations_cover_all_orders() {
    let mut seen = std::collections::HashSet::new();
    for index in 0..24 {
        seen.insert(nth_priority_permutation(index));
    }
    assert_eq!(seen.len(), 24, "indexing must reach every permutation");
}
