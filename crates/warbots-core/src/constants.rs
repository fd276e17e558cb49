//! Simulation constants and tuning parameters.

// --- Tick scheduling ---

/// Simulation steps per second.
pub const CALCS_PER_SEC: u32 = 60;

/// Steps per minute. Charge rates are expressed in units/min, so capacitive
/// systems gain `rate / CALCS_PER_MIN` per step.
pub const CALCS_PER_MIN: u32 = 3600;

/// Steps between successive agent action callbacks (15 steps → 4 Hz).
pub const ORDER_FREQ: u32 = 15;

/// Milliseconds between action callbacks, reported to agents.
pub const TURN_TIME_MS: u32 = 250;

// --- Arena ---

/// Playfield width in centimetres.
pub const ARENA_WIDTH_CM: f64 = 375.0;

/// Playfield height in centimetres.
pub const ARENA_HEIGHT_CM: f64 = 375.0;

/// Internal pixel scale for masks and sensing.
pub const PX_PER_CM: i32 = 2;

pub const ARENA_WIDTH_PX: i32 = ARENA_WIDTH_CM as i32 * PX_PER_CM;
pub const ARENA_HEIGHT_PX: i32 = ARENA_HEIGHT_CM as i32 * PX_PER_CM;

/// Wall-clamp correction that brings the odd-sized chassis mask exactly to
/// the arena edge.
pub const WALL_HIT_CORRECT_CM: f64 = 0.5;

// --- Roster ---

pub const MAX_ROBOTS: usize = 4;

/// Longest robot name, in bytes.
pub const MAX_NAME_LEN: usize = 20;

/// Longest status message, in bytes.
pub const STATUS_MSG_LEN: usize = 150;

/// Minimum clearance between shield rims when auto-placing robots (cm).
pub const MIN_RANDOM_DIST_CM: f64 = 3.0;

/// Auto-placement retries before giving up.
pub const PLACEMENT_ATTEMPTS: u32 = 1000;

// --- Shield geometry ---

/// Shield radius from the robot centre (cm).
pub const SHIELD_RAD_CM: f64 = 16.0;

pub const SHIELD_RAD_PX: i32 = 32;

/// Chassis mask size: shield diameter + 1 so the centre lands on a pixel.
pub const SHIELD_BMP_SZ: i32 = 65;

/// Shield ring thickness in pixels.
pub const SHIELD_THICK_PX: i32 = 5;

// --- Motion ---

/// Full-throttle tread speed (cm/s).
pub const MAX_SPEED_CM_S: f64 = 11.76;

/// Distance between the two treads (cm).
pub const TREAD_DISTANCE_CM: f64 = 15.5;

/// Impulse speed lost per second to friction (cm/s²).
pub const FRIC_SLOW_RATE: f64 = 30.0;

/// Turbo boost duration in seconds.
pub const TURBO_TIME_SECS: u32 = 3;

/// One-time shield-energy cost to fire the turbo boost.
pub const TURBO_COST: f64 = 100.0;

/// Percentage speed added to each tread while boosting.
pub const TURBO_SPEED_BONUS: i32 = 200;

/// Impulse speed imparted when two shields cross (cm/s).
pub const SHIELD_CROSS_SPEED: f64 = 45.0;

/// Damage banked on each robot when shields cross.
pub const SHIELD_CROSS_DAMAGE: f64 = 200.0;

// --- Weapons ---

pub const MAX_WEAPONS: usize = 2;
pub const MISSILE_PORT: usize = 0;
pub const LASER_PORT: usize = 1;

pub const LASER_BMP_SZ: i32 = 11;

/// Laser bolt speed (cm/s). Clears the arena in under 2 seconds.
pub const LASER_SPEED_CM_S: f64 = 200.0;

/// Lasers can fire at any bearing.
pub const LASER_MAX_ANGLE: i32 = 360;

pub const LASER_SPLASH_RANGE_CM: f64 = 0.0;
pub const LASER_SPLASH_DAMAGE: f64 = 0.0;

pub const MISSILE_BMP_SZ: i32 = 17;

/// Missile speed (cm/s). Up to ~7.5 s to cross the arena.
pub const MISSILE_SPEED_CM_S: f64 = 50.0;

/// Missiles fire only within 90° of the body forward.
pub const MISSILE_MAX_ANGLE: i32 = 90;

pub const MISSILE_SPLASH_RANGE_CM: f64 = 50.0;
pub const MISSILE_SPLASH_DAMAGE: f64 = 50.0;

// --- Sensors ---

pub const MAX_SENSORS: usize = 4;

pub const MIN_RADAR_ARC_DEG: i32 = 10;
pub const MAX_RADAR_ARC_DEG: i32 = 45;

pub const RADAR_MIN_RANGE_CM: i32 = 32;
pub const RADAR_MAX_RANGE_CM: i32 = 100;

/// Working raster for the radar fan: range × 2 directions × 2 px/cm, +1 for
/// centring, +2 of margin so any permitted arc fits.
pub const RADAR_WORK_IMG_PX: i32 = 403;

/// The window cropped from the working raster and kept on the sensor.
pub const RADAR_IMAGE_PX: i32 = 200;

/// Range sensors always use this fixed maximum range (cm).
pub const RANGE_MAX_RANGE_CM: i32 = 125;

/// Shield-capacitor energy deducted per GPS query.
pub const GPS_COST: f64 = 2.0;

// --- Bump register bits ---

pub const BUMP_NONE: u8 = 0x00;
pub const BUMP_WALL: u8 = 0x01;
pub const BUMP_ROBOT: u8 = 0x02;
pub const BUMP_MISSILE: u8 = 0x04;
pub const BUMP_LASER: u8 = 0x08;

// --- Energy systems ---

pub const NUM_ENERGY_SYSTEMS: usize = 4;

/// Generator output at full structure, in units/min. Everything charging at
/// max would ask for 1750, so priorities matter.
pub const GENERATOR_CAPACITY: f64 = 1400.0;

pub const MAX_GENERATOR_STRUCTURE: f64 = 500.0;

pub const MAX_SHIELD_ENERGY: f64 = 1000.0;
pub const START_SHIELD_ENERGY: f64 = 600.0;
pub const MAX_SHIELD_CHARGE_RATE: i32 = 600;

/// Below this many shield points, damage starts leaking to the generator.
pub const SHIELDS_LEAK_THRESHOLD: f64 = 600.0;

pub const MAX_MISSILE_CHARGE_RATE: i32 = 600;

/// Max charge equals min charge: at most 4 missile shots/min.
pub const MAX_MISSILE_ENERGY: f64 = 100.0;
pub const MIN_MISSILE_ENERGY: f64 = 100.0;

/// Energy multiplier applied to the charge when a missile fires.
pub const MISSILE_ENERGY_BONUS: f64 = 0.5;

pub const MAX_LASER_CHARGE_RATE: i32 = 500;
pub const MAX_LASER_ENERGY: f64 = 50.0;
pub const MIN_LASER_ENERGY: f64 = 20.0;
pub const LASER_ENERGY_BONUS: f64 = 0.0;

/// Per-step pool cost of a powered range sensor (units/min).
pub const RANGE_SENSOR_ENERGY_COST: f64 = 50.0;

/// Per-step pool cost of a powered radar sensor (units/min).
pub const RADAR_SENSOR_ENERGY_COST: f64 = 75.0;
