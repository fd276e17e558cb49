//! Ballistic weapon flight.
//!
//! Weapons travel in a straight line at a fixed speed once fired. Missiles
//! leave a smoke trail as they go; impacts are resolved afterwards by the
//! collision pass.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use warbots_core::constants::CALCS_PER_SEC;
use warbots_core::enums::WeaponKind;
use warbots_core::types::heading_vec;

use crate::particles::ParticleField;
use crate::projectile::Projectile;

/// Advance every in-flight weapon one tick.
pub fn run(
    world: &mut World,
    weapons: &[Entity],
    particles: &mut ParticleField,
    rng: &mut ChaCha8Rng,
) {
    for &entity in weapons {
        let Ok(proj) = world.query_one_mut::<&mut Projectile>(entity) else {
            continue;
        };
        let dist = proj.speed / CALCS_PER_SEC as f64;
        proj.pos += dist * heading_vec(proj.heading);
        if proj.kind == WeaponKind::Missile {
            let (pos, heading) = (proj.pos, proj.heading);
            particles.missile_smoke(pos, heading, rng);
        }
    }
}
