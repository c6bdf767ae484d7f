//! Collision detection and purging
//!
//! Everything here is circle arithmetic on squared distances: no square root
//! per bullet per tick.

use glam::Vec2;

use super::player::Player;
use super::projectile::Projectile;
use super::rect::Rect;

/// Circle/circle overlap, touching counts as a hit
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Index of the first live projectile touching the player's hit circle
pub fn first_hit(projectiles: &[Projectile], player: &Player) -> Option<usize> {
    projectiles
        .iter()
        .position(|p| p.alive && circles_overlap(p.pos, p.hit_radius, player.pos, player.hit_radius))
}

/// Whether any live projectile touches the player's hit circle
pub fn check_collision(projectiles: &[Projectile], player: &Player) -> bool {
    first_hit(projectiles, player).is_some()
}

/// Remove dead projectiles, returning how many were dropped
pub fn purge_dead(projectiles: &mut Vec<Projectile>) -> usize {
    let before = projectiles.len();
    projectiles.retain(|p| p.alive);
    before - projectiles.len()
}

/// Kill and remove projectiles more than `margin` outside the playfield on any edge
pub fn purge_out_of_bounds(projectiles: &mut Vec<Projectile>, playfield: &Rect, margin: f32) -> usize {
    let bounds = playfield.expanded(margin);
    for p in projectiles.iter_mut() {
        if !bounds.contains_point(p.pos) {
            p.alive = false;
        }
    }
    purge_dead(projectiles)
}

/// Kill and remove projectiles whose circle overlaps any safe rectangle
pub fn purge_inside_safe_zones(projectiles: &mut Vec<Projectile>, safe_rects: &[Rect]) -> usize {
    if safe_rects.is_empty() {
        return 0;
    }
    for p in projectiles.iter_mut() {
        if safe_rects.iter().any(|r| r.intersects_circle(p.pos, p.radius)) {
            p.alive = false;
        }
    }
    purge_dead(projectiles)
}
