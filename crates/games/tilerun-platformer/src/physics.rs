use serde::{Deserialize, Serialize};

use tilerun_core::geometry::Rect;

/// Downward acceleration added to vy every tick.
pub const GRAVITY: f32 = 0.5;
/// Horizontal player speed (units/tick).
pub const PLAYER_SPEED: f32 = 5.0;
/// Jump impulse. Negative because +y points down.
pub const JUMP_FORCE: f32 = -11.0;

/// Tunable physics parameters, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub player_speed: f32,
    pub jump_force: f32,
    /// Terminal fall speed. `None` lets vy grow without bound.
    pub max_fall_speed: Option<f32>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            jump_force: JUMP_FORCE,
            max_fall_speed: None,
        }
    }
}

/// Horizontal facing shared by the player and enemies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Position, size, and per-tick velocity of a moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
}

impl KinematicBody {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.rect.x, self.rect.y)
    }

    pub fn size(&self) -> (f32, f32) {
        (self.rect.w, self.rect.h)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    /// Advance one tick under gravity and resolve against `colliders`.
    pub fn update(&mut self, colliders: &[Rect], physics: &PhysicsConfig) -> Contacts {
        resolve_step(self, colliders, physics)
    }
}

/// What a body touched during one resolution step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Stopped by a collider while falling.
    pub landed: bool,
    /// Stopped by a collider while rising.
    pub hit_ceiling: bool,
    /// Clamped horizontally at least once.
    pub hit_wall: bool,
}

/// One fixed tick of axis-separated collision resolution.
///
/// Gravity first, then the X pass, then the Y pass. Colliders are visited in
/// slice order and each overlap test uses the body's current (possibly
/// already clamped) rectangle. A horizontal hit moves the body but leaves vx
/// alone; a vertical hit zeroes vy, so on the Y axis the first clamp wins.
pub fn resolve_step(
    body: &mut KinematicBody,
    colliders: &[Rect],
    physics: &PhysicsConfig,
) -> Contacts {
    body.vy += physics.gravity;
    if let Some(max) = physics.max_fall_speed
        && body.vy > max
    {
        body.vy = max;
    }

    let mut contacts = Contacts::default();

    body.rect.x += body.vx;
    contacts.hit_wall = resolve_x(body, colliders);

    body.rect.y += body.vy;
    let (landed, hit_ceiling) = resolve_y(body, colliders);
    contacts.landed = landed;
    contacts.hit_ceiling = hit_ceiling;

    contacts
}

pub(crate) fn resolve_x(body: &mut KinematicBody, colliders: &[Rect]) -> bool {
    let mut hit = false;
    for collider in colliders {
        if !body.rect.overlaps(collider) {
            continue;
        }
        if body.vx > 0.0 {
            body.rect.set_right(collider.left());
            hit = true;
        } else if body.vx < 0.0 {
            body.rect.set_left(collider.right());
            hit = true;
        }
    }
    hit
}

pub(crate) fn resolve_y(body: &mut KinematicBody, colliders: &[Rect]) -> (bool, bool) {
    let mut landed = false;
    let mut hit_ceiling = false;
    for collider in colliders {
        if !body.rect.overlaps(collider) {
            continue;
        }
        if body.vy > 0.0 {
            body.rect.set_bottom(collider.top());
            body.vy = 0.0;
            landed = true;
        } else if body.vy < 0.0 {
            body.rect.set_top(collider.bottom());
            body.vy = 0.0;
            hit_ceiling = true;
        }
    }
    (landed, hit_ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND_Y: i32 = 208;

    /// Row of ground cells at `GROUND_Y` spanning columns `0..n`.
    fn ground_row(n: i32) -> Vec<Rect> {
        (0..n).map(|i| Rect::cell(i * 16, GROUND_Y, 16)).collect()
    }

    fn standing_body(x: f32) -> KinematicBody {
        KinematicBody::new(x, GROUND_Y as f32 - 32.0, 16.0, 32.0)
    }

    #[test]
    fn gravity_accumulates_without_colliders() {
        let mut body = KinematicBody::new(0.0, 0.0, 16.0, 32.0);
        let physics = PhysicsConfig::default();
        for _ in 0..4 {
            body.update(&[], &physics);
        }
        assert_eq!(body.vy, 4.0 * GRAVITY);
        // 0.5 + 1.0 + 1.5 + 2.0
        assert_eq!(body.rect.y, 5.0);
    }

    #[test]
    fn resting_body_stays_grounded() {
        let ground = ground_row(4);
        let mut body = standing_body(16.0);
        let contacts = body.update(&ground, &PhysicsConfig::default());

        assert!(contacts.landed);
        assert_eq!(body.vy, 0.0);
        assert_eq!(body.rect.bottom(), GROUND_Y as f32);
        assert_eq!(body.rect.x, 16.0);
    }

    #[test]
    fn falling_body_lands_on_tile_top() {
        let ground = ground_row(4);
        let mut body = KinematicBody::new(20.0, 170.0, 16.0, 32.0);
        body.vy = 10.0;

        let contacts = body.update(&ground, &PhysicsConfig::default());

        assert!(contacts.landed);
        assert!(!contacts.hit_ceiling);
        assert_eq!(body.rect.bottom(), GROUND_Y as f32);
        assert_eq!(body.vy, 0.0);
    }

    #[test]
    fn rising_body_stops_under_ceiling() {
        let ceiling = vec![Rect::cell(0, 96, 16)];
        let mut body = KinematicBody::new(0.0, 116.0, 16.0, 32.0);
        body.vy = -11.0;

        let contacts = body.update(&ceiling, &PhysicsConfig::default());

        assert!(contacts.hit_ceiling);
        assert!(!contacts.landed);
        assert_eq!(body.rect.top(), 112.0);
        assert_eq!(body.vy, 0.0);
    }

    #[test]
    fn wall_clamps_position_but_keeps_vx() {
        let mut colliders = ground_row(8);
        // Two-high wall in column 5
        colliders.push(Rect::cell(80, 192, 16));
        colliders.push(Rect::cell(80, 176, 16));

        let mut body = standing_body(62.0);
        body.vx = 5.0;
        let contacts = body.update(&colliders, &PhysicsConfig::default());

        assert!(contacts.hit_wall);
        assert_eq!(body.rect.right(), 80.0);
        assert_eq!(body.vx, 5.0, "horizontal hits only move the body");
        assert!(contacts.landed, "Y pass still runs after an X hit");

        // Pushing again every tick leaves the body pinned in place
        for _ in 0..5 {
            body.update(&colliders, &PhysicsConfig::default());
        }
        assert_eq!(body.rect.right(), 80.0);
    }

    #[test]
    fn leftward_wall_clamps_left_edge() {
        let mut colliders = ground_row(8);
        colliders.push(Rect::cell(16, 192, 16));

        let mut body = standing_body(34.0);
        body.vx = -5.0;
        body.update(&colliders, &PhysicsConfig::default());

        assert_eq!(body.rect.left(), 32.0);
        assert_eq!(body.vx, -5.0);
    }

    #[test]
    fn x_resolves_before_y() {
        // Body falling diagonally into the corner of a single block. Resolving
        // X first pushes it out sideways, so it keeps falling past the block.
        let block = vec![Rect::cell(32, 100, 16)];
        let mut body = KinematicBody::new(14.0, 80.0, 16.0, 32.0);
        body.vx = 5.0;
        body.vy = 5.0;

        let contacts = body.update(&block, &PhysicsConfig::default());

        assert!(contacts.hit_wall);
        assert!(!contacts.landed);
        assert_eq!(body.rect.right(), 32.0);
        assert_eq!(body.vy, 5.5);
    }

    #[test]
    fn first_vertical_clamp_wins() {
        // Overlapping two stacked cells; the first one in list order decides.
        let upper_first = vec![Rect::cell(0, 176, 16), Rect::cell(0, 192, 16)];
        let mut body = KinematicBody::new(0.0, 150.0, 16.0, 32.0);
        body.vy = 10.0;
        body.update(&upper_first, &PhysicsConfig::default());
        assert_eq!(body.rect.bottom(), 176.0);

        let lower_first = vec![Rect::cell(0, 192, 16), Rect::cell(0, 176, 16)];
        let mut body = KinematicBody::new(0.0, 150.0, 16.0, 32.0);
        body.vy = 10.0;
        body.update(&lower_first, &PhysicsConfig::default());
        assert_eq!(body.rect.bottom(), 192.0);
        assert_eq!(body.vy, 0.0);
    }

    #[test]
    fn terminal_velocity_caps_fall_speed() {
        let physics = PhysicsConfig {
            max_fall_speed: Some(3.0),
            ..Default::default()
        };
        let mut body = KinematicBody::new(0.0, 0.0, 16.0, 16.0);
        for _ in 0..20 {
            body.update(&[], &physics);
        }
        assert_eq!(body.vy, 3.0);
    }

    #[test]
    fn no_ground_means_no_landing() {
        let mut body = standing_body(500.0);
        let contacts = body.update(&ground_row(4), &PhysicsConfig::default());
        assert_eq!(contacts, Contacts::default());
        assert!(body.rect.bottom() > GROUND_Y as f32);
    }

    #[test]
    fn facing_flip_and_sign() {
        assert_eq!(Facing::Left.flipped(), Facing::Right);
        assert_eq!(Facing::Right.flipped(), Facing::Left);
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::Right.sign(), 1.0);
    }

    #[test]
    fn physics_config_partial_toml() {
        let cfg: PhysicsConfig = toml::from_str("gravity = 0.8\nmax_fall_speed = 12.0").unwrap();
        assert_eq!(cfg.gravity, 0.8);
        assert_eq!(cfg.max_fall_speed, Some(12.0));
        assert_eq!(cfg.player_speed, PLAYER_SPEED);
        assert_eq!(cfg.jump_force, JUMP_FORCE);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn falling_body_ends_on_top_of_collider(
                x in -15.0f32..15.0,
                vy in 0.0f32..12.0,
                gap_frac in 0.0f32..0.99,
            ) {
                let tile = Rect::cell(0, GROUND_Y, 16);
                let physics = PhysicsConfig::default();
                let gap = gap_frac * (vy + physics.gravity);
                let mut body = KinematicBody::new(x, GROUND_Y as f32 - 32.0 - gap, 16.0, 32.0);
                body.vy = vy;

                let moved = body.rect.translated(0.0, vy + physics.gravity);
                prop_assume!(moved.overlaps(&tile));

                let contacts = body.update(&[tile], &physics);
                prop_assert!(contacts.landed);
                prop_assert!(body.rect.bottom() <= tile.top());
                prop_assert_eq!(body.vy, 0.0);
                prop_assert!(!body.rect.overlaps(&tile));
            }

            #[test]
            fn rising_body_ends_below_collider(
                x in -15.0f32..15.0,
                vy in -12.0f32..-0.6,
                gap_frac in 0.0f32..0.99,
            ) {
                let tile = Rect::cell(0, 96, 16);
                let physics = PhysicsConfig::default();
                let travel = -(vy + physics.gravity);
                let mut body = KinematicBody::new(x, tile.bottom() + gap_frac * travel, 16.0, 32.0);
                body.vy = vy;

                let moved = body.rect.translated(0.0, vy + physics.gravity);
                prop_assume!(moved.overlaps(&tile));

                let contacts = body.update(&[tile], &physics);
                prop_assert!(contacts.hit_ceiling);
                prop_assert!(body.rect.top() >= tile.bottom());
                prop_assert_eq!(body.vy, 0.0);
            }

            #[test]
            fn walking_into_wall_never_overlaps(
                start_col in 0i32..4,
                speed in 0.5f32..15.0,
                ticks in 1usize..40,
            ) {
                let mut colliders = ground_row(12);
                colliders.push(Rect::cell(128, 192, 16));
                let mut body = standing_body(start_col as f32 * 16.0);
                body.vx = speed;

                for _ in 0..ticks {
                    body.update(&colliders, &PhysicsConfig::default());
                    for c in &colliders {
                        prop_assert!(!body.rect.overlaps(c), "overlap with {c:?}: {:?}", body.rect);
                    }
                }
                prop_assert!(body.rect.right() <= 128.0);
            }
        }
    }
}
