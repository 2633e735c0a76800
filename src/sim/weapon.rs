//! Player weapons
//!
//! The sword hits every enemy in a forward cone. The bow and staff fire
//! player projectiles along the facing direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, Faction, Projectile};
use crate::consts::{ATTACK_ANIMATION, MELEE_CONE_DOT};
use crate::direction_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Sword,
    Bow,
    Staff,
}

/// Flight parameters for ranged weapons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotProfile {
    pub speed: f32,
    pub radius: f32,
    pub lifetime: f32,
}

impl WeaponKind {
    pub fn damage(self) -> f32 {
        match self {
            WeaponKind::Sword => 25.0,
            WeaponKind::Bow => 15.0,
            WeaponKind::Staff => 20.0,
        }
    }

    pub fn range(self) -> f32 {
        match self {
            WeaponKind::Sword => 50.0,
            WeaponKind::Bow => 200.0,
            WeaponKind::Staff => 100.0,
        }
    }

    /// Seconds between attacks
    pub fn cooldown(self) -> f32 {
        match self {
            WeaponKind::Sword => 0.5,
            WeaponKind::Bow => 1.0,
            WeaponKind::Staff => 0.8,
        }
    }

    /// `None` for melee weapons
    pub fn shot(self) -> Option<ShotProfile> {
        match self {
            WeaponKind::Sword => None,
            WeaponKind::Bow => Some(ShotProfile {
                speed: 600.0,
                radius: 4.0,
                lifetime: 1.0,
            }),
            WeaponKind::Staff => Some(ShotProfile {
                speed: 350.0,
                radius: 8.0,
                lifetime: 1.2,
            }),
        }
    }
}

/// What a triggered weapon produced
#[derive(Debug, Clone)]
pub enum Attack {
    Melee { damage: f32, range: f32 },
    Shot(Projectile),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
    /// Time until the next attack is allowed
    pub cooldown_timer: f32,
    /// Remaining attack animation time
    pub attack_timer: f32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            damage: kind.damage(),
            range: kind.range(),
            cooldown: kind.cooldown(),
            cooldown_timer: 0.0,
            attack_timer: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        self.attack_timer = (self.attack_timer - dt).max(0.0);
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    /// Fire from `origin` along `facing` if off cooldown
    pub fn trigger(&mut self, origin: Vec2, facing: Vec2) -> Option<Attack> {
        if !self.ready() {
            return None;
        }
        self.cooldown_timer = self.cooldown;
        self.attack_timer = ATTACK_ANIMATION;

        let attack = match self.kind.shot() {
            None => Attack::Melee {
                damage: self.damage,
                range: self.range,
            },
            Some(shot) => Attack::Shot(Projectile::new(
                origin,
                facing.normalize_or_zero() * shot.speed,
                self.damage,
                shot.radius,
                Faction::Player,
                shot.lifetime,
            )),
        };
        Some(attack)
    }
}

/// Whether a melee swing from `origin` toward `facing` reaches `enemy`
pub fn melee_hits(origin: Vec2, facing: Vec2, range: f32, enemy: &Enemy) -> bool {
    if !enemy.alive {
        return false;
    }
    let in_reach = origin.distance(enemy.pos) <= range + enemy.radius;
    let in_cone = facing.normalize_or_zero().dot(direction_to(origin, enemy.pos)) > MELEE_CONE_DOT;
    in_reach && in_cone
}
