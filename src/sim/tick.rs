//! Fixed timestep simulation tick
//!
//! One call advances the whole game by `dt`. Ordering inside a running
//! tick matters: camera, player, door/wall check, weapons, enemies (each
//! one's player contact resolved right after it moves), projectiles,
//! enemy-enemy contacts, compaction, death check, timed spawns.

use glam::Vec2;

use super::collision::{circles_overlap, resolve_overlap};
use super::dungeon::DungeonError;
use super::room::TileGrid;
use super::state::{Enemy, Faction, GamePhase, GameState, Player};
use super::weapon::{Attack, melee_hits};
use crate::direction_to;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent, normalized by the player update
    pub move_dir: Vec2,
    /// Aim direction relative to the player (zero keeps last facing)
    pub aim: Vec2,
    /// Dash pressed this frame
    pub dash: bool,
    /// Attack pressed this frame
    pub attack: bool,
    /// Switch weapon pressed this frame
    pub switch_weapon: bool,
    /// Leave the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over from the game over screen
    pub restart: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Only a failed restart returns an error; room load failures mid-run
/// just cancel the transition.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), DungeonError> {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                log::info!("Run started");
                state.phase = GamePhase::Running;
            }
            return Ok(());
        }
        GamePhase::GameOver => {
            if input.restart {
                log::info!("Restarting run");
                state.restart()?;
            }
            return Ok(());
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Running;
            }
            return Ok(());
        }
        GamePhase::Running => {
            if input.pause {
                state.phase = GamePhase::Paused;
                return Ok(());
            }
        }
    }

    state.time_elapsed += dt;
    state.dungeon.update(dt);

    if input.dash {
        state.player.try_dash();
    }

    // --- PLAYER ---
    let prev_pos = state.player.pos;
    state
        .player
        .update(dt, input.move_dir, state.screen_size);
    resolve_player_position(state, prev_pos);

    // --- WEAPONS ---
    state.player.aim(input.aim);
    state.player.tick_weapons(dt);
    if input.switch_weapon {
        state.player.switch_weapon();
    }
    if input.attack {
        player_attack(state);
    }

    // --- ENEMIES ---
    // Each enemy moves and resolves its contact before the next one moves
    let room = state.dungeon.current_room();
    let player = &mut state.player;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if let Some(shot) = enemy.update(dt, player.pos, player.radius, room) {
            state.projectiles.push(shot);
        }
        player_enemy_contact(player, enemy, room, dt);
    }

    // --- PROJECTILES ---
    for projectile in &mut state.projectiles {
        projectile.update(dt, room);
    }
    projectile_hits(state);

    // --- CONTACTS ---
    enemy_enemy_contacts(state);

    state.enemies.retain(|e| e.alive);
    state.projectiles.retain(|p| p.alive);

    if state.player.hp <= 0.0 {
        log::info!("Player died (score {}, rooms {})", state.score, state.dungeon.rooms_visited);
        state.phase = GamePhase::GameOver;
        return Ok(());
    }

    // --- TIMED SPAWNS ---
    if state.spawn_enabled {
        state.spawn_timer += dt;
        if state.spawn_timer > state.spawn_interval && state.enemies.len() < state.max_enemies {
            state.spawn_random_enemy();
            state.spawn_timer = 0.0;
        }
    }

    Ok(())
}

/// Revert a move into a wall, or walk through a door into the next room
fn resolve_player_position(state: &mut GameState, prev_pos: Vec2) {
    let room = state.dungeon.current_room();
    if room.is_walkable(state.player.pos, state.player.radius) {
        return;
    }

    let exit = room.tile_at(state.player.pos);
    let Some(arrival) = exit.opposite_door() else {
        state.player.pos = prev_pos;
        return;
    };

    if let Err(err) = state.dungeon.load_next_room() {
        log::warn!("Room transition through {:?} failed: {}", exit, err);
        state.player.pos = prev_pos;
        return;
    }

    let room = state.dungeon.current_room();
    let spawn = room.get_door_position(arrival);
    state.player.pos = if spawn.x >= 0.0 && spawn.y >= 0.0 {
        spawn
    } else {
        room.get_spawn()
    };
    state.enemies.clear();
    state.projectiles.clear();
    state.wave += 1;
    log::info!(
        "Entered room {} through {:?}",
        state.dungeon.rooms_visited,
        arrival
    );
}

fn player_attack(state: &mut GameState) {
    let origin = state.player.pos;
    let facing = state.player.facing;
    let Some(attack) = state.player.weapon_mut().trigger(origin, facing) else {
        return;
    };

    match attack {
        Attack::Melee { damage, range } => {
            for enemy in &mut state.enemies {
                if melee_hits(origin, facing, range, enemy) && enemy.take_damage(damage) {
                    state.score += u64::from(enemy.kind.profile().score);
                }
            }
        }
        Attack::Shot(projectile) => state.projectiles.push(projectile),
    }
}

/// Projectiles hurt the opposing faction and vanish on impact
fn projectile_hits(state: &mut GameState) {
    for projectile in &mut state.projectiles {
        if !projectile.alive {
            continue;
        }
        match projectile.faction {
            Faction::Player => {
                let target = state.enemies.iter_mut().find(|e| {
                    e.alive && circles_overlap(projectile.pos, projectile.radius, e.pos, e.radius)
                });
                if let Some(enemy) = target {
                    projectile.alive = false;
                    if enemy.take_damage(projectile.damage) {
                        state.score += u64::from(enemy.kind.profile().score);
                    }
                }
            }
            Faction::Enemy => {
                let player = &mut state.player;
                if circles_overlap(projectile.pos, projectile.radius, player.pos, player.radius) {
                    projectile.alive = false;
                    player.hp -= projectile.damage;
                }
            }
        }
    }
}

/// Contact damage and separation for one enemy touching the player
fn player_enemy_contact(player: &mut Player, enemy: &mut Enemy, room: &TileGrid, dt: f32) {
    if !circles_overlap(player.pos, player.radius, enemy.pos, enemy.radius) {
        return;
    }
    player.hp -= enemy.damage * dt;

    let before = player.pos;
    resolve_overlap(&mut player.pos, player.radius, &mut enemy.pos, enemy.radius);

    // Never shove the player into a wall; push only the enemy instead
    if !room.is_walkable(player.pos, player.radius) {
        player.pos = before;
        let push = direction_to(player.pos, enemy.pos);
        enemy.pos = player.pos + push * (player.radius + enemy.radius);
    }
}

/// Separate every overlapping pair of living enemies (i < j)
fn enemy_enemy_contacts(state: &mut GameState) {
    let enemies = &mut state.enemies;
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.alive {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.alive) {
            if circles_overlap(a.pos, a.radius, b.pos, b.radius) {
                resolve_overlap(&mut a.pos, a.radius, &mut b.pos, b.radius);
            }
        }
    }
}
