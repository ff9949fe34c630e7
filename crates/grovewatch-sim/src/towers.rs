//! Player intents that change the board: place, sell, upgrade, start wave.
//!
//! These run between ticks. Each either applies fully or returns a
//! `CommandError` and leaves the state untouched.

use tracing::info;

use grovewatch_core::config::{
    DotSpec, GameConfig, SlowSpec, StatModifiers, TowerProfile, UpgradeTable, VulnerabilitySpec,
};
use grovewatch_core::constants::MAX_TOWER_LEVEL;
use grovewatch_core::entities::{Tower, TowerStats, UpgradeState};
use grovewatch_core::enums::{GameStatus, Tile, TowerType, UpgradeBranch, WavePhase};
use grovewatch_core::error::CommandError;
use grovewatch_core::geometry;
use grovewatch_core::state::GameState;
use grovewatch_core::types::{GridCell, TowerId};

/// Current stats: base profile x branch bonuses x owned perks.
pub fn compute_stats(
    profile: &TowerProfile,
    upgrade: &UpgradeState,
    table: &UpgradeTable,
) -> TowerStats {
    let mut modifiers = StatModifiers::IDENTITY;
    if let Some(branch) = upgrade.branch {
        for level in 2..=upgrade.level {
            if let Some(bonus) = table.branch_bonus(branch, level) {
                modifiers = modifiers.combine(*bonus);
            }
        }
    }
    for perk in upgrade.perks.iter().filter_map(|id| table.perk(id)) {
        modifiers = modifiers.combine(perk.modifiers);
    }

    let m = modifiers;
    TowerStats {
        range: profile.range * m.range,
        fire_rate: profile.fire_rate * m.fire_rate,
        damage: profile.damage * m.damage,
        projectile_speed: profile.projectile_speed,
        damage_type: profile.damage_type,
        splash_radius: profile.splash_radius * m.splash_radius,
        splash_ratio: profile.splash_ratio,
        slow: profile.slow.map(|slow| SlowSpec {
            // Strength scales the speed removed, not the multiplier itself.
            multiplier: geometry::clamp(1.0 - (1.0 - slow.multiplier) * m.slow_strength, 0.0, 1.0),
            duration: slow.duration * m.effect_duration,
        }),
        dot: profile.dot.map(|dot| DotSpec {
            dps: dot.dps * m.dot_dps,
            duration: dot.duration * m.effect_duration,
        }),
        vulnerability: profile.vulnerability.map(|v| VulnerabilitySpec {
            amount: v.amount * m.vulnerability,
            duration: v.duration * m.effect_duration,
        }),
    }
}

fn ensure_building_allowed(state: &GameState) -> Result<(), CommandError> {
    if state.status.is_terminal() {
        return Err(CommandError::NotAllowed(state.status));
    }
    Ok(())
}

fn charge(state: &mut GameState, cost: u32) -> Result<(), CommandError> {
    let available = state.resources.money;
    if available < cost {
        return Err(CommandError::InsufficientFunds {
            needed: cost,
            available,
        });
    }
    state.resources.money = available - cost;
    Ok(())
}

/// Build a level 1 tower on an empty grass cell.
pub fn place_tower(
    state: &mut GameState,
    config: &GameConfig,
    tower_type: TowerType,
    cell: GridCell,
) -> Result<TowerId, CommandError> {
    ensure_building_allowed(state)?;
    match state.map.tile(cell) {
        None => return Err(CommandError::OutOfBounds(cell)),
        Some(Tile::Path) => return Err(CommandError::NotBuildable(cell)),
        Some(Tile::Grass) => {}
    }
    if state.tower_at(cell).is_some() {
        return Err(CommandError::Occupied(cell));
    }

    let profile = config.towers.get(tower_type);
    charge(state, profile.cost)?;

    let id = state.allocate_tower_id();
    let upgrade = UpgradeState::default();
    state.towers.push(Tower {
        id,
        tower_type,
        cell,
        position: cell.center(state.map.cell_size),
        stats: compute_stats(profile, &upgrade, &config.upgrades),
        cooldown: 0.0,
        upgrade,
        invested: profile.cost,
    });
    info!(tower = %id, ?tower_type, %cell, cost = profile.cost, "tower_placed");
    Ok(id)
}

/// Remove a tower and refund `floor(invested * refund_ratio)`.
///
/// Its projectiles already in flight still land and keep the tower's id.
pub fn sell_tower(
    state: &mut GameState,
    config: &GameConfig,
    id: TowerId,
) -> Result<u32, CommandError> {
    ensure_building_allowed(state)?;
    let index = state
        .towers
        .iter()
        .position(|t| t.id == id)
        .ok_or(CommandError::UnknownTower(id))?;
    let tower = state.towers.remove(index);
    let refund = (f64::from(tower.invested) * config.economy.sell_refund_ratio).floor() as u32;
    state.resources.money = state.resources.money.saturating_add(refund);
    info!(tower = %id, refund, "tower_sold");
    Ok(refund)
}

/// Upgrade one level along `branch`. Returns the new level.
///
/// The first upgrade locks the branch. Reaching the top level grants the
/// branch perk for this tower type, if one is configured.
pub fn upgrade_tower(
    state: &mut GameState,
    config: &GameConfig,
    id: TowerId,
    branch: UpgradeBranch,
) -> Result<u8, CommandError> {
    ensure_building_allowed(state)?;
    let tower = state.tower(id).ok_or(CommandError::UnknownTower(id))?;
    let level = tower.upgrade.level;
    if level >= MAX_TOWER_LEVEL {
        return Err(CommandError::MaxLevel(id));
    }
    if let Some(chosen) = tower.upgrade.branch {
        if chosen != branch {
            return Err(CommandError::BranchLocked { tower: id, chosen });
        }
    }
    let tower_type = tower.tower_type;
    let profile = config.towers.get(tower_type);
    let cost = config
        .upgrades
        .cost(profile.cost, level)
        .ok_or(CommandError::MaxLevel(id))?;
    charge(state, cost)?;

    let Some(tower) = state.tower_mut(id) else {
        return Err(CommandError::UnknownTower(id));
    };
    tower.upgrade.level = level + 1;
    tower.upgrade.branch = Some(branch);
    if tower.upgrade.level == MAX_TOWER_LEVEL {
        if let Some(perk) = config.upgrades.perk_for(tower_type, branch) {
            tower.upgrade.perks.push(perk.id.clone());
        }
    }
    tower.invested += cost;
    tower.stats = compute_stats(profile, &tower.upgrade, &config.upgrades);
    info!(tower = %id, ?branch, level = level + 1, cost, "tower_upgraded");
    Ok(level + 1)
}

/// Index of the wave a `StartWave` would begin.
fn startable_wave(state: &GameState) -> Result<usize, CommandError> {
    if state.waves.is_empty() {
        return Err(CommandError::NoWaveToStart);
    }
    match (state.status, state.wave_phase) {
        (GameStatus::Idle, WavePhase::Idle) => Ok(state.current_wave),
        (GameStatus::Running, WavePhase::Completed) => {
            let next = state.current_wave + 1;
            if next < state.waves.len() {
                Ok(next)
            } else {
                Err(CommandError::NoWaveToStart)
            }
        }
        (status, _) => Err(CommandError::NotAllowed(status)),
    }
}

pub fn can_start_wave(state: &GameState) -> bool {
    startable_wave(state).is_ok()
}

/// Begin the first wave, or the next one after a completed wave.
/// Returns the wave index.
pub fn start_wave(state: &mut GameState) -> Result<usize, CommandError> {
    let index = startable_wave(state)?;
    state.current_wave = index;
    state.status = GameStatus::Running;
    state.wave_phase = WavePhase::Active;
    info!(wave = index + 1, total = state.waves.len(), "wave_started");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_setup;

    fn setup() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        (world_setup::build_state(&config), config)
    }

    const GRASS: GridCell = GridCell::new(3, 4);

    #[test]
    fn place_deducts_cost_and_starts_ready() {
        let (mut state, config) = setup();
        let id = place_tower(&mut state, &config, TowerType::Thorn, GRASS).unwrap();
        assert_eq!(state.resources.money, 200);
        let tower = state.tower(id).unwrap();
        assert_eq!(tower.cooldown, 0.0);
        assert_eq!(tower.upgrade.level, 1);
        assert_eq!(tower.position, GRASS.center(40.0));
        assert_eq!(tower.stats.range, 120.0);
    }

    #[test]
    fn place_rejections_leave_state_untouched() {
        let (mut state, config) = setup();
        let before = state.clone();
        assert_eq!(
            place_tower(&mut state, &config, TowerType::Thorn, GridCell::new(0, 2)),
            Err(CommandError::NotBuildable(GridCell::new(0, 2)))
        );
        assert_eq!(
            place_tower(&mut state, &config, TowerType::Thorn, GridCell::new(20, 0)),
            Err(CommandError::OutOfBounds(GridCell::new(20, 0)))
        );
        state.resources.money = 10;
        assert_eq!(
            place_tower(&mut state, &config, TowerType::Mortar, GRASS),
            Err(CommandError::InsufficientFunds {
                needed: 90,
                available: 10
            })
        );
        state.resources.money = before.resources.money;
        assert_eq!(state, before);

        place_tower(&mut state, &config, TowerType::Thorn, GRASS).unwrap();
        assert_eq!(
            place_tower(&mut state, &config, TowerType::Frost, GRASS),
            Err(CommandError::Occupied(GRASS))
        );
    }

    #[test]
    fn sell_refunds_floor_of_invested_share() {
        let (mut state, config) = setup();
        let id = place_tower(&mut state, &config, TowerType::Frost, GRASS).unwrap();
        upgrade_tower(&mut state, &config, id, UpgradeBranch::Reach).unwrap();
        // 70 + ceil(70 * 0.75) = 123 invested; 123 * 0.7 = 86.1.
        assert_eq!(state.tower(id).unwrap().invested, 123);
        let money = state.resources.money;
        assert_eq!(sell_tower(&mut state, &config, id), Ok(86));
        assert_eq!(state.resources.money, money + 86);
        assert!(state.towers.is_empty());
        assert_eq!(
            sell_tower(&mut state, &config, id),
            Err(CommandError::UnknownTower(id))
        );
    }

    #[test]
    fn upgrade_path_locks_branch_and_grants_perk() {
        let (mut state, config) = setup();
        state.resources.money = 1000;
        let id = place_tower(&mut state, &config, TowerType::Thorn, GRASS).unwrap();

        assert_eq!(upgrade_tower(&mut state, &config, id, UpgradeBranch::Power), Ok(2));
        assert_eq!(
            upgrade_tower(&mut state, &config, id, UpgradeBranch::Reach),
            Err(CommandError::BranchLocked {
                tower: id,
                chosen: UpgradeBranch::Power
            })
        );
        assert_eq!(upgrade_tower(&mut state, &config, id, UpgradeBranch::Power), Ok(3));
        assert_eq!(
            upgrade_tower(&mut state, &config, id, UpgradeBranch::Power),
            Err(CommandError::MaxLevel(id))
        );

        let tower = state.tower(id).unwrap();
        assert_eq!(tower.upgrade.perks, vec!["thorn.barbed".to_string()]);
        // 8 * 1.35 * 1.4 * 1.2
        assert!((tower.stats.damage - 18.144).abs() < 1e-9);
        assert_eq!(tower.invested, 50 + 38 + 63);
        assert_eq!(state.resources.money, 1000 - 50 - 38 - 63);
    }

    #[test]
    fn slow_strength_perk_deepens_slow() {
        let config = GameConfig::default();
        let upgrade = UpgradeState {
            level: 3,
            branch: Some(UpgradeBranch::Power),
            perks: vec!["frost.deep_freeze".to_string()],
        };
        let stats = compute_stats(config.towers.get(TowerType::Frost), &upgrade, &config.upgrades);
        let slow = stats.slow.unwrap();
        // 40% slow scaled by 1.5 removes 60% of speed.
        assert!((slow.multiplier - 0.4).abs() < 1e-9);
        assert!((slow.duration - 1.5).abs() < 1e-9);
    }

    #[test]
    fn upgrade_requires_funds() {
        let (mut state, config) = setup();
        let id = place_tower(&mut state, &config, TowerType::Arcane, GRASS).unwrap();
        state.resources.money = 0;
        assert_eq!(
            upgrade_tower(&mut state, &config, id, UpgradeBranch::Power),
            Err(CommandError::InsufficientFunds {
                needed: 83,
                available: 0
            })
        );
        assert_eq!(state.tower(id).unwrap().upgrade.level, 1);
    }

    #[test]
    fn start_wave_flow() {
        let (mut state, _) = setup();
        assert!(can_start_wave(&state));
        assert_eq!(start_wave(&mut state), Ok(0));
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.wave_phase, WavePhase::Active);
        assert_eq!(
            start_wave(&mut state),
            Err(CommandError::NotAllowed(GameStatus::Running))
        );

        state.wave_phase = WavePhase::Completed;
        assert_eq!(start_wave(&mut state), Ok(1));
        assert_eq!(state.current_wave, 1);

        state.current_wave = state.waves.len() - 1;
        state.wave_phase = WavePhase::Completed;
        assert_eq!(start_wave(&mut state), Err(CommandError::NoWaveToStart));
    }

    #[test]
    fn nothing_is_allowed_after_the_game_ends() {
        let (mut state, config) = setup();
        state.status = GameStatus::Lost;
        assert_eq!(
            place_tower(&mut state, &config, TowerType::Thorn, GRASS),
            Err(CommandError::NotAllowed(GameStatus::Lost))
        );
        assert!(!can_start_wave(&state));
    }
}
