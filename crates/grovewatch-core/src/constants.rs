//! Default tuning values backing `GameConfig::default()`.
//!
//! Balance values reach gameplay code through the validated config, so a JSON
//! override can change any of them. Tolerances and the resistance clamp are
//! fixed and read directly.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Fixed step in milliseconds.
pub const FIXED_STEP_MS: f64 = 1000.0 / TICK_RATE as f64;

/// Largest wall-clock delta accepted per frame before clamping (ms).
pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

/// Upper bound on ticks run for a single frame.
pub const MAX_TICKS_PER_FRAME: u32 = 8;

/// Largest fixed step a config may ask for (ms).
pub const FIXED_STEP_CEILING_MS: f64 = 1000.0;

/// Largest frame clamp a config may ask for (ms).
pub const FRAME_DELTA_CEILING_MS: f64 = 60_000.0;

/// Cooldowns at or below this are treated as elapsed.
pub const COOLDOWN_EPSILON: f64 = 1e-9;

/// Timed effects with less than this remaining, or smaller than this, are dropped.
pub const EFFECT_EPSILON: f64 = 1e-9;

// --- Economy ---

pub const STARTING_MONEY: u32 = 250;
pub const STARTING_LIVES: u32 = 20;

/// Share of the total invested money returned when selling.
pub const SELL_REFUND_RATIO: f64 = 0.7;

// --- Modifier caps ---

/// Maximum summed vulnerability on a single enemy.
pub const MAX_VULNERABILITY: f64 = 1.0;

/// Global floor on an enemy's speed multiplier.
pub const MIN_SPEED_MULTIPLIER: f64 = 0.1;

/// Upper clamp of the resistance term in the damage multiplier.
pub const MAX_RESISTANCE_MULTIPLIER: f64 = 2.5;

// --- Map ---

pub const GRID_COLUMNS: u32 = 20;
pub const GRID_ROWS: u32 = 12;
pub const CELL_SIZE: f64 = 40.0;

// --- Spawning ---

/// Spawn jitter as a fraction of cell size.
pub const SPAWN_JITTER_FRACTION: f64 = 0.2;

// --- Projectile pool ---

/// Released projectiles kept for reuse.
pub const POOL_MAX_FREE: usize = 500;

/// Live projectiles allowed at once.
pub const POOL_HARD_LIMIT: usize = 1000;

// --- Particles ---

pub const MAX_PARTICLES: usize = 600;
pub const MUZZLE_PARTICLES: u32 = 3;
pub const HIT_PARTICLES: u32 = 5;
pub const KILL_PARTICLES: u32 = 12;
pub const PARTICLE_MIN_SPEED: f64 = 20.0;
pub const PARTICLE_MAX_SPEED: f64 = 90.0;
pub const PARTICLE_MIN_LIFE: f64 = 0.25;
pub const PARTICLE_MAX_LIFE: f64 = 0.6;
pub const PARTICLE_RADIUS: f64 = 2.5;

// --- Upgrades ---

/// Max tower level.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Cost of reaching level 2 and 3, as a fraction of the tower's base cost.
pub const UPGRADE_COST_FACTORS: [f64; 2] = [0.75, 1.25];
