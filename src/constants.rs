// Timing constants
pub const TICK_INTERVAL_MS: u64 = 100;
/// Opponent "thinking" delay: 30 ticks at 100ms = 3 seconds
pub const DEFAULT_THINK_TICKS: u32 = 30;

// Session constants
pub const DEFAULT_MAX_PLIES: u32 = 4; // mate in 2
/// Longest mate-in-N accepted from puzzle files and the prompt
pub const MAX_MATE_IN: u32 = 20;

// Persistence constants
pub const APP_NAME: &str = "mate-trainer";
pub const STATS_VERSION_MAGIC: u64 = 0x4D41544553540001; // "MATEST" + version 1
pub const STATS_FILE_NAME: &str = "stats.dat";
pub const CONFIG_FILE_NAME: &str = "config.json";
