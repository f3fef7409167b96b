//! Battle rule constants - default values for `GameConfig`
//!
//! The engine never reads these directly; they only seed the config.

// Run length
pub const DEFAULT_MAX_STEPS: u64 = 50_000;
pub const SHELLS_EXHAUSTED_GRACE_STEPS: u32 = 40;

// Tank loadout and timings (turns)
pub const SHELLS_PER_TANK: u32 = 16;
pub const SHOOT_COOLDOWN_TURNS: u32 = 4;
pub const REVERSE_WAIT_TURNS: u32 = 2;

// Board limits; a side beyond this is rejected before any cell is allocated
pub const MAX_BOARD_SIDE: u32 = 1024;

// Terrain
pub const WALL_HIT_POINTS: u32 = 2;

// Shells travel two cells per turn, resolved as half-steps
pub const SHELL_SUBSTEPS: u32 = 2;

// Board symbols
pub const WALL_SYMBOL: char = '#';
pub const MINE_SYMBOL: char = '@';
pub const SHELL_SYMBOL: char = '*';
pub const SELF_SYMBOL: char = '%';
pub const EMPTY_SYMBOL: char = ' ';
pub const OUT_OF_BOUNDS_SYMBOL: char = '&';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shells_outrun_tanks() {
        assert!(SHELL_SUBSTEPS > 1);
    }

    #[test]
    fn test_symbols_distinct() {
        let symbols = [
            WALL_SYMBOL,
            MINE_SYMBOL,
            SHELL_SYMBOL,
            SELF_SYMBOL,
            EMPTY_SYMBOL,
            OUT_OF_BOUNDS_SYMBOL,
            '1',
            '2',
        ];
        for (i, a) in symbols.iter().enumerate() {
            for b in &symbols[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
