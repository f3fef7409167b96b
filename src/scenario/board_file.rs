//! Text board files
//!
//! ```text
//! Crossroads duel          <- free-text name
//! MaxSteps = 2000
//! NumShells = 16
//! Rows = 4
//! Cols = 10
//! #########                <- Rows grid lines follow
//! #1   @  2#
//! ```
//!
//! Metadata keys may come in any order. Grid lines shorter than `Cols` are
//! padded with empty cells, longer ones truncated, and missing trailing lines
//! are empty rows. `#` is a wall, `@` a mine, `1`/`2` a tank; anything else
//! is empty ground. Tanks are created in row-major order.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::Scenario;
use crate::battle::constants::{MINE_SYMBOL, WALL_SYMBOL};
use crate::battle::grid::check_dimensions;
use crate::core::error::{BattleError, Result};
use crate::core::types::PlayerId;

const METADATA_LINES: usize = 4;

fn parse_error(line: usize, message: impl Into<String>) -> BattleError {
    BattleError::ScenarioParse {
        line,
        message: message.into(),
    }
}

#[derive(Default)]
struct Metadata {
    max_steps: Option<u64>,
    num_shells: Option<u32>,
    rows: Option<u32>,
    cols: Option<u32>,
}

impl Metadata {
    fn apply(&mut self, line_no: usize, line: &str) -> Result<()> {
        let (key, value) = line.split_once('=').ok_or_else(|| {
            parse_error(line_no, format!("expected `Key = value`, got {:?}", line))
        })?;
        let key = key.trim();
        let value = value.trim();

        let number = |what: &str| -> Result<u64> {
            value.parse::<u64>().map_err(|_| {
                parse_error(
                    line_no,
                    format!("{} must be a non-negative integer, got {:?}", what, value),
                )
            })
        };
        let small = |what: &str| -> Result<u32> {
            u32::try_from(number(what)?)
                .map_err(|_| parse_error(line_no, format!("{} is too large", what)))
        };

        let slot_taken = match key {
            "MaxSteps" => self.max_steps.replace(number(key)?).is_some(),
            "NumShells" => self.num_shells.replace(small(key)?).is_some(),
            "Rows" => self.rows.replace(small(key)?).is_some(),
            "Cols" => self.cols.replace(small(key)?).is_some(),
            other => return Err(parse_error(line_no, format!("unknown metadata key {:?}", other))),
        };
        if slot_taken {
            return Err(parse_error(line_no, format!("duplicate metadata key {:?}", key)));
        }
        Ok(())
    }
}

/// Parse a board file's contents into a scenario
pub fn parse_board(contents: &str) -> Result<Scenario> {
    let lines: Vec<&str> = contents.lines().map(|l| l.trim_end_matches('\r')).collect();

    let name = lines
        .first()
        .map(|l| l.trim().to_string())
        .ok_or_else(|| parse_error(1, "missing board name"))?;

    let mut meta = Metadata::default();
    for offset in 1..=METADATA_LINES {
        let line = lines
            .get(offset)
            .ok_or_else(|| parse_error(offset + 1, "missing metadata line"))?;
        meta.apply(offset + 1, line)?;
    }

    // Four known, non-duplicate keys on four lines define all of them
    let (Some(max_steps), Some(num_shells), Some(rows), Some(cols)) =
        (meta.max_steps, meta.num_shells, meta.rows, meta.cols)
    else {
        return Err(parse_error(
            METADATA_LINES + 1,
            "metadata must define MaxSteps, NumShells, Rows and Cols",
        ));
    };
    check_dimensions(cols, rows)?;

    let mut scenario = Scenario::new(name, cols, rows)
        .with_max_steps(max_steps)
        .with_shells_per_tank(num_shells);

    let grid = lines.iter().skip(1 + METADATA_LINES);
    for (y, row) in grid.take(rows as usize).enumerate() {
        for (x, ch) in row.chars().take(cols as usize).enumerate() {
            let (x, y) = (x as i32, y as i32);
            scenario = match ch {
                WALL_SYMBOL => scenario.wall(x, y),
                MINE_SYMBOL => scenario.mine(x, y),
                c => match PlayerId::from_symbol(c) {
                    Some(player) => scenario.tank(player, x, y),
                    None => scenario,
                },
            };
        }
    }

    debug!(
        name = %scenario.name,
        width = cols,
        height = rows,
        walls = scenario.walls.len(),
        mines = scenario.mines.len(),
        tanks = scenario.tanks.len(),
        "Parsed board"
    );
    Ok(scenario)
}

/// Read and parse a board file from disk
pub fn load_board_file(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)?;
    parse_board(&contents)
}
