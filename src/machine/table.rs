use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Symbol, TmState};
use crate::config::{MAX_STATES, MAX_SYMBOLS};

/// Head movement after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move one cell towards lower coordinates.
    Left,
    /// Move one cell towards higher coordinates.
    Right,
}

impl Direction {
    /// Signed head displacement.
    pub const fn delta(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// State entered after a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextState {
    /// Continue in the given state.
    Goto(TmState),
    /// Halt after writing and moving.
    Halt,
}

/// A single table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Symbol written under the head.
    pub write: Symbol,
    /// Head movement.
    pub direction: Direction,
    /// Successor state.
    pub next: NextState,
}

/// Read-only access to a machine's transition function.
///
/// `lookup` returns `None` for an undefined entry, which halts the machine
/// without writing or moving.
pub trait TransitionTable {
    /// Size of the tape alphabet.
    fn symbols(&self) -> u8;

    /// Number of states.
    fn states(&self) -> u8;

    /// Transition for `state` reading `symbol`.
    fn lookup(&self, state: TmState, symbol: Symbol) -> Option<Transition>;
}

/// Failures while building or parsing a transition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("machine description is empty")]
    Empty,
    #[error("row {row} has {got} entries, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },
    #[error("row {row}: malformed entry `{entry}`")]
    MalformedEntry { row: usize, entry: String },
    #[error("alphabet of {got} symbols exceeds the limit of {max}")]
    TooManySymbols { max: u8, got: usize },
    #[error("{got} states exceed the limit of {max}")]
    TooManyStates { max: u8, got: usize },
    #[error("table has {got} entries, expected {expected}")]
    TableSize { expected: usize, got: usize },
}

/// Table-driven Turing machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Machine {
    symbols: u8,
    states: u8,
    /// Row-major: entry `state * symbols + symbol`.
    table: Vec<Option<Transition>>,
}

impl Machine {
    /// Builds a machine from a row-major table, validating every entry.
    pub fn new(
        symbols: u8,
        states: u8,
        table: Vec<Option<Transition>>,
    ) -> Result<Self, MachineError> {
        validate_shape(symbols as usize, states as usize)?;
        let expected = symbols as usize * states as usize;
        if table.len() != expected {
            return Err(MachineError::TableSize {
                expected,
                got: table.len(),
            });
        }
        for (index, entry) in table.iter().enumerate() {
            let Some(transition) = entry else { continue };
            let in_range = transition.write < symbols
                && match transition.next {
                    NextState::Goto(next) => next < states,
                    NextState::Halt => true,
                };
            if !in_range {
                return Err(MachineError::MalformedEntry {
                    row: index / symbols as usize,
                    entry: format_entry(entry),
                });
            }
        }
        Ok(Self {
            symbols,
            states,
            table,
        })
    }
}

impl TransitionTable for Machine {
    fn symbols(&self) -> u8 {
        self.symbols
    }

    fn states(&self) -> u8 {
        self.states
    }

    fn lookup(&self, state: TmState, symbol: Symbol) -> Option<Transition> {
        if state >= self.states || symbol >= self.symbols {
            return None;
        }
        self.table[state as usize * self.symbols as usize + symbol as usize]
    }
}

fn validate_shape(symbols: usize, states: usize) -> Result<(), MachineError> {
    if symbols == 0 || states == 0 {
        return Err(MachineError::Empty);
    }
    if symbols > MAX_SYMBOLS as usize {
        return Err(MachineError::TooManySymbols {
            max: MAX_SYMBOLS,
            got: symbols,
        });
    }
    if states > MAX_STATES as usize {
        return Err(MachineError::TooManyStates {
            max: MAX_STATES,
            got: states,
        });
    }
    Ok(())
}

fn parse_entry(entry: &[u8], states: usize) -> Option<Option<Transition>> {
    let [write, direction, next] = entry else {
        return None;
    };
    if entry.iter().all(|&b| b == b'-') {
        return Some(None);
    }
    let write = match write {
        b'0'..=b'9' => write - b'0',
        _ => return None,
    };
    let direction = match direction {
        b'L' => Direction::Left,
        b'R' => Direction::Right,
        _ => return None,
    };
    let next = match next {
        b'A'..=b'Z' if ((next - b'A') as usize) < states => NextState::Goto(next - b'A'),
        // Letters past the last state (conventionally `Z` or `H`) halt.
        b'A'..=b'Z' => NextState::Halt,
        _ => return None,
    };
    Some(Some(Transition {
        write,
        direction,
        next,
    }))
}

fn format_entry(entry: &Option<Transition>) -> String {
    match entry {
        None => "---".to_owned(),
        Some(t) => {
            let direction = match t.direction {
                Direction::Left => 'L',
                Direction::Right => 'R',
            };
            let next = match t.next {
                NextState::Goto(state) => (b'A' + state) as char,
                NextState::Halt => 'Z',
            };
            format!("{}{}{}", t.write, direction, next)
        }
    }
}

impl FromStr for Machine {
    type Err = MachineError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = text.trim().split('_').collect();
        let states = rows.len();
        let first = rows.first().map_or(0, |row| row.len());
        if first == 0 {
            return Err(MachineError::Empty);
        }
        let symbols = first / 3;
        validate_shape(symbols, states)?;

        let mut table = Vec::with_capacity(states * symbols);
        for (row_index, row) in rows.iter().enumerate() {
            let bytes = row.as_bytes();
            if bytes.len() % 3 != 0 || bytes.len() / 3 != symbols {
                return Err(MachineError::RaggedRow {
                    row: row_index,
                    expected: symbols,
                    got: bytes.len() / 3,
                });
            }
            for chunk in bytes.chunks(3) {
                let entry =
                    parse_entry(chunk, states).ok_or_else(|| MachineError::MalformedEntry {
                        row: row_index,
                        entry: String::from_utf8_lossy(chunk).into_owned(),
                    })?;
                table.push(entry);
            }
        }
        Machine::new(symbols as u8, states as u8, table)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, entries) in self.table.chunks(self.symbols as usize).enumerate() {
            if row > 0 {
                f.write_str("_")?;
            }
            for entry in entries {
                f.write_str(&format_entry(entry))?;
            }
        }
        Ok(())
    }
}
