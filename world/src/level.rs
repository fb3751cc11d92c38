//! Parsing of the persisted level grid.

use platformer_core::{TileCode, TILE_TYPES};
use thiserror::Error;

/// Reasons a level description may be rejected at load time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The description contains more rows than the configured grid.
    #[error("level has more than {expected} rows")]
    TooManyRows {
        /// Number of rows the grid holds.
        expected: u32,
    },
    /// A row contains more cells than the configured grid.
    #[error("row {row} has {found} cells but the grid holds {expected} columns")]
    TooManyColumns {
        /// Zero-based row index.
        row: u32,
        /// Number of cells found in the row.
        found: usize,
        /// Number of columns the grid holds.
        expected: u32,
    },
    /// A cell is not an integer.
    #[error("cell at row {row}, column {column} is not an integer: {value:?}")]
    InvalidCell {
        /// Zero-based row index.
        row: u32,
        /// Zero-based column index.
        column: u32,
        /// Raw text found in the cell.
        value: String,
    },
    /// A cell holds an integer outside the known tile codes.
    #[error("cell at row {row}, column {column} holds unknown tile code {code}")]
    UnknownTileCode {
        /// Zero-based row index.
        row: u32,
        /// Zero-based column index.
        column: u32,
        /// Offending code.
        code: i32,
    },
    /// The level has no player spawn marker.
    #[error("level has no player spawn marker")]
    MissingPlayerSpawn,
    /// The level has more than one player spawn marker.
    #[error("level has a second player spawn marker at row {row}, column {column}")]
    DuplicatePlayerSpawn {
        /// Zero-based row index of the extra marker.
        row: u32,
        /// Zero-based column index of the extra marker.
        column: u32,
    },
}

/// Fixed-size grid of tile codes stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    columns: u32,
    rows: u32,
    cells: Vec<TileCode>,
}

impl LevelGrid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn empty(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![TileCode::EMPTY; capacity],
        }
    }

    /// Parses comma-separated rows of tile codes into a grid of fixed size.
    ///
    /// Rows and cells missing from the text stay empty. Blank lines at the end
    /// of the text are ignored.
    pub fn parse(text: &str, columns: u32, rows: u32) -> Result<Self, LevelError> {
        let mut grid = Self::empty(columns, rows);
        let lines: Vec<&str> = text.trim_end().lines().collect();

        for (row_index, line) in lines.iter().enumerate() {
            let row = u32::try_from(row_index).unwrap_or(u32::MAX);
            if row >= rows {
                return Err(LevelError::TooManyRows { expected: rows });
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.split(',').collect();
            if cells.len() > columns as usize {
                return Err(LevelError::TooManyColumns {
                    row,
                    found: cells.len(),
                    expected: columns,
                });
            }

            for (column_index, raw) in cells.into_iter().enumerate() {
                let column = u32::try_from(column_index).unwrap_or(u32::MAX);
                let raw = raw.trim();
                let code = raw.parse::<i32>().map_err(|_| LevelError::InvalidCell {
                    row,
                    column,
                    value: raw.to_owned(),
                })?;
                grid.set(column, row, code)?;
            }
        }

        Ok(grid)
    }

    /// Builds a grid from literal rows; the widest row decides the column count.
    pub fn from_rows(rows: &[&[i32]]) -> Result<Self, LevelError> {
        let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut grid = Self::empty(
            u32::try_from(columns).unwrap_or(u32::MAX),
            u32::try_from(rows.len()).unwrap_or(u32::MAX),
        );

        for (row_index, cells) in rows.iter().enumerate() {
            for (column_index, code) in cells.iter().enumerate() {
                grid.set(column_index as u32, row_index as u32, *code)?;
            }
        }

        Ok(grid)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Code stored at the provided cell; cells outside the grid are empty.
    #[must_use]
    pub fn code(&self, column: u32, row: u32) -> TileCode {
        self.index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(TileCode::EMPTY)
    }

    /// Iterates over `(column, row, code)` triples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, TileCode)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| (column, row, self.code(column, row)))
        })
    }

    fn set(&mut self, column: u32, row: u32, code: i32) -> Result<(), LevelError> {
        if !(-1..TILE_TYPES).contains(&code) {
            return Err(LevelError::UnknownTileCode { row, column, code });
        }

        if let Some(slot) = self
            .index(column, row)
            .and_then(|index| self.cells.get_mut(index))
        {
            *slot = TileCode::new(code);
        }
        Ok(())
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
