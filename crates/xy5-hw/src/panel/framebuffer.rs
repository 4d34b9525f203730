//! Binary pixel buffer for one panel or the stacked pair.

use crate::{Error, Result, DISPLAY_ROWS, PANEL_COLUMNS, PANEL_ROWS};
use std::str::FromStr;

/// The two frame shapes the display understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameShape {
    /// One 7x28 panel.
    SinglePanel,
    /// Two stacked panels, 14x28.
    DualPanel,
}

impl FrameShape {
    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        match self {
            FrameShape::SinglePanel => PANEL_ROWS,
            FrameShape::DualPanel => DISPLAY_ROWS,
        }
    }

    /// Returns the number of columns.
    pub fn columns(&self) -> usize {
        PANEL_COLUMNS
    }

    /// Matches dimensions against the supported shapes.
    pub fn from_dimensions(rows: usize, columns: usize) -> Result<Self> {
        match (rows, columns) {
            (PANEL_ROWS, PANEL_COLUMNS) => Ok(FrameShape::SinglePanel),
            (DISPLAY_ROWS, PANEL_COLUMNS) => Ok(FrameShape::DualPanel),
            _ => Err(Error::Shape { rows, columns }),
        }
    }
}

/// Which half of a dual-panel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHalf {
    /// Rows 0-6.
    Top,
    /// Rows 7-13.
    Bottom,
}

/// Row-major buffer of dots, 1 = visible side flipped up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    shape: FrameShape,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a blank buffer.
    pub fn new(shape: FrameShape) -> Self {
        Self {
            shape,
            data: vec![0; shape.rows() * shape.columns()],
        }
    }

    /// Creates a blank 7x28 buffer.
    pub fn single_panel() -> Self {
        Self::new(FrameShape::SinglePanel)
    }

    /// Creates a blank 14x28 buffer.
    pub fn dual_panel() -> Self {
        Self::new(FrameShape::DualPanel)
    }

    /// Builds a buffer from rows of 0/1 values.
    ///
    /// The shape is checked before any value, so an 8x28 buffer full of 2s
    /// reports a shape error.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != columns) {
            return Err(Error::Shape {
                rows: rows.len(),
                columns: bad.as_ref().len(),
            });
        }
        let shape = FrameShape::from_dimensions(rows.len(), columns)?;

        let mut data = Vec::with_capacity(shape.rows() * shape.columns());
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.as_ref().iter().enumerate() {
                if value > 1 {
                    return Err(Error::ValueDomain { row, col, value });
                }
                data.push(value);
            }
        }

        Ok(Self { shape, data })
    }

    /// Returns the buffer shape.
    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    /// Returns the number of columns.
    pub fn columns(&self) -> usize {
        self.shape.columns()
    }

    /// Returns the raw row-major values.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Gets a dot.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < self.rows() && col < self.columns() {
            Some(self.data[row * self.columns() + col] == 1)
        } else {
            None
        }
    }

    /// Sets a dot. Coordinates outside the buffer are ignored.
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        if row < self.rows() && col < self.columns() {
            let idx = row * self.columns() + col;
            self.data[idx] = on as u8;
        }
    }

    /// Sets every dot.
    pub fn fill(&mut self, on: bool) {
        self.data.fill(on as u8);
    }

    /// Flips every dot.
    pub fn invert(&mut self) {
        for value in &mut self.data {
            *value ^= 1;
        }
    }

    /// Returns true when no dot is set.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Counts the dots that are set.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Copies a rectangular 0/1 pattern into the buffer at `(row, col)`.
    ///
    /// The whole pattern must fit; nothing is copied otherwise.
    pub fn blit<R: AsRef<[u8]>>(&mut self, pattern: &[R], row: usize, col: usize) -> Result<()> {
        let rows = pattern.len();
        let columns = pattern.first().map_or(0, |r| r.as_ref().len());

        if row + rows > self.rows()
            || col + columns > self.columns()
            || pattern.iter().any(|r| r.as_ref().len() != columns)
        {
            return Err(Error::BlitOutOfBounds {
                row,
                col,
                rows,
                columns,
            });
        }

        for (dy, line) in pattern.iter().enumerate() {
            for (dx, &value) in line.as_ref().iter().enumerate() {
                if value > 1 {
                    return Err(Error::ValueDomain {
                        row: dy,
                        col: dx,
                        value,
                    });
                }
            }
        }

        for (dy, line) in pattern.iter().enumerate() {
            let start = (row + dy) * self.columns() + col;
            self.data[start..start + columns].copy_from_slice(line.as_ref());
        }
        Ok(())
    }

    /// Extracts one panel from a dual-panel buffer.
    pub fn panel(&self, half: PanelHalf) -> Result<PixelBuffer> {
        if self.shape != FrameShape::DualPanel {
            return Err(Error::Shape {
                rows: self.rows(),
                columns: self.columns(),
            });
        }

        let panel_len = PANEL_ROWS * PANEL_COLUMNS;
        let start = match half {
            PanelHalf::Top => 0,
            PanelHalf::Bottom => panel_len,
        };
        Ok(PixelBuffer {
            shape: FrameShape::SinglePanel,
            data: self.data[start..start + panel_len].to_vec(),
        })
    }

    /// Returns the dots of one column of a single-panel buffer, top first.
    ///
    /// `None` for a dual-panel buffer or a column past the edge.
    pub fn column(&self, col: usize) -> Option<[u8; PANEL_ROWS]> {
        if self.shape != FrameShape::SinglePanel || col >= self.columns() {
            return None;
        }
        let mut dots = [0u8; PANEL_ROWS];
        for (row, dot) in dots.iter_mut().enumerate() {
            *dot = self.data[row * self.columns() + col];
        }
        Some(dots)
    }
}

impl FromStr for PixelBuffer {
    type Err = Error;

    /// Parses one line per row: `1`/`#` for a set dot, `0`/`.` for a clear one.
    /// Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let mut row = Vec::with_capacity(line.len());
            for c in line.chars() {
                match c {
                    '0' | '.' => row.push(0),
                    '1' | '#' => row.push(1),
                    // Digits are values, just not binary ones.
                    d if d.is_ascii_digit() => row.push(d as u8 - b'0'),
                    other => return Err(Error::InvalidPixel(other)),
                }
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

impl std::fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.data.chunks(self.columns()) {
            for &value in row {
                write!(f, "{}", if value == 1 { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
