use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row-major grid of iteration counts, owned by the coordinator. Each row is
/// written exactly once over a run, either in one gathered block (static
/// mode) or one row at a time as results arrive (dynamic mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub data: Vec<i32>,
    pub width: usize,
    pub height: usize,
}

impl Image {
    /// Create a zeroed image with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Image {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    /// Create an image from a row-major buffer.
    pub fn from_vec(data: Vec<i32>, width: usize, height: usize) -> Result<Self, String> {
        if data.len() != width * height {
            return Err(format!(
                "Data length {} does not match dimensions {}x{}",
                data.len(),
                width,
                height
            ));
        }
        Ok(Image {
            data,
            width,
            height,
        })
    }

    /// Get a value at a specific position.
    pub fn get(&self, row: usize, col: usize) -> Result<i32, String> {
        if row >= self.height || col >= self.width {
            return Err(format!(
                "Index out of bounds: ({}, {}) for image {}x{}",
                row, col, self.width, self.height
            ));
        }
        Ok(self.data[row * self.width + col])
    }

    /// Get a row as a slice.
    pub fn row(&self, row: usize) -> Result<&[i32], String> {
        if row >= self.height {
            return Err(format!(
                "Row index {} out of bounds for {} rows",
                row, self.height
            ));
        }
        let start = row * self.width;
        Ok(&self.data[start..start + self.width])
    }

    /// Write one complete row. Out-of-range indices and short payloads are
    /// rejected rather than clobbering neighbouring rows.
    pub fn set_row(&mut self, row: usize, payload: &[i32]) -> Result<(), String> {
        if row >= self.height {
            return Err(format!(
                "Row index {} out of bounds for {} rows",
                row, self.height
            ));
        }
        if payload.len() != self.width {
            return Err(format!(
                "Row payload length {} does not match width {}",
                payload.len(),
                self.width
            ));
        }
        let start = row * self.width;
        self.data[start..start + self.width].copy_from_slice(payload);
        Ok(())
    }

    /// Save the image as an ASCII PGM (P2) grayscale raster.
    /// Format: `P2`, `<width> <height>`, `<max_value>`, then one line of
    /// space-terminated values per row.
    pub fn save_pgm<P: AsRef<Path>>(&self, path: P, max_value: i32) -> Result<(), String> {
        let file = File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "P2").map_err(|e| format!("Failed to write header: {}", e))?;
        writeln!(writer, "{} {}", self.width, self.height)
            .map_err(|e| format!("Failed to write header: {}", e))?;
        writeln!(writer, "{}", max_value).map_err(|e| format!("Failed to write header: {}", e))?;

        for row in 0..self.height {
            let start = row * self.width;
            for &value in &self.data[start..start + self.width] {
                write!(writer, "{} ", value).map_err(|e| format!("Failed to write: {}", e))?;
            }
            writeln!(writer).map_err(|e| format!("Failed to write newline: {}", e))?;
        }

        writer
            .flush()
            .map_err(|e| format!("Failed to flush file: {}", e))?;

        Ok(())
    }
}
