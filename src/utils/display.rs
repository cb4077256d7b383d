//! Display and output formatting utilities

use crate::sat::GRID_SIZE;
use crate::sat::variables::BOX_SIZE;
use crate::sudoku::{Grid, Uniqueness};

/// Format grids for the terminal
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form, one row per line
    pub fn format_grid_compact(grid: &Grid) -> String {
        grid.to_string()
    }

    /// Format a grid with box separators and row/column numbers
    pub fn format_grid_boxed(grid: &Grid) -> String {
        let mut output = String::new();
        let separator = format!("   +{}\n", "-------+".repeat(BOX_SIZE));

        // Header with column numbers
        output.push_str("    ");
        for col in 0..GRID_SIZE {
            output.push_str(&format!("{} ", col));
            if col % BOX_SIZE == BOX_SIZE - 1 && col + 1 < GRID_SIZE {
                output.push_str("  ");
            }
        }
        output.push('\n');

        for row in 0..GRID_SIZE {
            if row % BOX_SIZE == 0 {
                output.push_str(&separator);
            }
            output.push_str(&format!("{:2} |", row));
            for col in 0..GRID_SIZE {
                let value = grid.get(row, col);
                output.push(' ');
                output.push(if value == 0 { '.' } else { (b'0' + value) as char });
                if col % BOX_SIZE == BOX_SIZE - 1 {
                    output.push_str(" |");
                }
            }
            output.push('\n');
        }
        output.push_str(&separator);

        output
    }

    /// One-line description of a uniqueness check
    pub fn format_uniqueness(uniqueness: Uniqueness) -> String {
        match uniqueness {
            Uniqueness::NoSolution => ColorOutput::error("Puzzle has no solution"),
            Uniqueness::Unique => ColorOutput::success("Puzzle has a unique solution"),
            Uniqueness::Multiple => ColorOutput::warning("Puzzle has more than one solution"),
        }
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
