//! File I/O for puzzles and satisfying assignments

use super::Grid;
use crate::error::SudokuSatError;
use crate::sat::variables::{GRID_SIZE, VARIABLE_COUNT};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Parse a puzzle from nine lines of nine characters.
/// A digit 1-9 is a clue; any other character is a blank cell.
/// Lines after the ninth are ignored.
pub fn parse_puzzle(content: &str) -> Result<Grid, SudokuSatError> {
    let mut grid = Grid::empty();
    let mut lines = content.lines();

    for row in 0..GRID_SIZE {
        let line = lines.next().ok_or_else(|| SudokuSatError::MalformedInput {
            line: row + 1,
            reason: format!("expected {} lines, found {}", GRID_SIZE, row),
        })?;

        let length = line.chars().count();
        if length != GRID_SIZE {
            return Err(SudokuSatError::MalformedInput {
                line: row + 1,
                reason: format!("line has {} characters, expected {}", length, GRID_SIZE),
            });
        }

        for (col, ch) in line.chars().enumerate() {
            grid.cells[row][col] = match ch {
                '1'..='9' => ch as u8 - b'0',
                _ => 0,
            };
        }
    }

    Ok(grid)
}

/// Read a puzzle from any reader (typically stdin)
pub fn read_puzzle<R: Read>(reader: &mut R) -> Result<Grid> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Failed to read puzzle input")?;
    Ok(parse_puzzle(&content)?)
}

/// Load a puzzle from a text file
pub fn load_puzzle_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.as_ref().display()))?;

    parse_puzzle(&content)
        .with_context(|| format!("Failed to parse puzzle from file: {}", path.as_ref().display()))
}

/// Parse a JSON array of booleans; position `i` is the value of variable `i + 1`
pub fn parse_assignment(json: &str) -> Result<Vec<bool>> {
    let assignment: Vec<bool> =
        serde_json::from_str(json).context("Assignment must be a JSON array of booleans")?;
    Ok(assignment)
}

/// Parse a solver model in DIMACS style into a positional assignment.
///
/// Accepts `v`-prefixed value lines as well as a bare literal list after a
/// `SAT` line. Comment (`c`) and status (`s`) lines are skipped. Variables
/// absent from the model are false; literals past `variable_count` are an error.
pub fn parse_model(content: &str, variable_count: usize) -> Result<Vec<bool>, SudokuSatError> {
    let mut assignment = vec![false; variable_count];

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('c')
            || trimmed.starts_with('s')
            || trimmed == "SAT"
        {
            continue;
        }
        if trimmed == "UNSAT" || trimmed == "UNSATISFIABLE" {
            return Err(SudokuSatError::MalformedFormula {
                line: index + 1,
                reason: "model reports the formula as unsatisfiable".to_string(),
            });
        }

        let values = trimmed.strip_prefix('v').unwrap_or(trimmed);
        for word in values.split_whitespace() {
            let literal = word.parse::<i64>().map_err(|e| SudokuSatError::MalformedFormula {
                line: index + 1,
                reason: format!("bad literal '{}': {}", word, e),
            })?;
            if literal == 0 {
                continue;
            }
            let variable = literal.unsigned_abs() as usize;
            if variable > variable_count {
                return Err(SudokuSatError::MalformedFormula {
                    line: index + 1,
                    reason: format!("variable {} exceeds {}", variable, variable_count),
                });
            }
            assignment[variable - 1] = literal > 0;
        }
    }

    Ok(assignment)
}

/// Read an assignment from a file, either JSON or a solver model
pub fn load_assignment_from_file<P: AsRef<Path>>(path: P, model: bool) -> Result<Vec<bool>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read assignment file: {}", path.as_ref().display()))?;
    parse_assignment_content(&content, model)
        .with_context(|| format!("Failed to parse assignment from file: {}", path.as_ref().display()))
}

/// Parse assignment text in either supported format
pub fn parse_assignment_content(content: &str, model: bool) -> Result<Vec<bool>> {
    if model {
        Ok(parse_model(content, VARIABLE_COUNT)?)
    } else {
        parse_assignment(content)
    }
}

/// Convert a grid to the puzzle text format ('.' for blanks)
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(GRID_SIZE * (GRID_SIZE + 1));

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let value = grid.get(row, col);
            result.push(if value == 0 { '.' } else { (b'0' + value) as char });
        }
        result.push('\n');
    }

    result
}

/// Save a grid to a text file in the puzzle format
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = grid_to_string(grid);

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create example puzzle files
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let classic = "53..7....\n6..195...\n.98....6.\n8...6...3\n4..8.3..1\n7...2...6\n.6....28.\n...419..5\n....8..79\n";
    std::fs::write(dir.join("classic.txt"), classic).context("Failed to write classic.txt")?;

    let blank = ".........\n".repeat(GRID_SIZE);
    std::fs::write(dir.join("blank.txt"), blank).context("Failed to write blank.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CLASSIC: &str = "53..7....\n6..195...\n.98....6.\n8...6...3\n4..8.3..1\n7...2...6\n.6....28.\n...419..5\n....8..79\n";

    #[test]
    fn test_parse_puzzle() {
        let grid = parse_puzzle(CLASSIC).unwrap();
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(0, 2), 0);
        assert_eq!(grid.get(8, 8), 9);
        assert_eq!(grid.clue_count(), 30);
    }

    #[test]
    fn test_any_non_digit_is_blank() {
        let content = "0x -?.___\n".repeat(9);
        let grid = parse_puzzle(&content).unwrap();
        assert_eq!(grid.clue_count(), 0);
    }

    #[test]
    fn test_malformed_puzzle() {
        let short_line = CLASSIC.replacen("53..7....", "53..7...", 1);
        assert!(matches!(
            parse_puzzle(&short_line),
            Err(SudokuSatError::MalformedInput { line: 1, .. })
        ));

        let missing_lines = "123456789\n".repeat(4);
        assert!(matches!(
            parse_puzzle(&missing_lines),
            Err(SudokuSatError::MalformedInput { line: 5, .. })
        ));
    }

    #[test]
    fn test_grid_to_string_round_trip() {
        let grid = parse_puzzle(CLASSIC).unwrap();
        assert_eq!(grid_to_string(&grid), CLASSIC);
    }

    #[test]
    fn test_parse_assignment() {
        let assignment = parse_assignment("[true, false, true]").unwrap();
        assert_eq!(assignment, vec![true, false, true]);
        assert!(parse_assignment("[1, 0]").is_err());
        assert!(parse_assignment("{}").is_err());
    }

    #[test]
    fn test_parse_model() {
        let model = "c comment\ns SATISFIABLE\nv 1 -2 3\nv -4 0\n";
        assert_eq!(parse_model(model, 5).unwrap(), vec![true, false, true, false, false]);

        let minisat = "SAT\n-1 2 0\n";
        assert_eq!(parse_model(minisat, 2).unwrap(), vec![false, true]);

        assert!(parse_model("v 7 0", 3).is_err());
        assert!(parse_model("UNSAT\n", 3).is_err());
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();

        let classic = load_puzzle_from_file(temp_dir.path().join("classic.txt")).unwrap();
        assert_eq!(classic.clue_count(), 30);
        let blank = load_puzzle_from_file(temp_dir.path().join("blank.txt")).unwrap();
        assert_eq!(blank.clue_count(), 0);

        let saved = temp_dir.path().join("nested/saved.txt");
        save_grid_to_file(&classic, &saved).unwrap();
        assert_eq!(load_puzzle_from_file(&saved).unwrap(), classic);
    }
}
