//! Variable numbering for the SAT encoding
//!
//! Every (row, column, value) triple gets its own boolean variable. Triples are
//! flattened row-major, value-minor: `id = ((row * 9 + col) * 9 + value) + 1`.

/// Side length of the grid
pub const GRID_SIZE: usize = 9;

/// Side length of a box
pub const BOX_SIZE: usize = 3;

/// Number of variables in the encoding (9 * 9 * 9)
pub const VARIABLE_COUNT: usize = GRID_SIZE * GRID_SIZE * GRID_SIZE;

/// Bijection between (row, col, value) triples and variable ids in `1..=729`
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableEncoder;

impl VariableEncoder {
    /// Variable id for `value` (0-based) at `(row, col)`
    #[inline]
    pub fn encode(row: usize, col: usize, value: usize) -> i32 {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE && value < GRID_SIZE);
        (((row * GRID_SIZE + col) * GRID_SIZE + value) + 1) as i32
    }

    /// Inverse of [`VariableEncoder::encode`]; `None` outside `1..=729`
    #[inline]
    pub fn decode(id: i32) -> Option<(usize, usize, usize)> {
        if id < 1 || id as usize > VARIABLE_COUNT {
            return None;
        }
        let index = id as usize - 1;
        let value = index % GRID_SIZE;
        let col = (index / GRID_SIZE) % GRID_SIZE;
        let row = index / (GRID_SIZE * GRID_SIZE);
        Some((row, col, value))
    }

    /// The nine value variables of a single cell
    pub fn cell_variables(row: usize, col: usize) -> Vec<i32> {
        (0..GRID_SIZE).map(|value| Self::encode(row, col, value)).collect()
    }

    /// Variables placing `value` somewhere in `row`
    pub fn row_variables(row: usize, value: usize) -> Vec<i32> {
        (0..GRID_SIZE).map(|col| Self::encode(row, col, value)).collect()
    }

    /// Variables placing `value` somewhere in `col`
    pub fn column_variables(col: usize, value: usize) -> Vec<i32> {
        (0..GRID_SIZE).map(|row| Self::encode(row, col, value)).collect()
    }

    /// Variables placing `value` somewhere in box `box_index` (boxes numbered row-major)
    pub fn box_variables(box_index: usize, value: usize) -> Vec<i32> {
        let top = (box_index / BOX_SIZE) * BOX_SIZE;
        let left = (box_index % BOX_SIZE) * BOX_SIZE;
        let mut variables = Vec::with_capacity(GRID_SIZE);
        for row in top..top + BOX_SIZE {
            for col in left..left + BOX_SIZE {
                variables.push(Self::encode(row, col, value));
            }
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_encode_bounds() {
        assert_eq!(VariableEncoder::encode(0, 0, 0), 1);
        assert_eq!(VariableEncoder::encode(0, 0, 8), 9);
        assert_eq!(VariableEncoder::encode(0, 1, 0), 10);
        assert_eq!(VariableEncoder::encode(8, 8, 8), 729);
    }

    #[test]
    fn test_bijection() {
        let mut seen = HashSet::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                for value in 0..GRID_SIZE {
                    let id = VariableEncoder::encode(row, col, value);
                    assert!((1..=VARIABLE_COUNT as i32).contains(&id));
                    assert_eq!(VariableEncoder::decode(id), Some((row, col, value)));
                    seen.insert(id);
                }
            }
        }
        assert_eq!(seen.len(), VARIABLE_COUNT);
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(VariableEncoder::decode(0), None);
        assert_eq!(VariableEncoder::decode(-5), None);
        assert_eq!(VariableEncoder::decode(730), None);
    }

    #[test]
    fn test_box_variables() {
        let vars = VariableEncoder::box_variables(4, 2);
        assert_eq!(vars.len(), 9);
        for id in vars {
            let (row, col, value) = VariableEncoder::decode(id).unwrap();
            assert!((3..6).contains(&row));
            assert!((3..6).contains(&col));
            assert_eq!(value, 2);
        }
    }
}
