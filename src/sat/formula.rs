//! CNF formulas and the DIMACS text format

use super::constraints::Clause;
use crate::error::SudokuSatError;
use std::fmt;
use std::io::{self, Write};

/// A conjunction of clauses with its declared variable count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub variable_count: usize,
    pub clauses: Vec<Clause>,
}

impl Formula {
    /// Create a formula from clauses
    pub fn new(variable_count: usize, clauses: Vec<Clause>) -> Self {
        Self {
            variable_count,
            clauses,
        }
    }

    /// Number of clauses, as declared in the header
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Largest variable magnitude actually referenced
    pub fn max_variable(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals.iter())
            .map(|literal| literal.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Whether every clause holds under a positional assignment
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(assignment))
    }

    /// Write the formula as DIMACS text
    pub fn write_dimacs<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "p cnf {} {}", self.variable_count, self.clause_count())?;
        for clause in &self.clauses {
            writeln!(writer, "{}", clause)?;
        }
        Ok(())
    }

    /// Render the formula as DIMACS text
    pub fn to_dimacs(&self) -> String {
        self.to_string()
    }

    /// Parse DIMACS text. Comment lines start with `c`; literals may span lines
    /// and every clause must be terminated by `0`.
    pub fn parse_dimacs(content: &str) -> Result<Self, SudokuSatError> {
        let malformed = |line: usize, reason: String| SudokuSatError::MalformedFormula { line, reason };

        let mut header: Option<(usize, usize)> = None;
        let mut clauses = Vec::new();
        let mut current = Vec::new();
        let mut last_line = 0;

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            last_line = line_number;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('c') {
                continue;
            }

            // SATLIB end marker
            if trimmed.starts_with('%') {
                break;
            }

            if trimmed.starts_with('p') {
                if header.is_some() {
                    return Err(malformed(line_number, "duplicate problem line".to_string()));
                }
                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if parts.len() != 4 || parts[0] != "p" || parts[1] != "cnf" {
                    return Err(malformed(line_number, format!("expected 'p cnf <vars> <clauses>', got '{}'", trimmed)));
                }
                let variables = parts[2]
                    .parse::<usize>()
                    .map_err(|e| malformed(line_number, format!("bad variable count '{}': {}", parts[2], e)))?;
                let declared = parts[3]
                    .parse::<usize>()
                    .map_err(|e| malformed(line_number, format!("bad clause count '{}': {}", parts[3], e)))?;
                header = Some((variables, declared));
                continue;
            }

            let Some((variables, _)) = header else {
                return Err(malformed(line_number, "clause before problem line".to_string()));
            };

            for word in trimmed.split_whitespace() {
                let literal = word
                    .parse::<i32>()
                    .map_err(|e| malformed(line_number, format!("bad literal '{}': {}", word, e)))?;
                if literal == 0 {
                    if current.is_empty() {
                        return Err(malformed(line_number, "empty clause".to_string()));
                    }
                    clauses.push(Clause::new(std::mem::take(&mut current)));
                } else if literal.unsigned_abs() as usize > variables {
                    return Err(malformed(
                        line_number,
                        format!("literal {} exceeds declared variable count {}", literal, variables),
                    ));
                } else {
                    current.push(literal);
                }
            }
        }

        let Some((variable_count, declared)) = header else {
            return Err(malformed(last_line, "missing problem line".to_string()));
        };
        if !current.is_empty() {
            return Err(malformed(last_line, "last clause is not terminated by 0".to_string()));
        }
        if clauses.len() != declared {
            return Err(malformed(
                last_line,
                format!("header declares {} clauses, found {}", declared, clauses.len()),
            ));
        }

        Ok(Self::new(variable_count, clauses))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.variable_count, self.clause_count())?;
        for clause in &self.clauses {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_dimacs() {
        let formula = Formula::new(3, vec![Clause::new(vec![1, -2]), Clause::unit(3)]);
        assert_eq!(formula.to_dimacs(), "p cnf 3 2\n1 -2 0\n3 0\n");

        let mut buffer = Vec::new();
        formula.write_dimacs(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), formula.to_dimacs());
    }

    #[test]
    fn test_parse_basic() {
        let formula = Formula::parse_dimacs("c whatever\np cnf 2 2\n1 2 0\n1 -2 0").unwrap();
        assert_eq!(formula.variable_count, 2);
        assert_eq!(formula.clauses, vec![Clause::new(vec![1, 2]), Clause::new(vec![1, -2])]);
    }

    #[test]
    fn test_parse_split_clause() {
        let formula = Formula::parse_dimacs("p cnf 1 1\n1 1\n-1 -1 0").unwrap();
        assert_eq!(formula.clauses, vec![Clause::new(vec![1, 1, -1, -1])]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Formula::parse_dimacs("1 2 0"),
            Err(SudokuSatError::MalformedFormula { line: 1, .. })
        ));
        assert!(Formula::parse_dimacs("p cnf 2 1\n1 3 0").is_err());
        assert!(Formula::parse_dimacs("p cnf 2 2\n1 2 0").is_err());
        assert!(Formula::parse_dimacs("p cnf 2 1\n1 2").is_err());
        assert!(Formula::parse_dimacs("p cnf 2 1\n0").is_err());
        assert!(Formula::parse_dimacs("c only comments\n").is_err());
    }

    #[test]
    fn test_satisfaction() {
        let formula = Formula::new(2, vec![Clause::new(vec![1, 2]), Clause::new(vec![-1, 2])]);
        assert!(formula.is_satisfied_by(&[false, true]));
        assert!(!formula.is_satisfied_by(&[true, false]));
        assert_eq!(formula.max_variable(), 2);
    }
}
