use std::fmt;

use crate::expression::Expression;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Min => f.write_str("min"),
            Direction::Max => f.write_str("max"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expression: Expression,
    pub direction: Direction,
}

impl Objective {
    pub fn new(expression: Expression, direction: Direction) -> Self {
        Self { expression, direction }
    }

    /// `min f` becomes `max -f` and vice versa; the optimal point is unchanged
    pub fn invert(&mut self) {
        self.expression = self.expression.negated();
        self.direction = match self.direction {
            Direction::Min => Direction::Max,
            Direction::Max => Direction::Min,
        };
    }

    pub fn evaluate(&self, assignment: &[f64]) -> f64 {
        self.expression.evaluate(assignment)
    }
}
