use crate::constraint::{Constraint, ConstraintOp};
use crate::EPSILON;

/// A decision variable owned by a [`crate::Model`]
///
/// Identity is the `index`, which equals the variable's position in the
/// model's variable list. The name is only used for display and lookup.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub index: usize,
}

/// A single `coefficient * variable` entry of an expression
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub variable: usize,
    pub coefficient: f64,
}

/// A linear combination of model variables (the constant part is always zero)
///
/// Terms may repeat a variable until the expression is simplified; every
/// query sums repeated entries, so an unsimplified expression still means
/// the same thing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    /// `coefficient * variable`
    pub fn term(variable: &Variable, coefficient: f64) -> Self {
        Self {
            terms: vec![Term {
                variable: variable.index,
                coefficient,
            }],
        }
    }

    /// Pairs variables with coefficients, e.g. `[x, y], [3, 2]` -> `3x + 2y`
    ///
    /// Extra entries in the longer slice are ignored.
    pub fn from_vectors(variables: &[Variable], coefficients: &[f64]) -> Self {
        Self {
            terms: variables
                .iter()
                .zip(coefficients)
                .map(|(v, &c)| Term {
                    variable: v.index,
                    coefficient: c,
                })
                .collect(),
        }
    }

    /// Builder form of [`Expression::add_term`]
    pub fn with_term(mut self, variable: &Variable, coefficient: f64) -> Self {
        self.add_term(variable.index, coefficient);
        self
    }

    /// Accumulates `coefficient` onto the variable with the given index in place
    pub fn add_term(&mut self, variable: usize, coefficient: f64) {
        self.terms.push(Term {
            variable,
            coefficient,
        });
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn plus(&self, other: &Expression) -> Expression {
        let mut terms = self.terms.clone();
        terms.extend_from_slice(&other.terms);
        Expression { terms }
    }

    pub fn minus(&self, other: &Expression) -> Expression {
        self.plus(&other.negated())
    }

    pub fn scale(&self, factor: f64) -> Expression {
        Expression {
            terms: self
                .terms
                .iter()
                .map(|t| Term {
                    variable: t.variable,
                    coefficient: t.coefficient * factor,
                })
                .collect(),
        }
    }

    pub fn negated(&self) -> Expression {
        self.scale(-1.0)
    }

    /// Coalesces repeated variables, drops zero coefficients and orders the
    /// terms by variable index
    pub fn simplify(&mut self) {
        let mut merged: Vec<Term> = Vec::with_capacity(self.terms.len());
        let mut sorted = std::mem::take(&mut self.terms);
        sorted.sort_by_key(|t| t.variable);

        for term in sorted {
            match merged.last_mut() {
                Some(last) if last.variable == term.variable => {
                    last.coefficient += term.coefficient
                }
                _ => merged.push(term),
            }
        }

        merged.retain(|t| t.coefficient != 0.0);
        self.terms = merged;
    }

    pub fn simplified(&self) -> Expression {
        let mut copy = self.clone();
        copy.simplify();
        copy
    }

    /// Total coefficient of `variable` (0 when absent)
    pub fn coefficient(&self, variable: &Variable) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.variable == variable.index)
            .map(|t| t.coefficient)
            .sum()
    }

    /// Dense coefficient vector over the first `width` variable indices
    pub fn coefficients(&self, width: usize) -> Vec<f64> {
        let mut dense = vec![0.0; width];
        for term in &self.terms {
            if let Some(slot) = dense.get_mut(term.variable) {
                *slot += term.coefficient;
            }
        }
        dense
    }

    /// Value of the expression under `assignment`, indexed like the model's
    /// variables. Variables past the end of the assignment count as 0.
    pub fn evaluate(&self, assignment: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * assignment.get(t.variable).copied().unwrap_or(0.0))
            .sum()
    }

    /// Largest variable index referenced, if any
    pub fn max_variable(&self) -> Option<usize> {
        self.terms.iter().map(|t| t.variable).max()
    }

    /// Whether both expressions describe the same linear combination
    pub fn is_equivalent(&self, other: &Expression) -> bool {
        let width = match (self.max_variable(), other.max_variable()) {
            (None, None) => return true,
            (a, b) => a.max(b).map_or(0, |m| m + 1),
        };
        self.coefficients(width)
            .iter()
            .zip(other.coefficients(width))
            .all(|(a, b)| (a - b).abs() <= EPSILON)
    }

    pub fn le(self, bound: f64) -> Constraint {
        Constraint::new(self, ConstraintOp::Le, bound)
    }

    pub fn ge(self, bound: f64) -> Constraint {
        Constraint::new(self, ConstraintOp::Ge, bound)
    }

    pub fn equals(self, bound: f64) -> Constraint {
        Constraint::new(self, ConstraintOp::Eq, bound)
    }
}

impl From<&Variable> for Expression {
    fn from(variable: &Variable) -> Self {
        Expression::term(variable, 1.0)
    }
}
