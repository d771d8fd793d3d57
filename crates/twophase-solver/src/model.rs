use thiserror::Error;

use crate::constraint::Constraint;
use crate::expression::{Expression, Variable};
use crate::objective::{Direction, Objective};
use crate::simplex::{SolveError, Solver};
use crate::solution::Solution;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Cannot create variable named {0}. There is already a variable with the same name.")]
    DuplicateVariableName(String),
    #[error("Expression refers to variable #{index}, but the model only has {count} variables")]
    UnknownVariable { index: usize, count: usize },
    #[error("Cannot solve model without any variables.")]
    EmptyModel,
    #[error("Cannot solve model missing an objective.")]
    MissingObjective,
}

/// A linear program: variables (all implicitly `>= 0`), constraints and an objective
///
/// Variables and constraints are append-only, so their indices always equal
/// their list positions.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_variable(&mut self, name: impl Into<String>) -> Result<Variable, ModelError> {
        let name = name.into();
        if self.variable(&name).is_some() {
            return Err(ModelError::DuplicateVariableName(name));
        }
        Ok(self.push_variable(name))
    }

    /// Appends a solver-owned variable named `{prefix}{constraint}`, adding
    /// primes when a user variable already holds that name
    pub(crate) fn create_auxiliary_variable(
        &mut self,
        prefix: &str,
        constraint: usize,
    ) -> Variable {
        let mut name = format!("{}{}", prefix, constraint);
        while self.variable(&name).is_some() {
            name.push('\'');
        }
        self.push_variable(name)
    }

    fn push_variable(&mut self, name: String) -> Variable {
        let variable = Variable {
            name,
            index: self.variables.len(),
        };
        self.variables.push(variable.clone());
        variable
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Adds a constraint and returns its index
    pub fn add_constraint(&mut self, mut constraint: Constraint) -> Result<usize, ModelError> {
        self.check_expression(&constraint.expression)?;
        constraint.index = self.constraints.len();
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn constraints_mut(&mut self) -> &mut [Constraint] {
        &mut self.constraints
    }

    pub fn maximize(&mut self, expression: Expression) -> Result<(), ModelError> {
        self.set_objective(Objective::new(expression, Direction::Max))
    }

    pub fn minimize(&mut self, expression: Expression) -> Result<(), ModelError> {
        self.set_objective(Objective::new(expression, Direction::Min))
    }

    /// Replaces the objective
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        self.check_expression(&objective.expression)?;
        self.objective = Some(objective);
        Ok(())
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub(crate) fn objective_mut(&mut self) -> Option<&mut Objective> {
        self.objective.as_mut()
    }

    /// Simplifies every constraint expression and the objective
    pub fn simplify(&mut self) {
        for constraint in &mut self.constraints {
            constraint.expression.simplify();
        }
        if let Some(objective) = &mut self.objective {
            objective.expression.simplify();
        }
    }

    /// Structural checks performed before solving
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.variables.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if self.objective.is_none() {
            return Err(ModelError::MissingObjective);
        }
        Ok(())
    }

    /// Solves the model with a default [`Solver`]
    pub fn solve(&self) -> Result<Solution, SolveError> {
        Solver::new().solve(self)
    }

    fn check_expression(&self, expression: &Expression) -> Result<(), ModelError> {
        match expression.max_variable() {
            Some(index) if index >= self.variables.len() => Err(ModelError::UnknownVariable {
                index,
                count: self.variables.len(),
            }),
            _ => Ok(()),
        }
    }
}
