use crate::expression::Variable;
use crate::model::Model;
use crate::tableau::Tableau;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
}

/// The result of solving a [`Model`]
///
/// Carries an assignment only when the model is both feasible and bounded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    model: Model,
    /// Values of every tableau column, original variables first
    assignment: Option<Vec<f64>>,
    pub is_feasible: bool,
    pub is_bounded: bool,
    /// First basic solution of phase 2 (last phase-1 tableau when infeasible)
    initial_tableau: Tableau,
    /// Tableau at termination
    tableau: Tableau,
}

impl Solution {
    pub fn with_assignment(
        model: Model,
        assignment: Vec<f64>,
        initial_tableau: Tableau,
        tableau: Tableau,
    ) -> Self {
        Self {
            model,
            assignment: Some(assignment),
            is_feasible: true,
            is_bounded: true,
            initial_tableau,
            tableau,
        }
    }

    pub fn infeasible(model: Model, initial_tableau: Tableau, tableau: Tableau) -> Self {
        Self {
            model,
            assignment: None,
            is_feasible: false,
            is_bounded: true,
            initial_tableau,
            tableau,
        }
    }

    pub fn unbounded(model: Model, initial_tableau: Tableau, tableau: Tableau) -> Self {
        Self {
            model,
            assignment: None,
            is_feasible: true,
            is_bounded: false,
            initial_tableau,
            tableau,
        }
    }

    pub fn status(&self) -> SolutionStatus {
        match (self.is_feasible, self.is_bounded) {
            (false, _) => SolutionStatus::Infeasible,
            (true, false) => SolutionStatus::Unbounded,
            (true, true) => SolutionStatus::Optimal,
        }
    }

    /// The model this solution was computed for
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn has_assignment(&self) -> bool {
        self.assignment.is_some()
    }

    /// Values of the model's variables, in `model.variables()` order
    pub fn assignment(&self) -> Option<&[f64]> {
        let n = self.model.variables().len();
        self.assignment.as_deref().map(|values| &values[..n.min(values.len())])
    }

    pub fn value(&self, variable: &Variable) -> Option<f64> {
        self.assignment()?.get(variable.index).copied()
    }

    /// Value of the model's own objective (in its own direction)
    pub fn objective_value(&self) -> Option<f64> {
        let assignment = self.assignment()?;
        self.model.objective().map(|objective| objective.evaluate(assignment))
    }

    pub fn initial_tableau(&self) -> &Tableau {
        &self.initial_tableau
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }
}
