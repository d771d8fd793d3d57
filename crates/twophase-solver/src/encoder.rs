use crate::model::{Model, ModelError};
use crate::simplex::{SolveError, Solver};
use crate::solution::Solution;

/// A domain problem that can be expressed as a linear program
///
/// Implementors only build the model; solving and reading the solution back
/// stay with the caller.
pub trait ProblemEncoder {
    fn to_model(&self) -> Result<Model, ModelError>;

    fn solve_with(&self, solver: &Solver) -> Result<Solution, SolveError> {
        let model = self.to_model()?;
        solver.solve(&model)
    }
}
