use log::{debug, trace};
use thiserror::Error;

use crate::augment::{augment, AugmentedModel};
use crate::model::{Model, ModelError};
use crate::presolve::PhaseOne;
use crate::solution::Solution;
use crate::tableau::Tableau;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Simplex did not terminate within {limit} pivots")]
    IterationLimit { limit: usize },
}

/// Two-phase tableau simplex solver
///
/// Entering columns follow Dantzig's rule (most negative reduced cost,
/// lowest column on ties), leaving rows the minimum-ratio test (lowest row
/// on ties). Nothing guards against cycling on degenerate problems unless an
/// iteration limit is set.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    /// Maximum pivots per phase; unlimited when `None`
    max_iterations: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimplexResult {
    Optimal,
    Unbounded,
}

enum PhaseOneResult {
    /// Feasible phase-2 starting tableau
    Feasible(Tableau),
    /// Final phase-1 tableau, with a positive artificial variable
    Infeasible(Tableau),
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Solve the model using the two-phase simplex method
    ///
    /// The model itself is never modified.
    pub fn solve(&self, model: &Model) -> Result<Solution, SolveError> {
        model.validate()?;

        let augmented = augment(model);
        debug!(
            "Augmented '{}': {} variables, {} constraints ({} slack, {} surplus)",
            model.name(),
            augmented.model.variables().len(),
            augmented.model.constraints().len(),
            augmented.slacks.len(),
            augmented.surpluses.len()
        );

        let mut tableau = if augmented.needs_presolve() {
            match self.presolve(&augmented)? {
                PhaseOneResult::Feasible(tableau) => tableau,
                PhaseOneResult::Infeasible(last) => {
                    debug!("'{}' is infeasible", model.name());
                    return Ok(Solution::infeasible(model.clone(), last.clone(), last));
                }
            }
        } else {
            Tableau::with_objective_row(augmented.objective_row(), &augmented.model)
        };

        let initial_tableau = tableau.clone();
        match self.optimize(&mut tableau)? {
            SimplexResult::Unbounded => {
                debug!("'{}' is unbounded", model.name());
                Ok(Solution::unbounded(model.clone(), initial_tableau, tableau))
            }
            SimplexResult::Optimal => {
                let assignment = tableau.extract_assignment();
                debug!("'{}' optimal with value {}", model.name(), tableau.objective_value());
                Ok(Solution::with_assignment(model.clone(), assignment, initial_tableau, tableau))
            }
        }
    }

    /// Phase 1: finds a feasible starting tableau for `augmented`, or returns
    /// the final phase-1 tableau as proof of infeasibility
    fn presolve(&self, augmented: &AugmentedModel) -> Result<PhaseOneResult, SolveError> {
        let phase_one = PhaseOne::new(augmented);
        debug!("Phase 1 with {} artificial variables", phase_one.artificials.len());

        let mut tableau = phase_one.initial_tableau();
        let result = self.optimize(&mut tableau)?;

        // the artificial sum is bounded below by 0, so an unbounded verdict
        // can only come from round-off
        if result == SimplexResult::Unbounded || phase_one.artificials_positive(&tableau) {
            return Ok(PhaseOneResult::Infeasible(tableau));
        }

        Ok(PhaseOneResult::Feasible(phase_one.restore(&tableau, augmented)))
    }

    /// Pivots until the tableau is optimal or an unbounded column shows up
    fn optimize(&self, tableau: &mut Tableau) -> Result<SimplexResult, SolveError> {
        let mut pivots = 0;

        while !tableau.is_optimal() {
            let col = tableau.choose_entering_variable();
            if tableau.is_unbounded(col) {
                debug!("Column {} is unbounded after {} pivots", col, pivots);
                return Ok(SimplexResult::Unbounded);
            }
            let Some(row) = tableau.choose_leaving_variable(col) else {
                return Ok(SimplexResult::Unbounded);
            };

            if let Some(limit) = self.max_iterations {
                if pivots >= limit {
                    return Err(SolveError::IterationLimit { limit });
                }
            }

            trace!(
                "Pivot {}: column {} (reduced cost {}) enters at row {}",
                pivots,
                col,
                tableau.get(0, col),
                row
            );
            tableau.pivot(row, col);
            pivots += 1;
        }

        debug!("Optimal after {} pivots", pivots);
        Ok(SimplexResult::Optimal)
    }
}
