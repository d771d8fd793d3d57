mod augment;
mod constraint;
mod encoder;
mod expression;
mod model;
mod objective;
mod presolve;
mod simplex;
mod solution;
mod tableau;

pub use augment::{augment, AugmentedModel};
pub use constraint::{Constraint, ConstraintOp};
pub use encoder::ProblemEncoder;
pub use expression::{Expression, Term, Variable};
pub use model::{Model, ModelError};
pub use objective::{Direction, Objective};
pub use presolve::PhaseOne;
pub use simplex::{SolveError, Solver};
pub use solution::{Solution, SolutionStatus};
pub use tableau::Tableau;

/// Tolerance for every floating point comparison made by the solver
pub const EPSILON: f64 = 1e-9;

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_solution_serializes() {
        let mut model = Model::new("serde");
        let x = model.create_variable("x").unwrap();
        model.add_constraint(Expression::from(&x).le(2.5)).unwrap();
        model.maximize(Expression::from(&x)).unwrap();
        let solution = model.solve().unwrap();

        let json = serde_json::to_value(&solution).unwrap();
        assert_eq!(json["is_feasible"], true);
        assert_eq!(json["assignment"][0], 2.5);
        assert_eq!(json["model"]["name"], "serde");

        let back: Solution = serde_json::from_value(json).unwrap();
        assert_eq!(back.objective_value(), Some(2.5));
    }
}
