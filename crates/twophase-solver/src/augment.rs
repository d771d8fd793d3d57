use std::collections::BTreeMap;

use crate::constraint::ConstraintOp;
use crate::model::Model;
use crate::objective::Direction;

/// A model rewritten into standard form: maximisation, non-negative bounds,
/// equality constraints only
#[derive(Debug, Clone)]
pub struct AugmentedModel {
    pub model: Model,
    /// Slack variable index -> index of the `<=` constraint it was added to
    pub slacks: BTreeMap<usize, usize>,
    /// Surplus variable index -> index of the `>=` constraint it was added to
    pub surpluses: BTreeMap<usize, usize>,
}

impl AugmentedModel {
    /// Whether the slack columns alone cannot form a starting basis
    pub fn needs_presolve(&self) -> bool {
        self.slacks.len() < self.model.constraints().len()
    }

    pub fn has_slack(&self, constraint: usize) -> bool {
        self.slacks.values().any(|&c| c == constraint)
    }

    /// Tableau row 0 for the model's own objective: negated coefficients and
    /// a zero objective value
    pub fn objective_row(&self) -> Vec<f64> {
        let width = self.model.variables().len();
        let mut row = match self.model.objective() {
            Some(objective) => objective.expression.negated().coefficients(width),
            None => vec![0.0; width],
        };
        row.push(0.0);
        row
    }
}

/// Rewrites a copy of `original` into standard form
///
/// Slack variables are appended for every `<=` constraint first, then
/// surplus variables for every `>=` constraint, each in constraint order.
/// Equality constraints receive neither.
pub fn augment(original: &Model) -> AugmentedModel {
    let mut model = original.clone();
    model.simplify();

    if let Some(objective) = model.objective_mut() {
        if objective.direction == Direction::Min {
            objective.invert();
        }
    }

    for constraint in model.constraints_mut() {
        if constraint.bound < 0.0 {
            constraint.invert();
        }
    }

    let slacks = add_auxiliary(&mut model, ConstraintOp::Le, 1.0);
    let surpluses = add_auxiliary(&mut model, ConstraintOp::Ge, -1.0);

    AugmentedModel {
        model,
        slacks,
        surpluses,
    }
}

/// Adds `coefficient * s_i` to every constraint of type `op` and turns it
/// into an equality
fn add_auxiliary(model: &mut Model, op: ConstraintOp, coefficient: f64) -> BTreeMap<usize, usize> {
    let mut added = BTreeMap::new();
    let targets: Vec<usize> = model
        .constraints()
        .iter()
        .filter(|c| c.op == op)
        .map(|c| c.index)
        .collect();

    for index in targets {
        let variable = model.create_auxiliary_variable("s", index);
        let constraint = &mut model.constraints_mut()[index];
        constraint.expression.add_term(variable.index, coefficient);
        constraint.op = ConstraintOp::Eq;
        added.insert(variable.index, index);
    }

    added
}
