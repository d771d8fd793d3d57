use std::fmt;

use crate::expression::Expression;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        };
        f.write_str(symbol)
    }
}

/// `expression op bound`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub expression: Expression,
    pub op: ConstraintOp,
    /// Right-hand side value
    pub bound: f64,
    /// Position in the owning model's constraint list; 0 until the
    /// constraint is added to a model
    pub index: usize,
}

impl Constraint {
    pub fn new(expression: Expression, op: ConstraintOp, bound: f64) -> Self {
        Self {
            expression,
            op,
            bound,
            index: 0,
        }
    }

    /// Multiplies both sides by -1, flipping `<=` and `>=`
    pub fn invert(&mut self) {
        self.expression = self.expression.negated();
        self.bound = -self.bound;
        self.op = self.op.flipped();
    }

    /// Whether `assignment` satisfies the constraint within `tolerance`
    pub fn is_satisfied(&self, assignment: &[f64], tolerance: f64) -> bool {
        let lhs = self.expression.evaluate(assignment);
        match self.op {
            ConstraintOp::Le => lhs <= self.bound + tolerance,
            ConstraintOp::Ge => lhs >= self.bound - tolerance,
            ConstraintOp::Eq => (lhs - self.bound).abs() <= tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Variable;

    #[test]
    fn test_invert_flips_sides() {
        let x = Variable { name: "x".into(), index: 0 };
        let y = Variable { name: "y".into(), index: 1 };

        let mut c = Expression::term(&x, 2.0).with_term(&y, -1.0).le(-1.0);
        c.invert();

        assert_eq!(c.op, ConstraintOp::Ge);
        assert_eq!(c.bound, 1.0);
        assert_eq!(c.expression.coefficients(2), vec![-2.0, 1.0]);

        let mut eq = Expression::from(&x).equals(-3.0);
        eq.invert();
        assert_eq!(eq.op, ConstraintOp::Eq);
        assert_eq!(eq.bound, 3.0);
    }

    #[test]
    fn test_is_satisfied() {
        let x = Variable { name: "x".into(), index: 0 };
        let c = Expression::from(&x).ge(5.0);
        assert!(c.is_satisfied(&[5.0], 1e-9));
        assert!(!c.is_satisfied(&[4.9], 1e-9));
        assert_eq!(c.op.to_string(), ">=");
    }
}
