use std::collections::BTreeMap;

use log::{debug, trace};

use crate::augment::AugmentedModel;
use crate::model::Model;
use crate::tableau::Tableau;
use crate::EPSILON;

/// The auxiliary problem of phase 1: the augmented model plus one artificial
/// variable for every constraint that has no slack
#[derive(Debug, Clone)]
pub struct PhaseOne {
    pub model: Model,
    /// Artificial variable index -> index of the constraint it was added to
    pub artificials: BTreeMap<usize, usize>,
}

impl PhaseOne {
    pub fn new(augmented: &AugmentedModel) -> Self {
        let mut model = augmented.model.clone();
        let mut artificials = BTreeMap::new();

        let uncovered: Vec<usize> = (0..model.constraints().len())
            .filter(|&i| !augmented.has_slack(i))
            .collect();

        for index in uncovered {
            let variable = model.create_auxiliary_variable("R", index);
            model.constraints_mut()[index]
                .expression
                .add_term(variable.index, 1.0);
            artificials.insert(variable.index, index);
        }

        Self { model, artificials }
    }

    /// Tableau minimising the sum of the artificial variables, with every
    /// artificial variable basic
    pub fn initial_tableau(&self) -> Tableau {
        let width = self.model.variables().len();
        let mut objective_row = vec![0.0; width + 1];
        for &variable in self.artificials.keys() {
            objective_row[variable] = 1.0;
        }

        // each artificial column is a unit vector in its own row, so
        // subtracting that row zeroes its reduced cost
        let mut basis = vec![None; self.model.constraints().len()];
        for (&variable, &constraint) in &self.artificials {
            basis[constraint] = Some(variable);
        }

        let mut tableau = Tableau::with_objective_row(objective_row, &self.model);
        tableau.canonicalize_objective(&basis);
        tableau
    }

    /// Whether some artificial variable is still positive in `tableau`,
    /// which proves the original problem infeasible
    pub fn artificials_positive(&self, tableau: &Tableau) -> bool {
        let assignment = tableau.extract_assignment();
        self.artificials
            .keys()
            .any(|&v| assignment.get(v).is_some_and(|&value| value > EPSILON))
    }

    /// Turns an optimal phase-1 tableau into a feasible phase-2 tableau for
    /// `augmented`: drives the artificial variables out of the basis, drops
    /// their columns, restores the real objective and re-expresses it
    /// against the remaining basis
    pub fn restore(&self, tableau: &Tableau, augmented: &AugmentedModel) -> Tableau {
        let mut tableau = tableau.clone();
        self.drive_out_artificials(&mut tableau);

        let removed: Vec<usize> = self.artificials.keys().copied().collect();

        let basis: Vec<Option<usize>> = tableau
            .extract_basis()
            .into_iter()
            .map(|basic| {
                basic
                    .filter(|col| !removed.contains(col))
                    .map(|col| col - removed.iter().filter(|&&r| r < col).count())
            })
            .collect();

        let mut restored = tableau.without_columns(&removed);
        restored.set_objective_row(augmented.objective_row());
        restored.canonicalize_objective(&basis);
        restored
    }

    /// Replaces every artificial variable left in the basis (at value 0) by
    /// a real column of its row. Rows with no such column belong to
    /// redundant constraints and are dropped.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let vars = tableau.num_cols().saturating_sub(1);
        let mut redundant = Vec::new();

        for (i, basic) in tableau.extract_basis().into_iter().enumerate() {
            if !basic.is_some_and(|col| self.artificials.contains_key(&col)) {
                continue;
            }
            let row = i + 1;

            // largest entry keeps the pivot well conditioned
            let mut entering: Option<(usize, f64)> = None;
            for col in (0..vars).filter(|col| !self.artificials.contains_key(col)) {
                let size = tableau.get(row, col).abs();
                if size > EPSILON && entering.is_none_or(|(_, best)| size > best) {
                    entering = Some((col, size));
                }
            }

            match entering {
                Some((col, _)) => {
                    trace!("Degenerate artificial in row {} replaced by column {}", row, col);
                    tableau.pivot(row, col);
                }
                None => redundant.push(row),
            }
        }

        for &row in redundant.iter().rev() {
            debug!("Dropping redundant constraint row {}", row);
            tableau.remove_row(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::augment;
    use crate::expression::Expression;

    fn assert_table_close(actual: &Tableau, expected: &[Vec<f64>]) {
        assert_eq!(actual.num_rows(), expected.len(), "row count");
        for (r, (got, want)) in actual.rows().iter().zip(expected).enumerate() {
            assert_eq!(got.len(), want.len(), "row {} width", r);
            for (c, (g, w)) in got.iter().zip(want).enumerate() {
                assert!((g - w).abs() < 1e-6, "cell ({}, {}) = {} (expected {})", r, c, g, w);
            }
        }
    }

    fn example_solvable() -> Model {
        let mut m = Model::new("example_solvable");
        let x1 = m.create_variable("x1").unwrap();
        let x2 = m.create_variable("x2").unwrap();
        m.add_constraint(Expression::term(&x1, 2.0).with_term(&x2, -1.0).le(100.0)).unwrap();
        m.add_constraint(Expression::term(&x1, 2.0).with_term(&x2, -1.0).le(-1.0)).unwrap();
        m.add_constraint(Expression::from(&x1).with_term(&x2, 1.0).le(3.0)).unwrap();
        m.add_constraint(Expression::from(&x1).with_term(&x2, 2.0).ge(4.0)).unwrap();
        m.maximize(Expression::from(&x1).with_term(&x2, 2.0)).unwrap();
        m
    }

    fn example_infeasible() -> Model {
        let mut m = Model::new("example_infeasible");
        let x1 = m.create_variable("x1").unwrap();
        let x2 = m.create_variable("x2").unwrap();
        m.add_constraint(Expression::from(&x1).with_term(&x2, 1.0).le(3.0)).unwrap();
        m.add_constraint(Expression::from(&x1).with_term(&x2, 1.0).ge(4.0)).unwrap();
        m.maximize(Expression::from(&x1).with_term(&x2, 3.0)).unwrap();
        m
    }

    // optimal phase-1 tableau of `example_solvable`
    fn solvable_optimum() -> Tableau {
        Tableau::from_rows(vec![
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 101.0],
            vec![0.0, 1.0, 0.0, 0.0, -0.2, -0.4, 0.2, 0.4, 1.8],
            vec![0.0, 0.0, 0.0, 1.0, -0.2, 0.6, 0.2, -0.6, 0.8],
            vec![1.0, 0.0, 0.0, 0.0, 0.4, -0.2, -0.4, 0.2, 0.4],
        ])
    }

    #[test]
    fn test_artificials_only_where_slack_is_missing() {
        let augmented = augment(&example_solvable());
        let phase_one = PhaseOne::new(&augmented);
        assert_eq!(phase_one.artificials, BTreeMap::from([(6, 1), (7, 3)]));
        assert_eq!(phase_one.model.variables()[6].name, "R1");

        let augmented = augment(&example_infeasible());
        let phase_one = PhaseOne::new(&augmented);
        assert_eq!(phase_one.artificials, BTreeMap::from([(4, 1)]));
        for constraint in phase_one.artificials.values() {
            assert!(!augmented.has_slack(*constraint));
        }
    }

    #[test]
    fn test_initial_tableau() {
        let phase_one = PhaseOne::new(&augment(&example_solvable()));
        // columns: x1 x2 s0 s2 s1 s3 R1 R3 | b
        assert_table_close(
            &phase_one.initial_tableau(),
            &[
                vec![1.0, -3.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, -5.0],
                vec![2.0, -1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0],
                vec![-2.0, 1.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0],
                vec![1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 3.0],
                vec![1.0, 2.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 4.0],
            ],
        );

        let phase_one = PhaseOne::new(&augment(&example_infeasible()));
        assert_table_close(
            &phase_one.initial_tableau(),
            &[
                vec![-1.0, -1.0, 0.0, 1.0, 0.0, -4.0],
                vec![1.0, 1.0, 1.0, 0.0, 0.0, 3.0],
                vec![1.0, 1.0, 0.0, -1.0, 1.0, 4.0],
            ],
        );
    }

    #[test]
    fn test_artificials_positive() {
        let phase_one = PhaseOne::new(&augment(&example_solvable()));
        assert!(!phase_one.artificials_positive(&solvable_optimum()));

        let phase_one = PhaseOne::new(&augment(&example_infeasible()));
        let stuck = Tableau::from_rows(vec![
            vec![0.0, 0.0, 1.0, 1.0, 0.0, -1.0],
            vec![1.0, 1.0, 1.0, 0.0, 0.0, 3.0],
            vec![0.0, 0.0, -1.0, -1.0, 1.0, 1.0],
        ]);
        assert!(phase_one.artificials_positive(&stuck));
    }

    #[test]
    fn test_restore() {
        let augmented = augment(&example_solvable());
        let phase_one = PhaseOne::new(&augmented);
        let restored = phase_one.restore(&solvable_optimum(), &augmented);

        assert_table_close(
            &restored,
            &[
                vec![0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 4.0],
                vec![0.0, 0.0, 1.0, 0.0, -1.0, 0.0, 101.0],
                vec![0.0, 1.0, 0.0, 0.0, -0.2, -0.4, 1.8],
                vec![0.0, 0.0, 0.0, 1.0, -0.2, 0.6, 0.8],
                vec![1.0, 0.0, 0.0, 0.0, 0.4, -0.2, 0.4],
            ],
        );
        assert_eq!(restored.extract_basis(), vec![Some(2), Some(1), Some(3), Some(0)]);
    }

    #[test]
    fn test_restore_drives_out_degenerate_artificial() {
        // max 3y s.t. -3x - 2y >= 0, y <= 10: R0 stays basic at 0
        let mut m = Model::new("degenerate");
        let x = m.create_variable("x").unwrap();
        let y = m.create_variable("y").unwrap();
        m.add_constraint(Expression::term(&x, -3.0).with_term(&y, -2.0).ge(0.0)).unwrap();
        m.add_constraint(Expression::from(&y).le(10.0)).unwrap();
        m.maximize(Expression::term(&y, 3.0)).unwrap();

        let augmented = augment(&m);
        let phase_one = PhaseOne::new(&augmented);
        let optimum = phase_one.initial_tableau();
        assert!(optimum.is_optimal());
        assert!(!phase_one.artificials_positive(&optimum));
        assert_eq!(optimum.extract_basis(), vec![Some(4), Some(2)]);

        // columns: x y s1 s0 | b
        let restored = phase_one.restore(&optimum, &augmented);
        assert_table_close(
            &restored,
            &[
                vec![0.0, -3.0, 0.0, 0.0, 0.0],
                vec![1.0, 2.0 / 3.0, 0.0, 1.0 / 3.0, 0.0],
                vec![0.0, 1.0, 1.0, 0.0, 10.0],
            ],
        );
        assert_eq!(restored.extract_basis(), vec![Some(0), Some(2)]);
    }

    #[test]
    fn test_restore_drops_redundant_rows() {
        // x + y = 2 and 2x + 2y = 4 under max x + 2y
        let mut m = Model::new("redundant");
        let x = m.create_variable("x").unwrap();
        let y = m.create_variable("y").unwrap();
        m.add_constraint(Expression::from(&x).with_term(&y, 1.0).equals(2.0)).unwrap();
        m.add_constraint(Expression::term(&x, 2.0).with_term(&y, 2.0).equals(4.0)).unwrap();
        m.maximize(Expression::from(&x).with_term(&y, 2.0)).unwrap();

        let augmented = augment(&m);
        let phase_one = PhaseOne::new(&augmented);
        assert_eq!(phase_one.artificials, BTreeMap::from([(2, 0), (3, 1)]));

        // columns: x y R0 R1 | b, after x entered on row 1
        let optimum = Tableau::from_rows(vec![
            vec![0.0, 0.0, 3.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0, 0.0, 2.0],
            vec![0.0, 0.0, -2.0, 1.0, 0.0],
        ]);
        assert!(!phase_one.artificials_positive(&optimum));

        let restored = phase_one.restore(&optimum, &augmented);
        assert_table_close(&restored, &[vec![1.0, 0.0, 4.0], vec![1.0, 1.0, 2.0]]);
        assert_eq!(restored.extract_basis(), vec![Some(1)]);
    }
}
