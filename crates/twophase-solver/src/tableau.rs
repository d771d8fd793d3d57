use crate::model::Model;
use crate::EPSILON;

/// Simplex tableau for a maximisation problem
///
/// Row 0 is the objective row: the negated objective coefficients followed
/// by the current objective value. Rows `1..` are constraint rows, each with
/// its coefficients followed by the right-hand side. The last column is
/// always the right-hand side.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    table: Vec<Vec<f64>>,
}

impl Tableau {
    /// Wraps raw rows
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    pub fn from_rows(table: Vec<Vec<f64>>) -> Self {
        assert!(
            table.windows(2).all(|w| w[0].len() == w[1].len()),
            "tableau rows must have the same length"
        );
        Self { table }
    }

    /// Builds a tableau from the given objective row and the model's
    /// constraints (which must already be equalities)
    pub fn with_objective_row(objective_row: Vec<f64>, model: &Model) -> Self {
        let width = model.variables().len();
        let mut table = Vec::with_capacity(model.constraints().len() + 1);
        table.push(objective_row);
        for constraint in model.constraints() {
            let mut row = constraint.expression.coefficients(width);
            row.push(constraint.bound);
            table.push(row);
        }
        Self::from_rows(table)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.table
    }

    pub fn num_rows(&self) -> usize {
        self.table.len()
    }

    pub fn num_cols(&self) -> usize {
        self.table.first().map_or(0, Vec::len)
    }

    fn rhs_col(&self) -> usize {
        self.num_cols().saturating_sub(1)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.table[row][col]
    }

    /// Reduced costs (objective row without the right-hand side)
    pub fn objective_coefficients(&self) -> &[f64] {
        let rhs = self.rhs_col();
        &self.table[0][..rhs]
    }

    /// Current value of the (maximised) objective
    pub fn objective_value(&self) -> f64 {
        self.table[0][self.rhs_col()]
    }

    /// Right-hand sides of the constraint rows
    pub fn rhs(&self) -> impl Iterator<Item = f64> + '_ {
        let rhs = self.rhs_col();
        self.table[1..].iter().map(move |row| row[rhs])
    }

    pub fn is_optimal(&self) -> bool {
        self.objective_coefficients().iter().all(|&c| c >= -EPSILON)
    }

    /// Column with the most negative reduced cost, lowest index on ties
    pub fn choose_entering_variable(&self) -> usize {
        let mut best = 0;
        for (col, &c) in self.objective_coefficients().iter().enumerate() {
            if c < self.table[0][best] {
                best = col;
            }
        }
        best
    }

    /// Whether no constraint row limits the growth of `col`
    pub fn is_unbounded(&self, col: usize) -> bool {
        self.table[1..].iter().all(|row| row[col] <= EPSILON)
    }

    /// Minimum-ratio test over rows with a positive entry in `col`, lowest
    /// row on ties. `None` exactly when the column is unbounded.
    pub fn choose_leaving_variable(&self, col: usize) -> Option<usize> {
        let rhs = self.rhs_col();
        let mut best: Option<(f64, usize)> = None;

        for (row, values) in self.table.iter().enumerate().skip(1) {
            let entry = values[col];
            if entry <= EPSILON {
                continue;
            }
            let ratio = values[rhs] / entry;
            match best {
                Some((min_ratio, _)) if ratio >= min_ratio => {}
                _ => best = Some((ratio, row)),
            }
        }

        best.map(|(_, row)| row)
    }

    /// Makes `col` a unit column with its 1 in `row`
    pub fn pivot(&mut self, row: usize, col: usize) {
        let pivot_val = self.table[row][col];
        for value in &mut self.table[row] {
            *value /= pivot_val;
        }

        let pivot_row = self.table[row].clone();
        for (i, values) in self.table.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = values[col];
            if factor == 0.0 {
                continue;
            }
            for (value, p) in values.iter_mut().zip(&pivot_row) {
                *value -= factor * p;
            }
        }
    }

    /// Basic column of every constraint row (`None` if the row has none)
    ///
    /// A column is basic when it is a unit vector over the whole table,
    /// objective row included. Later columns win if two qualify for the
    /// same row.
    pub fn extract_basis(&self) -> Vec<Option<usize>> {
        let mut basis = vec![None; self.num_rows().saturating_sub(1)];

        for col in 0..self.rhs_col() {
            let column = self.table.iter().map(|row| row[col]);
            let (min, max, sum) = column.fold(
                (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                |(lo, hi, s), v| (lo.min(v), hi.max(v), s + v),
            );

            let is_unit = is_close(min, 0.0) && is_close(max, 1.0) && is_close(sum, 1.0);
            if !is_unit {
                continue;
            }

            let one_at = self.table.iter().position(|row| is_close(row[col], 1.0));
            if let Some(row) = one_at.filter(|&r| r > 0) {
                basis[row - 1] = Some(col);
            }
        }

        basis
    }

    /// Values of all columns: basic variables take their row's right-hand
    /// side, everything else is 0
    pub fn extract_assignment(&self) -> Vec<f64> {
        let rhs = self.rhs_col();
        let mut assignment = vec![0.0; rhs];
        for (i, basic) in self.extract_basis().into_iter().enumerate() {
            if let Some(col) = basic {
                assignment[col] = self.table[i + 1][rhs];
            }
        }
        assignment
    }

    /// Copy of the tableau without the given variable columns
    pub fn without_columns(&self, columns: &[usize]) -> Tableau {
        let table = self
            .table
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(col, _)| !columns.contains(col))
                    .map(|(_, &v)| v)
                    .collect()
            })
            .collect();
        Tableau::from_rows(table)
    }

    /// Drops constraint row `row` (1-based, row 0 is the objective)
    pub fn remove_row(&mut self, row: usize) {
        if row > 0 && row < self.table.len() {
            self.table.remove(row);
        }
    }

    /// Replaces row 0
    pub fn set_objective_row(&mut self, objective_row: Vec<f64>) {
        debug_assert_eq!(objective_row.len(), self.num_cols());
        self.table[0] = objective_row;
    }

    /// Eliminates the objective-row entries of the basic columns, so that
    /// the objective row holds valid reduced costs for `basis`
    pub fn canonicalize_objective(&mut self, basis: &[Option<usize>]) {
        let rhs = self.rhs_col();
        for (i, basic) in basis.iter().enumerate() {
            let Some(col) = *basic else {
                continue;
            };
            if col >= rhs {
                continue;
            }

            let factor = self.table[0][col];
            if factor.abs() <= EPSILON {
                continue;
            }
            let (objective, constraints) = self.table.split_at_mut(1);
            for (value, r) in objective[0].iter_mut().zip(&constraints[i]) {
                *value -= factor * r;
            }
        }
    }
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
