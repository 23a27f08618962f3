use core::ops::Index;

/// View of an item every stride on a collection of data.
/// Starts at start, ends at the end.
pub struct StridedVecView<'a, A: 'a> {
    data: &'a [A],
    start: usize,
    stride: usize,
}

impl<'a, A: 'a> StridedVecView<'a, A> {
    pub fn new(data: &'a [A], start: usize, stride: usize) -> StridedVecView<'a, A> {
        StridedVecView {
            data,
            start,
            stride,
        }
    }
}

impl<'a, A: 'a> Index<usize> for StridedVecView<'a, A> {
    type Output = A;
    fn index(&self, pos: usize) -> &A {
        &self.data[self.start + pos * self.stride]
    }
}

/// Store a dense matrix in a column-major way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMajorMatrix<A> {
    /// Number of rows in the matrix
    n_rows: usize,
    /// Number of columns in the matrix
    n_cols: usize,
    /// Values, one column after the other
    values: Vec<A>,
}

impl<A> ColumnMajorMatrix<A> {
    /// Columns must all have the same length, checked by the caller.
    pub fn from_columns(columns: Vec<Vec<A>>) -> ColumnMajorMatrix<A> {
        let n_cols = columns.len();
        let n_rows = columns.first().map_or(0, |c| c.len());
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for column in columns {
            assert_eq!(column.len(), n_rows);
            values.extend(column);
        }
        ColumnMajorMatrix {
            n_rows,
            n_cols,
            values,
        }
    }

    pub fn column(&self, col: usize) -> &[A] {
        let start = col * self.n_rows;
        &self.values[start..start + self.n_rows]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[A]> {
        (0..self.n_cols).map(move |col| self.column(col))
    }

    pub fn row(&self, row: usize) -> StridedVecView<A> {
        assert!(row < self.n_rows);
        StridedVecView::new(&self.values, row, self.n_rows)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }
}

impl<A: Clone> ColumnMajorMatrix<A> {
    /// New matrix keeping only the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> ColumnMajorMatrix<A> {
        let columns = self
            .columns()
            .map(|column| rows.iter().map(|&i| column[i].clone()).collect())
            .collect();
        let mut matrix = ColumnMajorMatrix::from_columns(columns);
        // Keep the row count right even without any column
        matrix.n_rows = rows.len();
        matrix
    }
}

impl<A> Index<(usize, usize)> for ColumnMajorMatrix<A> {
    type Output = A;
    fn index(&self, (row, col): (usize, usize)) -> &A {
        // No need to check for col because it will be out of the buffer
        assert!(row < self.n_rows);
        &self.values[row + col * self.n_rows]
    }
}
