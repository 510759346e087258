//! Conversions to and from `nalgebra::DMatrix<f64>`
//!
//! nalgebra stores column-major and allows empty matrices; conversion into
//! [`Matrix`] re-lays the data row-major and rejects zero dimensions with the
//! same [`ShapeError`] the wire validator uses.

use nalgebra::DMatrix;

use crate::error::ShapeError;
use crate::Matrix;

impl From<&Matrix> for DMatrix<f64> {
    fn from(m: &Matrix) -> Self {
        DMatrix::from_row_slice(m.rows(), m.cols(), m.as_slice())
    }
}

impl TryFrom<&DMatrix<f64>> for Matrix {
    type Error = ShapeError;

    fn try_from(d: &DMatrix<f64>) -> Result<Self, Self::Error> {
        if d.nrows() == 0 {
            return Err(ShapeError::EmptyRows);
        }
        if d.ncols() == 0 {
            return Err(ShapeError::EmptyColumns);
        }
        let mut m = Matrix::zeros(d.nrows(), d.ncols());
        let cols = d.ncols();
        for (i, row) in d.row_iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m.data_mut()[i * cols + j] = v;
            }
        }
        Ok(m)
    }
}
