use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::{Mat4, Vec4};

use super::vector::cross3;

/// Row-major 4x4 matrix for row vectors (`v' = v * M`).
///
/// Translation lives in the fourth row, and `a * b` applies `a` first, then `b`.
/// The flat row-major layout is what the shaders receive, so `as_array` can be
/// uploaded as-is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    rows: [[f32; 4]; 4],
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const ZERO: Self = Self { rows: [[0.0; 4]; 4] };

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn from_row_major(flat: [f32; 16]) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, value) in flat.into_iter().enumerate() {
            rows[i / 4][i % 4] = value;
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::from_array(self.rows[row])
    }

    pub fn col(&self, col: usize) -> Vec4 {
        Vec4::new(
            self.rows[0][col],
            self.rows[1][col],
            self.rows[2][col],
            self.rows[3][col],
        )
    }

    /// Element at `row`, `col`.
    ///
    /// # Panics
    /// If either index is outside `0..4`.
    pub fn data_at(&self, row: usize, col: usize) -> f32 {
        assert!(row < 4 && col < 4, "matrix index ({row}, {col}) out of range");
        self.rows[row][col]
    }

    /// Mutable element at `row`, `col`.
    ///
    /// # Panics
    /// If either index is outside `0..4`.
    pub fn data_at_mut(&mut self, row: usize, col: usize) -> &mut f32 {
        assert!(row < 4 && col < 4, "matrix index ({row}, {col}) out of range");
        &mut self.rows[row][col]
    }

    /// Flat row-major copy
    pub fn as_array(&self) -> [f32; 16] {
        let mut flat = [0.0; 16];
        for (i, value) in flat.iter_mut().enumerate() {
            *value = self.rows[i / 4][i % 4];
        }
        flat
    }

    /// Sets every element to `value`
    pub fn fill(&mut self, value: f32) {
        self.rows = [[value; 4]; 4];
    }

    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f32 {
        let minor = cross3(self.col(0), self.col(1), self.col(2));
        -self.col(3).dot(minor)
    }

    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    pub fn transposed(&self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.rows[i][j] = self.rows[j][i];
            }
        }
        out
    }

    /// Inverts in place. A singular matrix (determinant exactly zero) is left as is.
    pub fn invert(&mut self) {
        let det = self.determinant();
        if det == 0.0 {
            return;
        }

        let mut out = Self::ZERO;
        for i in 0..4 {
            let mut others = [Vec4::ZERO; 3];
            let mut a = 0;
            for j in (0..4).filter(|&j| j != i) {
                others[a] = self.row(j);
                a += 1;
            }
            let v = cross3(others[0], others[1], others[2]);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            for (k, value) in v.to_array().into_iter().enumerate() {
                out.rows[k][i] = sign * value / det;
            }
        }
        *self = out;
    }

    /// Inverted copy; see [`Matrix::invert`] for the singular case
    pub fn inverse(&self) -> Self {
        let mut m = *self;
        m.invert();
        m
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            rows: self.rows.map(|row| row.map(&f)),
        }
    }

    fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut out = self;
        for i in 0..4 {
            for j in 0..4 {
                out.rows[i][j] = f(self.rows[i][j], other.rows[i][j]);
            }
        }
        out
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.rows[i][j] = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        out
    }
}

impl MulAssign for Matrix {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Add for Matrix {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl AddAssign for Matrix {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Matrix {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl SubAssign for Matrix {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Matrix {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl Mul<f32> for Matrix {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.map(|v| v * rhs)
    }
}

impl Mul<Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        rhs * self
    }
}

impl MulAssign<f32> for Matrix {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Div<f32> for Matrix {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        let inv = 1.0 / rhs;
        self.map(|v| v * inv)
    }
}

impl DivAssign<f32> for Matrix {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

// glam stores columns and multiplies column vectors, which is the transpose of the
// row-vector convention. The two memory layouts therefore coincide.
impl From<Matrix> for Mat4 {
    fn from(m: Matrix) -> Self {
        Mat4::from_cols_array(&m.as_array())
    }
}

impl From<Mat4> for Matrix {
    fn from(m: Mat4) -> Self {
        Matrix::from_row_major(m.to_cols_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows([
            [2.0, 0.5, 0.0, 1.0],
            [0.0, 1.0, -3.0, 0.0],
            [1.0, 0.0, 4.0, 2.0],
            [0.5, 2.0, 1.0, 1.0],
        ])
    }

    fn assert_close(a: Matrix, b: Matrix) {
        assert!(
            Mat4::from(a).abs_diff_eq(Mat4::from(b), 1e-4),
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn default_is_identity() {
        assert!(Matrix::default().is_identity());
    }

    #[test]
    fn identity_is_two_sided() {
        let m = sample();
        assert_eq!(Matrix::IDENTITY * m, m);
        assert_eq!(m * Matrix::IDENTITY, m);
    }

    #[test]
    fn multiplication_is_not_commutative() {
        let a = sample();
        let b = a.transposed();
        assert_ne!(a * b, b * a);
    }

    #[test]
    fn determinant_matches_glam() {
        let m = sample();
        let expected = Mat4::from(m).determinant();
        assert!((m.determinant() - expected).abs() < 1e-4);
        assert_eq!(Matrix::IDENTITY.determinant(), 1.0);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = sample();
        assert_close(m.inverse() * m, Matrix::IDENTITY);
        assert_close(m * m.inverse(), Matrix::IDENTITY);
        assert_close(m.inverse(), Mat4::from(m).inverse().into());
    }

    #[test]
    fn singular_inverse_is_noop() {
        let mut m = sample();
        // Duplicate a row to make it singular
        m.rows[3] = m.rows[0];
        assert_eq!(m.determinant(), 0.0);
        assert_eq!(m.inverse(), m);

        let mut zero = Matrix::ZERO;
        zero.invert();
        assert_eq!(zero, Matrix::ZERO);
    }

    #[test]
    fn transpose_swaps_indices() {
        let m = sample();
        let t = m.transposed();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.data_at(i, j), t.data_at(j, i));
            }
        }
        let mut twice = t;
        twice.transpose();
        assert_eq!(twice, m);
    }

    #[test]
    #[should_panic]
    fn data_at_out_of_range_panics() {
        Matrix::IDENTITY.data_at(4, 0);
    }

    #[test]
    fn scalar_ops() {
        let m = sample();
        assert_eq!(m * 2.0, 2.0 * m);
        assert_close((m * 4.0) / 4.0, m);
        assert_eq!(m + (-m), Matrix::ZERO);
        assert_eq!(m - m, Matrix::ZERO);

        let mut f = Matrix::IDENTITY;
        f.fill(3.0);
        assert!(f.as_array().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn glam_round_trip_preserves_layout() {
        let m = sample();
        assert_eq!(Matrix::from(Mat4::from(m)), m);
        assert_eq!(Matrix::from_row_major(m.as_array()), m);
    }
}
