//! Galerkin projection of sparse operators onto a reduced basis.

use crate::sparse::CsrMatrix;
use ndarray::Array2;
use seismic_types::error::{SeismicError, SeismicResult};

/// Reduced operator `Phi_leftᵀ · J · Phi_right`.
///
/// `J` maps the right field into the left field, so `phi_right` spans
/// the input space and `phi_left` the output space. The result is dense
/// (reduced-left × reduced-right) and is computed exactly once per run.
pub fn project_operator(
    phi_left: &Array2<f64>,
    jac: &CsrMatrix,
    phi_right: &Array2<f64>,
) -> SeismicResult<Array2<f64>> {
    if phi_left.nrows() != jac.nrows() {
        return Err(SeismicError::ShapeMismatch(format!(
            "left basis has {} rows, operator has {} rows",
            phi_left.nrows(),
            jac.nrows()
        )));
    }
    let half = jac.matmul_dense(phi_right)?;
    Ok(phi_left.t().dot(&half))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::CsrBuilder;
    use ndarray::array;

    #[test]
    fn test_projection_equals_dense_triple_product() {
        let mut b = CsrBuilder::new(3);
        b.push_row(&[(0, 1.0), (1, -2.0)]);
        b.push_row(&[(2, 0.5)]);
        let jac = b.finish(); // 2 x 3

        let phi_left = array![[1.0, 0.0], [0.5, 1.0]]; // 2 x 2
        let phi_right = array![[1.0], [2.0], [3.0]]; // 3 x 1

        let reduced = project_operator(&phi_left, &jac, &phi_right).unwrap();
        let expected = phi_left.t().dot(&jac.to_dense()).dot(&phi_right);

        assert_eq!(reduced.dim(), (2, 1));
        for r in 0..2 {
            assert!((reduced[[r, 0]] - expected[[r, 0]]).abs() < 1e-14);
        }
    }

    #[test]
    fn test_projection_rejects_mismatched_left_basis() {
        let mut b = CsrBuilder::new(2);
        b.push_row(&[(0, 1.0)]);
        let jac = b.finish(); // 1 x 2
        let phi_left = array![[1.0], [1.0]]; // wrong: 2 rows vs 1
        let phi_right = array![[1.0], [1.0]];
        assert!(project_operator(&phi_left, &jac, &phi_right).is_err());
    }
}
