use crate::ops::arithmetic::sub_op;
use crate::ops::reduction::sum_all_op;
use crate::tensor::Tensor;
use crate::error::NeuraRustError;
use crate::utils::testing::{check_tensor_near, create_test_tensor_with_grad};

#[test]
fn test_sub_forward() -> Result<(), NeuraRustError> {
    let a = Tensor::new(vec![5.0, 7.0, 9.0], vec![3])?;
    let b = Tensor::new(vec![1.0, 2.0, 3.0], vec![3])?;
    check_tensor_near(&sub_op(&a, &b)?, &[3], &[4.0, 5.0, 6.0], 1e-6);
    Ok(())
}

#[test]
fn test_sub_backward_negates_rhs() -> Result<(), NeuraRustError> {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let b = create_test_tensor_with_grad(vec![1.0, 1.0], vec![1, 2]);
    sum_all_op(&sub_op(&a, &b)?)?.backward(None)?;
    check_tensor_near(&a.grad().unwrap(), &[2, 2], &[1.0; 4], 1e-6);
    check_tensor_near(&b.grad().unwrap(), &[1, 2], &[-2.0, -2.0], 1e-6);
    Ok(())
}
