use crate::ops::arithmetic::mul_op;
use crate::ops::reduction::sum_all_op;
use crate::tensor::Tensor;
use crate::error::NeuraRustError;
use crate::utils::testing::{check_tensor_near, create_test_tensor_with_grad};

#[test]
fn test_mul_forward_broadcast_scalar() -> Result<(), NeuraRustError> {
    let a = Tensor::new(vec![1.0, -2.0, 3.0], vec![3])?;
    let s = Tensor::scalar(2.0);
    check_tensor_near(&mul_op(&a, &s)?, &[3], &[2.0, -4.0, 6.0], 1e-6);
    Ok(())
}

#[test]
fn test_mul_backward() -> Result<(), NeuraRustError> {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_tensor_with_grad(vec![4.0, 5.0, 6.0], vec![3]);
    sum_all_op(&mul_op(&a, &b)?)?.backward(None)?;
    check_tensor_near(&a.grad().unwrap(), &[3], &[4.0, 5.0, 6.0], 1e-6);
    check_tensor_near(&b.grad().unwrap(), &[3], &[1.0, 2.0, 3.0], 1e-6);
    Ok(())
}

#[test]
fn test_mul_same_tensor_accumulates() -> Result<(), NeuraRustError> {
    // d(x*x)/dx = 2x, reached through both inputs of the same node.
    let x = create_test_tensor_with_grad(vec![1.5, -2.0], vec![2]);
    sum_all_op(&mul_op(&x, &x)?)?.backward(None)?;
    check_tensor_near(&x.grad().unwrap(), &[2], &[3.0, -4.0], 1e-6);
    Ok(())
}
