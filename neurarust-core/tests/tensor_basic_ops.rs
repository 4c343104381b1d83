use approx::assert_relative_eq;
use neurarust_core::autograd::{grad, no_grad};
use neurarust_core::nn::{Linear, Module, ReLU, Sequential, Sigmoid};
use neurarust_core::{NeuraRustError, Tensor};

mod common;
use common::{create_test_tensor, init_logger};

fn small_net() -> Result<Sequential, NeuraRustError> {
    let lin1 = Linear::from_tensors(
        create_test_tensor(vec![0.5, -0.3, 0.8, 0.1, -0.6, 0.4], vec![2, 3]),
        Some(create_test_tensor(vec![0.05, -0.1], vec![2])),
    )?;
    let lin2 = Linear::from_tensors(
        create_test_tensor(vec![0.7, -0.9], vec![1, 2]),
        Some(create_test_tensor(vec![0.2], vec![1])),
    )?;
    Ok(Sequential::new()
        .with("lin1", lin1)
        .with("relu", ReLU::new())
        .with("lin2", lin2)
        .with("sigmoid", Sigmoid::new()))
}

fn forward_scalar(model: &Sequential, x: &[f32]) -> Result<f32, NeuraRustError> {
    let input = Tensor::new(x.to_vec(), vec![1, x.len()])?;
    no_grad(|| model.forward(&input))?.item()
}

#[test]
fn test_input_gradient_matches_finite_differences() -> Result<(), NeuraRustError> {
    init_logger();
    let model = small_net()?;
    let x = vec![1.0f32, -1.0, 0.5];

    let input = Tensor::new(x.clone(), vec![1, 3])?;
    input.requires_grad_(true)?;
    let out = model.forward(&input)?;
    let grads = grad(&out, &[input.clone()], None)?;
    let analytic = grads[0].get_f32_data()?;

    let eps = 1e-2f32;
    for i in 0..x.len() {
        let mut plus = x.clone();
        let mut minus = x.clone();
        plus[i] += eps;
        minus[i] -= eps;
        let numeric = (forward_scalar(&model, &plus)? - forward_scalar(&model, &minus)?) / (2.0 * eps);
        assert_relative_eq!(analytic[i], numeric, epsilon = 1e-3);
    }

    // grad() leaves parameter gradients untouched.
    assert!(model.parameters().iter().all(|p| p.grad().is_none()));
    Ok(())
}

#[test]
fn test_backward_populates_parameter_grads() -> Result<(), NeuraRustError> {
    init_logger();
    let model = small_net()?;
    let input = create_test_tensor(vec![1.0, 2.0, -0.5, 0.0, 1.0, 1.0], vec![2, 3]);
    model.forward(&input)?.sum_all()?.backward(None)?;
    for (name, param) in model.named_parameters() {
        let g = param.grad().unwrap_or_else(|| panic!("{} has no grad", name));
        assert_eq!(g.shape(), param.shape(), "{}", name);
    }
    Ok(())
}

#[test]
fn test_no_grad_forward_builds_no_graph() -> Result<(), NeuraRustError> {
    let model = small_net()?;
    let input = create_test_tensor(vec![1.0, 2.0, -0.5], vec![1, 3]);
    let out = no_grad(|| model.forward(&input))?;
    assert!(!out.requires_grad());
    assert!(out.grad_fn().is_none());
    Ok(())
}
