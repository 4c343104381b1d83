use super::*;
use crate::approximation::ApproximationMethod;
use approx::assert_abs_diff_eq;
use neurarust_core::nn::{Linear, Module};

fn linear_model() -> Linear {
    Linear::from_tensors(
        Tensor::new(vec![0.5, -2.0, 1.5], vec![1, 3]).unwrap(),
        Some(Tensor::new(vec![0.25], vec![1]).unwrap()),
    )
    .unwrap()
}

fn square_sum(x: &Tensor) -> Result<Tensor, NeuraRustError> {
    x.mul(x)?.sum_axes(&[1], false)
}

#[test]
fn test_linear_model_is_exact_for_every_method() -> Result<(), AttributionError> {
    let model = linear_model();
    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
    let inputs = Tensor::new(vec![1.0, 2.0, 3.0, -1.0, 0.0, 4.0], vec![2, 3])?;
    let baseline = Tensor::new(vec![0.5, 0.5, 0.5], vec![1, 3])?;

    for method in ApproximationMethod::ALL {
        let request = AttributionRequest::default()
            .with_baselines(baseline.clone())
            .with_method(method)
            .with_n_steps(7)
            .with_convergence_delta(true);
        let out = ig.attribute(&inputs, &request)?;
        let attr = out.attributions.get_f32_data()?;
        let expected = [0.25, -3.0, 3.75, -0.75, 1.0, 5.25];
        for (a, e) in attr.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-5);
        }
        let delta = out.delta.expect("delta requested");
        assert_eq!(delta.shape(), vec![2]);
        for d in delta.get_f32_data()? {
            assert_abs_diff_eq!(d, 0.0, epsilon = 1e-5);
        }
    }
    Ok(())
}

#[test]
fn test_quadratic_integrand() -> Result<(), AttributionError> {
    // IG of sum(x^2) from zero is x^2 whenever the rule integrates t exactly.
    let ig = IntegratedGradients::new(square_sum);
    let inputs = Tensor::new(vec![1.0, -2.0, 3.0], vec![1, 3])?;
    for method in [
        ApproximationMethod::RiemannMiddle,
        ApproximationMethod::RiemannTrapezoid,
        ApproximationMethod::GaussLegendre,
    ] {
        let request = AttributionRequest::default().with_method(method).with_n_steps(4);
        let attr = ig.attribute(&inputs, &request)?.attributions.get_f32_data()?;
        assert_abs_diff_eq!(attr[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(attr[1], 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(attr[2], 9.0, epsilon = 1e-5);
    }

    // The left rule under-estimates by a factor (n - 1) / n.
    let request = AttributionRequest::default()
        .with_method(ApproximationMethod::RiemannLeft)
        .with_n_steps(4)
        .with_convergence_delta(true);
    let out = ig.attribute(&inputs, &request)?;
    assert_abs_diff_eq!(out.attributions.get_f32_data()?[2], 6.75, epsilon = 1e-5);
    // sum(attr) = 14 * 3/4, output change = 14
    assert_abs_diff_eq!(out.delta.unwrap().item()?, -3.5, epsilon = 1e-4);
    Ok(())
}

#[test]
fn test_internal_batch_size_does_not_change_result() -> Result<(), AttributionError> {
    let ig = IntegratedGradients::new(square_sum);
    let inputs = Tensor::new(vec![1.0, 2.0, 0.5, -1.5], vec![2, 2])?;
    let request = AttributionRequest::default()
        .with_method(ApproximationMethod::RiemannRight)
        .with_n_steps(9);
    let whole = ig.attribute(&inputs, &request)?.attributions.get_f32_data()?;
    for ibs in [1, 4, 7, 100] {
        let chunked = ig
            .attribute(&inputs, &request.clone().with_internal_batch_size(ibs))?
            .attributions
            .get_f32_data()?;
        for (a, b) in whole.iter().zip(chunked.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }
    Ok(())
}

#[test]
fn test_global_attribution() -> Result<(), AttributionError> {
    let model = linear_model();
    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x)).with_multiply_by_inputs(false);
    assert!(!ig.multiplies_by_inputs());
    let inputs = Tensor::new(vec![3.0, 3.0, 3.0], vec![1, 3])?;
    let attr = ig
        .attribute(&inputs, &AttributionRequest::default())?
        .attributions
        .get_f32_data()?;
    for (a, w) in attr.iter().zip([0.5, -2.0, 1.5].iter()) {
        assert_abs_diff_eq!(*a, *w, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_attribute_errors() -> Result<(), AttributionError> {
    let model = linear_model();
    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
    let inputs = Tensor::new(vec![1.0, 2.0, 3.0], vec![1, 3])?;

    let zero_steps = AttributionRequest::default().with_n_steps(0);
    assert!(matches!(
        ig.attribute(&inputs, &zero_steps),
        Err(AttributionError::InvalidStepCount { n_steps: 0, .. })
    ));

    let bad_baseline = AttributionRequest::default().with_baselines(Tensor::new(vec![0.0; 2], vec![1, 2])?);
    assert!(matches!(
        ig.attribute(&inputs, &bad_baseline),
        Err(AttributionError::BaselineShapeMismatch { .. })
    ));

    let bad_target = AttributionRequest::default().with_target(Target::Index(1));
    assert_eq!(
        ig.attribute(&inputs, &bad_target).unwrap_err(),
        AttributionError::TargetOutOfRange { index: 1, num_classes: 1 }
    );

    let wrong_attr = Tensor::new(vec![0.0; 2], vec![1, 2])?;
    assert!(matches!(
        ig.compute_convergence_delta(&wrong_attr, None, &inputs, &Target::None),
        Err(AttributionError::AttributionShapeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_parameters_keep_no_gradient() -> Result<(), AttributionError> {
    let model = linear_model();
    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
    let inputs = Tensor::new(vec![1.0, 2.0, 3.0], vec![1, 3])?;
    ig.attribute(&inputs, &AttributionRequest::default().with_convergence_delta(true))?;
    assert!(model.parameters().iter().all(|p| p.grad().is_none()));
    assert!(ig.has_convergence_delta());
    Ok(())
}
