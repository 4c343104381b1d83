use approx::assert_abs_diff_eq;
use neurarust_attr::{
    ApproximationMethod, Attribution, AttributionError, AttributionRequest, IntegratedGradients,
    NoiseTunnel, NoiseTunnelRequest, NoiseTunnelType, Target,
};
use neurarust_core::nn::Module;
use neurarust_core::Tensor;

mod common;
use common::{arange_input, init_logger, softmax_model};

#[test]
fn test_noise_free_smoothgrad_matches_vanilla() -> Result<(), AttributionError> {
    init_logger();
    let model = softmax_model(40, 20, 10)?;
    let input = arange_input(3, 40)?;
    let request = AttributionRequest::default()
        .with_target(vec![5usize, 5, 2])
        .with_method(ApproximationMethod::RiemannMiddle)
        .with_n_steps(20);

    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
    let vanilla = ig.attribute(&input, &request)?.attributions.get_f32_data()?;

    let nt = NoiseTunnel::new(IntegratedGradients::new(|x: &Tensor| model.forward(x)));
    let nt_request = NoiseTunnelRequest::default()
        .with_nt_type(NoiseTunnelType::SmoothGrad)
        .with_n_samples(3)
        .with_stdevs(0.0)
        .with_attribution(request);
    let smoothed = nt.attribute(&input, &nt_request)?.attributions.get_f32_data()?;

    for (a, b) in vanilla.iter().zip(smoothed.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_chunked_integration_matches_single_pass() -> Result<(), AttributionError> {
    let model = softmax_model(40, 20, 10)?;
    let input = arange_input(3, 40)?;
    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
    let request = AttributionRequest::default()
        .with_target(Target::PerExample(vec![5, 5, 2]))
        .with_n_steps(16)
        .with_convergence_delta(true);

    let single = ig.attribute(&input, &request)?;
    let chunked = ig.attribute(&input, &request.clone().with_internal_batch_size(10))?;
    for (a, b) in single
        .attributions
        .get_f32_data()?
        .iter()
        .zip(chunked.attributions.get_f32_data()?.iter())
    {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
    }
    assert_eq!(chunked.delta.map(|d| d.shape()), Some(vec![3]));
    Ok(())
}

#[test]
fn test_recomputed_delta_matches_inline_delta() -> Result<(), AttributionError> {
    let model = softmax_model(40, 20, 10)?;
    let input = arange_input(1, 40)?;
    let ig = IntegratedGradients::new(|x: &Tensor| model.forward(x));
    let request = AttributionRequest::default()
        .with_target(5usize)
        .with_method(ApproximationMethod::GaussLegendre)
        .with_n_steps(50)
        .with_convergence_delta(true);
    let out = ig.attribute(&input, &request)?;
    let recomputed = ig.compute_convergence_delta(&out.attributions, None, &input, &Target::Index(5))?;
    assert!(neurarust_attr::tensors_almost_equal(
        &out.delta.unwrap(),
        &recomputed,
        1e-4,
        neurarust_attr::ToleranceMode::Sum
    )?);
    Ok(())
}
