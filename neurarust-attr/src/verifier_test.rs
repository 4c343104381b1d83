use super::*;
use neurarust_core::nn::{Linear, Sequential, Sigmoid};

fn logistic_model() -> Sequential {
    let linear = Linear::from_tensors(
        Tensor::new(vec![0.3, -0.2, 0.1, 0.05], vec![1, 4]).unwrap(),
        Some(Tensor::new(vec![0.1], vec![1]).unwrap()),
    )
    .unwrap();
    Sequential::new().with("lin", linear).with("sigmoid", Sigmoid::new())
}

fn input() -> Tensor {
    Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![1, 4]).unwrap()
}

#[test]
fn test_parse_modes() {
    for mode in AttributionMode::ALL {
        assert_eq!(mode.to_string().parse::<AttributionMode>(), Ok(mode));
    }
    assert_eq!(
        "smoothgrad_sq".parse::<AttributionMode>(),
        Ok(AttributionMode::NoiseTunnel(NoiseTunnelType::SmoothGradSq))
    );
    assert_eq!(
        "integrated".parse::<AttributionMode>(),
        Err(AttributionError::UnknownTag {
            kind: "attribution mode",
            tag: "integrated".to_string()
        })
    );
}

#[test]
fn test_config_defaults() {
    let config = VerifierConfig::default();
    assert_eq!(config.vanilla_n_steps, 200);
    assert_eq!(config.noise_n_samples, 10);
    assert_eq!(config.noise_stdevs, 0.0002);
    assert_eq!(config.noise_n_steps, 100);
    assert_eq!(config.thresholds.tight, 0.005);
    assert_eq!(config.thresholds.loose, 0.05);
    assert_eq!(config.with_seed(9).seed, Some(9));
}

#[test]
fn test_vanilla_passes() -> Result<(), VerificationError> {
    let model = logistic_model();
    let verifier = CompletenessVerifier::default();
    let report = verifier.verify(
        &model,
        &input(),
        &Target::None,
        None,
        AttributionMode::Vanilla,
        ApproximationMethod::GaussLegendre,
    )?;
    assert_eq!(report.delta.shape(), vec![1]);
    assert_eq!(report.attributions.shape(), vec![1, 4]);
    assert!(report.max_abs_delta < 0.005);
    Ok(())
}

#[test]
fn test_noise_tunnel_passes() -> Result<(), VerificationError> {
    let model = logistic_model();
    let verifier = CompletenessVerifier::new(VerifierConfig::default().with_seed(42));
    for nt_type in NoiseTunnelType::ALL {
        let report = verifier.verify(
            &model,
            &input(),
            &Target::None,
            None,
            AttributionMode::NoiseTunnel(nt_type),
            ApproximationMethod::RiemannMiddle,
        )?;
        assert_eq!(report.delta.shape(), vec![10]);
        assert_eq!(report.attributions.shape(), vec![1, 4]);
    }
    Ok(())
}

#[test]
fn test_tight_threshold_violation() {
    let model = logistic_model();
    let thresholds = Thresholds {
        tight: 0.0,
        ..Thresholds::default()
    };
    let verifier = CompletenessVerifier::new(VerifierConfig::default().with_thresholds(thresholds));
    let err = verifier
        .verify(
            &model,
            &input(),
            &Target::None,
            None,
            AttributionMode::Vanilla,
            ApproximationMethod::RiemannRight,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        VerificationError::DeltaAboveThreshold { threshold, ref deltas } if threshold == 0.0 && deltas.len() == 1
    ));
}

#[test]
fn test_loose_threshold_applies_to_noise_tunnel() {
    let model = logistic_model();
    let thresholds = Thresholds {
        loose: 0.0,
        ..Thresholds::default()
    };
    let verifier = CompletenessVerifier::new(VerifierConfig::default().with_thresholds(thresholds));
    let err = verifier
        .verify(
            &model,
            &input(),
            &Target::None,
            None,
            AttributionMode::NoiseTunnel(NoiseTunnelType::SmoothGrad),
            ApproximationMethod::RiemannLeft,
        )
        .unwrap_err();
    assert!(matches!(err, VerificationError::DeltaAboveThreshold { deltas, .. } if deltas.len() == 10));
}

#[test]
fn test_attribution_errors_are_wrapped() {
    let model = logistic_model();
    let err = CompletenessVerifier::default()
        .verify(
            &model,
            &input(),
            &Target::Index(3),
            None,
            AttributionMode::Vanilla,
            ApproximationMethod::GaussLegendre,
        )
        .unwrap_err();
    assert_eq!(
        err,
        VerificationError::Attribution(AttributionError::TargetOutOfRange {
            index: 3,
            num_classes: 1
        })
    );
}

#[test]
fn test_model_grads_cleared_before_attribution() -> Result<(), VerificationError> {
    let model = logistic_model();
    model.forward(&input())?.sum_all()?.backward(None)?;
    assert!(model.parameters().iter().all(|p| p.grad().is_some()));

    CompletenessVerifier::default().verify(
        &model,
        &input(),
        &Target::None,
        None,
        AttributionMode::Vanilla,
        ApproximationMethod::RiemannTrapezoid,
    )?;
    assert!(model.parameters().iter().all(|p| p.grad().is_none()));
    Ok(())
}

#[test]
fn test_delta_match_rejects_diverging_deltas() {
    let inline = Tensor::new(vec![0.001, -0.002], vec![2]).unwrap();
    let recomputed = Tensor::new(vec![0.001, -0.0025], vec![2]).unwrap();
    let tolerance = Thresholds::default().delta_match;

    assert!(check_delta_match(&inline, &inline.clone(), tolerance).is_ok());
    assert_eq!(
        check_delta_match(&inline, &recomputed, tolerance),
        Err(VerificationError::DeltaMismatch {
            inline: vec![0.001, -0.002],
            recomputed: vec![0.001, -0.0025],
        })
    );
}

#[test]
fn test_delta_len_mismatch() {
    let delta = Tensor::new(vec![0.0; 3], vec![3]).unwrap();
    assert!(check_delta_len(&delta, 3).is_ok());
    assert_eq!(
        check_delta_len(&delta, 30),
        Err(VerificationError::DeltaShapeMismatch {
            expected: vec![30],
            actual: vec![3],
        })
    );
}

#[test]
fn test_delta_must_be_one_dimensional() {
    let row = Tensor::new(vec![0.0; 3], vec![1, 3]).unwrap();
    let column = Tensor::new(vec![0.0; 3], vec![3, 1]).unwrap();
    assert_eq!(
        check_delta_len(&row, 3),
        Err(VerificationError::DeltaShapeMismatch {
            expected: vec![3],
            actual: vec![1, 3],
        })
    );
    assert_eq!(
        check_delta_len(&column, 3),
        Err(VerificationError::DeltaShapeMismatch {
            expected: vec![3],
            actual: vec![3, 1],
        })
    );
}

#[test]
fn test_attribution_shape_mismatch() {
    let output = AttributionOutput {
        attributions: Tensor::new(vec![0.1, 0.2, 0.3], vec![1, 3]).unwrap(),
        delta: None,
    };
    assert_eq!(
        check_attribution_shape(&output, &input()),
        Err(VerificationError::AttributionShapeMismatch {
            expected: vec![1, 4],
            actual: vec![1, 3],
        })
    );

    let matching = AttributionOutput {
        attributions: Tensor::new(vec![0.0; 4], vec![1, 4]).unwrap(),
        delta: None,
    };
    assert!(check_attribution_shape(&matching, &input()).is_ok());
}
