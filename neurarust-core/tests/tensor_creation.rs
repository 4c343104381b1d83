use approx::assert_relative_eq;
use neurarust_core::tensor::{arange, full, ones, randn, zeros, zeros_like};
use neurarust_core::NeuraRustError;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use common::create_test_tensor;

#[test]
fn test_filled_constructors() -> Result<(), NeuraRustError> {
    assert_eq!(zeros(&[2, 3])?.get_f32_data()?, vec![0.0; 6]);
    assert_eq!(ones(&[4])?.get_f32_data()?, vec![1.0; 4]);
    assert_eq!(full(&[1, 2], 7.5)?.get_f32_data()?, vec![7.5, 7.5]);

    let t = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let z = zeros_like(&t)?;
    assert_eq!(z.shape(), vec![2, 2]);
    assert_eq!(t.strides(), vec![2, 1]);
    Ok(())
}

#[test]
fn test_arange_matches_row_major_layout() -> Result<(), NeuraRustError> {
    let t = arange(0.0, 120.0, 1.0)?.view_detached(vec![3, 40])?;
    let data = t.get_f32_data()?;
    assert_eq!(t.shape(), vec![3, 40]);
    assert_eq!(data[41], 41.0);
    assert_eq!(data[119], 119.0);
    Ok(())
}

#[test]
fn test_creation_shape_errors() {
    assert!(matches!(
        neurarust_core::Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]),
        Err(NeuraRustError::TensorCreationError { data_len: 3, .. })
    ));
    assert!(matches!(
        arange(0.0, 5.0, -1.0),
        Err(NeuraRustError::InvalidArgument { .. })
    ));
}

#[test]
fn test_randn_statistics() -> Result<(), NeuraRustError> {
    let mut rng = StdRng::seed_from_u64(1234);
    let t = randn(&[20_000], 1.0, 0.5, &mut rng)?;
    let data = t.get_f32_data()?;
    let n = data.len() as f64;
    let mean = data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = data.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
    assert_relative_eq!(mean, 1.0, epsilon = 0.02);
    assert_relative_eq!(var.sqrt(), 0.5, epsilon = 0.02);
    Ok(())
}
