use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zeros_like() {
    let tensor = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![1, 3]).unwrap();
    let zeros_t = zeros_like(&tensor).unwrap();
    assert_eq!(zeros_t.shape(), tensor.shape());
    assert!(zeros_t.get_f32_data().unwrap().iter().all(|&x| x == 0.0));
}

#[test]
fn test_ones() {
    let t = ones(&[1, 4]).unwrap();
    assert_eq!(t.shape(), vec![1, 4]);
    assert!(t.get_f32_data().unwrap().iter().all(|&x| x == 1.0));
}

#[test]
fn test_full() {
    let fill_val = 42.5_f32;
    let t = full(&[3, 1, 2], fill_val).unwrap();
    assert_eq!(t.numel(), 6);
    assert!(t.get_f32_data().unwrap().iter().all(|&x| (x - fill_val).abs() < 1e-6));
}

#[test]
fn test_arange() {
    let t = arange(0.0, 20.0, 1.0).unwrap();
    assert_eq!(t.shape(), vec![20]);
    let data = t.get_f32_data().unwrap();
    assert_eq!(data[0], 0.0);
    assert_eq!(data[19], 19.0);
}

#[test]
fn test_arange_invalid_step() {
    assert!(arange(0.0, 5.0, 0.0).is_err());
    assert!(arange(0.0, 5.0, -1.0).is_err());
}

#[test]
fn test_randn_seeded_is_reproducible() {
    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    let a = randn(&[3, 3], 0.0, 1.0, &mut rng_a).unwrap();
    let b = randn(&[3, 3], 0.0, 1.0, &mut rng_b).unwrap();
    assert_eq!(a.shape(), vec![3, 3]);
    assert_eq!(a.get_f32_data().unwrap(), b.get_f32_data().unwrap());
}

#[test]
fn test_randn_small_std_stays_close_to_mean() {
    let mut rng = StdRng::seed_from_u64(11);
    let t = randn(&[1000], 5.0, 0.0002, &mut rng).unwrap();
    assert!(t.get_f32_data().unwrap().iter().all(|&x| (x - 5.0).abs() < 0.01));
}

#[test]
fn test_uniform_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let t = uniform(&[4, 5], -0.5, 0.5, &mut rng).unwrap();
    assert!(t.get_f32_data().unwrap().iter().all(|&x| (-0.5..0.5).contains(&x)));
    assert!(uniform(&[1], 1.0, 1.0, &mut rng).is_err());
}
