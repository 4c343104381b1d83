//! Runs the completeness verifier over a small softmax classifier in every mode and
//! prints the largest convergence delta of each run.
//!
//! `cargo run -p neurarust-attr --example completeness_report [seed]`

use neurarust_attr::{ApproximationMethod, AttributionMode, CompletenessVerifier, Target, VerifierConfig};
use neurarust_core::nn::{Linear, ReLU, Sequential, Softmax};
use neurarust_core::tensor::{arange, zeros};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let seed: u64 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);

    let model = Sequential::new()
        .with("lin1", Linear::with_rng(40, 20, true, &mut rng)?)
        .with("relu1", ReLU::new())
        .with("lin2", Linear::with_rng(20, 20, true, &mut rng)?)
        .with("relu2", ReLU::new())
        .with("lin3", Linear::with_rng(20, 10, true, &mut rng)?)
        .with("softmax", Softmax::new(1));
    let input = arange(0.0, 120.0, 1.0)?.view_detached(vec![3, 40])?;
    let baseline = zeros(&[1, 40])?;
    let target = Target::PerExample(vec![5, 5, 2]);

    let verifier = CompletenessVerifier::new(VerifierConfig::default().with_seed(seed));
    println!("{:<14} {:<18} {:>12}  result", "mode", "method", "max |delta|");
    for mode in AttributionMode::ALL {
        for method in ApproximationMethod::ALL {
            match verifier.verify(&model, &input, &target, Some(&baseline), mode, method) {
                Ok(report) => println!(
                    "{:<14} {:<18} {:>12.3e}  ok",
                    mode.to_string(),
                    method.to_string(),
                    report.max_abs_delta
                ),
                Err(err) => println!("{:<14} {:<18} {:>12}  {}", mode.to_string(), method.to_string(), "-", err),
            }
        }
    }
    Ok(())
}
