use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Stopping voltage against light frequency, as a class would record it:
/// a straight line with a little scatter and one misread point.
fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);
    let scatter = Normal::new(0.0, 0.05).context("building noise model")?;

    // Frequencies: 1200 → 2400 THz, step 50
    let frequency_thz: Vec<f64> = (0..=24).map(|i| 1200.0 + i as f64 * 50.0).collect();
    let work_function_ev = 4.7;
    let slope = 6.626e-34 / 1.602e-19 * 1e12;

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["frequency_thz", "stopping_voltage_v"])?;
    for (i, &f) in frequency_thz.iter().enumerate() {
        let mut u = slope * f - work_function_ev + scatter.sample(&mut rng);
        if i == 17 {
            u += 1.5;
        }
        writer.write_record([format!("{f:.1}"), format!("{u:.4}")])?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Wrote {} rows to {output_path}", frequency_thz.len());
    println!("Wrote {} rows to {output_path}", frequency_thz.len());
    Ok(())
}
