//! Mono sample-rate conversion using rubato.

use ps_core::error::{Result, ScreeningError};
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

/// Resample a mono signal from `input_rate` to `output_rate`.
///
/// The whole signal is processed as a single chunk, the resampler is flushed,
/// and its output delay is trimmed so the result stays time-aligned with the
/// input. If both rates match, returns a copy without resampling.
///
/// # Errors
/// Returns [`ScreeningError::Decode`] if a rate is zero or rubato rejects the
/// conversion.
///
/// # Example
/// ```
/// use ps_audio::resample::resample_mono;
/// let out = resample_mono(&vec![0.0f32; 44_100], 44_100, 16_000).unwrap();
/// assert!((out.len() as i64 - 16_000).abs() <= 1);
/// ```
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == 0 || output_rate == 0 {
        return Err(ScreeningError::Decode(format!(
            "fréquence invalide pour le rééchantillonnage : {input_rate} -> {output_rate}"
        )));
    }
    if input_rate == output_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = f64::from(output_rate) / f64::from(input_rate);
    let expected = (input.len() as f64 * ratio).round() as usize;

    let mut resampler = FastFixedIn::<f32>::new(
        ratio,
        1.0,
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| ScreeningError::Decode(format!("Failed to create resampler: {e}")))?;

    let delay = resampler.output_delay();
    let mut out = resampler
        .process(&[input], None)
        .map_err(|e| ScreeningError::Decode(format!("Resampling failed: {e}")))?
        .swap_remove(0);

    // Flush until the delayed tail has been emitted.
    while out.len() < delay + expected {
        let tail = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| ScreeningError::Decode(format!("Resampling flush failed: {e}")))?
            .swap_remove(0);
        if tail.is_empty() {
            break;
        }
        out.extend_from_slice(&tail);
    }

    let start = delay.min(out.len());
    let end = (delay + expected).min(out.len());
    log::debug!(
        "Resampled {} frames @ {input_rate}Hz to {} frames @ {output_rate}Hz",
        input.len(),
        end - start
    );
    Ok(out[start..end].to_vec())
}
