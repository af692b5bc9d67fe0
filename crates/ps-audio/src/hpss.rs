//! Harmonic/percussive separation by median filtering of the magnitude
//! spectrogram (Fitzgerald, 2010).
//!
//! Harmonic energy is smooth along time, percussive energy is smooth along
//! frequency. Each component gets a power-2 soft mask and is resynthesised
//! with the inverse STFT.

use crate::fft::StftPipeline;

/// Time-domain components, each the same length as the input.
#[derive(Clone, Debug)]
pub struct HpssComponents {
    /// Tonal part of the signal.
    pub harmonic: Vec<f32>,
    /// Transient part of the signal.
    pub percussive: Vec<f32>,
}

/// Split `samples` into harmonic and percussive components.
///
/// # Panics
/// Panics if `n_fft`, `hop` or `kernel` is 0.
///
/// # Example
/// ```
/// use ps_audio::hpss::separate;
/// let parts = separate(&vec![0.0f32; 4000], 512, 128, 17);
/// assert_eq!(parts.harmonic.len(), 4000);
/// assert!(parts.percussive.iter().all(|&x| x == 0.0));
/// ```
#[must_use]
pub fn separate(samples: &[f32], n_fft: usize, hop: usize, kernel: usize) -> HpssComponents {
    assert!(kernel > 0, "median kernel must be > 0");

    let mut pipeline = StftPipeline::new(n_fft, hop);
    let spec = pipeline.forward(samples);
    let mags = spec.magnitudes();

    let harm = median_along_time(&mags, kernel);
    let perc = median_along_freq(&mags, kernel);

    let mut mask_h = Vec::with_capacity(mags.len());
    let mut mask_p = Vec::with_capacity(mags.len());
    for (h_row, p_row) in harm.iter().zip(&perc) {
        let (mh, mp): (Vec<f32>, Vec<f32>) = h_row
            .iter()
            .zip(p_row)
            .map(|(&h, &p)| soft_masks(h, p))
            .unzip();
        mask_h.push(mh);
        mask_p.push(mp);
    }

    let harmonic = pipeline.inverse(&spec.masked(&mask_h), samples.len());
    let percussive = pipeline.inverse(&spec.masked(&mask_p), samples.len());

    HpssComponents {
        harmonic,
        percussive,
    }
}

/// Power-2 Wiener-style masks. Bins where both filtered magnitudes vanish go to zero.
fn soft_masks(h: f32, p: f32) -> (f32, f32) {
    let h2 = h * h;
    let p2 = p * p;
    let denom = h2 + p2;
    if denom <= f32::MIN_POSITIVE {
        (0.0, 0.0)
    } else {
        (h2 / denom, p2 / denom)
    }
}

/// Median of each bin across neighbouring frames.
fn median_along_time(mags: &[Vec<f32>], kernel: usize) -> Vec<Vec<f32>> {
    let n_frames = mags.len();
    let n_bins = mags.first().map_or(0, Vec::len);
    let mut out = vec![vec![0.0f32; n_bins]; n_frames];
    let mut track = vec![0.0f32; n_frames];
    let mut window = Vec::with_capacity(kernel);

    for k in 0..n_bins {
        for (slot, frame) in track.iter_mut().zip(mags) {
            *slot = frame[k];
        }
        for (t, row) in out.iter_mut().enumerate() {
            row[k] = median_at(&track, t, kernel, &mut window);
        }
    }
    out
}

/// Median of each frame across neighbouring bins.
fn median_along_freq(mags: &[Vec<f32>], kernel: usize) -> Vec<Vec<f32>> {
    let mut window = Vec::with_capacity(kernel);
    mags.iter()
        .map(|frame| {
            (0..frame.len())
                .map(|k| median_at(frame, k, kernel, &mut window))
                .collect()
        })
        .collect()
}

/// Median of the `kernel` values centred on `center`, with half-sample
/// symmetric reflection at the boundaries.
fn median_at(values: &[f32], center: usize, kernel: usize, window: &mut Vec<f32>) -> f32 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let half = (kernel / 2) as isize;
    window.clear();
    for offset in -half..=half {
        window.push(values[reflect(center as isize + offset, n)]);
    }
    let mid = window.len() / 2;
    let (_, median, _) = window.select_nth_unstable_by(mid, f32::total_cmp);
    *median
}

/// Map any index onto `0..n` by repeated mirror reflection (`d c b a | a b c d | d c b a`).
fn reflect(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_mirrors_edges() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(-9, 1), 0);
    }

    #[test]
    fn median_ignores_single_spike() {
        let values = [1.0, 1.0, 100.0, 1.0, 1.0];
        let mut w = Vec::new();
        assert_eq!(median_at(&values, 2, 3, &mut w), 1.0);
    }

    #[test]
    fn masks_sum_to_one() {
        let (h, p) = soft_masks(3.0, 4.0);
        assert!((h + p - 1.0).abs() < 1e-6);
        assert_eq!(soft_masks(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn steady_tone_is_mostly_harmonic() {
        let sr = 16_000.0f32;
        let tone: Vec<f32> = (0..16_000)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr).sin())
            .collect();
        let parts = separate(&tone, 1024, 256, 17);
        let energy = |x: &[f32]| x.iter().map(|v| v * v).sum::<f32>();
        assert!(energy(&parts.harmonic) > 4.0 * energy(&parts.percussive));
    }

    #[test]
    fn click_train_is_mostly_percussive() {
        let mut clicks = vec![0.0f32; 16_000];
        for i in (0..clicks.len()).step_by(4000) {
            clicks[i] = 1.0;
        }
        let parts = separate(&clicks, 1024, 256, 17);
        let energy = |x: &[f32]| x.iter().map(|v| v * v).sum::<f32>();
        assert!(energy(&parts.percussive) > energy(&parts.harmonic));
    }

    #[test]
    fn components_match_input_length() {
        let parts = separate(&[0.1, -0.2, 0.3], 64, 16, 5);
        assert_eq!(parts.harmonic.len(), 3);
        assert_eq!(parts.percussive.len(), 3);
    }
}
