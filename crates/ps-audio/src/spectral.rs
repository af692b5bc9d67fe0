use ps_core::config::AnalysisConfig;
use ps_core::numeric::is_silent;
use ps_core::waveform::Waveform;

use crate::fft::StftPipeline;
use crate::stats::Summary;

/// Per-frame spectral descriptors, aligned in time (Hz).
#[derive(Clone, Debug, Default)]
pub struct SpectralDescriptors {
    /// Magnitude-weighted mean frequency.
    pub centroid: Vec<f64>,
    /// Magnitude-weighted standard deviation around the centroid.
    pub bandwidth: Vec<f64>,
    /// Frequency below which `rolloff_percent` of the magnitude lies.
    pub rolloff: Vec<f64>,
}

impl SpectralDescriptors {
    /// Number of frames.
    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.centroid.len()
    }

    /// Summary of the centroid track.
    #[must_use]
    pub fn centroid_summary(&self) -> Summary {
        Summary::of(&self.centroid)
    }

    /// Summary of the bandwidth track.
    #[must_use]
    pub fn bandwidth_summary(&self) -> Summary {
        Summary::of(&self.bandwidth)
    }

    /// Summary of the rolloff track.
    #[must_use]
    pub fn rolloff_summary(&self) -> Summary {
        Summary::of(&self.rolloff)
    }
}

/// Frame-wise centroid, bandwidth and rolloff over the magnitude spectrum.
///
/// # Example
/// ```
/// use ps_audio::spectral::SpectralAnalyzer;
/// use ps_core::config::AnalysisConfig;
/// use ps_core::waveform::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 4096], 16_000).unwrap();
/// let d = SpectralAnalyzer::new(AnalysisConfig::default()).analyze(&wave);
/// assert!(d.centroid.iter().all(|&c| c == 0.0));
/// ```
pub struct SpectralAnalyzer {
    config: AnalysisConfig,
}

impl SpectralAnalyzer {
    /// Analyzer for the given frame configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compute the three descriptor tracks of `wave`.
    #[must_use]
    pub fn analyze(&self, wave: &Waveform) -> SpectralDescriptors {
        let n_fft = self.config.n_fft;
        let mut stft = StftPipeline::new(n_fft, self.config.hop_length);
        let spec = stft.forward(wave.samples());

        let bin_hz = f64::from(wave.sample_rate()) / n_fft as f64;
        let freqs: Vec<f64> = (0..spec.n_bins()).map(|k| k as f64 * bin_hz).collect();

        let mut out = SpectralDescriptors::default();
        for frame in spec.magnitudes() {
            let mags: Vec<f64> = frame.iter().map(|&m| f64::from(m)).collect();
            let (c, b, r) = frame_descriptors(&mags, &freqs, self.config.rolloff_percent);
            out.centroid.push(c);
            out.bandwidth.push(b);
            out.rolloff.push(r);
        }

        log::debug!(
            "Spectral: {} frames, centroid moyen {:.1} Hz",
            out.n_frames(),
            out.centroid_summary().mean
        );
        out
    }
}

/// (centroid, bandwidth, rolloff) of one magnitude frame. Silent frames are all zero.
fn frame_descriptors(mags: &[f64], freqs: &[f64], rolloff_percent: f64) -> (f64, f64, f64) {
    let total: f64 = mags.iter().sum();
    if is_silent(total) {
        return (0.0, 0.0, 0.0);
    }

    let centroid = mags.iter().zip(freqs).map(|(m, f)| m * f).sum::<f64>() / total;

    let bandwidth = mags
        .iter()
        .zip(freqs)
        .map(|(m, f)| (m / total) * (f - centroid) * (f - centroid))
        .sum::<f64>()
        .sqrt();

    let threshold = rolloff_percent * total;
    let mut cumulative = 0.0;
    let mut rolloff = freqs.last().copied().unwrap_or(0.0);
    for (m, f) in mags.iter().zip(freqs) {
        cumulative += m;
        if cumulative >= threshold {
            rolloff = *f;
            break;
        }
    }

    (centroid, bandwidth, rolloff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_wave(freq: f32, secs: f32) -> Waveform {
        let sr = 16_000u32;
        let n = (sr as f32 * secs) as usize;
        let samples = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect();
        Waveform::new(samples, sr).unwrap()
    }

    #[test]
    fn silence_yields_zero_descriptors() {
        let wave = Waveform::new(vec![0.0; 16_000], 16_000).unwrap();
        let d = SpectralAnalyzer::new(AnalysisConfig::default()).analyze(&wave);
        assert_eq!(d.n_frames(), 1 + 16_000 / 512);
        for track in [&d.centroid, &d.bandwidth, &d.rolloff] {
            assert!(track.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn sine_centroid_near_tone() {
        let d = SpectralAnalyzer::new(AnalysisConfig::default()).analyze(&sine_wave(440.0, 1.0));
        let mid = d.centroid[d.n_frames() / 2];
        assert!((mid - 440.0).abs() < 30.0, "centroid {mid}");
        let rolloff = d.rolloff[d.n_frames() / 2];
        assert!(rolloff >= 400.0 && rolloff < 600.0, "rolloff {rolloff}");
    }

    #[test]
    fn tracks_are_time_aligned() {
        let d = SpectralAnalyzer::new(AnalysisConfig::default()).analyze(&sine_wave(1000.0, 0.5));
        assert_eq!(d.centroid.len(), d.bandwidth.len());
        assert_eq!(d.centroid.len(), d.rolloff.len());
    }

    #[test]
    fn single_bin_frame_has_zero_bandwidth() {
        let freqs = [0.0, 100.0, 200.0, 300.0];
        let (c, b, r) = frame_descriptors(&[0.0, 0.0, 2.0, 0.0], &freqs, 0.85);
        assert!((c - 200.0).abs() < 1e-9);
        assert!(b.abs() < 1e-9);
        assert!((r - 200.0).abs() < 1e-9);
    }

    #[test]
    fn frame_at_silence_floor_is_zeroed() {
        let freqs = [0.0, 100.0, 200.0, 300.0];
        let tiny = [0.0, 0.0, ps_core::numeric::SILENCE_FLOOR, 0.0];
        assert_eq!(frame_descriptors(&tiny, &freqs, 0.85), (0.0, 0.0, 0.0));
        let (c, _, _) = frame_descriptors(&[0.0, 0.0, 1e-9, 0.0], &freqs, 0.85);
        assert!((c - 200.0).abs() < 1e-6);
    }
}
