use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::frames::{PadMode, frames, pad_centered};

/// Complex short-time spectrum, `frames[t][k]` for frame `t` and bin `k`.
#[derive(Clone, Debug)]
pub struct Stft {
    n_bins: usize,
    frames: Vec<Vec<Complex<f32>>>,
}

impl Stft {
    /// Number of frequency bins per frame (`n_fft / 2 + 1`).
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Number of frames.
    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Per-frame complex bins.
    #[must_use]
    pub fn frames(&self) -> &[Vec<Complex<f32>>] {
        &self.frames
    }

    /// Magnitude spectrogram, same layout as [`Stft::frames`].
    #[must_use]
    pub fn magnitudes(&self) -> Vec<Vec<f32>> {
        self.frames
            .iter()
            .map(|f| f.iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Copy with every bin multiplied by the matching `mask` entry.
    #[must_use]
    pub fn masked(&self, mask: &[Vec<f32>]) -> Self {
        let frames = self
            .frames
            .iter()
            .zip(mask)
            .map(|(f, m)| f.iter().zip(m).map(|(c, &g)| *c * g).collect())
            .collect();
        Self {
            n_bins: self.n_bins,
            frames,
        }
    }
}

/// STFT pipeline: centred, Hann-windowed real FFT with overlap-add inverse.
///
/// Pre-allocates the FFT plans and scratch buffers once per pipeline.
///
/// # Example
/// ```
/// use ps_audio::fft::StftPipeline;
/// let mut stft = StftPipeline::new(256, 64);
/// let spec = stft.forward(&vec![0.0f32; 1000]);
/// assert_eq!(spec.n_bins(), 129);
/// assert_eq!(spec.n_frames(), 1 + 1000 / 64);
/// ```
pub struct StftPipeline {
    n_fft: usize,
    hop: usize,
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<Complex<f32>>,
    output_buf: Vec<f32>,
    fwd_scratch: Vec<Complex<f32>>,
    inv_scratch: Vec<Complex<f32>>,
    /// Periodic Hann window coefficients.
    window: Vec<f32>,
}

impl StftPipeline {
    /// Create a pipeline for frames of `n_fft` samples spaced by `hop`.
    ///
    /// # Panics
    /// Panics if `n_fft` or `hop` is 0.
    #[must_use]
    pub fn new(n_fft: usize, hop: usize) -> Self {
        assert!(n_fft > 0, "FFT size must be > 0");
        assert!(hop > 0, "hop length must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(n_fft);
        let inverse = planner.plan_fft_inverse(n_fft);

        let window = hann_periodic(n_fft);

        Self {
            n_fft,
            hop,
            input_buf: forward.make_input_vec(),
            spectrum_buf: forward.make_output_vec(),
            output_buf: inverse.make_output_vec(),
            fwd_scratch: forward.make_scratch_vec(),
            inv_scratch: inverse.make_scratch_vec(),
            forward,
            inverse,
            window,
        }
    }

    /// FFT size.
    #[must_use]
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Hop length.
    #[must_use]
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Forward STFT of `samples`, zero-padded by `n_fft / 2` on both sides.
    pub fn forward(&mut self, samples: &[f32]) -> Stft {
        let padded = pad_centered(samples, self.n_fft, PadMode::Zero);
        let n_bins = self.spectrum_buf.len();
        let mut out = Vec::new();

        for frame in frames(&padded, samples.len(), self.n_fft, self.hop) {
            for ((slot, &x), &w) in self.input_buf.iter_mut().zip(&frame).zip(&self.window) {
                *slot = x * w;
            }

            if self
                .forward
                .process_with_scratch(
                    &mut self.input_buf,
                    &mut self.spectrum_buf,
                    &mut self.fwd_scratch,
                )
                .is_err()
            {
                out.push(vec![Complex::new(0.0, 0.0); n_bins]);
                continue;
            }
            out.push(self.spectrum_buf.clone());
        }

        Stft {
            n_bins,
            frames: out,
        }
    }

    /// Inverse STFT by windowed overlap-add, trimmed to `length` samples.
    ///
    /// Samples whose summed squared window is negligible are left at zero.
    pub fn inverse(&mut self, stft: &Stft, length: usize) -> Vec<f32> {
        let half = self.n_fft / 2;
        let total = half + length + self.n_fft + stft.n_frames() * self.hop;
        let mut signal = vec![0.0f32; total];
        let mut envelope = vec![0.0f32; total];
        let scale = 1.0 / self.n_fft as f32;

        for (t, bins) in stft.frames().iter().enumerate() {
            self.spectrum_buf.copy_from_slice(bins);
            // Real-signal spectra carry no imaginary part at DC/Nyquist.
            if let Some(dc) = self.spectrum_buf.first_mut() {
                dc.im = 0.0;
            }
            if self.n_fft.is_multiple_of(2)
                && let Some(nyq) = self.spectrum_buf.last_mut()
            {
                nyq.im = 0.0;
            }

            if self
                .inverse
                .process_with_scratch(
                    &mut self.spectrum_buf,
                    &mut self.output_buf,
                    &mut self.inv_scratch,
                )
                .is_err()
            {
                continue;
            }

            let offset = t * self.hop;
            for (i, (&y, &w)) in self.output_buf.iter().zip(&self.window).enumerate() {
                signal[offset + i] += y * scale * w;
                envelope[offset + i] += w * w;
            }
        }

        signal
            .iter()
            .zip(&envelope)
            .skip(half)
            .take(length)
            .map(|(&s, &e)| if e > f32::MIN_POSITIVE { s / e } else { 0.0 })
            .collect()
    }
}

/// Periodic Hann window (the DFT-even variant used for STFT analysis).
fn hann_periodic(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}
