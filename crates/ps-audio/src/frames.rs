/// How a signal is extended before centred framing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadMode {
    /// Pad with zeros.
    Zero,
    /// Repeat the first/last sample.
    Edge,
}

/// Pad `samples` by `frame_len / 2` on each side so frame `t` is centred on
/// sample `t * hop`.
///
/// # Example
/// ```
/// use ps_audio::frames::{pad_centered, PadMode};
/// let padded = pad_centered(&[1.0, 2.0], 4, PadMode::Edge);
/// assert_eq!(padded, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
/// ```
#[must_use]
pub fn pad_centered(samples: &[f32], frame_len: usize, mode: PadMode) -> Vec<f32> {
    let half = frame_len / 2;
    let (head, tail) = match mode {
        PadMode::Zero => (0.0, 0.0),
        PadMode::Edge => (
            samples.first().copied().unwrap_or(0.0),
            samples.last().copied().unwrap_or(0.0),
        ),
    };
    let mut padded = Vec::with_capacity(samples.len() + 2 * half);
    padded.resize(half, head);
    padded.extend_from_slice(samples);
    padded.resize(padded.len() + half, tail);
    padded
}

/// Number of centred frames for a signal of `len` samples.
///
/// # Example
/// ```
/// use ps_audio::frames::frame_count;
/// assert_eq!(frame_count(16_000, 512), 32);
/// assert_eq!(frame_count(1, 512), 1);
/// ```
#[must_use]
pub fn frame_count(len: usize, hop: usize) -> usize {
    1 + len / hop
}

/// Iterate over the centred frames of an already padded signal.
///
/// Frames past the end of `padded` are zero-extended so every yielded frame
/// has exactly `frame_len` samples.
pub fn frames(
    padded: &[f32],
    original_len: usize,
    frame_len: usize,
    hop: usize,
) -> impl Iterator<Item = Vec<f32>> + '_ {
    (0..frame_count(original_len, hop)).map(move |t| {
        let start = (t * hop).min(padded.len());
        let end = (start + frame_len).min(padded.len());
        let mut frame = padded[start..end].to_vec();
        frame.resize(frame_len, 0.0);
        frame
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padding_surrounds_signal() {
        let padded = pad_centered(&[1.0, 2.0, 3.0], 4, PadMode::Zero);
        assert_eq!(padded, vec![0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn every_frame_has_full_length() {
        let samples = vec![0.5f32; 1000];
        let padded = pad_centered(&samples, 256, PadMode::Zero);
        let all: Vec<_> = frames(&padded, samples.len(), 256, 100).collect();
        assert_eq!(all.len(), frame_count(1000, 100));
        assert!(all.iter().all(|f| f.len() == 256));
    }

    #[test]
    fn first_frame_is_centred_on_first_sample() {
        let samples: Vec<f32> = (1..=8).map(|i| i as f32).collect();
        let padded = pad_centered(&samples, 4, PadMode::Zero);
        let first = frames(&padded, samples.len(), 4, 2).next().unwrap();
        assert_eq!(first, vec![0.0, 0.0, 1.0, 2.0]);
    }
}
