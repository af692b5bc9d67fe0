use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use ps_core::error::{Result, ScreeningError};
use ps_core::waveform::Waveform;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{
    MediaSource, MediaSourceStream, MediaSourceStreamOptions, ReadOnlySource,
};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::resample::resample_mono;

/// Decode an audio file into a mono waveform at `target_rate`.
///
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia.
///
/// # Errors
/// Returns [`ScreeningError::Decode`] if the file cannot be opened, is not a
/// supported encoding, or yields no samples.
///
/// # Example
/// ```no_run
/// use ps_audio::decode::decode_file;
/// let wave = decode_file("voice.wav", 16_000).unwrap();
/// assert_eq!(wave.sample_rate(), 16_000);
/// ```
pub fn decode_file(path: impl AsRef<Path>, target_rate: u32) -> Result<Waveform> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ScreeningError::Decode(format!("Cannot open audio file {}: {e}", path.display()))
    })?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let (samples, sample_rate) = decode_source(Box::new(file), &hint)?;
    log::info!(
        "Decoded {} samples @ {}Hz from {}",
        samples.len(),
        sample_rate,
        path.display()
    );
    finish(&samples, sample_rate, target_rate)
}

/// Decode an in-memory encoded stream (e.g. an uploaded file body).
///
/// `extension` is an optional format hint such as `"wav"`.
///
/// # Errors
/// Returns [`ScreeningError::Decode`] if the bytes are empty, not a supported
/// encoding, or yield no samples.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>, target_rate: u32) -> Result<Waveform> {
    if bytes.is_empty() {
        return Err(ScreeningError::Decode("flux audio vide".into()));
    }
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }
    let (samples, sample_rate) = decode_source(Box::new(Cursor::new(bytes)), &hint)?;
    log::info!("Decoded {} samples @ {}Hz from stream", samples.len(), sample_rate);
    finish(&samples, sample_rate, target_rate)
}

/// Decode from any byte stream (socket, pipe, stdin) without buffering it first.
///
/// The stream is read forward only; formats whose demuxer needs to seek may
/// fail to probe and should go through [`decode_file`] or [`decode_bytes`].
///
/// # Errors
/// Returns [`ScreeningError::Decode`] if the stream is empty, not a supported
/// encoding, or yields no samples.
pub fn decode_reader<R>(reader: R, extension: Option<&str>, target_rate: u32) -> Result<Waveform>
where
    R: Read + Send + Sync + 'static,
{
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }
    let (samples, sample_rate) = decode_source(Box::new(ReadOnlySource::new(reader)), &hint)?;
    log::info!("Decoded {} samples @ {}Hz from reader", samples.len(), sample_rate);
    finish(&samples, sample_rate, target_rate)
}

/// Resample to the target rate and enforce the waveform invariants.
fn finish(samples: &[f32], sample_rate: u32, target_rate: u32) -> Result<Waveform> {
    if samples.is_empty() {
        return Err(ScreeningError::Decode("aucun échantillon après décodage".into()));
    }
    let resampled = resample_mono(samples, sample_rate, target_rate)?;
    Waveform::new(resampled, target_rate)
}

/// Probe, decode every packet of the default track, and downmix to mono.
fn decode_source(source: Box<dyn MediaSource>, hint: &Hint) -> Result<(Vec<f32>, u32)> {
    let mss = MediaSourceStream::new(source, MediaSourceStreamOptions::default());

    let probed = symphonia::default::get_probe()
        .format(
            hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ScreeningError::Decode(format!("Failed to probe audio format: {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| ScreeningError::Decode("No default audio track found".into()))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| ScreeningError::Decode("Sample rate unknown".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ScreeningError::Decode(format!("Failed to create audio decoder: {e}")))?;

    let track_id = track.id;
    let mut mono: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Audio decode packet error: {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Audio decode frame error: {e}");
                continue;
            }
            Err(e) => {
                return Err(ScreeningError::Decode(format!("Audio decode failed: {e}")));
            }
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        mono.extend(
            buf.samples()
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    }

    Ok((mono, sample_rate))
}
