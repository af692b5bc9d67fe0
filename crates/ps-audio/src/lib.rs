// Audio decoding, short-time analysis, and feature assembly for phonoscreen.

pub mod decode;
pub mod features;
pub mod fft;
pub mod frames;
pub mod hpss;
pub mod perturbation;
pub mod resample;
pub mod spectral;
pub mod stats;
