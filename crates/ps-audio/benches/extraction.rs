use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ps_audio::features::FeatureExtractor;
use ps_audio::hpss::separate;
use ps_audio::spectral::SpectralAnalyzer;
use ps_core::config::AnalysisConfig;
use ps_core::waveform::Waveform;

fn voice_like(secs: usize) -> Waveform {
    let sr = 16_000u32;
    let samples = (0..secs * sr as usize)
        .map(|i| {
            let t = i as f32 / sr as f32;
            0.4 * (2.0 * std::f32::consts::PI * 180.0 * t).sin()
                + 0.2 * (2.0 * std::f32::consts::PI * 360.0 * t).sin()
                + 0.1 * (2.0 * std::f32::consts::PI * 540.0 * t).sin()
        })
        .collect();
    Waveform::new(samples, sr).unwrap_or_else(|e| panic!("{e}"))
}

fn bench_extraction(c: &mut Criterion) {
    let wave = voice_like(3);
    let config = AnalysisConfig::default();

    c.bench_function("spectral_3s", |b| {
        let analyzer = SpectralAnalyzer::new(config.clone());
        b.iter(|| analyzer.analyze(black_box(&wave)));
    });

    c.bench_function("hpss_3s", |b| {
        b.iter(|| separate(black_box(wave.samples()), 2048, 512, 31));
    });

    c.bench_function("extract_3s", |b| {
        let extractor = FeatureExtractor::new(config.clone());
        b.iter(|| extractor.extract(black_box(&wave)));
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
