use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectrogram::{InputDescriptor, SampleWidth, Stft, TransformConfig, WindowKind};

fn chirp(sample_rate: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * (50.0 + 200.0 * t) * t).sin()
        })
        .collect()
}

fn stft_compute(c: &mut Criterion) {
    let sample_rate = 8000.0;
    let signal = chirp(sample_rate, 80_000);
    let mut group = c.benchmark_group("stft_compute");

    for window_length in [256usize, 1024] {
        let input = InputDescriptor::new(sample_rate, signal.len(), SampleWidth::F64);
        let config =
            TransformConfig::with_window(WindowKind::Hann, window_length, window_length / 2);
        let mut stft = Stft::<f64>::new(input, config).expect("valid transform");

        group.bench_with_input(
            BenchmarkId::from_parameter(window_length),
            &window_length,
            |b, _| {
                b.iter(|| {
                    stft.compute(black_box(&signal))
                        .expect("signal matches descriptor");
                });
            },
        );
    }
    group.finish();
}

fn stft_create(c: &mut Criterion) {
    let input = InputDescriptor::new(8000.0, 80_000, SampleWidth::F64);
    let config = TransformConfig::with_window(WindowKind::BlackmanHarris, 1024, 768);

    c.bench_function("stft_create_1024", |b| {
        b.iter(|| black_box(Stft::<f64>::new(input.clone(), config.clone()).expect("valid transform")));
    });
}

fn stft_power(c: &mut Criterion) {
    let sample_rate = 8000.0;
    let signal = chirp(sample_rate, 80_000);
    let input = InputDescriptor::new(sample_rate, signal.len(), SampleWidth::F64);
    let mut stft = Stft::<f64>::new(input, TransformConfig::with_window(WindowKind::Hamming, 512, 256))
        .expect("valid transform");
    stft.compute(&signal).expect("signal matches descriptor");
    let mut power = vec![0.0; stft.spectrogram_len()];

    c.bench_function("stft_power_512", |b| {
        b.iter(|| {
            stft.write_power(black_box(&mut power))
                .expect("buffer sized to spectrogram");
        });
    });
}

criterion_group!(benches, stft_create, stft_compute, stft_power);
criterion_main!(benches);
