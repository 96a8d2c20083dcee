use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixel_mask_transform_core::{ops, ByteBuffer, Pipeline, TransformStage};
use std::hint::black_box;

// Helper to generate test data with predictable patterns
fn generate_test_data(width: u32, height: u32) -> ByteBuffer {
    let len = width as usize * height as usize * 3;
    let bytes = (0..len).map(|x| (x * 7 % 251) as u8).collect();
    ByteBuffer::new(width, height, bytes).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Elementary Ops");

    // 512x512 RGB
    let input = generate_test_data(512, 512);
    let reference = generate_test_data(512, 512);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function(BenchmarkId::new("xor_key", input.len()), |b| {
        let mut data = input.clone();
        b.iter(|| ops::xor_key(black_box(data.as_mut_slice()), 0xAA))
    });

    group.bench_function(BenchmarkId::new("xor_buffer", input.len()), |b| {
        let mut data = input.clone();
        b.iter(|| ops::xor_buffer(black_box(data.as_mut_slice()), reference.as_slice()))
    });

    group.bench_function(BenchmarkId::new("rotate_right", input.len()), |b| {
        let mut data = input.clone();
        b.iter(|| ops::rotate_right_slice(black_box(data.as_mut_slice()), 3))
    });

    let pipeline = Pipeline::new()
        .with(TransformStage::RotateRight(3))
        .with(TransformStage::XorBuffer(reference.clone()));

    group.bench_function(BenchmarkId::new("pipeline_round_trip", input.len()), |b| {
        b.iter(|| {
            let encoded = pipeline.encode(input.clone()).unwrap();
            black_box(pipeline.decode(encoded).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
