#![allow(missing_docs)]

use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use varrs_manifest::{ChunkIndices, ChunkManifest, VirtualChunkRef};

fn full_manifest(location: &str, rows: u64, cols: u64) -> ChunkManifest {
    let mut chunks = HashMap::with_capacity(usize::try_from(rows * cols).unwrap());
    for i in 0..rows {
        for j in 0..cols {
            chunks.insert(
                ChunkIndices::from([i, j].as_slice()),
                VirtualChunkRef::new(location.to_string(), (i * cols + j) * 4096, 4096),
            );
        }
    }
    ChunkManifest::new(vec![rows, cols], chunks).unwrap()
}

fn manifest_merge(c: &mut Criterion) {
    let a = full_manifest("s3://bucket/a.nc", 512, 512);
    let b = full_manifest("s3://bucket/b.nc", 512, 512);

    c.bench_function("concatenate 2x 512x512", |bench| {
        bench.iter(|| ChunkManifest::concatenate(&[&a, &b], 0).unwrap());
    });

    c.bench_function("stack 2x 512x512", |bench| {
        bench.iter(|| ChunkManifest::stack(&[&a, &b], 0).unwrap());
    });
}

criterion_group!(benches, manifest_merge);
criterion_main!(benches);
