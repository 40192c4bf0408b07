//! Benchmark for terrain and chunk generation.
//!
//! Run with: cargo bench --bench terrain_benchmark

use cgmath::Point3;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxel_streaming::engine_state::voxels::chunk::Chunk;
use voxel_streaming::engine_state::voxels::terrain::TerrainGenerator;
use voxel_streaming::{
    Biome, BlockCatalog, ChunkCoordinate, LoggingPresenter, VoxelMod, WorldConfig, WorldMap,
};

fn benchmark_single_voxel(c: &mut Criterion) {
    let config = WorldConfig::default();
    let generator = TerrainGenerator::new(&config, Biome::default());

    c.bench_function("generate_voxel", |b| {
        let mut x = 16;
        let mut structures: Vec<VoxelMod> = Vec::new();
        b.iter(|| {
            x = 16 + (x + 7) % 1500;
            structures.clear();
            black_box(generator.generate_voxel(Point3::new(x, black_box(40), 800), &mut structures))
        });
    });
}

fn benchmark_chunk_column(c: &mut Criterion) {
    let config = WorldConfig::default();
    let generator = TerrainGenerator::new(&config, Biome::default());

    let mut group = c.benchmark_group("chunk_column");
    group.throughput(Throughput::Elements(config.voxels_per_chunk() as u64));
    group.sample_size(20);
    group.bench_function("16x128x16", |b| {
        let mut coordinate = 1;
        b.iter(|| {
            coordinate = 1 + coordinate % 90;
            let mut chunk = Chunk::new(
                ChunkCoordinate::new(coordinate, 50),
                config.chunk_width,
                config.chunk_height,
            );
            let mut structures: Vec<VoxelMod> = Vec::new();
            chunk.initialize(&generator, &mut structures);
            black_box((chunk, structures))
        });
    });
    group.finish();
}

fn benchmark_steady_walk(c: &mut Criterion) {
    let config = WorldConfig {
        view_distance_in_chunks: 3,
        ..WorldConfig::default()
    };

    let mut group = c.benchmark_group("world_map");
    group.sample_size(10);
    group.bench_function("walk_64_ticks", |b| {
        b.iter_with_setup(
            || {
                let mut world = WorldMap::new(
                    config.clone(),
                    Biome::default(),
                    BlockCatalog::default(),
                    LoggingPresenter::new(),
                )
                .unwrap();
                world.generate_map();
                world
            },
            |mut world| {
                let spawn = world.spawn_position();
                for tick in 0..64 {
                    let observer = Point3::new(spawn.x + tick as f32, spawn.y, spawn.z);
                    black_box(world.tick(observer));
                }
                world
            },
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_voxel,
    benchmark_chunk_column,
    benchmark_steady_walk
);
criterion_main!(benches);
