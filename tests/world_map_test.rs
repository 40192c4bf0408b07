//! # World Map Integration Test
//!
//! Walks an observer across a small noise-generated world and checks that the
//! chunk maps, the presenter and the terrain stay consistent.

use std::collections::HashSet;

use cgmath::Point3;
use voxel_streaming::{
    Biome, BlockCatalog, BlockType, ChunkCoordinate, ChunkPresenter, ConfigError, VoxelMod,
    WorldConfig, WorldMap,
};
use voxel_streaming::engine_state::voxels::chunk::Chunk;

/// Tracks which chunks the host currently shows.
#[derive(Default)]
struct RecordingPresenter {
    visible: HashSet<ChunkCoordinate>,
    meshes: usize,
}

impl ChunkPresenter for RecordingPresenter {
    fn rebuild_mesh(&mut self, chunk: &Chunk) {
        self.meshes += 1;
        if chunk.is_visible() {
            self.visible.insert(chunk.coordinate);
        } else {
            self.visible.remove(&chunk.coordinate);
        }
    }

    fn set_visible(&mut self, coordinate: ChunkCoordinate, visible: bool) {
        if visible {
            self.visible.insert(coordinate);
        } else {
            self.visible.remove(&coordinate);
        }
    }
}

const CONFIG_JSON: &str = r#"{
    "chunk_width": 8,
    "chunk_height": 64,
    "map_size_in_chunks": 40,
    "view_distance_in_chunks": 3
}"#;

const BIOME_JSON: &str = r#"{
    "name": "Test hills",
    "solid_ground_height": 20,
    "terrain_height": 20,
    "water_height": 22,
    "sand_depth": 2,
    "stone_height": 36,
    "tree_zone_height": 28,
    "tree_zone_threshold": 0.4,
    "tree_placement_threshold": 0.6,
    "min_tree_height": 4,
    "max_tree_height": 7,
    "lodes": [
        { "name": "Stone", "block_type": "STONE", "min_height": 0, "max_height": 64,
          "scale": 0.1, "threshold": 0.0, "noise_offset": 0.0 },
        { "name": "Coal", "block_type": "COAL_ORE", "min_height": 2, "max_height": 30,
          "scale": 0.2, "threshold": 0.6, "noise_offset": 300.0 }
    ]
}"#;

fn world() -> WorldMap<RecordingPresenter> {
    let config = WorldConfig::from_json_str(CONFIG_JSON).unwrap();
    let biome = Biome::from_json_str(BIOME_JSON).unwrap();
    let mut world =
        WorldMap::new(config, biome, BlockCatalog::default(), RecordingPresenter::default())
            .unwrap();
    world.generate_map();
    world
}

fn assert_maps_disjoint<P: ChunkPresenter>(world: &WorldMap<P>) {
    let streamer = world.streamer();
    for coordinate in streamer.active_coordinates() {
        assert!(!streamer.is_out_of_view(coordinate), "{coordinate:?} active and out of view");
        assert!(!streamer.is_pending(coordinate), "{coordinate:?} active and pending");
    }
    for coordinate in streamer.out_of_view_coordinates() {
        assert!(!streamer.is_pending(coordinate), "{coordinate:?} out of view and pending");
    }
}

/// Ticks in place until every queue has drained.
fn settle<P: ChunkPresenter>(world: &mut WorldMap<P>, observer: Point3<f32>) {
    for _ in 0..10_000 {
        world.tick(observer);
        if world.streamer().pending_len() == 0
            && world.rebuilds().is_empty()
            && world.modifications().is_empty()
            && !world.modifications().is_applying()
        {
            return;
        }
    }
    panic!("world did not settle");
}

#[test]
fn walking_keeps_maps_disjoint_and_presenter_in_sync() {
    let mut world = world();
    let spawn = world.spawn_position();
    assert_eq!(world.current_coordinate(), Some(ChunkCoordinate::new(20, 20)));

    let mut path = Vec::new();
    for step in 0..80 {
        path.push(Point3::new(spawn.x + step as f32, spawn.y, spawn.z));
    }
    for step in 0..80 {
        path.push(Point3::new(spawn.x + 80.0, spawn.y, spawn.z + step as f32));
    }
    for step in (0..80).rev() {
        path.push(Point3::new(spawn.x + step as f32, spawn.y, spawn.z + step as f32));
    }

    for observer in &path {
        let report = world.tick(*observer);
        assert!(report.drain.routed() <= world.config().modifications_per_tick);
        assert_maps_disjoint(&world);
    }
    settle(&mut world, spawn);
    assert_maps_disjoint(&world);

    let centre = world.current_coordinate().unwrap();
    assert_eq!(centre, ChunkCoordinate::new(20, 20));
    let view_distance = world.config().view_distance_in_chunks;
    let streamer = world.streamer();

    let active: HashSet<ChunkCoordinate> = streamer.active_coordinates().collect();
    for x in centre.x - view_distance..centre.x + view_distance {
        for z in centre.z - view_distance..centre.z + view_distance {
            assert!(active.contains(&ChunkCoordinate::new(x, z)), "({x}, {z}) not active");
        }
    }
    for coordinate in &active {
        assert!(coordinate.chebyshev_distance(centre) <= view_distance);
        assert!(streamer.get(*coordinate).unwrap().is_visible());
    }
    for coordinate in streamer.out_of_view_coordinates() {
        assert!(!streamer.get(coordinate).unwrap().is_visible());
    }
    assert!(streamer.out_of_view_len() > 0);
    assert_eq!(world.presenter().visible, active);
}

#[test]
fn returning_to_spawn_reuses_parked_chunks() {
    let mut world = world();
    let spawn = world.spawn_position();
    let built_at_spawn = world.streamer().chunks_built();

    let away = Point3::new(spawn.x + 64.0, spawn.y, spawn.z);
    settle(&mut world, away);
    let built_away = world.streamer().chunks_built();
    assert!(built_away > built_at_spawn);

    let report = world.tick(spawn);
    let update = report.window.unwrap();
    assert_eq!(update.reactivated.len(), 36);
    assert!(update.enqueued.is_empty());
    settle(&mut world, spawn);
    assert_eq!(world.streamer().chunks_built(), built_away);
}

#[test]
fn terrain_floor_and_ceiling_hold_everywhere() {
    let world = world();
    let map_size = world.config().map_size_in_voxels();
    for x in (8..map_size).step_by(37) {
        for z in (8..map_size).step_by(41) {
            assert_eq!(world.get_existing_voxel(x, 0, z), BlockType::BEDROCK, "({x}, 0, {z})");
            assert_eq!(world.get_existing_voxel(x, -1, z), BlockType::AIR);
            assert_eq!(world.get_existing_voxel(x, 64, z), BlockType::AIR);
        }
    }
    assert_eq!(world.get_existing_voxel(map_size + 3, 10, 100), BlockType::AIR);
    assert_eq!(world.get_existing_voxel(-3, 10, 100), BlockType::AIR);
}

#[test]
fn identical_worlds_generate_identical_terrain() {
    let first = world();
    let second = world();
    for x in (100..220).step_by(7) {
        for z in (100..220).step_by(11) {
            for y in [1, 10, 18, 22, 26, 30, 38] {
                assert_eq!(
                    first.get_existing_voxel(x, y, z),
                    second.get_existing_voxel(x, y, z),
                    "({x}, {y}, {z})"
                );
            }
        }
    }
}

#[test]
fn edits_are_applied_within_the_view_window() {
    let mut world = world();
    let spawn = world.spawn_position();
    let target = Point3::new(spawn.x as i32, 60, spawn.z as i32);
    world.queue_modification(VoxelMod::new(target, BlockType::DIAMOND_ORE));
    assert!(!world.is_solid(Point3::new(target.x as f32, 60.5, target.z as f32)));

    settle(&mut world, spawn);
    assert_eq!(world.get_existing_voxel(target.x, 60, target.z), BlockType::DIAMOND_ORE);
    assert!(world.is_solid(Point3::new(target.x as f32 + 0.5, 60.5, target.z as f32 + 0.5)));
}

#[test]
fn bad_configuration_is_reported() {
    assert!(matches!(
        WorldConfig::from_json_str("{ \"chunk_width\": "),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        WorldConfig::from_json_file("does/not/exist.json"),
        Err(ConfigError::Io { .. })
    ));
    assert!(matches!(
        Biome::from_json_str(r#"{ "min_tree_height": 9, "max_tree_height": 3 }"#),
        Err(ConfigError::Invalid(_))
    ));
}
