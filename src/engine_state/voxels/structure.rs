//! # Structure Module
//!
//! Multi-voxel structures emitted by terrain generation. A structure is never
//! written straight into a chunk: it is expressed as a batch of [`VoxelMod`]s
//! so that voxels spilling into neighbouring (possibly unbuilt) chunks are
//! applied by the modification queue like any other edit.

use cgmath::Point3;

use super::block::block_type::BlockType;
use super::modifications::VoxelMod;

/// Appends a tree rooted at `root` (the surface voxel) to `structures`.
///
/// The trunk rises from `root.y + 1` to `root.y + height - 1`; the canopy
/// wraps the top of the trunk in two wide layers and caps it with two narrow
/// ones. The height is drawn from `rng` within `[min_height, max_height]`.
pub fn create_tree(
    root: Point3<i32>,
    rng: &mut fastrand::Rng,
    min_height: i32,
    max_height: i32,
    structures: &mut impl Extend<VoxelMod>,
) {
    let height = rng.i32(min_height..=max_height.max(min_height));

    structures.extend(
        (1..height).map(|i| VoxelMod::new(Point3::new(root.x, root.y + i, root.z), BlockType::WOOD)),
    );

    let top = root.y + height;
    let mut canopy = Vec::new();
    for dy in -2..=1 {
        let radius: i32 = if dy < 0 { 2 } else { 1 };
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                // Wide layers lose their corners.
                if radius == 2 && dx.abs() == 2 && dz.abs() == 2 {
                    continue;
                }
                // The trunk still occupies the centre of the wide layers.
                if dy < 0 && dx == 0 && dz == 0 {
                    continue;
                }
                canopy.push(VoxelMod::new(
                    Point3::new(root.x + dx, top + dy, root.z + dz),
                    BlockType::LEAVES,
                ));
            }
        }
    }
    structures.extend(canopy);
}
