use bytemuck::{Pod, Zeroable};
use vibequest_common::ObjectPose;

/// One corner of a slice quad. `position.z` and `texcoord.z` both carry the
/// layer index; the vertex shader turns one into depth and the fragment
/// shader uses the other to pick the texture array layer.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct SliceVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 3],
}

/// Per-instance placement, matching the pose layout on the CPU side.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct InstanceData {
    pub location: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: f32,
}

impl From<&ObjectPose> for InstanceData {
    fn from(pose: &ObjectPose) -> Self {
        InstanceData {
            location: pose.location.to_array(),
            scale: pose.scale.to_array(),
            rotation: pose.rotation,
        }
    }
}

/// Quad corners spanning clip space, with 0..1 texture coordinates.
#[rustfmt::skip]
const QUAD: [[f32; 4]; 6] = [
    // x, y, u, v
    [-1.0, -1.0, 0.0, 0.0],
    [-1.0,  1.0, 0.0, 1.0],
    [ 1.0, -1.0, 1.0, 0.0],
    [ 1.0, -1.0, 1.0, 0.0],
    [-1.0,  1.0, 0.0, 1.0],
    [ 1.0,  1.0, 1.0, 1.0],
];

/// Build the slice mesh for a volume of `levels` layers: one quad per
/// layer, emitted top layer first so the draw order descends the stack.
pub fn slice_vertices(levels: u32) -> Vec<SliceVertex> {
    let mut vertices = Vec::with_capacity(levels as usize * 6);
    for layer in (0..levels).rev() {
        for corner in QUAD {
            vertices.push(SliceVertex {
                position: [corner[0], corner[1], layer as f32],
                texcoord: [corner[2], corner[3], layer as f32],
            });
        }
    }
    vertices
}

/// Vertex buffer offset of the quad for `layer` within [`slice_vertices`].
pub fn layer_vertex_offset(levels: u32, layer: u32) -> u32 {
    (levels - 1 - layer) * 6
}

pub fn instances_from_poses(poses: &[ObjectPose]) -> Vec<InstanceData> {
    poses.iter().map(InstanceData::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_vertices_per_layer_top_first() {
        let verts = slice_vertices(4);
        assert_eq!(verts.len(), 24);
        assert_eq!(verts[0].position[2], 3.0);
        assert_eq!(verts[0].texcoord[2], 3.0);
        assert_eq!(verts[23].position[2], 0.0);
    }

    #[test]
    fn layer_offset_indexes_into_the_descending_order() {
        let verts = slice_vertices(8);
        let offset = layer_vertex_offset(8, 2) as usize;
        assert_eq!(verts[offset].position[2], 2.0);
    }

    #[test]
    fn instance_layout_is_28_bytes() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 28);
    }
}
