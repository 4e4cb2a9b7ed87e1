use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::grid::Grid;

/// Vertex data for GPU: position, normal and color, 9 floats in total.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Number of floats each vertex contributes to the flat vertex buffer.
pub const FLOATS_PER_VERTEX: usize = 9;

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Generated mesh ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct TerrainMesh {
    pub vertices: Vec<Vertex>,
    /// Triangle list, two triangles per grid cell.
    pub indices: Vec<u32>,
    size: usize,
}

impl TerrainMesh {
    /// Assemble the mesh from per-vertex grids of equal size.
    ///
    /// Vertex `(i, j)` lands at index `i * size + j` with position
    /// `(i / size, height, j / size)`. Triangles are emitted for every cell
    /// whose four corners are all inside the grid, so the sheet is open at
    /// the wrap seam even though the grids themselves are periodic.
    pub fn assemble(heights: &Grid<f32>, normals: &Grid<Vec3>, colors: &Grid<Vec3>) -> Self {
        debug_assert_eq!(heights.size(), normals.size());
        debug_assert_eq!(heights.size(), colors.size());

        let size = heights.size();
        let scale = size as f32;

        let vertices = heights
            .cells()
            .iter()
            .zip(normals.cells())
            .zip(colors.cells())
            .enumerate()
            .map(|(idx, ((&h, n), c))| Vertex {
                position: [(idx / size) as f32 / scale, h, (idx % size) as f32 / scale],
                normal: n.to_array(),
                color: c.to_array(),
            })
            .collect();

        Self {
            vertices,
            indices: triangle_indices(size),
            size,
        }
    }

    /// Side length of the grid the mesh was built from.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Interleaved vertex buffer as a flat float slice.
    pub fn vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    /// Line-list indices for wireframe rendering.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let size = self.size;
        if size == 0 {
            return Vec::new();
        }
        let mut indices = Vec::with_capacity(4 * size * (size - 1));

        // Lines along j
        for i in 0..size {
            for j in 0..size - 1 {
                let idx = (i * size + j) as u32;
                indices.push(idx);
                indices.push(idx + 1);
            }
        }

        // Lines along i
        for i in 0..size - 1 {
            for j in 0..size {
                let idx = (i * size + j) as u32;
                indices.push(idx);
                indices.push(idx + size as u32);
            }
        }

        indices
    }

    /// Line-list endpoints from every vertex along its normal.
    ///
    /// Pairs of points `(p, p + n * length)`; renderers usually pass `1 / size`.
    pub fn normal_lines(&self, length: f32) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .flat_map(|v| {
                let p = Vec3::from_array(v.position);
                let tip = p + Vec3::from_array(v.normal) * length;
                [v.position, tip.to_array()]
            })
            .collect()
    }
}

/// Two triangles per interior cell: `(idx, idx+1, idx+size)` and
/// `(idx+size, idx+1, idx+size+1)`. The loop bounds stop one short of the
/// last row and column, which yields exactly `(size - 1)² * 6` indices.
fn triangle_indices(size: usize) -> Vec<u32> {
    if size < 2 {
        return Vec::new();
    }
    let stride = size as u32;
    let mut indices = Vec::with_capacity((size - 1) * (size - 1) * 6);

    for i in 0..size - 1 {
        for j in 0..size - 1 {
            let idx = (i * size + j) as u32;
            indices.extend_from_slice(&[idx, idx + 1, idx + stride]);
            indices.extend_from_slice(&[idx + stride, idx + 1, idx + stride + 1]);
        }
    }

    indices
}
