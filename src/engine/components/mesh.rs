use std::ops::Range;

use log::{ debug, warn };

use crate::engine::error::{ RenderError, RenderResult };
use crate::engine::rendering::backend::GraphicsBackend;

/// A per-vertex attribute and the fixed shader slot it streams into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    TexCoord,
    Normal,
    /// Only present in the unlit color layout; shares slot 1 with texcoords.
    Color,
}

impl VertexAttribute {
    pub fn slot(self) -> u32 {
        match self {
            VertexAttribute::Position => 0,
            VertexAttribute::TexCoord | VertexAttribute::Color => 1,
            VertexAttribute::Normal => 2,
        }
    }

    pub fn components(self) -> usize {
        match self {
            VertexAttribute::TexCoord => 2,
            _ => 3,
        }
    }
}

/// Field layout of one interleaved vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// 3 color + 3 position floats.
    C3fV3f,
    /// 2 texcoord + 3 normal + 3 position floats.
    T2fN3fV3f,
}

impl VertexLayout {
    pub fn record_width(self) -> usize {
        self.columns()
            .iter()
            .map(|(attribute, _)| attribute.components())
            .sum()
    }

    /// Column ranges within a record, in field order.
    pub fn columns(self) -> &'static [(VertexAttribute, Range<usize>)] {
        static C3F_V3F: [(VertexAttribute, Range<usize>); 2] = [
            (VertexAttribute::Color, 0..3),
            (VertexAttribute::Position, 3..6),
        ];
        static T2F_N3F_V3F: [(VertexAttribute, Range<usize>); 3] = [
            (VertexAttribute::TexCoord, 0..2),
            (VertexAttribute::Normal, 2..5),
            (VertexAttribute::Position, 5..8),
        ];
        match self {
            VertexLayout::C3fV3f => &C3F_V3F,
            VertexLayout::T2fN3fV3f => &T2F_N3F_V3F,
        }
    }

    pub fn is_lit(self) -> bool {
        matches!(self, VertexLayout::T2fN3fV3f)
    }
}

/// CPU-side, non-indexed triangle list split into parallel attribute arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub layout: VertexLayout,
    pub streams: Vec<(VertexAttribute, Vec<f32>)>,
    pub triangle_count: usize,
}

impl MeshData {
    /// Reshapes a flat stream of records by the layout's width and slices out
    /// one array per attribute column.
    pub fn from_interleaved(layout: VertexLayout, floats: &[f32]) -> RenderResult<Self> {
        let width = layout.record_width();
        if floats.is_empty() {
            return Err(RenderError::AssetFormat("mesh contains no vertex records".into()));
        }
        if floats.len() % width != 0 {
            return Err(
                RenderError::AssetFormat(
                    format!(
                        "{} floats is not a whole number of {:?} records ({} floats each)",
                        floats.len(),
                        layout,
                        width
                    )
                )
            );
        }

        let vertex_count = floats.len() / width;
        if vertex_count % 3 != 0 {
            return Err(
                RenderError::AssetFormat(
                    format!("{} vertices do not form whole triangles", vertex_count)
                )
            );
        }

        let streams = layout
            .columns()
            .iter()
            .map(|(attribute, range)| {
                let mut data = Vec::with_capacity(vertex_count * range.len());
                for record in floats.chunks_exact(width) {
                    data.extend_from_slice(&record[range.clone()]);
                }
                (*attribute, data)
            })
            .collect();

        Ok(Self {
            layout,
            streams,
            triangle_count: vertex_count / 3,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.triangle_count * 3
    }

    pub fn stream(&self, attribute: VertexAttribute) -> Option<&[f32]> {
        self.streams
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, data)| data.as_slice())
    }
}

/// One uploaded attribute stream.
#[derive(Debug)]
pub struct GpuStream<Buffer> {
    pub attribute: VertexAttribute,
    pub buffer: Buffer,
}

/// GPU-resident mesh: one static buffer per attribute plus the triangle count.
///
/// This struct is the sole owner of its buffer handles. `release` empties it,
/// so a released mesh has nothing left for the renderer to reach and a second
/// release is a no-op.
#[derive(Debug)]
pub struct GpuMesh<B: GraphicsBackend> {
    streams: Vec<GpuStream<B::Buffer>>,
    triangle_count: usize,
    released: bool,
}

impl<B: GraphicsBackend> GpuMesh<B> {
    pub(crate) fn from_streams(streams: Vec<GpuStream<B::Buffer>>, triangle_count: usize) -> Self {
        Self {
            streams,
            triangle_count,
            released: false,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn streams(&self) -> &[GpuStream<B::Buffer>] {
        &self.streams
    }

    pub fn is_live(&self) -> bool {
        !self.released
    }

    /// Deletes every buffer exactly once. Returns the number of buffers freed,
    /// zero when the mesh was already released.
    pub(crate) fn release(&mut self, backend: &B) -> usize {
        if self.released {
            warn!("mesh already released, ignoring second release");
            return 0;
        }
        let streams = std::mem::take(&mut self.streams);
        let freed = streams.len();
        for stream in streams {
            backend.delete_buffer(stream.buffer);
        }
        self.released = true;
        self.triangle_count = 0;
        debug!("released mesh ({} buffers)", freed);
        freed
    }
}
