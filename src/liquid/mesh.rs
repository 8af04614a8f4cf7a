// ============================================
// Liquid Mesh - Поверхность слоя для рендера
// ============================================
// Производные данные: не сериализуются, перестраиваются из сеток слоя.

use bytemuck::{Pod, Zeroable};

use super::constants::UNIT_SIZE;
use super::grid::{HeightGrid, OpacityGrid};
use super::mask::PresenceMask;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, Default, PartialEq)]
pub struct LiquidVertex {
    pub position: [f32; 3],
    /// Прозрачность ячейки 0..1
    pub alpha: f32,
    pub liquid_type: u32,
}

/// Меш слоя: по квадрату (4 вершины, 6 индексов) на занятую ячейку
#[derive(Debug, Clone, Default)]
pub struct LiquidMesh {
    pub vertices: Vec<LiquidVertex>,
    pub indices: Vec<u32>,
}

impl LiquidMesh {
    /// origin - мировые координаты угла (0, 0) чанка по X/Z
    pub fn build(
        origin: [f32; 2],
        liquid_type: u16,
        mask: PresenceMask,
        heights: &HeightGrid,
        opacity: &OpacityGrid,
    ) -> Self {
        let cells = mask.count();
        let mut vertices = Vec::with_capacity(cells * 4);
        let mut indices = Vec::with_capacity(cells * 6);

        for (x, y) in mask.iter() {
            let alpha = opacity.get(x, y) as f32 / 255.0;
            let base = vertices.len() as u32;

            for (dx, dy) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
                let (vx, vy) = (x + dx, y + dy);
                vertices.push(LiquidVertex {
                    position: [
                        origin[0] + vx as f32 * UNIT_SIZE,
                        heights.get(vx, vy),
                        origin[1] + vy as f32 * UNIT_SIZE,
                    ],
                    alpha,
                    liquid_type: liquid_type as u32,
                });
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Сырые байты вершин для загрузки в буфер
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
