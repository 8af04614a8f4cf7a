// ============================================
// Liquid Constants - Размеры сеток и значения по умолчанию
// ============================================

/// Ячеек по стороне чанка (8x8)
pub const CELLS: usize = 8;
/// Вершин высот по стороне чанка (9x9)
pub const VERTICES: usize = CELLS + 1;
pub const CELL_COUNT: usize = CELLS * CELLS;
pub const VERTEX_COUNT: usize = VERTICES * VERTICES;

/// Максимум слоёв жидкости в одном чанке
pub const MAX_LAYERS: usize = 5;

/// Размер тайла в мировых единицах
pub const TILE_SIZE: f32 = 533.333_33;
/// Чанков по стороне тайла (16x16)
pub const TILE_CHUNKS: usize = 16;
pub const CHUNK_SIZE: f32 = TILE_SIZE / TILE_CHUNKS as f32;
pub const UNIT_SIZE: f32 = CHUNK_SIZE / CELLS as f32;

pub const DEFAULT_HEIGHT: f32 = 0.0;
pub const DEFAULT_OPACITY: u8 = 255;
/// Вода
pub const DEFAULT_LIQUID_TYPE: u16 = 1;
