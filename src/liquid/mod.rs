// ============================================
// Liquid - Слоистая модель жидкости чанка
// ============================================
// Чанк -> до 5 слоёв -> маска 8x8 + высоты 9x9 + прозрачность 8x8

pub mod constants;
mod grid;
mod mask;
mod layer;
mod chunk;
mod mesh;
mod error;
mod types;

pub use grid::{Grid, HeightGrid, OpacityGrid};
pub use mask::PresenceMask;
pub use layer::LiquidLayer;
pub use chunk::{ChunkPos, LiquidChunk};
pub use mesh::{LiquidMesh, LiquidVertex};
pub use error::LiquidError;
pub use types::{
    global_liquid_types, LiquidKind, LiquidTypeDef, LiquidTypeTable, LiquidTypesFile, VertexFormat,
};
