// ============================================
// Liquid Tiles - Жидкость на чанках карты
// ============================================
// Слои жидкости чанка 8x8, бинарный формат с отложенными смещениями,
// файлы тайлов и размещённые объекты мира.

pub mod liquid;
pub mod codec;
pub mod tile;
pub mod world;

// Реэкспорт основного API
pub use codec::{CodecError, LiquidCodec};
pub use liquid::{ChunkPos, LiquidChunk, LiquidError, LiquidLayer, PresenceMask};
pub use tile::{LoadPolicy, TileFile, TileWater};
pub use world::{ObjectStore, PlacedObject, WorldError};
