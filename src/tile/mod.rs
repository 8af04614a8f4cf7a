// ============================================
// Tile - Жидкость тайла и её файл
// ============================================

mod water;
mod file;

pub use water::{LoadPolicy, TileWater};
pub use file::{TileFile, TileFileError, TileFileHeader, TILE_FILE_VERSION, TILE_MAGIC};
