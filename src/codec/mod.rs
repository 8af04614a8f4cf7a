// ============================================
// Liquid Codec - Чтение/запись жидкости чанка
// ============================================
// Формат (все смещения относительно базы, переданной вызывающим):
//
//   header   : info_offset u32, layer_count u32
//   info[i]  : liquid_type u16, min/max f32, mask_offset u32, payload_offset u32
//   mask[i]  : 8 байт (нет, если заняты все ячейки)
//   payload  : f32 высоты затронутых вершин + u8 прозрачность занятых ячеек
//
// Запись идёт в три фазы (header -> info -> data), чтобы тайл мог
// сначала записать все заголовки, потом все таблицы, потом все данные.
// Смещения дописываются через явные patch-записи.

mod error;
mod records;
mod decode;
mod encode;

pub use error::CodecError;
pub use records::{ChunkHeader, LayerInfo, HEADER_SIZE, INFO_SIZE, MASK_SIZE};
pub use encode::{HeaderPatch, InfoPatch};

use crate::liquid::{global_liquid_types, LiquidTypeTable};

/// Кодек без состояния; таблица типов нужна для выбора формата payload
#[derive(Debug, Clone, Copy)]
pub struct LiquidCodec<'a> {
    types: &'a LiquidTypeTable,
}

impl<'a> LiquidCodec<'a> {
    pub fn new(types: &'a LiquidTypeTable) -> Self {
        Self { types }
    }

    #[inline]
    pub fn types(&self) -> &'a LiquidTypeTable {
        self.types
    }
}

impl Default for LiquidCodec<'static> {
    fn default() -> Self {
        Self::new(global_liquid_types())
    }
}
