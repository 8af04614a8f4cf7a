// ============================================
// Chunk Records - Фиксированные записи формата
// ============================================
// bincode (fixint, little-endian) пишет структуры без паддинга:
//   ChunkHeader = 8 байт, LayerInfo = 18 байт.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::CodecError;

pub const HEADER_SIZE: usize = 8;
pub const INFO_SIZE: usize = 18;
pub const MASK_SIZE: usize = 8;

/// Смещения полей внутри записей (для отложенной дописи)
pub const HEADER_INFO_OFFSET_AT: usize = 0;
pub const INFO_MASK_OFFSET_AT: usize = 10;
pub const INFO_PAYLOAD_OFFSET_AT: usize = 14;

/// Заголовок чанка
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkHeader {
    /// Смещение таблицы слоёв от базы, 0 если жидкости нет
    pub info_offset: u32,
    pub layer_count: u32,
}

/// Запись о слое
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub liquid_type: u16,
    pub min_height: f32,
    pub max_height: f32,
    /// 0 => заняты все 64 ячейки
    pub mask_offset: u32,
    /// 0 => payload нет (ровная непрозрачная поверхность)
    pub payload_offset: u32,
}

/// Кусок буфера [pos, pos + len) с проверкой границ
pub(crate) fn slice(data: &[u8], pos: usize, len: usize) -> Result<&[u8], CodecError> {
    if pos > data.len() {
        return Err(CodecError::OffsetOutOfRange { offset: pos, len: data.len() });
    }
    let available = data.len() - pos;
    if len > available {
        return Err(CodecError::Truncated { offset: pos, needed: len, available });
    }
    Ok(&data[pos..pos + len])
}

pub(crate) fn read_record<T: DeserializeOwned>(
    data: &[u8],
    pos: usize,
    size: usize,
) -> Result<T, CodecError> {
    Ok(bincode::deserialize(slice(data, pos, size)?)?)
}

/// Дописать запись в конец, вернуть её позицию
pub(crate) fn write_record<T: Serialize>(out: &mut Vec<u8>, record: &T) -> Result<usize, CodecError> {
    let pos = out.len();
    bincode::serialize_into(&mut *out, record)?;
    Ok(pos)
}

/// База + относительное смещение
pub(crate) fn resolve(base: usize, offset: u32) -> Result<usize, CodecError> {
    base.checked_add(offset as usize)
        .ok_or(CodecError::OffsetOverflow(offset as usize))
}

/// Абсолютная позиция -> смещение от базы
pub(crate) fn relative(position: usize, base: usize) -> Result<u32, CodecError> {
    let delta = position
        .checked_sub(base)
        .ok_or(CodecError::BaseAfterPosition { base, position })?;
    u32::try_from(delta).map_err(|_| CodecError::OffsetOverflow(delta))
}

/// Дописать u32 поверх заглушки
pub(crate) fn patch_u32(out: &mut [u8], at: usize, value: u32) -> Result<(), CodecError> {
    let len = out.len();
    let field = out
        .get_mut(at..at + 4)
        .ok_or(CodecError::OffsetOutOfRange { offset: at, len })?;
    field.copy_from_slice(&value.to_le_bytes());
    Ok(())
}
