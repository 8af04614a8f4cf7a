// ============================================
// Codec Errors - Ошибки чтения/записи чанка
// ============================================
// Любая ошибка прерывает разбор только текущего чанка.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Данные кончились раньше записи
    Truncated { offset: usize, needed: usize, available: usize },
    /// Смещение указывает за пределы буфера
    OffsetOutOfRange { offset: usize, len: usize },
    /// В заголовке больше 5 слоёв
    TooManyLayers(u32),
    /// База для относительных смещений правее позиции записи
    BaseAfterPosition { base: usize, position: usize },
    /// Относительное смещение не влезает в u32
    OffsetOverflow(usize),
    /// Слот опустел между фазами записи
    MissingLayer(usize),
    /// Число слоёв изменилось после записи заголовка
    LayerCountChanged { expected: usize, actual: usize },
    /// Ошибка bincode
    Record(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset, needed, available } => write!(
                f,
                "truncated liquid data at {offset}: need {needed} bytes, {available} available"
            ),
            Self::OffsetOutOfRange { offset, len } => {
                write!(f, "offset {offset} outside buffer of {len} bytes")
            }
            Self::TooManyLayers(count) => write!(f, "liquid chunk declares {count} layers (max 5)"),
            Self::BaseAfterPosition { base, position } => {
                write!(f, "base offset {base} lies past write position {position}")
            }
            Self::OffsetOverflow(offset) => write!(f, "relative offset {offset} does not fit in u32"),
            Self::MissingLayer(slot) => write!(f, "layer slot {slot} was emptied between write phases"),
            Self::LayerCountChanged { expected, actual } => write!(
                f,
                "chunk header declares {expected} layer(s), chunk now holds {actual}"
            ),
            Self::Record(msg) => write!(f, "record error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<bincode::Error> for CodecError {
    fn from(e: bincode::Error) -> Self {
        CodecError::Record(e.to_string())
    }
}
