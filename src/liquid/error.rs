// ============================================
// Liquid Errors - Ошибки изменения слоёв
// ============================================

use std::fmt;

/// Ошибки мутации чанка/слоя. Состояние при ошибке не меняется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiquidError {
    /// Координата вне сетки размера size x size
    OutOfBounds { x: usize, y: usize, size: usize },
    /// Все 5 слотов заняты
    LayersFull,
}

impl fmt::Display for LiquidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y, size } => {
                write!(f, "coordinate ({x}, {y}) outside {size}x{size} grid")
            }
            Self::LayersFull => write!(f, "all liquid layer slots are occupied"),
        }
    }
}

impl std::error::Error for LiquidError {}
