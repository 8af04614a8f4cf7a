// ============================================
// Liquid Layer - Один слой жидкости в чанке
// ============================================
// Тип + маска присутствия + высоты 9x9 + прозрачность 8x8.
// Инвариант: min_height <= любая хранимая высота <= max_height.

use super::constants::{CELLS, DEFAULT_HEIGHT, DEFAULT_OPACITY, VERTICES};
use super::error::LiquidError;
use super::grid::{HeightGrid, OpacityGrid};
use super::mask::PresenceMask;
use super::mesh::LiquidMesh;

#[derive(Debug, Clone)]
pub struct LiquidLayer {
    liquid_type: u16,
    min_height: f32,
    max_height: f32,
    mask: PresenceMask,
    heights: HeightGrid,
    opacity: OpacityGrid,
    /// Кэш меша, сбрасывается при любом изменении
    mesh: Option<LiquidMesh>,
}

#[inline]
fn check(x: usize, y: usize, size: usize) -> Result<(), LiquidError> {
    if x < size && y < size {
        Ok(())
    } else {
        Err(LiquidError::OutOfBounds { x, y, size })
    }
}

impl LiquidLayer {
    /// Слой с заданной маской и значениями по умолчанию
    pub fn new(liquid_type: u16, mask: PresenceMask) -> Self {
        Self {
            liquid_type,
            min_height: DEFAULT_HEIGHT,
            max_height: DEFAULT_HEIGHT,
            mask,
            heights: HeightGrid::uniform(DEFAULT_HEIGHT),
            opacity: OpacityGrid::uniform(DEFAULT_OPACITY),
            mesh: None,
        }
    }

    /// Слой на все 64 ячейки
    pub fn full(liquid_type: u16) -> Self {
        Self::new(liquid_type, PresenceMask::FULL)
    }

    /// Собрать слой из прочитанных данных. Границы расширяются,
    /// если сетка выходит за [min_height, max_height].
    pub fn from_parts(
        liquid_type: u16,
        min_height: f32,
        max_height: f32,
        mask: PresenceMask,
        heights: HeightGrid,
        opacity: OpacityGrid,
    ) -> Self {
        let (lo, hi) = heights.extremes();
        Self {
            liquid_type,
            min_height: min_height.min(lo),
            max_height: max_height.max(hi),
            mask,
            heights,
            opacity,
            mesh: None,
        }
    }

    #[inline]
    pub fn liquid_type(&self) -> u16 {
        self.liquid_type
    }

    /// Меняет только ID типа для следующей записи
    pub fn set_liquid_type(&mut self, liquid_type: u16) {
        if self.liquid_type != liquid_type {
            self.liquid_type = liquid_type;
            self.mesh = None;
        }
    }

    #[inline]
    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    #[inline]
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    #[inline]
    pub fn mask(&self) -> PresenceMask {
        self.mask
    }

    #[inline]
    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    #[inline]
    pub fn opacities(&self) -> &OpacityGrid {
        &self.opacity
    }

    /// Высота вершины (x, y в 0..=8)
    pub fn get_height(&self, x: usize, y: usize) -> Result<f32, LiquidError> {
        check(x, y, VERTICES)?;
        Ok(self.heights.get(x, y))
    }

    /// Записать высоту вершины, расширив границы при необходимости
    pub fn set_height(&mut self, x: usize, y: usize, height: f32) -> Result<(), LiquidError> {
        check(x, y, VERTICES)?;
        self.heights.set(x, y, height);
        self.min_height = self.min_height.min(height);
        self.max_height = self.max_height.max(height);
        self.mesh = None;
        Ok(())
    }

    /// Прозрачность ячейки (x, y в 0..8)
    pub fn get_opacity(&self, x: usize, y: usize) -> Result<u8, LiquidError> {
        check(x, y, CELLS)?;
        Ok(self.opacity.get(x, y))
    }

    pub fn set_opacity(&mut self, x: usize, y: usize, opacity: u8) -> Result<(), LiquidError> {
        check(x, y, CELLS)?;
        self.opacity.set(x, y, opacity);
        self.mesh = None;
        Ok(())
    }

    /// Есть ли жидкость в ячейке
    #[inline]
    pub fn has_data(&self, x: usize, y: usize) -> bool {
        self.mask.contains(x, y)
    }

    pub fn mark_present(&mut self, x: usize, y: usize) -> Result<(), LiquidError> {
        check(x, y, CELLS)?;
        self.mask.insert(x, y);
        self.mesh = None;
        Ok(())
    }

    /// Высота и прозрачность ячейки остаются в сетках, но больше не активны
    pub fn mark_absent(&mut self, x: usize, y: usize) -> Result<(), LiquidError> {
        check(x, y, CELLS)?;
        self.mask.remove(x, y);
        self.mesh = None;
        Ok(())
    }

    /// Залить всю сетку одной высотой, границы = [height, height]
    pub fn fill_height(&mut self, height: f32) {
        self.heights.fill(height);
        self.min_height = height;
        self.max_height = height;
        self.mesh = None;
    }

    pub fn fill_opacity(&mut self, opacity: u8) {
        self.opacity.fill(opacity);
        self.mesh = None;
    }

    /// Сжать границы до точных экстремумов сетки
    pub fn recompute_bounds(&mut self) {
        let (lo, hi) = self.heights.extremes();
        self.min_height = lo;
        self.max_height = hi;
    }

    /// Ни одной занятой ячейки
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Первая занятая ячейка в row-major порядке
    pub fn first_cell(&self) -> Option<(usize, usize)> {
        self.mask.iter().next()
    }

    /// Меш слоя, строится лениво
    pub fn mesh(&mut self, origin: [f32; 2]) -> &LiquidMesh {
        let (liquid_type, mask, heights, opacity) =
            (self.liquid_type, self.mask, &self.heights, &self.opacity);
        self.mesh
            .get_or_insert_with(|| LiquidMesh::build(origin, liquid_type, mask, heights, opacity))
    }

    #[inline]
    pub fn has_cached_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn invalidate_mesh(&mut self) {
        self.mesh = None;
    }
}
