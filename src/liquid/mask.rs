// ============================================
// Presence Mask - Маска занятых ячеек 8x8
// ============================================
// Бит (y * 8 + x) = 1 => в ячейке есть жидкость.
// На диске: 8 байт, байт = строка y, бит x.

use super::constants::{CELLS, CELL_COUNT};

/// Маска присутствия жидкости по ячейкам слоя
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PresenceMask(u64);

impl PresenceMask {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(u64::MAX);

    #[inline]
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Маска из одной ячейки
    pub fn single(x: usize, y: usize) -> Self {
        let mut mask = Self::EMPTY;
        mask.insert(x, y);
        mask
    }

    #[inline]
    fn bit(x: usize, y: usize) -> u64 {
        debug_assert!(x < CELLS && y < CELLS);
        1u64 << (y * CELLS + x)
    }

    /// Вне 8x8 всегда false
    #[inline]
    pub fn contains(self, x: usize, y: usize) -> bool {
        x < CELLS && y < CELLS && self.0 & Self::bit(x, y) != 0
    }

    #[inline]
    pub fn insert(&mut self, x: usize, y: usize) {
        self.0 |= Self::bit(x, y);
    }

    #[inline]
    pub fn remove(&mut self, x: usize, y: usize) {
        self.0 &= !Self::bit(x, y);
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Занятые ячейки в row-major порядке
    pub fn iter(self) -> impl Iterator<Item = (usize, usize)> {
        (0..CELL_COUNT)
            .filter(move |i| self.0 & (1u64 << i) != 0)
            .map(|i| (i % CELLS, i / CELLS))
    }

    /// Является ли вершина (x, y) углом хотя бы одной занятой ячейки
    pub fn touches_vertex(self, x: usize, y: usize) -> bool {
        (x.saturating_sub(1)..=x.min(CELLS - 1)).any(|cx| {
            (y.saturating_sub(1)..=y.min(CELLS - 1)).any(|cy| self.contains(cx, cy))
        })
    }

    /// Упаковка в 8 байт (строка на байт)
    pub fn to_rows(self) -> [u8; CELLS] {
        self.0.to_le_bytes()
    }

    pub fn from_rows(rows: [u8; CELLS]) -> Self {
        Self(u64::from_le_bytes(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_layout() {
        let mut mask = PresenceMask::EMPTY;
        mask.insert(1, 0);
        mask.insert(7, 2);
        let rows = mask.to_rows();
        assert_eq!(rows[0], 0b0000_0010);
        assert_eq!(rows[2], 0b1000_0000);
        assert_eq!(PresenceMask::from_rows(rows), mask);
    }

    #[test]
    fn test_iter_row_major() {
        let mut mask = PresenceMask::EMPTY;
        mask.insert(3, 3);
        mask.insert(5, 0);
        mask.insert(0, 3);
        let cells: Vec<_> = mask.iter().collect();
        assert_eq!(cells, vec![(5, 0), (0, 3), (3, 3)]);
    }

    #[test]
    fn test_touches_vertex() {
        let mask = PresenceMask::single(3, 3);
        assert!(mask.touches_vertex(3, 3));
        assert!(mask.touches_vertex(4, 4));
        assert!(mask.touches_vertex(4, 3));
        assert!(!mask.touches_vertex(5, 3));
        assert!(!mask.touches_vertex(2, 2));

        let corner = PresenceMask::single(7, 7);
        assert!(corner.touches_vertex(8, 8));
    }

    #[test]
    fn test_out_of_domain_is_absent() {
        assert!(!PresenceMask::FULL.contains(8, 0));
        assert!(!PresenceMask::FULL.contains(0, 8));
    }
}
