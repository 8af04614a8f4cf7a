// ============================================
// Liquid Grid - Сетка скаляров N x N
// ============================================
// Хранится одним значением пока все клетки равны,
// в массив разворачивается при первой отличающейся записи.

use super::constants::{CELLS, VERTICES};

/// Сетка N x N (row-major, индекс = y * N + x)
#[derive(Debug, Clone, PartialEq)]
pub enum Grid<T: Copy + PartialEq, const N: usize> {
    /// Все клетки равны
    Uniform(T),
    /// Значение на каждую клетку
    PerCell(Box<[[T; N]; N]>),
}

/// Высоты по вершинам 9x9
pub type HeightGrid = Grid<f32, VERTICES>;
/// Прозрачность по ячейкам 8x8
pub type OpacityGrid = Grid<u8, CELLS>;

impl<T: Copy + PartialEq, const N: usize> Grid<T, N> {
    pub fn uniform(value: T) -> Self {
        Grid::Uniform(value)
    }

    /// Собрать из массива и сразу свернуть если всё одинаково
    pub fn from_cells(cells: [[T; N]; N]) -> Self {
        let mut grid = Grid::PerCell(Box::new(cells));
        grid.collapse();
        grid
    }

    #[inline]
    pub fn contains(x: usize, y: usize) -> bool {
        x < N && y < N
    }

    /// Значение в клетке. Вызывающий проверяет границы.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(Self::contains(x, y));
        match self {
            Grid::Uniform(value) => *value,
            Grid::PerCell(cells) => cells[y][x],
        }
    }

    /// Записать значение, развернув uniform в массив только при отличии
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(Self::contains(x, y));
        match self {
            Grid::Uniform(current) => {
                if *current == value {
                    return;
                }
                let mut cells = Box::new([[*current; N]; N]);
                cells[y][x] = value;
                *self = Grid::PerCell(cells);
            }
            Grid::PerCell(cells) => cells[y][x] = value,
        }
    }

    pub fn fill(&mut self, value: T) {
        *self = Grid::Uniform(value);
    }

    #[inline]
    pub fn is_uniform(&self) -> bool {
        matches!(self, Grid::Uniform(_))
    }

    /// Uniform значение (если сетка свёрнута)
    pub fn uniform_value(&self) -> Option<T> {
        match self {
            Grid::Uniform(value) => Some(*value),
            Grid::PerCell(_) => None,
        }
    }

    /// Свернуть в Uniform, если все клетки равны
    pub fn collapse(&mut self) {
        if let Grid::PerCell(cells) = self {
            let first = cells[0][0];
            if cells.iter().flatten().all(|&v| v == first) {
                *self = Grid::Uniform(first);
            }
        }
    }
}

impl HeightGrid {
    /// Минимум и максимум по всей сетке
    pub fn extremes(&self) -> (f32, f32) {
        match self {
            Grid::Uniform(value) => (*value, *value),
            Grid::PerCell(cells) => cells
                .iter()
                .flatten()
                .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_value_keeps_uniform() {
        let mut grid = HeightGrid::uniform(3.0);
        grid.set(4, 4, 3.0);
        assert!(grid.is_uniform());
    }

    #[test]
    fn test_divergent_write_promotes() {
        let mut grid = OpacityGrid::uniform(255);
        grid.set(2, 5, 10);
        assert!(!grid.is_uniform());
        assert_eq!(grid.get(2, 5), 10);
        assert_eq!(grid.get(5, 2), 255);
    }

    #[test]
    fn test_collapse_back() {
        let mut grid = HeightGrid::uniform(1.0);
        grid.set(0, 0, 2.0);
        grid.set(0, 0, 1.0);
        assert!(!grid.is_uniform());
        grid.collapse();
        assert_eq!(grid.uniform_value(), Some(1.0));
    }

    #[test]
    fn test_extremes() {
        let mut grid = HeightGrid::uniform(5.0);
        grid.set(8, 8, -2.0);
        grid.set(1, 7, 40.0);
        assert_eq!(grid.extremes(), (-2.0, 40.0));
    }
}
