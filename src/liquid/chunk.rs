// ============================================
// Liquid Chunk - Жидкость одной ячейки тайла
// ============================================
// До 5 слотов под слои. Слот либо пуст, либо содержит полный слой.
// Новые слои занимают первый свободный слот.

use super::constants::{CELLS, CHUNK_SIZE, DEFAULT_LIQUID_TYPE, MAX_LAYERS};
use super::error::LiquidError;
use super::layer::LiquidLayer;
use super::mask::PresenceMask;
use super::mesh::LiquidMesh;

/// Координаты чанка в мировой сетке
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Мировые координаты угла (0, 0) чанка
    #[inline]
    pub fn origin(self) -> [f32; 2] {
        [self.x as f32 * CHUNK_SIZE, self.y as f32 * CHUNK_SIZE]
    }
}

#[derive(Debug, Clone, Default)]
pub struct LiquidChunk {
    position: ChunkPos,
    layers: [Option<LiquidLayer>; MAX_LAYERS],
}

#[inline]
fn check_cell(x: usize, y: usize) -> Result<(), LiquidError> {
    if x < CELLS && y < CELLS {
        Ok(())
    } else {
        Err(LiquidError::OutOfBounds { x, y, size: CELLS })
    }
}

impl LiquidChunk {
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            layers: Default::default(),
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Есть ли хоть один слой
    pub fn has_data(&self) -> bool {
        self.layers.iter().any(Option::is_some)
    }

    /// Есть ли жидкость в ячейке хоть в одном слое
    pub fn has_data_at(&self, x: usize, y: usize) -> bool {
        self.layers().any(|(_, layer)| layer.has_data(x, y))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.iter().flatten().count()
    }

    #[inline]
    pub fn layer(&self, slot: usize) -> Option<&LiquidLayer> {
        self.layers.get(slot)?.as_ref()
    }

    #[inline]
    pub fn layer_mut(&mut self, slot: usize) -> Option<&mut LiquidLayer> {
        self.layers.get_mut(slot)?.as_mut()
    }

    /// Занятые слоты в порядке слотов
    pub fn layers(&self) -> impl Iterator<Item = (usize, &LiquidLayer)> {
        self.layers
            .iter()
            .enumerate()
            .filter_map(|(slot, layer)| layer.as_ref().map(|l| (slot, l)))
    }

    fn layers_mut(&mut self) -> impl Iterator<Item = &mut LiquidLayer> {
        self.layers.iter_mut().flatten()
    }

    /// Положить готовый слой в первый свободный слот
    pub fn insert_layer(&mut self, layer: LiquidLayer) -> Result<usize, LiquidError> {
        let slot = self
            .layers
            .iter()
            .position(Option::is_none)
            .ok_or(LiquidError::LayersFull)?;
        self.layers[slot] = Some(layer);
        Ok(slot)
    }

    /// Новый слой на весь чанк
    pub fn add_layer(&mut self) -> Result<usize, LiquidError> {
        self.insert_layer(LiquidLayer::full(DEFAULT_LIQUID_TYPE))
    }

    /// Добавить жидкость в одну ячейку.
    /// Уже покрыта каким-то слоем - ничего не делаем; иначе ячейка
    /// попадает в первый существующий слой, а если слоёв нет - создаётся новый.
    pub fn add_layer_at(&mut self, x: usize, y: usize) -> Result<(), LiquidError> {
        check_cell(x, y)?;
        if self.has_data_at(x, y) {
            return Ok(());
        }
        if let Some(layer) = self.layers.iter_mut().flatten().next() {
            return layer.mark_present(x, y);
        }
        self.insert_layer(LiquidLayer::new(DEFAULT_LIQUID_TYPE, PresenceMask::single(x, y)))
            .map(|_| ())
    }

    /// Удалить верхний слой, покрывающий весь чанк
    /// (или просто верхний, если полных нет)
    pub fn delete_layer(&mut self) {
        let full = self
            .layers
            .iter()
            .rposition(|l| l.as_ref().is_some_and(|l| l.mask().is_full()));
        let slot = full.or_else(|| self.layers.iter().rposition(Option::is_some));
        if let Some(slot) = slot {
            self.layers[slot] = None;
        }
    }

    /// Убрать ячейку из всех слоёв; опустевшие слои удаляются
    pub fn delete_layer_at(&mut self, x: usize, y: usize) -> Result<(), LiquidError> {
        check_cell(x, y)?;
        for slot in self.layers.iter_mut() {
            if let Some(layer) = slot {
                if !layer.has_data(x, y) {
                    continue;
                }
                layer.mark_absent(x, y)?;
                if layer.is_empty() {
                    *slot = None;
                }
            }
        }
        Ok(())
    }

    /// Высота всей поверхности: каждый слой заливается одним значением
    pub fn set_height(&mut self, height: f32) {
        for layer in self.layers_mut() {
            layer.fill_height(height);
        }
    }

    /// Высота первой занятой ячейки первого слоя, 0 если жидкости нет
    pub fn get_height(&self) -> f32 {
        self.layers()
            .next()
            .map(|(_, layer)| {
                let (x, y) = layer.first_cell().unwrap_or((0, 0));
                layer.heights().get(x, y)
            })
            .unwrap_or(0.0)
    }

    /// Высота угла (x, y) ячейки во всех слоях, покрывающих ячейку
    pub fn set_height_at(&mut self, x: usize, y: usize, height: f32) -> Result<(), LiquidError> {
        check_cell(x, y)?;
        for layer in self.layers_mut().filter(|l| l.has_data(x, y)) {
            layer.set_height(x, y, height)?;
        }
        Ok(())
    }

    /// Высота из первого слоя, покрывающего ячейку; 0 если такого нет
    pub fn get_height_at(&self, x: usize, y: usize) -> Result<f32, LiquidError> {
        check_cell(x, y)?;
        match self.layers().find(|(_, l)| l.has_data(x, y)) {
            Some((_, layer)) => layer.get_height(x, y),
            None => Ok(0.0),
        }
    }

    pub fn set_trans(&mut self, trans: u8) {
        for layer in self.layers_mut() {
            layer.fill_opacity(trans);
        }
    }

    pub fn get_trans(&self) -> u8 {
        self.layers()
            .next()
            .map(|(_, layer)| {
                let (x, y) = layer.first_cell().unwrap_or((0, 0));
                layer.opacities().get(x, y)
            })
            .unwrap_or(0)
    }

    pub fn set_trans_at(&mut self, x: usize, y: usize, trans: u8) -> Result<(), LiquidError> {
        check_cell(x, y)?;
        for layer in self.layers_mut().filter(|l| l.has_data(x, y)) {
            layer.set_opacity(x, y, trans)?;
        }
        Ok(())
    }

    pub fn get_trans_at(&self, x: usize, y: usize) -> Result<u8, LiquidError> {
        check_cell(x, y)?;
        match self.layers().find(|(_, l)| l.has_data(x, y)) {
            Some((_, layer)) => layer.get_opacity(x, y),
            None => Ok(0),
        }
    }

    /// Сменить тип жидкости у всех слоёв
    pub fn set_type(&mut self, liquid_type: u16) {
        for layer in self.layers_mut() {
            layer.set_liquid_type(liquid_type);
        }
    }

    /// Меш слоя в слоте (строится при первом запросе)
    pub fn mesh(&mut self, slot: usize) -> Option<&LiquidMesh> {
        let origin = self.position.origin();
        self.layer_mut(slot).map(|layer| layer.mesh(origin))
    }

    /// Перестроить меши всех слоёв
    pub fn rebuild_meshes(&mut self) {
        let origin = self.position.origin();
        for layer in self.layers_mut() {
            layer.invalidate_mesh();
            layer.mesh(origin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> LiquidChunk {
        LiquidChunk::new(ChunkPos::new(3, 7))
    }

    #[test]
    fn test_add_then_delete_is_empty() {
        let mut chunk = chunk();
        assert!(!chunk.has_data());
        chunk.add_layer().unwrap();
        assert!(chunk.has_data());
        chunk.delete_layer();
        assert!(!chunk.has_data());
    }

    #[test]
    fn test_delete_single_cell() {
        let mut chunk = chunk();
        chunk.add_layer().unwrap();
        chunk.delete_layer_at(0, 0).unwrap();
        assert!(!chunk.has_data_at(0, 0));
        assert!(chunk.has_data_at(1, 1));
        assert_eq!(chunk.layer_count(), 1);
        assert!(chunk.layer(0).unwrap().has_data(1, 1));
    }

    #[test]
    fn test_last_cell_removal_frees_slot() {
        let mut chunk = chunk();
        chunk.add_layer_at(4, 2).unwrap();
        assert_eq!(chunk.layer_count(), 1);
        chunk.delete_layer_at(4, 2).unwrap();
        assert!(!chunk.has_data());
    }

    #[test]
    fn test_layer_limit() {
        let mut chunk = chunk();
        for slot in 0..MAX_LAYERS {
            assert_eq!(chunk.add_layer().unwrap(), slot);
        }
        assert_eq!(chunk.add_layer(), Err(LiquidError::LayersFull));
        assert_eq!(chunk.layer_count(), MAX_LAYERS);
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut chunk = chunk();
        chunk.add_layer().unwrap();
        chunk.add_layer_at(0, 0).unwrap(); // уже покрыто первым слоем
        assert_eq!(chunk.layer_count(), 1);
        chunk.add_layer().unwrap();
        chunk.add_layer().unwrap();
        chunk.layer_mut(1).unwrap().mark_absent(0, 0).unwrap();
        chunk.delete_layer(); // слот 2 - верхний полный
        assert!(chunk.layer(2).is_none());
        assert_eq!(chunk.add_layer().unwrap(), 2);
    }

    #[test]
    fn test_delete_prefers_topmost_full_layer() {
        let mut chunk = chunk();
        chunk.add_layer().unwrap();
        chunk.insert_layer(LiquidLayer::new(1, PresenceMask::single(2, 2))).unwrap();
        chunk.delete_layer();
        assert!(chunk.layer(0).is_none());
        assert!(chunk.layer(1).is_some());
        chunk.delete_layer();
        assert!(!chunk.has_data());
    }

    #[test]
    fn test_cell_ops_with_overlapping_layers() {
        let mut chunk = chunk();
        chunk.add_layer().unwrap();
        chunk.insert_layer(LiquidLayer::new(3, PresenceMask::single(2, 2))).unwrap();

        // запись идёт во все покрывающие слои, чтение - из первого
        chunk.set_height_at(2, 2, 7.5).unwrap();
        assert_eq!(chunk.layer(0).unwrap().get_height(2, 2).unwrap(), 7.5);
        assert_eq!(chunk.layer(1).unwrap().get_height(2, 2).unwrap(), 7.5);
        chunk.layer_mut(1).unwrap().set_opacity(2, 2, 10).unwrap();
        assert_eq!(chunk.get_trans_at(2, 2).unwrap(), 255);

        // удаление ячейки снимает её со всех слоёв, одноклеточный слой исчезает
        chunk.delete_layer_at(2, 2).unwrap();
        assert!(!chunk.has_data_at(2, 2));
        assert!(chunk.layer(1).is_none());
        assert!(chunk.layer(0).is_some());

        // добавление в непокрытую ячейку - в первый существующий слой
        chunk.add_layer_at(2, 2).unwrap();
        assert_eq!(chunk.layer_count(), 1);
        assert!(chunk.layer(0).unwrap().has_data(2, 2));
    }

    #[test]
    fn test_absent_cell_reads_sentinel() {
        let chunk = chunk();
        assert_eq!(chunk.get_height_at(5, 5).unwrap(), 0.0);
        assert_eq!(chunk.get_trans_at(5, 5).unwrap(), 0);
        assert_eq!(chunk.get_height(), 0.0);
        assert!(chunk.get_height_at(8, 0).is_err());
    }

    #[test]
    fn test_whole_chunk_setters() {
        let mut chunk = chunk();
        chunk.add_layer().unwrap();
        chunk.add_layer_at(1, 1).unwrap();
        chunk.insert_layer(LiquidLayer::new(2, PresenceMask::single(6, 6))).unwrap();

        chunk.set_height(42.0);
        chunk.set_trans(128);
        chunk.set_type(4);
        assert_eq!(chunk.get_height(), 42.0);
        assert_eq!(chunk.get_trans(), 128);
        for (_, layer) in chunk.layers() {
            assert_eq!(layer.liquid_type(), 4);
            assert_eq!(layer.min_height(), 42.0);
            assert_eq!(layer.max_height(), 42.0);
            assert!(layer.heights().is_uniform());
        }
        assert_eq!(chunk.get_height_at(6, 6).unwrap(), 42.0);
    }

    #[test]
    fn test_mesh_uses_chunk_origin() {
        let mut chunk = LiquidChunk::new(ChunkPos::new(1, 0));
        chunk.add_layer_at(0, 0).unwrap();
        let mesh = chunk.mesh(0).unwrap();
        assert_eq!(mesh.vertices[0].position[0], CHUNK_SIZE);
        assert!(chunk.mesh(1).is_none());
    }
}
