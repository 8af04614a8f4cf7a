// ============================================
// Tile Water - Жидкость целого тайла (16x16 чанков)
// ============================================
// Блок жидкости тайла пишется так:
//   256 заголовков -> таблицы слоёв всех чанков -> данные всех чанков
// Смещения считаются от начала блока.

use rayon::prelude::*;

use crate::codec::{CodecError, LiquidCodec, HEADER_SIZE};
use crate::liquid::constants::TILE_CHUNKS;
use crate::liquid::{ChunkPos, LiquidChunk};

/// Что делать с битым чанком при загрузке тайла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Первая ошибка прерывает загрузку тайла
    #[default]
    Abort,
    /// Битый чанк остаётся пустым, остальные грузятся
    SkipChunk,
}

#[derive(Debug, Clone)]
pub struct TileWater {
    tile_x: i32,
    tile_y: i32,
    /// Row-major, индекс = y * 16 + x
    chunks: Vec<LiquidChunk>,
}

impl TileWater {
    pub const CHUNK_COUNT: usize = TILE_CHUNKS * TILE_CHUNKS;

    pub fn new(tile_x: i32, tile_y: i32) -> Self {
        let chunks = (0..Self::CHUNK_COUNT)
            .map(|i| LiquidChunk::new(Self::chunk_pos(tile_x, tile_y, i)))
            .collect();
        Self { tile_x, tile_y, chunks }
    }

    fn chunk_pos(tile_x: i32, tile_y: i32, index: usize) -> ChunkPos {
        ChunkPos::new(
            tile_x * TILE_CHUNKS as i32 + (index % TILE_CHUNKS) as i32,
            tile_y * TILE_CHUNKS as i32 + (index / TILE_CHUNKS) as i32,
        )
    }

    #[inline]
    pub fn tile_x(&self) -> i32 {
        self.tile_x
    }

    #[inline]
    pub fn tile_y(&self) -> i32 {
        self.tile_y
    }

    /// Чанк по локальным координатам (0..16)
    pub fn chunk(&self, x: usize, y: usize) -> Option<&LiquidChunk> {
        if x >= TILE_CHUNKS || y >= TILE_CHUNKS {
            return None;
        }
        self.chunks.get(y * TILE_CHUNKS + x)
    }

    pub fn chunk_mut(&mut self, x: usize, y: usize) -> Option<&mut LiquidChunk> {
        if x >= TILE_CHUNKS || y >= TILE_CHUNKS {
            return None;
        }
        self.chunks.get_mut(y * TILE_CHUNKS + x)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &LiquidChunk> {
        self.chunks.iter()
    }

    /// Сколько чанков содержат жидкость
    pub fn liquid_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.has_data()).count()
    }

    pub fn has_any_liquid(&self) -> bool {
        self.chunks.iter().any(LiquidChunk::has_data)
    }

    /// Дописать блок жидкости тайла в конец `out`, смещения от начала блока
    pub fn write(&self, codec: &LiquidCodec, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let base = out.len();
        self.write_with_base(codec, out, base)
    }

    /// То же, но смещения считаются от `base` (база может лежать раньше блока).
    /// При ошибке `out` возвращается к исходной длине.
    pub fn write_with_base(
        &self,
        codec: &LiquidCodec,
        out: &mut Vec<u8>,
        base: usize,
    ) -> Result<(), CodecError> {
        let start = out.len();
        let result = self.write_block(codec, out, base);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }

    fn write_block(&self, codec: &LiquidCodec, out: &mut Vec<u8>, base: usize) -> Result<(), CodecError> {
        let start = out.len();
        let headers = self
            .chunks
            .iter()
            .map(|chunk| codec.write_header(chunk, out))
            .collect::<Result<Vec<_>, _>>()?;

        let infos = self
            .chunks
            .iter()
            .zip(headers)
            .map(|(chunk, header)| codec.write_info(chunk, header, out, base))
            .collect::<Result<Vec<_>, _>>()?;

        for (chunk, info) in self.chunks.iter().zip(infos) {
            codec.write_data(chunk, info, out, base)?;
        }

        log::debug!(
            "Wrote liquid block of tile ({}, {}): {} bytes, {} chunk(s) with liquid",
            self.tile_x,
            self.tile_y,
            out.len() - start,
            self.liquid_chunk_count()
        );
        Ok(())
    }

    /// Прочитать блок жидкости тайла, начинающийся с `base`
    pub fn read(
        codec: &LiquidCodec,
        data: &[u8],
        base: usize,
        tile_x: i32,
        tile_y: i32,
        policy: LoadPolicy,
    ) -> Result<Self, CodecError> {
        Self::read_with_base(codec, data, base, base, tile_x, tile_y, policy)
    }

    /// Блок лежит с `start`, смещения внутри него считаются от `base`
    pub fn read_with_base(
        codec: &LiquidCodec,
        data: &[u8],
        start: usize,
        base: usize,
        tile_x: i32,
        tile_y: i32,
        policy: LoadPolicy,
    ) -> Result<Self, CodecError> {
        let mut chunks = Vec::with_capacity(Self::CHUNK_COUNT);

        for i in 0..Self::CHUNK_COUNT {
            let pos = Self::chunk_pos(tile_x, tile_y, i);
            let chunk = match codec.decode(data, start + i * HEADER_SIZE, base, pos) {
                Ok(chunk) => chunk,
                Err(e) if policy == LoadPolicy::SkipChunk => {
                    log::warn!("Skipping liquid chunk ({}, {}): {}", pos.x, pos.y, e);
                    LiquidChunk::new(pos)
                }
                Err(e) => return Err(e),
            };
            chunks.push(chunk);
        }

        Ok(Self { tile_x, tile_y, chunks })
    }

    /// Перестроить меши всех чанков параллельно
    pub fn rebuild_meshes(&mut self) {
        self.chunks.par_iter_mut().for_each(LiquidChunk::rebuild_meshes);
    }
}
