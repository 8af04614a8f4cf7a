// ============================================
// Decode - Байты -> LiquidChunk
// ============================================

use crate::liquid::constants::{CELLS, DEFAULT_OPACITY, MAX_LAYERS, VERTICES};
use crate::liquid::{
    ChunkPos, HeightGrid, LiquidChunk, LiquidLayer, OpacityGrid, PresenceMask, VertexFormat,
};

use super::error::CodecError;
use super::records::{read_record, resolve, slice, ChunkHeader, LayerInfo, HEADER_SIZE, INFO_SIZE, MASK_SIZE};
use super::LiquidCodec;

impl LiquidCodec<'_> {
    /// Прочитать чанк, чей заголовок лежит в `data[header_pos..]`.
    /// Все смещения внутри формата считаются от `base`.
    pub fn decode(
        &self,
        data: &[u8],
        header_pos: usize,
        base: usize,
        position: ChunkPos,
    ) -> Result<LiquidChunk, CodecError> {
        let header: ChunkHeader = read_record(data, header_pos, HEADER_SIZE)?;
        let mut chunk = LiquidChunk::new(position);

        if header.layer_count == 0 {
            return Ok(chunk);
        }
        if header.layer_count as usize > MAX_LAYERS {
            return Err(CodecError::TooManyLayers(header.layer_count));
        }

        let info_pos = resolve(base, header.info_offset)?;
        for i in 0..header.layer_count as usize {
            let info: LayerInfo = read_record(data, info_pos + i * INFO_SIZE, INFO_SIZE)?;
            let layer = self.decode_layer(data, base, &info)?;
            chunk
                .insert_layer(layer)
                .map_err(|e| CodecError::Record(e.to_string()))?;
        }

        log::debug!(
            "Decoded liquid chunk ({}, {}): {} layer(s)",
            position.x,
            position.y,
            header.layer_count
        );
        Ok(chunk)
    }

    fn decode_layer(&self, data: &[u8], base: usize, info: &LayerInfo) -> Result<LiquidLayer, CodecError> {
        let mask = if info.mask_offset == 0 {
            PresenceMask::FULL
        } else {
            let rows: [u8; MASK_SIZE] = read_record(data, resolve(base, info.mask_offset)?, MASK_SIZE)?;
            PresenceMask::from_rows(rows)
        };

        let (heights, opacity) = if info.payload_offset == 0 {
            (HeightGrid::uniform(info.min_height), OpacityGrid::uniform(DEFAULT_OPACITY))
        } else {
            let format = self.types().vertex_format(info.liquid_type);
            let pos = resolve(base, info.payload_offset)?;
            read_payload(data, pos, mask, format, info.min_height)?
        };

        Ok(LiquidLayer::from_parts(
            info.liquid_type,
            info.min_height,
            info.max_height,
            mask,
            heights,
            opacity,
        ))
    }
}

/// Количество вершин, реально лежащих в payload
pub(crate) fn materialized_vertices(mask: PresenceMask) -> usize {
    (0..VERTICES * VERTICES)
        .filter(|i| mask.touches_vertex(i % VERTICES, i / VERTICES))
        .count()
}

/// Разреженный payload: в файле есть только вершины и ячейки занятых клеток,
/// поэтому идём по маске в row-major порядке.
fn read_payload(
    data: &[u8],
    pos: usize,
    mask: PresenceMask,
    format: VertexFormat,
    fill_height: f32,
) -> Result<(HeightGrid, OpacityGrid), CodecError> {
    let height_bytes = match format {
        VertexFormat::HeightDepth => materialized_vertices(mask) * 4,
        VertexFormat::DepthOnly => 0,
    };
    let bytes = slice(data, pos, height_bytes + mask.count())?;
    let (height_part, opacity_part) = bytes.split_at(height_bytes);

    let heights = match format {
        VertexFormat::DepthOnly => HeightGrid::uniform(fill_height),
        VertexFormat::HeightDepth => {
            let mut cells = [[fill_height; VERTICES]; VERTICES];
            let mut values = height_part.chunks_exact(4);
            for y in 0..VERTICES {
                for x in 0..VERTICES {
                    if !mask.touches_vertex(x, y) {
                        continue;
                    }
                    if let Some(raw) = values.next() {
                        cells[y][x] = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                    }
                }
            }
            HeightGrid::from_cells(cells)
        }
    };

    let mut cells = [[DEFAULT_OPACITY; CELLS]; CELLS];
    for ((x, y), &value) in mask.iter().zip(opacity_part) {
        cells[y][x] = value;
    }

    Ok((heights, OpacityGrid::from_cells(cells)))
}
