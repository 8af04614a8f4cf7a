// ============================================
// Encode - LiquidChunk -> байты (три фазы)
// ============================================
// Каждая фаза дописывает в конец буфера и возвращает patch-записи:
// позиции заглушек, которые заполнит следующая фаза, когда узнает
// куда легли таблица слоёв / маска / payload.

use crate::liquid::constants::{DEFAULT_OPACITY, VERTICES};
use crate::liquid::{LiquidChunk, LiquidLayer, VertexFormat};

use super::error::CodecError;
use super::records::{
    patch_u32, relative, write_record, ChunkHeader, LayerInfo, HEADER_INFO_OFFSET_AT,
    INFO_MASK_OFFSET_AT, INFO_PAYLOAD_OFFSET_AT,
};
use super::LiquidCodec;

/// Заглушка info_offset в заголовке чанка
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct HeaderPatch {
    info_offset_at: usize,
    layer_count: usize,
}

/// Заглушки mask_offset / payload_offset по слоям
#[derive(Debug, Clone)]
#[must_use]
pub struct InfoPatch {
    layers: Vec<LayerPatch>,
}

#[derive(Debug, Clone, Copy)]
struct LayerPatch {
    slot: usize,
    mask_offset_at: usize,
    payload_offset_at: usize,
}

impl LiquidCodec<'_> {
    /// Фаза 1: заголовок с info_offset = 0
    pub fn write_header(&self, chunk: &LiquidChunk, out: &mut Vec<u8>) -> Result<HeaderPatch, CodecError> {
        let layer_count = chunk.layer_count();
        let header = ChunkHeader {
            info_offset: 0,
            layer_count: layer_count as u32,
        };
        let pos = write_record(out, &header)?;
        Ok(HeaderPatch {
            info_offset_at: pos + HEADER_INFO_OFFSET_AT,
            layer_count,
        })
    }

    /// Фаза 2: таблица слоёв в порядке слотов, info_offset дописывается
    pub fn write_info(
        &self,
        chunk: &LiquidChunk,
        header: HeaderPatch,
        out: &mut Vec<u8>,
        base: usize,
    ) -> Result<InfoPatch, CodecError> {
        // Заголовок уже обещал столько записей
        let actual = chunk.layer_count();
        if actual != header.layer_count {
            return Err(CodecError::LayerCountChanged {
                expected: header.layer_count,
                actual,
            });
        }
        if header.layer_count == 0 {
            return Ok(InfoPatch { layers: Vec::new() });
        }

        let info_offset = relative(out.len(), base)?;
        patch_u32(out, header.info_offset_at, info_offset)?;

        let mut layers = Vec::with_capacity(header.layer_count);
        for (slot, layer) in chunk.layers() {
            let info = LayerInfo {
                liquid_type: layer.liquid_type(),
                min_height: layer.min_height(),
                max_height: layer.max_height(),
                mask_offset: 0,
                payload_offset: 0,
            };
            let pos = write_record(out, &info)?;
            layers.push(LayerPatch {
                slot,
                mask_offset_at: pos + INFO_MASK_OFFSET_AT,
                payload_offset_at: pos + INFO_PAYLOAD_OFFSET_AT,
            });
        }
        Ok(InfoPatch { layers })
    }

    /// Фаза 3: маски и payload, смещения дописываются в таблицу слоёв
    pub fn write_data(
        &self,
        chunk: &LiquidChunk,
        info: InfoPatch,
        out: &mut Vec<u8>,
        base: usize,
    ) -> Result<(), CodecError> {
        for patch in info.layers {
            let layer = chunk.layer(patch.slot).ok_or(CodecError::MissingLayer(patch.slot))?;
            let mask = layer.mask();

            // Полная маска не пишется
            if !mask.is_full() {
                let mask_offset = relative(out.len(), base)?;
                patch_u32(out, patch.mask_offset_at, mask_offset)?;
                out.extend_from_slice(&mask.to_rows());
            }

            let format = self.types().vertex_format(layer.liquid_type());
            if needs_payload(layer, format) {
                let payload_offset = relative(out.len(), base)?;
                patch_u32(out, patch.payload_offset_at, payload_offset)?;
                write_payload(layer, format, out);
            }
        }

        log::debug!(
            "Encoded liquid chunk ({}, {}): {} layer(s), buffer now {} bytes",
            chunk.position().x,
            chunk.position().y,
            chunk.layer_count(),
            out.len()
        );
        Ok(())
    }

    /// Все три фазы подряд. При ошибке буфер откатывается к исходной длине.
    pub fn encode(&self, chunk: &LiquidChunk, out: &mut Vec<u8>, base: usize) -> Result<(), CodecError> {
        let start = out.len();
        let result = self
            .write_header(chunk, out)
            .and_then(|header| self.write_info(chunk, header, out, base))
            .and_then(|info| self.write_data(chunk, info, out, base));
        if result.is_err() {
            out.truncate(start);
        }
        result
    }
}

/// Без payload слой читается как ровный на min_height и полностью непрозрачный
fn needs_payload(layer: &LiquidLayer, format: VertexFormat) -> bool {
    let opaque = layer.opacities().uniform_value() == Some(DEFAULT_OPACITY);
    let flat = match format {
        VertexFormat::DepthOnly => true,
        VertexFormat::HeightDepth => layer.heights().uniform_value() == Some(layer.min_height()),
    };
    !(opaque && flat)
}

fn write_payload(layer: &LiquidLayer, format: VertexFormat, out: &mut Vec<u8>) {
    let mask = layer.mask();

    if format == VertexFormat::HeightDepth {
        let heights = layer.heights();
        for y in 0..VERTICES {
            for x in 0..VERTICES {
                if mask.touches_vertex(x, y) {
                    out.extend_from_slice(&heights.get(x, y).to_le_bytes());
                }
            }
        }
    }

    let opacity = layer.opacities();
    out.extend(mask.iter().map(|(x, y)| opacity.get(x, y)));
}
