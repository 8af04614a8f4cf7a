// ============================================
// Tile File - Чтение/запись файла жидкости тайла
// ============================================
// [заголовок bincode, 16 байт] [блок жидкости тайла, сжатый ZSTD]

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, LiquidCodec};

use super::water::{LoadPolicy, TileWater};

/// Магическое число "LQTL" в ASCII
pub const TILE_MAGIC: [u8; 4] = *b"LQTL";

/// Версия формата файла
pub const TILE_FILE_VERSION: u32 = 1;

const COMPRESSION_LEVEL: i32 = 3;

/// Заголовок файла тайла
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileFileHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub tile_x: i32,
    pub tile_y: i32,
}

impl TileFileHeader {
    pub fn new(tile_x: i32, tile_y: i32) -> Self {
        Self {
            magic: TILE_MAGIC,
            version: TILE_FILE_VERSION,
            tile_x,
            tile_y,
        }
    }
}

impl Default for TileFileHeader {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Ошибки сохранения/загрузки
#[derive(Debug)]
pub enum TileFileError {
    Io(std::io::Error),
    Serialize(String),
    Deserialize(String),
    InvalidMagic,
    UnsupportedVersion(u32),
    Compression(String),
    Codec(CodecError),
}

impl From<std::io::Error> for TileFileError {
    fn from(e: std::io::Error) -> Self {
        TileFileError::Io(e)
    }
}

impl From<CodecError> for TileFileError {
    fn from(e: CodecError) -> Self {
        TileFileError::Codec(e)
    }
}

impl fmt::Display for TileFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Serialize(msg) => write!(f, "failed to serialize header: {msg}"),
            Self::Deserialize(msg) => write!(f, "failed to read header: {msg}"),
            Self::InvalidMagic => write!(f, "not a liquid tile file"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported tile file version {v}"),
            Self::Compression(msg) => write!(f, "compression error: {msg}"),
            Self::Codec(e) => write!(f, "liquid data error: {e}"),
        }
    }
}

impl std::error::Error for TileFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

/// Интерфейс файла тайла
pub struct TileFile;

impl TileFile {
    /// Собрать файл тайла целиком в памяти
    pub fn to_bytes(tile: &TileWater, codec: &LiquidCodec) -> Result<Vec<u8>, TileFileError> {
        let mut body = Vec::new();
        tile.write(codec, &mut body)?;
        let compressed = zstd::encode_all(&body[..], COMPRESSION_LEVEL)
            .map_err(|e| TileFileError::Compression(e.to_string()))?;

        let header = TileFileHeader::new(tile.tile_x(), tile.tile_y());
        let mut bytes = bincode::serialize(&header)
            .map_err(|e| TileFileError::Serialize(e.to_string()))?;
        bytes.extend_from_slice(&compressed);

        log::debug!("Compressed liquid block: {} -> {} bytes", body.len(), compressed.len());
        Ok(bytes)
    }

    /// Разобрать файл тайла из памяти
    pub fn from_bytes(
        bytes: &[u8],
        codec: &LiquidCodec,
        policy: LoadPolicy,
    ) -> Result<TileWater, TileFileError> {
        // 1. Заголовок
        let header_size = bincode::serialized_size(&TileFileHeader::default())
            .map_err(|e| TileFileError::Deserialize(e.to_string()))? as usize;
        if bytes.len() < header_size {
            return Err(TileFileError::Deserialize(format!(
                "file too short: {} bytes, header needs {}",
                bytes.len(),
                header_size
            )));
        }
        let (header_bytes, compressed) = bytes.split_at(header_size);

        let header: TileFileHeader = bincode::deserialize(header_bytes)
            .map_err(|e| TileFileError::Deserialize(e.to_string()))?;

        if header.magic != TILE_MAGIC {
            return Err(TileFileError::InvalidMagic);
        }
        if header.version != TILE_FILE_VERSION {
            return Err(TileFileError::UnsupportedVersion(header.version));
        }

        // 2. Тело
        let body = zstd::decode_all(compressed)
            .map_err(|e| TileFileError::Compression(e.to_string()))?;

        Ok(TileWater::read(codec, &body, 0, header.tile_x, header.tile_y, policy)?)
    }

    /// Сохранить жидкость тайла в файл.
    /// Файл создаётся только когда все байты уже собраны.
    pub fn save(path: impl AsRef<Path>, tile: &TileWater, codec: &LiquidCodec) -> Result<(), TileFileError> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(tile, codec)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;

        log::info!(
            "Saved liquid tile ({}, {}) to {} ({} bytes)",
            tile.tile_x(),
            tile.tile_y(),
            path.display(),
            bytes.len()
        );
        Ok(())
    }

    /// Загрузить жидкость тайла из файла
    pub fn load(
        path: impl AsRef<Path>,
        codec: &LiquidCodec,
        policy: LoadPolicy,
    ) -> Result<TileWater, TileFileError> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

        let tile = Self::from_bytes(&bytes, codec, policy)?;
        log::info!(
            "Loaded liquid tile ({}, {}) from {}: {} chunk(s) with liquid",
            tile.tile_x(),
            tile.tile_y(),
            path.display(),
            tile.liquid_chunk_count()
        );
        Ok(tile)
    }
}
