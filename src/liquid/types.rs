// ============================================
// Liquid Types - Data-Driven таблица типов жидкостей
// ============================================
// ID типа хранится в файле как есть; таблица нужна кодеку,
// чтобы знать формат вершинных данных слоя.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Вид жидкости
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LiquidKind {
    #[default]
    Water,
    Ocean,
    Magma,
    Slime,
}

/// Что лежит в payload слоя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VertexFormat {
    /// Высоты вершин + прозрачность ячеек
    #[default]
    HeightDepth,
    /// Только прозрачность, высота = min_height
    DepthOnly,
}

/// Определение типа жидкости из JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidTypeDef {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub kind: LiquidKind,
    #[serde(default)]
    pub vertex_format: VertexFormat,
}

/// Файл с типами жидкостей
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidTypesFile {
    pub liquids: Vec<LiquidTypeDef>,
}

/// Таблица типов жидкостей
#[derive(Debug, Clone, Default)]
pub struct LiquidTypeTable {
    types: HashMap<u16, LiquidTypeDef>,
}

impl LiquidTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Загрузить типы из JSON строки
    pub fn load_from_json(&mut self, json: &str) -> Result<usize, String> {
        let file: LiquidTypesFile = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        let count = file.liquids.len();
        for def in file.liquids {
            self.register(def);
        }
        Ok(count)
    }

    /// Загрузить типы из файла
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read file: {}", e))?;
        self.load_from_json(&content)
    }

    /// Зарегистрировать (или переопределить) тип
    pub fn register(&mut self, def: LiquidTypeDef) {
        self.types.insert(def.id, def);
    }

    pub fn get(&self, id: u16) -> Option<&LiquidTypeDef> {
        self.types.get(&id)
    }

    /// Формат payload для типа; неизвестные типы пишутся с высотами
    pub fn vertex_format(&self, id: u16) -> VertexFormat {
        match self.types.get(&id) {
            Some(def) => def.vertex_format,
            None => {
                log::debug!("Unknown liquid type {}, assuming height+depth payload", id);
                VertexFormat::HeightDepth
            }
        }
    }

    pub fn count(&self) -> usize {
        self.types.len()
    }
}

// ============================================
// Global Table Singleton
// ============================================

static GLOBAL_TYPES: OnceLock<LiquidTypeTable> = OnceLock::new();

/// Глобальная таблица типов (встроенный default_liquids.json)
pub fn global_liquid_types() -> &'static LiquidTypeTable {
    GLOBAL_TYPES.get_or_init(|| {
        let mut table = LiquidTypeTable::new();
        if let Err(e) = table.load_from_json(include_str!("../../assets/liquids/default_liquids.json")) {
            log::warn!("Failed to load default liquid types: {}", e);
            register_fallback_types(&mut table);
        }
        table
    })
}

/// Fallback типы если JSON не загрузился
fn register_fallback_types(table: &mut LiquidTypeTable) {
    table.register(LiquidTypeDef {
        id: 1,
        name: "Water".to_string(),
        kind: LiquidKind::Water,
        vertex_format: VertexFormat::HeightDepth,
    });
    table.register(LiquidTypeDef {
        id: 2,
        name: "Ocean".to_string(),
        kind: LiquidKind::Ocean,
        vertex_format: VertexFormat::DepthOnly,
    });
}
