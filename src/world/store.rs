// ============================================
// Object Store - Размещённые объекты и запросы к ним
// ============================================

use std::collections::HashMap;
use std::fmt;

use ultraviolet::Vec3;

use super::object::{ModelInstance, PlacedObject, WmoInstance};

/// Ошибка операции с объектами мира (с именем операции)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldError {
    pub operation: &'static str,
    pub message: String,
}

impl WorldError {
    fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self { operation, message: message.into() }
    }
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

impl std::error::Error for WorldError {}

/// Хранилище объектов по uid
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: HashMap<u32, PlacedObject>,
    next_uid: u32,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Следующий свободный uid; счётчик идёт по кругу, 0 не выдаётся
    fn allocate_uid(&mut self) -> u32 {
        loop {
            self.next_uid = self.next_uid.wrapping_add(1);
            if self.next_uid != 0 && !self.objects.contains_key(&self.next_uid) {
                return self.next_uid;
            }
        }
    }

    pub fn add_model(&mut self, filename: &str, position: Vec3, rotation: Vec3, scale: f32) -> u32 {
        let uid = self.allocate_uid();
        self.objects.insert(
            uid,
            PlacedObject::Model(ModelInstance {
                uid,
                filename: filename.to_string(),
                position,
                rotation,
                scale,
            }),
        );
        uid
    }

    pub fn add_wmo(&mut self, filename: &str, position: Vec3, rotation: Vec3) -> u32 {
        let uid = self.allocate_uid();
        self.objects.insert(
            uid,
            PlacedObject::Wmo(WmoInstance {
                uid,
                filename: filename.to_string(),
                position,
                rotation,
            }),
        );
        uid
    }

    pub fn get(&self, uid: u32) -> Option<&PlacedObject> {
        self.objects.get(&uid)
    }

    pub fn get_mut(&mut self, uid: u32) -> Option<&mut PlacedObject> {
        self.objects.get_mut(&uid)
    }

    /// uid всех объектов, чья позиция попадает в [min, max] по X/Z.
    /// Сначала модели, потом WMO, внутри - по возрастанию uid.
    pub fn query(&self, min: Vec3, max: Vec3) -> Vec<u32> {
        let mut found: Vec<_> = self
            .objects
            .values()
            .filter(|o| o.within_xz(min, max))
            .map(|o| (o.is_wmo(), o.uid()))
            .collect();
        found.sort_unstable();
        found.into_iter().map(|(_, uid)| uid).collect()
    }

    pub fn remove(&mut self, uid: u32) -> Option<PlacedObject> {
        self.objects.remove(&uid)
    }

    /// Заменить объект другим файлом на том же месте.
    /// ".wmo" -> WMO, иначе модель с прежним масштабом. Возвращает новый uid.
    pub fn replace(&mut self, uid: u32, filename: &str) -> Result<u32, WorldError> {
        const OP: &str = "model_replace";

        if filename.is_empty() {
            return Err(WorldError::new(OP, "empty filename"));
        }
        let old = self
            .objects
            .get(&uid)
            .ok_or_else(|| WorldError::new(OP, format!("no object with uid {uid}")))?;
        if old.filename() == filename {
            return Ok(uid);
        }

        let (position, rotation, scale) = (old.position(), old.rotation(), old.scale());
        self.objects.remove(&uid);

        let new_uid = if filename.to_ascii_lowercase().ends_with(".wmo") {
            self.add_wmo(filename, position, rotation)
        } else {
            self.add_model(filename, position, rotation, scale)
        };
        log::debug!("Replaced object {} with {} ({})", uid, new_uid, filename);
        Ok(new_uid)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (ObjectStore, u32, u32, u32) {
        let mut store = ObjectStore::new();
        let tree = store.add_model("world/tree.m2", Vec3::new(5.0, 0.0, 5.0), Vec3::zero(), 2.0);
        let tower = store.add_wmo("world/tower.wmo", Vec3::new(8.0, 30.0, 2.0), Vec3::zero());
        let rock = store.add_model("world/rock.m2", Vec3::new(50.0, 0.0, 50.0), Vec3::zero(), 1.0);
        (store, tree, tower, rock)
    }

    #[test]
    fn test_query_rectangle() {
        let (store, tree, tower, _) = store();
        let found = store.query(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(found, vec![tree, tower]);
        assert!(store.query(Vec3::new(100.0, 0.0, 100.0), Vec3::new(110.0, 0.0, 110.0)).is_empty());
    }

    #[test]
    fn test_replace_model_with_wmo() {
        let (mut store, tree, _, _) = store();
        let new_uid = store.replace(tree, "world/house.WMO").unwrap();
        assert_ne!(new_uid, tree);
        assert!(store.get(tree).is_none());

        let house = store.get(new_uid).unwrap();
        assert!(house.is_wmo());
        assert_eq!(house.position(), Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(house.scale(), 1.0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_keeps_model_scale() {
        let (mut store, tree, _, _) = store();
        let new_uid = store.replace(tree, "world/bush.m2").unwrap();
        assert_eq!(store.get(new_uid).unwrap().scale(), 2.0);
    }

    #[test]
    fn test_replace_same_file_is_noop() {
        let (mut store, _, tower, _) = store();
        assert_eq!(store.replace(tower, "world/tower.wmo"), Ok(tower));
    }

    #[test]
    fn test_replace_errors() {
        let (mut store, tree, _, _) = store();
        let err = store.replace(tree, "").unwrap_err();
        assert_eq!(err.operation, "model_replace");
        assert_eq!(err.to_string(), "model_replace: empty filename");
        assert!(store.get(tree).is_some());

        assert!(store.replace(999, "x.m2").is_err());
    }

    #[test]
    fn test_uid_counter_wraps_past_used_ids() {
        let (mut store, tree, tower, _) = store();
        store.next_uid = u32::MAX;
        let uid = store.add_wmo("world/gate.wmo", Vec3::zero(), Vec3::zero());
        assert_ne!(uid, tree);
        assert_ne!(uid, tower);
        assert_eq!(uid, 4);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_edit_through_handle() {
        let (mut store, _, _, rock) = store();
        store.get_mut(rock).unwrap().set_position(Vec3::new(1.0, 0.0, 1.0));
        let found = store.query(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(found, vec![rock]);
        assert!(store.remove(rock).is_some());
        assert!(store.remove(rock).is_none());
    }
}
