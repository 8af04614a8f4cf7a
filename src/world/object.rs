// ============================================
// Placed Object - Размещённый объект мира
// ============================================
// Либо модель (M2, есть масштаб), либо WMO (масштаб всегда 1).

use ultraviolet::Vec3;

/// Динамическая модель
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    pub uid: u32,
    pub filename: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

/// Статический объект (здание)
#[derive(Debug, Clone, PartialEq)]
pub struct WmoInstance {
    pub uid: u32,
    pub filename: String,
    pub position: Vec3,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacedObject {
    Model(ModelInstance),
    Wmo(WmoInstance),
}

impl PlacedObject {
    pub fn uid(&self) -> u32 {
        match self {
            PlacedObject::Model(m) => m.uid,
            PlacedObject::Wmo(w) => w.uid,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            PlacedObject::Model(m) => &m.filename,
            PlacedObject::Wmo(w) => &w.filename,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            PlacedObject::Model(m) => m.position,
            PlacedObject::Wmo(w) => w.position,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        match self {
            PlacedObject::Model(m) => m.position = position,
            PlacedObject::Wmo(w) => w.position = position,
        }
    }

    pub fn rotation(&self) -> Vec3 {
        match self {
            PlacedObject::Model(m) => m.rotation,
            PlacedObject::Wmo(w) => w.rotation,
        }
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        match self {
            PlacedObject::Model(m) => m.rotation = rotation,
            PlacedObject::Wmo(w) => w.rotation = rotation,
        }
    }

    /// У WMO масштаба нет
    pub fn scale(&self) -> f32 {
        match self {
            PlacedObject::Model(m) => m.scale,
            PlacedObject::Wmo(_) => 1.0,
        }
    }

    /// Для WMO игнорируется
    pub fn set_scale(&mut self, scale: f32) {
        if let PlacedObject::Model(m) = self {
            m.scale = scale;
        }
    }

    #[inline]
    pub fn is_wmo(&self) -> bool {
        matches!(self, PlacedObject::Wmo(_))
    }

    /// Лежит ли позиция в прямоугольнике [min, max] по X/Z (включительно)
    pub fn within_xz(&self, min: Vec3, max: Vec3) -> bool {
        let p = self.position();
        p.x >= min.x && p.x <= max.x && p.z >= min.z && p.z <= max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_scale_is_fixed() {
        let mut wmo = PlacedObject::Wmo(WmoInstance {
            uid: 1,
            filename: "world/wmo/tower.wmo".to_string(),
            position: Vec3::zero(),
            rotation: Vec3::zero(),
        });
        wmo.set_scale(3.0);
        assert_eq!(wmo.scale(), 1.0);
        assert!(wmo.is_wmo());
    }

    #[test]
    fn test_model_accessors() {
        let mut model = PlacedObject::Model(ModelInstance {
            uid: 9,
            filename: "world/tree.m2".to_string(),
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::zero(),
            scale: 1.0,
        });
        model.set_scale(2.5);
        model.set_position(Vec3::new(4.0, 5.0, 6.0));
        model.set_rotation(Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(model.scale(), 2.5);
        assert_eq!(model.position(), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(model.rotation().y, 90.0);
        assert_eq!(model.uid(), 9);
        assert_eq!(model.filename(), "world/tree.m2");
    }

    #[test]
    fn test_within_xz_ignores_height() {
        let model = PlacedObject::Model(ModelInstance {
            uid: 1,
            filename: "a.m2".to_string(),
            position: Vec3::new(10.0, 9999.0, 20.0),
            rotation: Vec3::zero(),
            scale: 1.0,
        });
        assert!(model.within_xz(Vec3::new(10.0, 0.0, 0.0), Vec3::new(15.0, 0.0, 20.0)));
        assert!(!model.within_xz(Vec3::new(11.0, 0.0, 0.0), Vec3::new(15.0, 0.0, 20.0)));
    }
}
