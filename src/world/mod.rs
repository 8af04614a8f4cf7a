// ============================================
// World Objects - Объекты, размещённые на тайлах
// ============================================

mod object;
mod store;

pub use object::{ModelInstance, PlacedObject, WmoInstance};
pub use store::{ObjectStore, WorldError};
