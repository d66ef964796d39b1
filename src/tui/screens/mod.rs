//! TUI screen implementations.

pub mod equipment;

pub use equipment::{EquipmentScreenState, Focus, draw_equipment};
