mod equipment;
mod form;

pub use equipment::{EquipmentId, EquipmentRecord};
pub use form::{Field, FieldUpdate, FormMode, FormState, Submission, parse_price};
