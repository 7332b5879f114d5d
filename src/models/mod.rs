pub mod alert;
pub mod conversation;
pub mod enums;
pub mod intervention;
pub mod patient;
pub mod push;
pub mod report;
pub mod symptom;

pub use alert::*;
pub use conversation::*;
pub use enums::*;
pub use intervention::*;
pub use patient::*;
pub use push::*;
pub use report::*;
pub use symptom::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Eight-character record id, the format the JSON records have always used.
pub fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
