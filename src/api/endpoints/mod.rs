//! API endpoint handlers.
//!
//! Patient-facing modules (`health`, `patients`, `chat`, `education`) are
//! open; `staff` sits behind the staff credential middleware.

pub mod chat;
pub mod education;
pub mod health;
pub mod patients;
pub mod staff;
