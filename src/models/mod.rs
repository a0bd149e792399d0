//! Data models for the stock ledger

pub mod client;
pub mod enums;
pub mod equipment;
pub mod movement;
pub mod quote;
pub mod user;

// Re-export commonly used types
pub use client::Client;
pub use enums::{EquipmentType, MovementType, Role};
pub use equipment::Equipment;
pub use movement::{Movement, MovementDetails};
pub use quote::Quote;
pub use user::{User, UserClaims};
