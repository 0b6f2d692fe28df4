//! Background settings: schema, live store and persistence
//!
//! - **schema**: every tunable field with its bounds and default
//! - **store**: the session's live configuration (keyed updates, reset, observers)
//! - **storage**: key-value slots the store persists into

pub mod schema;
pub mod storage;
pub mod store;

pub use schema::{BackgroundSettings, BlendMode, FieldKind, FieldSpec, Section};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SettingsStore, SubscriptionId};
