pub mod chat_turn_model;
pub mod status_entry_model;
pub mod vector_record_model;

pub use chat_turn_model::{ChatTurnModel, NewChatTurnModel};
pub use status_entry_model::{NewStatusEntryModel, StatusEntryModel};
pub use vector_record_model::{NewVectorRecordModel, VectorRecordModel};
