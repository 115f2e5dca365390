// Adapters layer: concrete implementations for external systems (storage, chat, task tracker).

pub mod bitrix;
pub mod storage;
pub mod telegram;

pub use bitrix::BitrixClient;
pub use storage::LocalStorage;
pub use telegram::TelegramNotifier;
