pub mod chat_config;
pub mod default_config;

pub use chat_config::ChatConfig;
