pub mod cms;
pub mod json_store;
pub mod notify;

pub use cms::HttpPageContentSource;
pub use json_store::JsonFileAdapter;
pub use notify::HttpLeadNotifier;
