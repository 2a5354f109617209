pub mod entry_source;
pub mod entry_source_mock;
pub mod presenter;
