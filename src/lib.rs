pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod storage;

pub use engine::code_table::CodeTable;
pub use engine::quantizer::ThresholdMode;
pub use error::ConvertError;
pub use format::OutputFormat;
pub use storage::VectorSet;
