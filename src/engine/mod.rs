pub mod code_table;
pub mod conversion;
pub mod packer;
pub mod quantizer;
