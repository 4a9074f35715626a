pub mod key;
pub mod write;
