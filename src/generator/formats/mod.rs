pub mod binary;
pub mod source;
