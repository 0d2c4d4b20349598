pub mod converter;

pub use converter::{
    convert_dir, convert_file, convert_reader, BatchReport, ConvertOptions, FailedFile,
    FileReport,
};
