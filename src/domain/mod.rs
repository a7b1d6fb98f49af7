pub mod archive;
pub mod synthesis;
