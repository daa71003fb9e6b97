pub mod batch;
pub mod json_writer;
pub mod panel;
pub mod summary;
pub mod tsv_writer;
