//! Resume ingestion pipeline: upload → encode → extract → persist → view.

pub mod certificates;
pub mod encoding;
pub mod extraction;
pub mod handlers;
pub mod models;
pub mod persist;
pub mod prompts;
pub mod render;
pub mod schema;
pub mod section_parser;
pub mod upload;
