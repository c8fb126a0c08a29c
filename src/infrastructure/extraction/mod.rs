//! Unit Extractor Implementations

mod json_response;

pub use json_response::JsonResponseExtractor;
