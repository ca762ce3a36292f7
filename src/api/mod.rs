pub mod envelope;
pub mod list;
pub mod response;
