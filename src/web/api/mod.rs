pub mod docs;
pub mod greeting;
pub mod upload;
