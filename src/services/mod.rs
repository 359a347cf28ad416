pub mod media;
pub mod token_service;

pub use media::{HttpMediaStore, MediaAsset, MediaStore};
pub use token_service::TokenService;
