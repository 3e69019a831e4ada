//! Media host clients.
//!
//! - [`CloudinaryMediaHost`] - Cloudinary signed upload API over `reqwest`

mod cloudinary;

pub use cloudinary::{CloudinaryConfig, CloudinaryMediaHost};
