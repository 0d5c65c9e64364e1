pub mod client;
pub mod hash;
pub mod model;

pub use client::PixivClient;
pub use hash::md5_hex;
