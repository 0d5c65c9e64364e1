pub mod config;
pub mod http;
pub mod middleware;
pub mod pixiv;
pub mod raindrop;
