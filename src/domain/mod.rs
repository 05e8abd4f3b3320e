pub mod auth;
pub mod feed;
pub mod member;
pub mod shared;
pub mod tag;
