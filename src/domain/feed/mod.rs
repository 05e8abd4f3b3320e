pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use dto::{FeedListQuery, FeedPatchRequest, FeedPostRequest, FeedResponse, UploadedImage};
pub use error::FeedServiceError;
pub use model::{Feed, NewFeed};
pub use service::{FeedService, FeedServiceApi};
