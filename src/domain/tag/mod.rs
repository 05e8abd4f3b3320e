pub mod model;
pub mod service;

pub use model::{validate_tag_names, Tag, TagResponse, TagSearchQuery};
pub use service::{TagService, TagServiceApi};
