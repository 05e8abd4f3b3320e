pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use dto::{MemberResponse, SignUpRequest};
pub use error::MemberServiceError;
pub use model::{normalize_email, Member};
pub use service::{MemberService, MemberServiceApi};
