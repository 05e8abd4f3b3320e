pub mod middleware;
pub mod request_id;

pub use middleware::{
    auth_middleware, bearer_token, refresh_token, AuthUser, BEARER_PREFIX, REFRESH_HEADER,
};
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
