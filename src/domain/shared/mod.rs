pub mod response;
pub mod validation;

pub use response::DataResponse;
pub use validation::validate_request;
