pub mod models;
pub mod validator;

pub use models::PollerOptions;
pub use validator::validate_options;
