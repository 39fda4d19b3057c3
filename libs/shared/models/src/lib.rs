pub mod error;
pub mod service_account;

pub use error::AppError;
pub use service_account::ServiceAccountKey;
