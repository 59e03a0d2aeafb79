pub mod token;

pub use token::{RefreshRequest, TokenRecord};
