pub mod user;

pub use user::{Subject, UserRecord};
