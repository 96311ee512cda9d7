pub(crate) mod extractors;
pub mod jwt;
pub mod password;

pub use extractors::CurrentUser;
pub use password::hash_password;
