pub mod session;

pub use session::{CurrentUser, SessionGuard, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
