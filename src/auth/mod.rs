mod middleware;
mod password;
mod token;

pub use middleware::{AuthError, RequireReferent, RequireStaff, RequireUser};
pub use password::Hasher;
pub use token::{Claims, TokenPurpose, TokenService};
