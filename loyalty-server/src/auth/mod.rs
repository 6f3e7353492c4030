//! Authentication Module
//!
//! JWT sessions with three roles:
//!
//! - `member` - a loyalty member; `sub` is the member row id
//! - `staff` - door/bar staff; may accept visits and redemption codes
//! - `admin` - staff plus catalog management and member administration
//!
//! Staff log in with argon2-hashed credentials. Member tokens are issued
//! by staff at sign-up (the member app stores the token; there is no
//! member password).

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_staff};
pub use password::{hash_password, verify_password};
