//! Data Models
//!
//! Plain serde structs shared between server and clients.

pub mod member;
pub mod redemption;
pub mod review;
pub mod reward;
pub mod staff;
pub mod transaction;
pub mod visit;

pub use member::*;
pub use redemption::*;
pub use review::*;
pub use reward::*;
pub use staff::*;
pub use transaction::*;
pub use visit::*;
