//! Visit QR Code & Activity Models

use serde::{Deserialize, Serialize};

/// Per-member rotating visit credential. One row per member; the row is
/// replaced in place when the rotation interval elapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VisitQrCode {
    pub id: i64,
    pub member_id: i64,
    pub code: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Named activity a staff scan credits points for (entry, event night, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VisitActivity {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub is_active: bool,
}

/// Create visit activity payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitActivityCreate {
    pub name: String,
    pub points: i64,
}
