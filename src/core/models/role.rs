use serde::Serialize;
use sqlx::FromRow;

pub static HOST_ROLE: &str = "Host";
pub static ADMIN_ROLE: &str = "Admin";

pub static APPROVAL_APPROVED: &str = "Approved";
pub static ACTIVITY_ACTIVE: &str = "Active";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct HostProfile {
    pub user_id: i32,
    pub approval_status: String,
    pub activity_status: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct HostStatus {
    pub active: bool,
    pub profile: Option<HostProfile>,
}
