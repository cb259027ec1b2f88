use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const USER: &str = "user";
pub static USER_ACTIVE: &str = "Active";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Admin edit of a user's contact details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
}
