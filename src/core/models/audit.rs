use serde_json::Value;

pub static HOST_APPLICATION_SUBMITTED: &str = "host_application_submitted";
pub static HOST_APPLICATION_REVIEWED: &str = "host_application_reviewed";
pub static TARGET_HOST_APPLICATION: &str = "host_application";

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub event_type: String,
    pub user_id: Option<i32>,
    pub target_type: Option<String>,
    pub target_id: Option<i32>,
    pub metadata: Option<Value>,
}

impl Insert {
    pub fn host_application(event_type: &str, user_id: i32, application_id: i32, metadata: Value) -> Self {
        Self {
            event_type: event_type.into(),
            user_id: Some(user_id),
            target_type: Some(TARGET_HOST_APPLICATION.into()),
            target_id: Some(application_id),
            metadata: Some(metadata),
        }
    }
}
