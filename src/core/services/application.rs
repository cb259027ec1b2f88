use serde_json::json;

use crate::core::models::{
    application::{ApplicationStatus, ApplicationWithApplicant, HostApplication, Insert, Query, Submit, Summary},
    audit::{Insert as AuditInsert, HOST_APPLICATION_SUBMITTED},
};
use crate::core::ports::repository::{HostApplicationCommon, HostProfileCommon, Manager, Store};
use crate::core::services::audit;
use crate::error::Error;

pub static DEFAULT_EVENT_TYPE: &str = "General";

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

pub async fn submit<M>(manager: &M, uid: i32, data: Submit) -> Result<i32, Error>
where
    M: Manager,
{
    let org_name = trimmed(data.org_name);
    let motivation = trimmed(data.motivation);
    let mut missing = Vec::new();
    if org_name.is_empty() {
        missing.push("org_name");
    }
    if motivation.is_empty() {
        missing.push("motivation");
    }
    if !missing.is_empty() {
        return Err(Error::ValidationError(missing));
    }
    let mut event_type = trimmed(data.event_type);
    if event_type.is_empty() {
        event_type = DEFAULT_EVENT_TYPE.into();
    }
    let metadata = json!({ "org_name": &org_name, "event_type": &event_type });
    let id = {
        let mut db = manager.db().await?;
        HostApplicationCommon::insert(
            &mut db,
            Insert {
                applicant_user_id: uid,
                org_name,
                event_type,
                motivation,
                status: ApplicationStatus::Pending,
            },
        )
        .await?
    };
    log::info!("host application submitted(id: {}, user: {})", id, uid);
    audit::record(manager, AuditInsert::host_application(HOST_APPLICATION_SUBMITTED, uid, id, metadata)).await;
    Ok(id)
}

pub async fn applications_of_user<S>(db: &mut S, uid: i32) -> Result<Vec<HostApplication>, Error>
where
    S: Store,
{
    let list = HostApplicationCommon::query(
        db,
        Query {
            applicant_user_id_eq: Some(uid),
            ..Default::default()
        },
    )
    .await?;
    Ok(list.into_iter().map(|a| a.application).collect())
}

/// `None`, an empty string and `All` list every application.
pub fn status_filter(status: Option<String>) -> Option<String> {
    status.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}

pub async fn list_applications<S>(db: &mut S, status: Option<String>) -> Result<Vec<ApplicationWithApplicant>, Error>
where
    S: Store,
{
    HostApplicationCommon::query(
        db,
        Query {
            status_eq: status_filter(status),
            ..Default::default()
        },
    )
    .await
}

pub async fn summary<S>(db: &mut S) -> Result<Summary, Error>
where
    S: Store,
{
    let pending_applications = HostApplicationCommon::count(
        db,
        Query {
            status_eq: Some(ApplicationStatus::Pending.as_str().into()),
            ..Default::default()
        },
    )
    .await?;
    let active_hosts = HostProfileCommon::count_active(db).await?;
    Ok(Summary {
        pending_applications,
        active_hosts,
    })
}
