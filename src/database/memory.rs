use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::models::{
    application::{ApplicationWithApplicant, HostApplication, Insert as ApplicationInsert, Query as ApplicationQuery, ReviewUpdate},
    audit::Insert as AuditInsert,
    event::{Event, EventStatus, Fields as EventFields, Insert as EventInsert},
    role::{HostProfile, ACTIVITY_ACTIVE, ADMIN_ROLE, APPROVAL_APPROVED, HOST_ROLE},
    user::{UserSummary, USER_ACTIVE},
};
use crate::core::ports::repository::{AuditCommon, Common, EventCommon, HostApplicationCommon, HostProfileCommon, Manager, RoleCommon, Store, TxStore, UserCommon};
use crate::error::Error;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub status: String,
}

/// Tables of the in-memory database.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub users: Vec<User>,
    pub roles: Vec<(i32, String)>,
    pub user_roles: Vec<(i32, i32)>,
    pub applications: Vec<HostApplication>,
    pub profiles: Vec<HostProfile>,
    pub audit: Vec<AuditInsert>,
    pub events: Vec<Event>,
    /// Name of a store operation that fails with a storage error.
    pub fail_on: Option<&'static str>,
    next_id: i32,
}

impl State {
    /// Users 1 (admin), 7 (student) and 99 (second admin), with Admin and Host roles seeded.
    pub fn seeded() -> Self {
        let mut state = State {
            roles: vec![(1, ADMIN_ROLE.into()), (2, HOST_ROLE.into())],
            user_roles: vec![(1, 1), (99, 1)],
            next_id: 100,
            ..Default::default()
        };
        for (id, name) in [(1, "Admin"), (7, "Student Seven"), (99, "Reviewer")] {
            state.users.push(User {
                id,
                name: name.into(),
                email: format!("user{}@example.com", id),
                status: USER_ACTIVE.into(),
            });
        }
        state
    }

    pub fn add_application(&mut self, applicant_user_id: i32, status: &str) -> i32 {
        self.next_id += 1;
        let id = self.next_id;
        self.applications.push(HostApplication {
            id,
            applicant_user_id,
            org_name: format!("Org {}", id),
            event_type: "General".into(),
            motivation: "we host events".into(),
            status: status.into(),
            review_comment: None,
            reviewer_user_id: None,
            submitted_at: Utc::now() + Duration::seconds(id as i64),
        });
        id
    }

    /// Gives `uid` the Host role and a host profile in the given activity state.
    pub fn add_host(&mut self, uid: i32, active: bool) {
        self.user_roles.push((uid, 2));
        self.profiles.push(HostProfile {
            user_id: uid,
            approval_status: APPROVAL_APPROVED.into(),
            activity_status: if active { ACTIVITY_ACTIVE.into() } else { "Inactive".into() },
            is_active: active,
        });
    }

    pub fn application(&self, id: i32) -> Option<&HostApplication> {
        self.applications.iter().find(|a| a.id == id)
    }

    pub fn role_names(&self, uid: i32) -> Vec<String> {
        let mut names: Vec<String> = self
            .user_roles
            .iter()
            .filter(|(u, _)| *u == uid)
            .filter_map(|(_, rid)| self.roles.iter().find(|(id, _)| id == rid).map(|(_, name)| name.clone()))
            .collect();
        names.sort();
        names
    }

    fn check(&self, op: &str) -> Result<(), Error> {
        if self.fail_on == Some(op) {
            return Err(Error::StorageError(sqlx::Error::Protocol(format!("injected failure in {}", op))));
        }
        Ok(())
    }

    fn filtered(&self, param: &ApplicationQuery) -> Vec<&HostApplication> {
        self.applications
            .iter()
            .filter(|a| param.applicant_user_id_eq.map(|uid| a.applicant_user_id == uid).unwrap_or(true))
            .filter(|a| param.status_eq.as_ref().map(|s| a.status.eq_ignore_ascii_case(s)).unwrap_or(true))
            .collect()
    }
}

/// A single-connection database: every store holds the lock, so
/// transactions serialize the way row locks make them in Postgres.
#[derive(Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<State>>,
}

impl MemoryManager {
    pub fn new(state: State) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }

    pub async fn set_fail_on(&self, op: Option<&'static str>) {
        self.state.lock().await.fail_on = op;
    }
}

pub struct MemoryStore {
    guard: OwnedMutexGuard<State>,
    working: Option<State>,
}

impl MemoryStore {
    fn state(&mut self) -> &mut State {
        match &mut self.working {
            Some(working) => working,
            None => &mut *self.guard,
        }
    }
}

impl HostApplicationCommon for MemoryStore {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<i32, Error> {
        let state = self.state();
        state.check("application_insert")?;
        let id = state.add_application(data.applicant_user_id, data.status.as_str());
        if let Some(application) = state.applications.iter_mut().find(|a| a.id == id) {
            application.org_name = data.org_name;
            application.event_type = data.event_type;
            application.motivation = data.motivation;
        }
        Ok(id)
    }

    async fn query(&mut self, param: ApplicationQuery) -> Result<Vec<ApplicationWithApplicant>, Error> {
        let state = self.state();
        state.check("application_query")?;
        let mut list: Vec<ApplicationWithApplicant> = state
            .filtered(&param)
            .into_iter()
            .map(|a| {
                let user = state.users.iter().find(|u| u.id == a.applicant_user_id);
                ApplicationWithApplicant {
                    application: a.clone(),
                    applicant_name: user.map(|u| u.name.clone()),
                    applicant_email: user.map(|u| u.email.clone()),
                }
            })
            .collect();
        list.sort_by(|a, b| (b.application.submitted_at, b.application.id).cmp(&(a.application.submitted_at, a.application.id)));
        Ok(list)
    }

    async fn count(&mut self, param: ApplicationQuery) -> Result<i64, Error> {
        let state = self.state();
        state.check("application_count")?;
        Ok(state.filtered(&param).len() as i64)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<HostApplication>, Error> {
        let state = self.state();
        state.check("application_get")?;
        Ok(state.application(id).cloned())
    }

    async fn update_review(&mut self, id: i32, update: ReviewUpdate) -> Result<(), Error> {
        let state = self.state();
        state.check("application_update")?;
        if let Some(application) = state.applications.iter_mut().find(|a| a.id == id) {
            application.status = update.status.as_str().into();
            application.review_comment = update.review_comment;
            application.reviewer_user_id = Some(update.reviewer_user_id);
        }
        Ok(())
    }
}

impl RoleCommon for MemoryStore {
    async fn role_id(&mut self, name: &str) -> Result<Option<i32>, Error> {
        let state = self.state();
        state.check("role_id")?;
        Ok(state.roles.iter().find(|(_, n)| n.eq_ignore_ascii_case(name)).map(|(id, _)| *id))
    }

    async fn ensure_role(&mut self, uid: i32, role_id: i32) -> Result<(), Error> {
        let state = self.state();
        state.check("ensure_role")?;
        if !state.user_roles.contains(&(uid, role_id)) {
            state.user_roles.push((uid, role_id));
        }
        Ok(())
    }

    async fn roles(&mut self, uid: i32) -> Result<Vec<String>, Error> {
        let state = self.state();
        state.check("roles")?;
        Ok(state.role_names(uid))
    }
}

impl HostProfileCommon for MemoryStore {
    async fn activate(&mut self, uid: i32) -> Result<(), Error> {
        let state = self.state();
        state.check("activate")?;
        let active = HostProfile {
            user_id: uid,
            approval_status: APPROVAL_APPROVED.into(),
            activity_status: ACTIVITY_ACTIVE.into(),
            is_active: true,
        };
        match state.profiles.iter_mut().find(|p| p.user_id == uid) {
            Some(profile) => *profile = active,
            None => state.profiles.push(active),
        }
        Ok(())
    }

    async fn get(&mut self, uid: i32) -> Result<Option<HostProfile>, Error> {
        let state = self.state();
        state.check("profile_get")?;
        Ok(state.profiles.iter().find(|p| p.user_id == uid).cloned())
    }

    async fn count_active(&mut self) -> Result<i64, Error> {
        let state = self.state();
        state.check("profile_count")?;
        Ok(state.profiles.iter().filter(|p| p.is_active).count() as i64)
    }
}

impl AuditCommon for MemoryStore {
    async fn insert(&mut self, entry: AuditInsert) -> Result<i32, Error> {
        let state = self.state();
        state.check("audit_insert")?;
        state.audit.push(entry);
        Ok(state.audit.len() as i32)
    }
}

impl EventCommon for MemoryStore {
    async fn insert(&mut self, data: EventInsert) -> Result<i32, Error> {
        let state = self.state();
        state.check("event_insert")?;
        state.next_id += 1;
        let id = state.next_id;
        let fields = data.fields;
        state.events.push(Event {
            id,
            host_user_id: data.host_user_id,
            title: fields.title,
            description: fields.description,
            starts_at: fields.starts_at,
            location: fields.location,
            status: fields.status.unwrap_or(EventStatus::Active).as_str().into(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn query(&mut self) -> Result<Vec<Event>, Error> {
        let state = self.state();
        state.check("event_query")?;
        let mut list = state.events.clone();
        list.sort_by(|a, b| (a.starts_at, a.id).cmp(&(b.starts_at, b.id)));
        Ok(list)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Event>, Error> {
        let state = self.state();
        state.check("event_get")?;
        Ok(state.events.iter().find(|e| e.id == id).cloned())
    }

    async fn update(&mut self, id: i32, fields: EventFields) -> Result<(), Error> {
        let state = self.state();
        state.check("event_update")?;
        if let Some(event) = state.events.iter_mut().find(|e| e.id == id) {
            event.title = fields.title;
            event.description = fields.description;
            event.starts_at = fields.starts_at;
            event.location = fields.location;
            if let Some(status) = fields.status {
                event.status = status.as_str().into();
            }
        }
        Ok(())
    }

    async fn update_status(&mut self, id: i32, status: EventStatus) -> Result<(), Error> {
        let state = self.state();
        state.check("event_update")?;
        if let Some(event) = state.events.iter_mut().find(|e| e.id == id) {
            event.status = status.as_str().into();
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let state = self.state();
        state.check("event_delete")?;
        state.events.retain(|e| e.id != id);
        Ok(())
    }
}

impl UserCommon for MemoryStore {
    async fn active(&mut self) -> Result<Vec<UserSummary>, Error> {
        let state = self.state();
        state.check("user_query")?;
        let mut list: Vec<UserSummary> = state
            .users
            .iter()
            .filter(|u| u.status == USER_ACTIVE)
            .map(|u| UserSummary {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect();
        list.sort_by_key(|u| u.id);
        Ok(list)
    }

    async fn update(&mut self, id: i32, name: String, email: String) -> Result<bool, Error> {
        let state = self.state();
        state.check("user_update")?;
        match state.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.name = name;
                user.email = email;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mirrors the cascading foreign keys of the Postgres schema.
    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let state = self.state();
        state.check("user_delete")?;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        state.user_roles.retain(|(uid, _)| *uid != id);
        state.profiles.retain(|p| p.user_id != id);
        state.applications.retain(|a| a.applicant_user_id != id);
        state.events.retain(|e| e.host_user_id != id);
        for application in state.applications.iter_mut().filter(|a| a.reviewer_user_id == Some(id)) {
            application.reviewer_user_id = None;
        }
        Ok(true)
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(working) = self.working.take() {
            *self.guard = working;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type Tx = MemoryStore;

    async fn db(&self) -> Result<Self::Store, Error> {
        let guard = self.state.clone().lock_owned().await;
        Ok(MemoryStore { guard, working: None })
    }

    async fn tx(&self) -> Result<Self::Tx, Error> {
        let guard = self.state.clone().lock_owned().await;
        let working = Some((*guard).clone());
        Ok(MemoryStore { guard, working })
    }

    async fn ping(&self) -> Result<(), Error> {
        self.state.lock().await.check("ping")
    }
}
