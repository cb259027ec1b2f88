use crate::core::models::{
    application::{ApplicationWithApplicant, HostApplication, Insert as ApplicationInsert, Query as ApplicationQuery, ReviewUpdate},
    audit::Insert as AuditInsert,
    event::{Event, EventStatus, Fields as EventFields, Insert as EventInsert},
    role::HostProfile,
    user::UserSummary,
};
use crate::error::Error;
use futures::future::LocalBoxFuture;

pub trait HostApplicationCommon {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<i32, Error>;
    async fn query(&mut self, query: ApplicationQuery) -> Result<Vec<ApplicationWithApplicant>, Error>;
    async fn count(&mut self, query: ApplicationQuery) -> Result<i64, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<HostApplication>, Error>;
    async fn update_review(&mut self, id: i32, update: ReviewUpdate) -> Result<(), Error>;
}

pub trait RoleCommon {
    async fn role_id(&mut self, name: &str) -> Result<Option<i32>, Error>;
    async fn ensure_role(&mut self, uid: i32, role_id: i32) -> Result<(), Error>;
    async fn roles(&mut self, uid: i32) -> Result<Vec<String>, Error>;
}

pub trait HostProfileCommon {
    async fn activate(&mut self, uid: i32) -> Result<(), Error>;
    async fn get(&mut self, uid: i32) -> Result<Option<HostProfile>, Error>;
    async fn count_active(&mut self) -> Result<i64, Error>;
}

pub trait AuditCommon {
    async fn insert(&mut self, entry: AuditInsert) -> Result<i32, Error>;
}

pub trait EventCommon {
    async fn insert(&mut self, data: EventInsert) -> Result<i32, Error>;
    async fn query(&mut self) -> Result<Vec<Event>, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Event>, Error>;
    async fn update(&mut self, id: i32, fields: EventFields) -> Result<(), Error>;
    async fn update_status(&mut self, id: i32, status: EventStatus) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait UserCommon {
    async fn active(&mut self) -> Result<Vec<UserSummary>, Error>;
    /// Returns false when no such user exists.
    async fn update(&mut self, id: i32, name: String, email: String) -> Result<bool, Error>;
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
}

pub trait Common: HostApplicationCommon + RoleCommon + HostProfileCommon + AuditCommon + EventCommon + UserCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

/// Hands out stores backed by one shared pool.
pub trait Manager {
    type Store: Store;
    type Tx: TxStore + 'static;

    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::Tx, Error>;
    async fn ping(&self) -> Result<(), Error>;
}

/// Runs `f` inside a transaction: commits on `Ok`, rolls back on `Err` and
/// hands the closure's error back unchanged.
pub async fn in_transaction<M, F, R>(manager: &M, f: F) -> Result<R, Error>
where
    M: Manager,
    F: for<'t> FnOnce(&'t mut M::Tx) -> LocalBoxFuture<'t, Result<R, Error>>,
{
    let mut tx = manager.tx().await?;
    match f(&mut tx).await {
        Ok(res) => {
            tx.commit().await?;
            Ok(res)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                log::warn!("failed to roll back transaction: {}", rollback_err);
            }
            Err(err)
        }
    }
}
