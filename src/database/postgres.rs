use std::ops::DerefMut;

use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::{query, query_as, query_scalar, PgConnection, PgPool, Postgres, QueryBuilder, Transaction};

use crate::core::models::{
    application::{ApplicationWithApplicant, HostApplication, Insert as ApplicationInsert, Query as ApplicationQuery, ReviewUpdate},
    audit::Insert as AuditInsert,
    event::{Event, EventStatus, Fields as EventFields, Insert as EventInsert},
    role::{HostProfile, ACTIVITY_ACTIVE, APPROVAL_APPROVED},
    user::{UserSummary, USER_ACTIVE},
};
use crate::core::ports::repository::{AuditCommon, Common, EventCommon, HostApplicationCommon, HostProfileCommon, Manager, RoleCommon, Store, TxStore, UserCommon};
use crate::error::Error;

static EVENT_COLUMNS: &str = "id, host_user_id, title, description, starts_at, location, status, created_at";
static APPLICATION_COLUMNS: &str = "a.id, a.applicant_user_id, a.org_name, a.event_type, a.motivation, a.status, a.review_comment, a.reviewer_user_id, a.submitted_at";

/// Works over anything that derefs to a connection, so pooled connections
/// and open transactions share one implementation.
pub struct PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

fn push_application_filters(stmt: &mut QueryBuilder<'_, Postgres>, param: ApplicationQuery) {
    if let Some(uid) = param.applicant_user_id_eq {
        stmt.push(" AND a.applicant_user_id = ").push_bind(uid);
    }
    if let Some(status) = param.status_eq {
        stmt.push(" AND LOWER(a.status) = LOWER(").push_bind(status).push(")");
    }
}

impl<E> HostApplicationCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: ApplicationInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO host_applications (applicant_user_id, org_name, event_type, motivation, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id",
        )
        .bind(data.applicant_user_id)
        .bind(data.org_name)
        .bind(data.event_type)
        .bind(data.motivation)
        .bind(data.status.as_str())
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(id)
    }

    async fn query(&mut self, param: ApplicationQuery) -> Result<Vec<ApplicationWithApplicant>, Error> {
        let mut stmt = QueryBuilder::new(format!(
            "SELECT {}, u.name AS applicant_name, u.email AS applicant_email
            FROM host_applications AS a
            LEFT JOIN users AS u ON u.id = a.applicant_user_id
            WHERE 1 = 1",
            APPLICATION_COLUMNS
        ));
        push_application_filters(&mut stmt, param);
        stmt.push(" ORDER BY a.submitted_at DESC, a.id DESC");
        let list = stmt.build_query_as().fetch_all(&mut *self.executor).await?;
        Ok(list)
    }

    async fn count(&mut self, param: ApplicationQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM host_applications AS a WHERE 1 = 1");
        push_application_filters(&mut stmt, param);
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut *self.executor).await?;
        Ok(n)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<HostApplication>, Error> {
        let application = query_as(&format!("SELECT {} FROM host_applications AS a WHERE a.id = $1 FOR UPDATE", APPLICATION_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(application)
    }

    async fn update_review(&mut self, id: i32, update: ReviewUpdate) -> Result<(), Error> {
        query("UPDATE host_applications SET status = $1, review_comment = $2, reviewer_user_id = $3 WHERE id = $4")
            .bind(update.status.as_str())
            .bind(update.review_comment)
            .bind(update.reviewer_user_id)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }
}

impl<E> RoleCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn role_id(&mut self, name: &str) -> Result<Option<i32>, Error> {
        let id = query_scalar("SELECT id FROM roles WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(id)
    }

    async fn ensure_role(&mut self, uid: i32, role_id: i32) -> Result<(), Error> {
        query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT (user_id, role_id) DO NOTHING")
        .bind(uid)
        .bind(role_id)
        .execute(&mut *self.executor)
        .await?;
        Ok(())
    }

    async fn roles(&mut self, uid: i32) -> Result<Vec<String>, Error> {
        let roles = query_scalar(
            "SELECT r.name
            FROM roles AS r
            JOIN user_roles AS ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name",
        )
        .bind(uid)
        .fetch_all(&mut *self.executor)
        .await?;
        Ok(roles)
    }
}

impl<E> HostProfileCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn activate(&mut self, uid: i32) -> Result<(), Error> {
        query(
            "INSERT INTO host_profiles (user_id, approval_status, activity_status, is_active)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (user_id) DO UPDATE
            SET approval_status = EXCLUDED.approval_status, activity_status = EXCLUDED.activity_status, is_active = TRUE",
        )
        .bind(uid)
        .bind(APPROVAL_APPROVED)
        .bind(ACTIVITY_ACTIVE)
        .execute(&mut *self.executor)
        .await?;
        Ok(())
    }

    async fn get(&mut self, uid: i32) -> Result<Option<HostProfile>, Error> {
        let profile = query_as("SELECT user_id, approval_status, activity_status, is_active FROM host_profiles WHERE user_id = $1 LIMIT 1")
            .bind(uid)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(profile)
    }

    async fn count_active(&mut self) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM host_profiles WHERE is_active").fetch_one(&mut *self.executor).await?;
        Ok(n)
    }
}

impl<E> AuditCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, entry: AuditInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO audit_log (event_type, user_id, target_type, target_id, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id",
        )
        .bind(entry.event_type)
        .bind(entry.user_id)
        .bind(entry.target_type)
        .bind(entry.target_id)
        .bind(entry.metadata.map(Json))
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(id)
    }
}

impl<E> EventCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: EventInsert) -> Result<i32, Error> {
        let fields = data.fields;
        let id = query_scalar(
            "INSERT INTO events (host_user_id, title, description, starts_at, location, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
        )
        .bind(data.host_user_id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.starts_at)
        .bind(fields.location)
        .bind(fields.status.unwrap_or(EventStatus::Active).as_str())
        .fetch_one(&mut *self.executor)
        .await?;
        Ok(id)
    }

    async fn query(&mut self) -> Result<Vec<Event>, Error> {
        let list = query_as(&format!("SELECT {} FROM events ORDER BY starts_at, id", EVENT_COLUMNS))
            .fetch_all(&mut *self.executor)
            .await?;
        Ok(list)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Event>, Error> {
        let event = query_as(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *self.executor)
            .await?;
        Ok(event)
    }

    async fn update(&mut self, id: i32, fields: EventFields) -> Result<(), Error> {
        query(
            "UPDATE events
            SET title = $1, description = $2, starts_at = $3, location = $4, status = COALESCE($5, status)
            WHERE id = $6",
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.starts_at)
        .bind(fields.location)
        .bind(fields.status.map(|s| s.as_str()))
        .bind(id)
        .execute(&mut *self.executor)
        .await?;
        Ok(())
    }

    async fn update_status(&mut self, id: i32, status: EventStatus) -> Result<(), Error> {
        query("UPDATE events SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM events WHERE id = $1").bind(id).execute(&mut *self.executor).await?;
        Ok(())
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    E: DerefMut<Target = PgConnection>,
{
    async fn active(&mut self) -> Result<Vec<UserSummary>, Error> {
        let list = query_as("SELECT id, name, email FROM users WHERE status = $1 ORDER BY id")
            .bind(USER_ACTIVE)
            .fetch_all(&mut *self.executor)
            .await?;
        Ok(list)
    }

    async fn update(&mut self, id: i32, name: String, email: String) -> Result<bool, Error> {
        let res = query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&mut *self.executor)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM users WHERE id = $1").bind(id).execute(&mut *self.executor).await?;
        Ok(res.rows_affected() > 0)
    }
}

impl<E> Common for PgSqlx<E> where E: DerefMut<Target = PgConnection> {}
impl<E> Store for PgSqlx<E> where E: DerefMut<Target = PgConnection> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type Tx = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::Tx, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }

    async fn ping(&self) -> Result<(), Error> {
        query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
