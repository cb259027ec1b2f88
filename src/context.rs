use std::future::{ready, Ready};
use std::marker::PhantomData;

use actix_web::dev::Payload;
use actix_web::web::Data;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::core::models::role::ADMIN_ROLE;
use crate::core::ports::repository::Manager;
use crate::core::services::role;
use crate::error::Error;

/// The authenticated caller, put into the request extensions by the JWT middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Self>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(Error::Unauthorized("no user in request".into()))),
        }
    }
}

/// An authenticated caller holding the Admin role.
#[derive(Debug)]
pub struct Admin<M> {
    pub id: i32,
    _manager: PhantomData<M>,
}

impl<M> FromRequest for Admin<M>
where
    M: Manager + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<UserInfo>().cloned();
        let manager = req.app_data::<Data<M>>().cloned();
        Box::pin(async move {
            let user = user.ok_or_else(|| Error::Unauthorized("no user in request".into()))?;
            let manager = manager.ok_or_else(|| Error::ConfigError("database manager is not registered".into()))?;
            let mut db = manager.db().await?;
            if !role::has_role(&mut db, user.id, ADMIN_ROLE).await? {
                log::warn!("user {} tried an admin route", user.id);
                return Err(Error::Forbidden);
            }
            Ok(Admin {
                id: user.id,
                _manager: PhantomData,
            })
        })
    }
}

/// An authenticated caller whose host profile is active.
#[derive(Debug)]
pub struct ActiveHost<M> {
    pub id: i32,
    _manager: PhantomData<M>,
}

impl<M> FromRequest for ActiveHost<M>
where
    M: Manager + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<UserInfo>().cloned();
        let manager = req.app_data::<Data<M>>().cloned();
        Box::pin(async move {
            let user = user.ok_or_else(|| Error::Unauthorized("no user in request".into()))?;
            let manager = manager.ok_or_else(|| Error::ConfigError("database manager is not registered".into()))?;
            let mut db = manager.db().await?;
            if !role::host_status(&mut db, user.id).await?.active {
                return Err(Error::HostInactiveError(user.id));
            }
            Ok(ActiveHost {
                id: user.id,
                _manager: PhantomData,
            })
        })
    }
}
