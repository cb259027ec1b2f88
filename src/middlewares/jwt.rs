use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpMessage;
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;

static BEARER: &str = "Bearer ";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    /// Numeric user id.
    pub user: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}

pub struct JWTMiddleware {
    tokener: Rc<JWT>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            tokener: Rc::new(JWT::new(secret)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JWTService {
            tokener: self.tokener.clone(),
            next_service: service,
        }))
    }
}

pub struct JWTService<S> {
    tokener: Rc<JWT>,
    next_service: S,
}

impl<S> JWTService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<UserInfo, Error> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .ok_or_else(|| Error::Unauthorized("no token in header".into()))?;
        let header = header.to_str().map_err(|e| Error::Unauthorized(e.to_string()))?;
        let token = header.strip_prefix(BEARER).ok_or_else(|| Error::Unauthorized("expected a bearer token".into()))?;
        let claim: Claim = self.tokener.verify_token(token.trim())?;
        let id = claim.user().parse::<i32>().map_err(|e| Error::Unauthorized(format!("invalid user claim: {}", e)))?;
        Ok(UserInfo { id })
    }
}

impl<S, B> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    actix_web::dev::forward_ready!(next_service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let res_fut = self.next_service.call(req);
                Box::pin(async move { res_fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                log::debug!("rejected request to {}: {}", req.path(), e);
                let resp = req.error_response(e).map_into_right_body();
                Box::pin(async move { Ok(resp) })
            }
        }
    }
}
