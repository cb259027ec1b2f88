use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;

use crate::context::{Admin, UserInfo};
use crate::core::models::application::{ApplicationStatus, ApplicationWithApplicant, HostApplication, Review, ReviewOutcome, Submit};
use crate::core::ports::repository::Manager;
use crate::core::services::{application, review as review_service};
use crate::error::Error;
use crate::request::{ListParams, ReviewRequest};
use crate::response::{Created, List};

pub async fn submit<M>(user_info: UserInfo, manager: Data<M>, Json(data): Json<Submit>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let id = application::submit(manager.get_ref(), user_info.id, data).await?;
    Ok(HttpResponse::Created().json(Created {
        application_id: id,
        status: ApplicationStatus::Pending.as_str(),
    }))
}

pub async fn mine<M>(user_info: UserInfo, manager: Data<M>) -> Result<Json<List<HostApplication>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let list = application::applications_of_user(&mut db, user_info.id).await?;
    Ok(Json(List::new(list)))
}

pub async fn list<M>(_: Admin<M>, manager: Data<M>, Query(ListParams { status }): Query<ListParams>) -> Result<Json<List<ApplicationWithApplicant>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let list = application::list_applications(&mut db, status).await?;
    Ok(Json(List::new(list)))
}

pub async fn review<M>(admin: Admin<M>, manager: Data<M>, path: Path<(i32,)>, Json(body): Json<ReviewRequest>) -> Result<Json<ReviewOutcome>, Error>
where
    M: Manager + 'static,
{
    let (application_id,) = path.into_inner();
    let outcome = review_service::review(
        manager.get_ref(),
        Review {
            application_id,
            reviewer_user_id: admin.id,
            decision: body.decision,
            comment: body.comment,
        },
    )
    .await?;
    Ok(Json(outcome))
}
