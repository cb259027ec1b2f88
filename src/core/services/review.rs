use serde_json::json;

use crate::core::models::{
    application::{ApplicationStatus, Decision, Review, ReviewOutcome, ReviewUpdate, APPLICATION},
    audit::{Insert as AuditInsert, HOST_APPLICATION_REVIEWED},
};
use crate::core::ports::repository::{in_transaction, HostApplicationCommon, Manager, Store};
use crate::core::services::{audit, role};
use crate::error::Error;

/// Applies an admin's decision to a host application in one transaction.
///
/// Re-applying the decision an application already carries is a no-op
/// reported with `changed == false`. A decided application is never flipped
/// to the other verdict. Approval grants the Host role and activates the
/// applicant's host profile; rejection only updates the application.
pub async fn review<M>(manager: &M, review: Review) -> Result<ReviewOutcome, Error>
where
    M: Manager,
{
    let data = review.clone();
    let (outcome, decision) = in_transaction(manager, move |tx| Box::pin(apply_review(tx, data))).await?;
    if outcome.changed {
        log::info!(
            "host application {} {} by user {}",
            review.application_id,
            decision.target(),
            review.reviewer_user_id
        );
        audit::record(
            manager,
            AuditInsert::host_application(
                HOST_APPLICATION_REVIEWED,
                review.reviewer_user_id,
                review.application_id,
                json!({ "decision": decision.as_str(), "comment": review.comment }),
            ),
        )
        .await;
    }
    Ok(outcome)
}

async fn apply_review<S>(store: &mut S, review: Review) -> Result<(ReviewOutcome, Decision), Error>
where
    S: Store,
{
    let application = HostApplicationCommon::get_for_update(store, review.application_id)
        .await?
        .ok_or(Error::NotFoundError(APPLICATION, review.application_id))?;
    let decision: Decision = review.decision.parse()?;
    let target = decision.target();
    if target.matches(&application.status) {
        return Ok((ReviewOutcome { ok: true, changed: false }, decision));
    }
    if !ApplicationStatus::Pending.matches(&application.status) {
        return Err(Error::AlreadyDecidedError {
            id: application.id,
            status: application.status,
        });
    }
    HostApplicationCommon::update_review(
        store,
        application.id,
        ReviewUpdate {
            status: target,
            review_comment: review.comment,
            reviewer_user_id: review.reviewer_user_id,
        },
    )
    .await?;
    if decision == Decision::Approved {
        role::grant_host(store, application.applicant_user_id).await?;
    }
    Ok((ReviewOutcome { ok: true, changed: true }, decision))
}
