//! Admin endpoints.

use axum::{Json, Router, extract::State, routing::post};
use curator_common::{AppError, AppResult};
use curator_core::TargetRef;
use curator_db::entities::interaction::{RelationKind, TargetKind};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Counter reconciliation request.
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub target_kind: String,
    pub target_id: String,
    pub kind: String,
}

/// Counter reconciliation result.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub target_id: String,
    pub stored: i32,
    pub actual: i32,
    pub repaired: bool,
}

fn parse_target_kind(s: &str) -> AppResult<TargetKind> {
    match s {
        "post" => Ok(TargetKind::Post),
        "outfit" => Ok(TargetKind::Outfit),
        "lookbook" => Ok(TargetKind::Lookbook),
        "comment" => Ok(TargetKind::Comment),
        "user" => Ok(TargetKind::User),
        _ => Err(AppError::BadRequest(format!("Unknown target kind: {s}"))),
    }
}

fn parse_relation_kind(s: &str) -> AppResult<RelationKind> {
    match s {
        "like" => Ok(RelationKind::Like),
        "save" => Ok(RelationKind::Save),
        "follow" => Ok(RelationKind::Follow),
        "commentLike" => Ok(RelationKind::CommentLike),
        _ => Err(AppError::BadRequest(format!("Unknown relation kind: {s}"))),
    }
}

/// Recount a denormalized counter from live edges and repair drift.
async fn reconcile(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReconcileRequest>,
) -> AppResult<ApiResponse<ReconcileResponse>> {
    let target_kind = parse_target_kind(&req.target_kind)?;
    let kind = parse_relation_kind(&req.kind)?;

    let target = TargetRef::new(target_kind, &req.target_id);
    let (stored, actual) = state.interaction_service.reconcile(&target, kind).await?;

    Ok(ApiResponse::ok(ReconcileResponse {
        target_id: req.target_id,
        stored,
        actual,
        repaired: stored != actual,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/counters/reconcile", post(reconcile))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_kind() {
        assert!(matches!(parse_target_kind("post"), Ok(TargetKind::Post)));
        assert!(matches!(parse_target_kind("user"), Ok(TargetKind::User)));
        assert!(parse_target_kind("banana").is_err());
    }

    #[test]
    fn test_parse_relation_kind() {
        assert!(matches!(parse_relation_kind("like"), Ok(RelationKind::Like)));
        assert!(matches!(
            parse_relation_kind("commentLike"),
            Ok(RelationKind::CommentLike)
        ));
        assert!(parse_relation_kind("LIKE").is_err());
    }
}
