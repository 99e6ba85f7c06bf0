use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use domain_vetting::error::AppError;
use domain_vetting::vetting::{
    sort_for_display, BatchSummary, CellValue, DomainAssessment, FlexibilityLevel,
    MetricsImporter, RecordSet, VettingEngine,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::{info, warn};

/// A batch of metrics, either as raw CSV text or as an already tabulated sheet.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluateRequest {
    #[serde(default)]
    pub(crate) csv: Option<String>,
    #[serde(default)]
    pub(crate) columns: Vec<String>,
    #[serde(default)]
    pub(crate) rows: Vec<Vec<CellValue>>,
    #[serde(default)]
    pub(crate) flexibility_level: Option<FlexibilityLevel>,
    #[serde(default)]
    pub(crate) sort: bool,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) flexibility_level: FlexibilityLevel,
    pub(crate) summary: BatchSummary,
    pub(crate) assessments: Vec<DomainAssessment>,
}

pub(crate) fn vetting_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/domains/evaluate", post(evaluate_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let EvaluateRequest {
        csv,
        columns,
        rows,
        flexibility_level,
        sort,
        today,
    } = payload;

    let batch_limit = state.vetting.batch_limit;
    let records = match csv {
        Some(text) => MetricsImporter::new(batch_limit).from_reader(Cursor::new(text.into_bytes()))?,
        None => {
            let mut records = RecordSet::new(columns, rows)?;
            let dropped = records.truncate(batch_limit);
            if dropped > 0 {
                warn!(limit = batch_limit, dropped, "request exceeds the batch limit; extra rows ignored");
            }
            records
        }
    };

    let level = flexibility_level.unwrap_or(state.vetting.flexibility_level);
    let engine = match today {
        Some(today) => VettingEngine::with_today(level, today),
        None => VettingEngine::new(level),
    };

    let mut assessments = tokio::task::spawn_blocking(move || engine.evaluate(&records))
        .await
        .map_err(axum::Error::new)??;

    if sort {
        sort_for_display(&mut assessments);
    }
    let summary = BatchSummary::from_assessments(&assessments);
    info!(
        rows = assessments.len(),
        level = level.get(),
        high_risk = summary.high_risk,
        "evaluation request served"
    );

    Ok(Json(EvaluateResponse {
        flexibility_level: level,
        summary,
        assessments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use domain_vetting::config::VettingSettings;
    use domain_vetting::vetting::{RiskLevel, TrustLabel};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const EXPORT: &str = "Target,Domain Rating,Organic / Traffic,Ref. domains / All,Backlinks / All,Ref. IPs / IPs,Ref. IPs / Subnets,Domain Age,Brand Anchors,Authority TLDs,URL Rating\n\
pbn-candidate.net,55,200,50,2000,10,1,0.3,0.02,,\n\
example.com,65,80000,3000,9000,500,200,2015-01-01,45,2,55\n";

    fn state(batch_limit: usize) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            vetting: VettingSettings {
                flexibility_level: FlexibilityLevel::default(),
                batch_limit,
            },
        }
    }

    fn today() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 10, 19)
    }

    #[tokio::test]
    async fn evaluate_endpoint_scores_csv_batches() {
        let request = EvaluateRequest {
            csv: Some(EXPORT.to_string()),
            flexibility_level: FlexibilityLevel::new(1),
            sort: true,
            today: today(),
            ..EvaluateRequest::default()
        };

        let Json(body) = evaluate_endpoint(Extension(state(100)), Json(request))
            .await
            .expect("evaluation succeeds");

        assert_eq!(body.flexibility_level.get(), 1);
        assert_eq!(body.summary.analyzed, 2);
        assert_eq!(body.summary.high_risk, 1);
        assert_eq!(body.assessments[0].target, "example.com");
        assert_eq!(body.assessments[0].row, 1);
        assert_eq!(body.assessments[0].score.trust_label, TrustLabel::Excellent);
        assert_eq!(body.assessments[1].pbn.risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn evaluate_endpoint_accepts_tabulated_rows_and_applies_limit() {
        let request = EvaluateRequest {
            columns: vec!["Target".to_string(), "DR".to_string()],
            rows: vec![
                vec![CellValue::from("a.com"), CellValue::from(45.0)],
                vec![CellValue::from("b.com"), CellValue::from(20.0)],
            ],
            today: today(),
            ..EvaluateRequest::default()
        };

        let Json(body) = evaluate_endpoint(Extension(state(1)), Json(request))
            .await
            .expect("evaluation succeeds");

        assert_eq!(body.assessments.len(), 1);
        assert_eq!(body.assessments[0].target, "a.com");
        assert_eq!(body.flexibility_level, FlexibilityLevel::default());
    }

    #[tokio::test]
    async fn evaluate_route_rejects_rows_without_columns() {
        let app = vetting_router().layer(Extension(state(100)));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/domains/evaluate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"rows": [["a.com", 50]]}"#))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn evaluate_route_rejects_out_of_range_levels() {
        let app = vetting_router().layer(Extension(state(100)));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/domains/evaluate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"columns": ["Target"], "rows": [], "flexibility_level": 0}"#))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("router responds");
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn health_and_readiness_respond() {
        let app = vetting_router().layer(Extension(state(100)));

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
