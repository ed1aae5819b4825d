use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use admonitor_core::{Classification, PipelineOutput};

use crate::AppState;

#[derive(Deserialize)]
pub struct BuscarQuery {
    q: Option<String>,
    search_after: Option<String>,
}

#[derive(Deserialize)]
pub struct ChecarRequest {
    url: Option<String>,
}

pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "online",
        "mensagem": "Monitor de anúncios - API rodando!",
        "versao": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn buscar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BuscarQuery>,
) -> impl IntoResponse {
    let Some(q) = params.q.filter(|q| !q.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"erro": "parâmetro 'q' é obrigatório"})),
        )
            .into_response();
    };

    let output = state.pipeline.run(&q, params.search_after.as_deref()).await;
    Json(buscar_response(&output)).into_response()
}

pub async fn checar(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChecarRequest>,
) -> impl IntoResponse {
    let Some(url) = body.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"erro": "campo 'url' é obrigatório"})),
        )
            .into_response();
    };

    let (domain, classification) = state.pipeline.check(&url).await;
    Json(checar_response(&domain, &classification)).into_response()
}

/// Shape one discovery page for the dashboard.
fn buscar_response(output: &PipelineOutput) -> serde_json::Value {
    let mut body = serde_json::json!({
        "query": output.query,
        "total": output.total,
        "retornados": output.results.len(),
        "total_anunciando": output.confirmed_count(),
        "total_possivel": output.possible_count(),
        "resultados": output.results,
        "search_after": output.next_cursor,
    });
    if let Some(ref error) = output.error {
        body["erro"] = serde_json::json!(error);
    }
    body
}

/// Merge the resolved domain with the classification fields into one flat
/// object, as the dashboard expects.
fn checar_response(domain: &str, classification: &Classification) -> serde_json::Value {
    let mut body = serde_json::to_value(classification)
        .unwrap_or_else(|_| serde_json::json!({}));
    body["dominio"] = serde_json::json!(domain);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use admonitor_core::{AdStatus, Indicator};

    fn output_with(results: Vec<admonitor_core::SiteResult>) -> PipelineOutput {
        PipelineOutput {
            query: "page.domain:example.test".to_string(),
            total: 42,
            results,
            next_cursor: Some("100,abc".to_string()),
            error: None,
        }
    }

    #[test]
    fn buscar_response_includes_counts_and_cursor() {
        let body = buscar_response(&output_with(Vec::new()));
        assert_eq!(body["query"], serde_json::json!("page.domain:example.test"));
        assert_eq!(body["total"], serde_json::json!(42));
        assert_eq!(body["retornados"], serde_json::json!(0));
        assert_eq!(body["total_anunciando"], serde_json::json!(0));
        assert_eq!(body["total_possivel"], serde_json::json!(0));
        assert_eq!(body["search_after"], serde_json::json!("100,abc"));
        assert!(body.get("erro").is_none());
    }

    #[test]
    fn buscar_response_carries_upstream_error_note() {
        let mut output = output_with(Vec::new());
        output.error = Some("Network error: timeout".to_string());
        output.next_cursor = None;
        let body = buscar_response(&output);
        assert_eq!(body["erro"], serde_json::json!("Network error: timeout"));
        assert_eq!(body["search_after"], serde_json::Value::Null);
    }

    #[test]
    fn checar_response_merges_domain_and_verdict() {
        let classification = Classification {
            status: AdStatus::Confirmed,
            indicator: Some(Indicator::ClickId),
            ..Classification::default()
        };
        let body = checar_response("acme.test", &classification);
        assert_eq!(body["dominio"], serde_json::json!("acme.test"));
        assert_eq!(body["anunciando"], serde_json::json!(true));
        assert_eq!(body["indicador"], serde_json::json!("click-id"));
    }

    #[test]
    fn checar_response_null_verdict_for_possible() {
        let classification = Classification {
            status: AdStatus::Possible,
            indicator: Some(Indicator::CampaignGeneric),
            ..Classification::default()
        };
        let body = checar_response("acme.test", &classification);
        assert_eq!(body["anunciando"], serde_json::Value::Null);
    }
}
