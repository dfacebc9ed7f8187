//! Context retrieval and question answering endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use crate::error::Result;
use crate::retrieval::Retriever;
use crate::server::state::AppState;
use crate::types::{AnswerResponse, ContextResult, RetrievalRequest, RetrievalResponse};

/// POST /api/context-retrieval - Top-N stored chunks similar to a query
pub async fn context_retrieval(
    State(state): State<AppState>,
    request: std::result::Result<Json<RetrievalRequest>, JsonRejection>,
) -> Result<Json<RetrievalResponse>> {
    let Json(request) = request?;
    let (query, username) = request.validate()?;
    let n = request.n.unwrap_or(state.config().retrieval.default_top_n);

    tracing::info!("Context retrieval for {} (n: {}, all owners: {})", username, n, request.all_owners);

    let matches = state
        .retriever()
        .retrieve(query, request.owner_filter(), n)
        .await?;

    Ok(Json(RetrievalResponse::from_matches(&matches)))
}

/// POST /api/query - Answer a question from retrieved chunks
pub async fn query(
    State(state): State<AppState>,
    request: std::result::Result<Json<RetrievalRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>> {
    let start = Instant::now();
    let Json(request) = request?;
    let (question, username) = request.validate()?;
    let n = request.n.unwrap_or(state.config().retrieval.default_top_n);

    tracing::info!("Query from {}: \"{}\"", username, question);

    let matches = state
        .retriever()
        .retrieve(question, request.owner_filter(), n)
        .await?;
    let answer = state.answerer().answer(question, &matches).await?;

    Ok(Json(AnswerResponse {
        answer,
        results: matches.iter().map(ContextResult::from).collect(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
