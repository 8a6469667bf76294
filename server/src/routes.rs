//! Route handlers.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use futures_core::Stream;
use futures_lite::StreamExt;

use policyrag_core::llm::oneshot;
use policyrag_core::{EmbeddingModel, Generator};
use policyrag_index::{ChunkConfig, IndexBuilder, IndexSnapshot, PageSegment};
use policyrag_qa::{Envelope, QaEngine};
use policyrag_retrieval::Retriever;
use policyrag_store::IndexStore;

use crate::dto::{
    AdvancedQueryRequest, AmbiguousTextRequest, ClauseRequest, DecomposeRequest,
    ExceptionsRequest, IssuesRequest, MultiRetrievalRequest, QueryRequest, ReasonRequest,
    SummaryRequest, TableCriteriaRequest, TopKRequest, UploadRequest,
};
use crate::error::ApiError;
use crate::sse::StreamFrame;
use crate::state::AppState;

/// Builds the full application router.
#[must_use]
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/documents", post(upload).get(list_documents))
        .route("/documents/{doc_id}", delete(delete_document))
        .route("/documents/{doc_id}/exists", get(document_exists))
        .route("/documents/{doc_id}/query", post(ask))
        .route("/documents/{doc_id}/summary", post(summarize))
        .route("/documents/{doc_id}/summary-streaming", post(summarize_streaming))
        .route("/documents/{doc_id}/issues", post(extract_issues))
        .route("/documents/{doc_id}/clause", post(find_clause))
        .route("/documents/{doc_id}/reason", post(explain_reason))
        .route("/documents/{doc_id}/exceptions", post(find_exceptions))
        .route("/documents/{doc_id}/table-importance", post(table_importance))
        .route("/documents/{doc_id}/table-criteria", post(table_criteria))
        .route("/documents/{doc_id}/report-summary", post(report_summary))
        .route("/documents/{doc_id}/checklist", post(checklist))
        .route("/documents/{doc_id}/ambiguous-text", post(ambiguous_text))
        .route("/documents/{doc_id}/faq", post(faq))
        .route("/documents/{doc_id}/multi-retrieval", post(multi_retrieval))
        .route("/documents/{doc_id}/advanced-query", post(advanced_query))
        .route("/decompose-query", post(decompose_query))
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let store_reachable = state.store.list().await.is_ok();
    Json(serde_json::json!({
        "status": if store_reachable { "ok" } else { "degraded" },
        "store_reachable": store_reachable,
    }))
}

async fn document_exists(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
) -> Result<Json<Envelope<bool>>, ApiError> {
    let exists = state.store.exists(&doc_id).await?;
    Ok(Json(Envelope::success(exists)))
}

async fn upload(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    let started = Instant::now();
    let document = state.pdf_loader.load(&req.file_name)?;
    let pages: Vec<PageSegment<'_>> = document
        .pages
        .iter()
        .map(|page| PageSegment { page_label: page.page_label, text: page.text.as_str() })
        .collect();

    let config = req
        .analysis_type
        .as_deref()
        .map_or_else(ChunkConfig::general, ChunkConfig::for_analysis_type);
    let builder = IndexBuilder::new(&state.provider, config)?;
    let nodes = builder.build(&pages).await?;

    let snapshot = IndexSnapshot::new(req.doc_id.clone(), state.provider.dim(), nodes);
    let nodes_json = snapshot.encode()?;
    let metadata = serde_json::json!({
        "file_name": req.file_name,
        "page_count": document.page_count,
        "node_count": snapshot.nodes.len(),
    });

    state
        .store
        .put(
            &req.doc_id,
            &nodes_json,
            &metadata.to_string(),
            state.config.snapshot_ttl_seconds,
        )
        .await?;

    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(
        Envelope::success(serde_json::json!({
            "doc_id": req.doc_id,
            "node_count": snapshot.nodes.len(),
        }))
        .with_execution_time_ms(elapsed),
    ))
}

async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<serde_json::Value>>>, ApiError> {
    let documents = state.store.list().await?;
    let rendered = documents
        .into_iter()
        .map(|doc| {
            serde_json::json!({
                "doc_id": doc.doc_id,
                "metadata": serde_json::from_str::<serde_json::Value>(&doc.metadata_json)
                    .unwrap_or(serde_json::Value::Null),
            })
        })
        .collect();
    Ok(Json(Envelope::success(rendered)))
}

async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
) -> Result<Json<Envelope<bool>>, ApiError> {
    let deleted = state.store.delete(&doc_id).await?;
    if !deleted {
        return Err(ApiError::DocumentNotFound(doc_id));
    }
    Ok(Json(Envelope::success(true)))
}

const QA_SYSTEM_PROMPT: &str =
    "당신은 정부 정책 및 규정 문서를 분석하는 어시스턴트입니다. 제공된 문서 내용에만 근거하여 답변하세요.";

async fn ask(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<QueryRequest>,
) -> Result<axum::response::Response, ApiError> {
    if req.streaming {
        let retrieval = Retriever::new(&state.provider, &state.store)
            .search(&doc_id, &req.query, req.top_k)
            .await?;
        let context = policyrag_qa::prompts::render_context(&retrieval.sources);
        let prompt = policyrag_qa::prompts::qa_prompt(&context, &req.query);
        return Ok(stream_answer(&state, prompt).into_response());
    }

    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.ask(&doc_id, &req.query, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)).into_response())
}

async fn summarize_streaming(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<SummaryRequest>,
) -> Result<axum::response::Response, ApiError> {
    let retrieval = Retriever::new(&state.provider, &state.store)
        .search(&doc_id, "문서 요약", req.top_k)
        .await?;
    let context = policyrag_qa::prompts::render_context(&retrieval.sources);
    let prompt = policyrag_qa::prompts::summary_prompt(&context, req.max_length);
    Ok(stream_answer(&state, prompt).into_response())
}

/// Streams a generated completion for `prompt` as SSE frames shaped
/// `{"text": "...", "done": bool}`. Retrieval has already happened by the
/// time this is called; only generation is streamed.
fn stream_answer(state: &AppState, prompt: String) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let messages = oneshot(QA_SYSTEM_PROMPT, prompt);
    let provider = state.provider.clone();

    let frames = async_stream::stream! {
        let chunk_stream = provider.stream(&messages, 0.2);
        futures_lite::pin!(chunk_stream);
        let mut failure = None;
        while let Some(chunk) = chunk_stream.next().await {
            match chunk {
                Ok(text) => yield StreamFrame::chunk(text),
                Err(err) => {
                    failure = Some(err.to_string());
                    break;
                }
            }
        }
        yield match failure {
            Some(error) => StreamFrame::done_with_error(error),
            None => StreamFrame::done(),
        };
    };

    let events = frames.map(|frame| Ok(Event::default().data(serde_json::to_string(&frame).unwrap_or_default())));
    Sse::new(events)
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.summarize(&doc_id, req.max_length, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn extract_issues(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<IssuesRequest>,
) -> Result<Json<Envelope<policyrag_qa::ItemListPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.extract_issues(&doc_id, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn find_clause(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<ClauseRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.find_clause(&doc_id, &req.situation, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn explain_reason(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.explain_reason(&doc_id, &req.provision, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn find_exceptions(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<ExceptionsRequest>,
) -> Result<Json<Envelope<policyrag_qa::ExceptionPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine
        .find_exceptions(&doc_id, &req.situation, req.top_k)
        .await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn advanced_query(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<AdvancedQueryRequest>,
) -> Result<Json<Envelope<policyrag_qa::AdvancedQueryPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine
        .advanced_query(&doc_id, &req.query, req.top_k, req.use_text, req.use_table, req.use_json)
        .await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn table_importance(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<TopKRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.analyze_table_importance(&doc_id, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn table_criteria(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<TableCriteriaRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine
        .compare_table_criteria(&doc_id, &req.criteria, req.top_k)
        .await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn report_summary(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<TopKRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.generate_report_summary(&doc_id, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn checklist(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<TopKRequest>,
) -> Result<Json<Envelope<policyrag_qa::ChecklistPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.generate_checklist(&doc_id, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn ambiguous_text(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<AmbiguousTextRequest>,
) -> Result<Json<Envelope<policyrag_qa::AnswerPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine
        .analyze_ambiguous_text(&doc_id, &req.text, req.top_k)
        .await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn faq(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<TopKRequest>,
) -> Result<Json<Envelope<policyrag_qa::FaqPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.generate_faq(&doc_id, req.top_k).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn multi_retrieval(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(req): Json<MultiRetrievalRequest>,
) -> Result<Json<Envelope<policyrag_qa::MultiRetrievalPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine
        .multi_retrieval(&doc_id, &req.query, req.top_k, req.use_text, req.use_table, req.use_json)
        .await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}

async fn decompose_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DecomposeRequest>,
) -> Result<Json<Envelope<policyrag_qa::DecompositionPayload>>, ApiError> {
    let started = Instant::now();
    let engine = QaEngine::new(&state.provider, &state.provider, &state.store);
    let payload = engine.decompose_query(&req.query).await?;
    let elapsed = started.elapsed().as_secs_f64() * 1000.0;
    Ok(Json(Envelope::success(payload).with_execution_time_ms(elapsed)))
}
