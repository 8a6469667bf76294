//! Ties retrieval, prompting, and generation together into the operations a
//! document Q&A API exposes.

use std::collections::BTreeMap;

use policyrag_core::llm::oneshot;
use policyrag_core::{EmbeddingModel, Generator};
use policyrag_retrieval::{Retriever, SourceReference};
use policyrag_store::IndexStore;

use crate::channel::{fuse_channel_contexts, Channel};
use crate::error::{QaError, Result};
use crate::parsing::{
    extract_citations, find_exception_keywords, parse_bullet_list, parse_checklist, parse_faq,
};
use crate::prompts::{
    ambiguous_text_prompt, checklist_prompt, clause_prompt, decompose_prompt, exception_prompt,
    faq_prompt, fuse_prompt, integration_prompt, issue_extraction_prompt, qa_prompt, reason_prompt,
    render_context, render_sub_answers, report_summary_prompt, summary_prompt,
    table_criteria_prompt, table_importance_prompt,
};
use crate::types::{
    AdvancedQueryPayload, AnswerPayload, ChecklistPayload, DecompositionPayload, ExceptionPayload,
    FaqPayload, HighlightedSource, ItemListPayload, MultiRetrievalPayload,
};

const SYSTEM_PROMPT: &str =
    "당신은 정부 정책 및 규정 문서를 분석하는 어시스턴트입니다. 제공된 문서 내용에만 근거하여 답변하세요.";

/// Answers questions about a stored document by retrieving context and prompting a [`Generator`].
pub struct QaEngine<'a, E: EmbeddingModel, G: Generator, S: IndexStore> {
    embedding_model: &'a E,
    generator: &'a G,
    store: &'a S,
}

impl<'a, E: EmbeddingModel, G: Generator, S: IndexStore> QaEngine<'a, E, G, S> {
    /// Builds an engine over `store`, embedding with `embedding_model` and
    /// generating with `generator`.
    #[must_use]
    pub fn new(embedding_model: &'a E, generator: &'a G, store: &'a S) -> Self {
        Self {
            embedding_model,
            generator,
            store,
        }
    }

    async fn retrieve(
        &self,
        doc_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<policyrag_retrieval::RetrievalResult> {
        Retriever::new(self.embedding_model, self.store)
            .search(doc_id, query, top_k)
            .await
            .map_err(QaError::from)
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let messages = oneshot(SYSTEM_PROMPT, prompt);
        self.generator
            .complete(&messages, 0.2)
            .await
            .map_err(|e| QaError::Generation(anyhow::Error::new(e)))
    }

    /// Answers a free-form question about `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] if retrieval fails or
    /// [`QaError::Generation`] if the model call fails.
    pub async fn ask(&self, doc_id: &str, question: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, question, top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(qa_prompt(&context, question)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Summarizes `doc_id` to roughly `max_length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn summarize(&self, doc_id: &str, max_length: usize, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, "문서 요약", top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(summary_prompt(&context, max_length)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Extracts the notable issues raised in `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn extract_issues(&self, doc_id: &str, top_k: usize) -> Result<ItemListPayload> {
        let retrieval = self.retrieve(doc_id, "주요 쟁점", top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(issue_extraction_prompt(&context)).await?;
        Ok(ItemListPayload {
            items: parse_bullet_list(&answer),
            sources: retrieval.sources,
            confidence: retrieval.confidence,
        })
    }

    /// Finds the clause governing `situation` in `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn find_clause(&self, doc_id: &str, situation: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, situation, top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(clause_prompt(&context, situation)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Explains the stated reason behind `provision` in `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn explain_reason(&self, doc_id: &str, provision: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, provision, top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(reason_prompt(&context, provision)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Finds exception conditions for `situation` in `doc_id`, retaining only
    /// the sources whose text actually carries a canonical exception keyword.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn find_exceptions(&self, doc_id: &str, situation: &str, top_k: usize) -> Result<ExceptionPayload> {
        let retrieval = self.retrieve(doc_id, situation, top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(exception_prompt(&context, situation)).await?;

        let highlighted_sources = retrieval
            .sources
            .into_iter()
            .filter_map(|source| {
                let found_exception_keywords = find_exception_keywords(&source.text);
                (!found_exception_keywords.is_empty())
                    .then_some(HighlightedSource { source, found_exception_keywords })
            })
            .collect();

        Ok(ExceptionPayload {
            citations: extract_citations(&answer),
            answer,
            highlighted_sources,
            confidence: retrieval.confidence,
        })
    }

    /// Assesses how important `doc_id`'s tables are to its overall content.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn analyze_table_importance(&self, doc_id: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, "표 데이터", top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(table_importance_prompt(&context)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Compares `doc_id`'s tables against `criteria`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn compare_table_criteria(&self, doc_id: &str, criteria: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, criteria, top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(table_criteria_prompt(&context, criteria)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Generates a structured report-style summary of `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn generate_report_summary(&self, doc_id: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, "문서 요약", top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(report_summary_prompt(&context)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Generates a compliance checklist derived from `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn generate_checklist(&self, doc_id: &str, top_k: usize) -> Result<ChecklistPayload> {
        let retrieval = self.retrieve(doc_id, "준수 사항", top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(checklist_prompt(&context)).await?;
        Ok(ChecklistPayload {
            items: parse_checklist(&answer),
            sources: retrieval.sources,
            confidence: retrieval.confidence,
        })
    }

    /// Explains why `text` is ambiguous in the context of `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn analyze_ambiguous_text(&self, doc_id: &str, text: &str, top_k: usize) -> Result<AnswerPayload> {
        let retrieval = self.retrieve(doc_id, text, top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(ambiguous_text_prompt(&context, text)).await?;
        Ok(finish(answer, retrieval))
    }

    /// Generates frequently-asked questions and answers for `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] or [`QaError::Generation`].
    pub async fn generate_faq(&self, doc_id: &str, top_k: usize) -> Result<FaqPayload> {
        let retrieval = self.retrieve(doc_id, "자주 묻는 질문", top_k).await?;
        let context = render_context(&retrieval.sources);
        let answer = self.complete(faq_prompt(&context)).await?;
        Ok(FaqPayload {
            items: parse_faq(&answer),
            sources: retrieval.sources,
            confidence: retrieval.confidence,
        })
    }

    /// Decomposes `question` into independently-searchable sub-questions,
    /// without performing any retrieval itself.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Generation`] if the model call fails.
    pub async fn decompose_query(&self, question: &str) -> Result<DecompositionPayload> {
        let decomposition = self.complete(decompose_prompt(question)).await?;
        Ok(DecompositionPayload {
            query: question.to_string(),
            sub_queries: parse_bullet_list(&decomposition),
        })
    }

    /// Retrieves `query` against `doc_id` once per enabled channel, without
    /// fusing or answering — the raw building block behind [`Self::advanced_query`].
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] if any channel's retrieval fails.
    pub async fn multi_retrieval(
        &self,
        doc_id: &str,
        query: &str,
        top_k: usize,
        use_text: bool,
        use_table: bool,
        use_json: bool,
    ) -> Result<MultiRetrievalPayload> {
        let mut channels = BTreeMap::new();
        let enabled = [
            (Channel::Body, use_text),
            (Channel::Table, use_table),
            (Channel::JsonPath, use_json),
        ];
        for (channel, enabled) in enabled {
            if !enabled {
                continue;
            }
            let retrieval = self.retrieve(doc_id, query, top_k).await?;
            channels.insert(channel.label().to_string(), retrieval.sources);
        }
        Ok(MultiRetrievalPayload { channels })
    }

    /// Decomposes `question` into independently-answerable sub-questions,
    /// answers each one on its own with a full multi-channel retrieval and
    /// fusion pass, then asks the model to integrate every sub-answer into
    /// one final answer.
    ///
    /// All channels currently retrieve from the same document snapshot; the
    /// channel split organizes the fused prompt rather than routing to
    /// separate indexes.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Retrieval`] if any sub-question's retrieval fails
    /// or [`QaError::Generation`] if any model call fails.
    pub async fn advanced_query(
        &self,
        doc_id: &str,
        question: &str,
        top_k: usize,
        use_text: bool,
        use_table: bool,
        use_json: bool,
    ) -> Result<AdvancedQueryPayload> {
        let decomposition_text = self.complete(decompose_prompt(question)).await?;
        let sub_queries = parse_bullet_list(&decomposition_text);

        let mut sub_query_results = Vec::with_capacity(sub_queries.len());
        for sub_query in &sub_queries {
            let result = self
                .answer_sub_query(doc_id, sub_query, top_k, use_text, use_table, use_json)
                .await?;
            sub_query_results.push(result);
        }

        let sub_answers_block = render_sub_answers(&sub_queries, &sub_query_results);
        let final_answer = self.complete(integration_prompt(&sub_answers_block, question)).await?;

        Ok(AdvancedQueryPayload {
            decomposition: DecompositionPayload {
                query: question.to_string(),
                sub_queries,
            },
            sub_query_results,
            final_answer,
        })
    }

    /// Retrieves `sub_query` against every enabled channel and fuses the
    /// result into one grounded answer, the per-subquery unit of work behind
    /// [`Self::advanced_query`].
    async fn answer_sub_query(
        &self,
        doc_id: &str,
        sub_query: &str,
        top_k: usize,
        use_text: bool,
        use_table: bool,
        use_json: bool,
    ) -> Result<AnswerPayload> {
        let mut per_channel: BTreeMap<Channel, Vec<SourceReference>> = BTreeMap::new();
        for (channel, enabled) in [
            (Channel::Body, use_text),
            (Channel::Table, use_table),
            (Channel::JsonPath, use_json),
        ] {
            if !enabled {
                continue;
            }
            let retrieval = self.retrieve(doc_id, sub_query, top_k).await?;
            per_channel.insert(channel, retrieval.sources);
        }

        let fused_context = fuse_channel_contexts(&per_channel, render_context);
        let answer = self.complete(fuse_prompt(&fused_context, sub_query)).await?;
        let citations = extract_citations(&answer);
        let sources: Vec<SourceReference> = per_channel.into_values().flatten().collect();
        let confidence = mean_confidence(&sources);

        Ok(AnswerPayload {
            answer,
            sources,
            citations,
            confidence,
        })
    }
}

/// Mean retrieval score across `sources`, clamped to `[0.0, 1.0]` and rounded
/// to four decimal places, matching [`policyrag_retrieval::RetrievalResult`]'s
/// confidence formula.
fn mean_confidence(sources: &[SourceReference]) -> f64 {
    if sources.is_empty() {
        return 0.0;
    }
    let mean = sources.iter().map(|s| f64::from(s.score)).sum::<f64>() / sources.len() as f64;
    (mean.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}

fn finish(answer: String, retrieval: policyrag_retrieval::RetrievalResult) -> AnswerPayload {
    let citations = extract_citations(&answer);
    AnswerPayload {
        answer,
        sources: retrieval.sources,
        citations,
        confidence: retrieval.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policyrag_index::{IndexSnapshot, Node};
    use policyrag_store::MemoryStore;
    use std::convert::Infallible;

    struct MockEmbeddingModel;

    impl EmbeddingModel for MockEmbeddingModel {
        async fn embed(&self, _text: &str) -> policyrag_core::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
        fn dim(&self) -> usize {
            2
        }
    }

    struct MockGenerator {
        reply: String,
    }

    impl Generator for MockGenerator {
        type Error = Infallible;

        async fn complete(
            &self,
            _messages: &[policyrag_core::Message],
            _temperature: f32,
        ) -> std::result::Result<String, Self::Error> {
            Ok(self.reply.clone())
        }

        fn stream(
            &self,
            _messages: &[policyrag_core::Message],
            _temperature: f32,
        ) -> impl futures_core::Stream<Item = std::result::Result<String, Self::Error>> + Send {
            futures_lite::stream::iter(vec![Ok(self.reply.clone())])
        }
    }

    async fn seeded_store() -> MemoryStore {
        let mut child = Node::child("child text".to_string(), 0, 0);
        child.embedding = Some(vec![1.0, 0.0]);
        let nodes = vec![Node::parent("parent text".to_string(), 0), child];
        let snapshot = IndexSnapshot::new("doc-1", 2, nodes);
        let store = MemoryStore::new();
        store
            .put("doc-1", &snapshot.encode().unwrap(), "{}", None)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn ask_returns_answer_with_sources_and_citations() {
        let store = seeded_store().await;
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "근거는 [참조 1: 문단 0-0]에 있습니다.".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine.ask("doc-1", "이 조항은 무엇입니까?", 5).await.unwrap();

        assert_eq!(payload.sources.len(), 1);
        assert_eq!(payload.citations, vec!["[참조 1: 문단 0-0]".to_string()]);
    }

    #[tokio::test]
    async fn extract_issues_parses_bullets() {
        let store = seeded_store().await;
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "- 첫번째 쟁점\n- 두번째 쟁점".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine.extract_issues("doc-1", 5).await.unwrap();
        assert_eq!(payload.items.len(), 2);
    }

    #[tokio::test]
    async fn find_exceptions_keeps_only_sources_with_keywords() {
        let mut non_exception_child = Node::child("일반 규정 문장".to_string(), 0, 0);
        non_exception_child.embedding = Some(vec![1.0, 0.0]);
        let mut exception_child = Node::child("다만, 허위 신고의 경우 제외한다.".to_string(), 0, 1);
        exception_child.embedding = Some(vec![1.0, 0.0]);
        let nodes = vec![
            Node::parent("parent text".to_string(), 0),
            non_exception_child,
            exception_child,
        ];
        let snapshot = IndexSnapshot::new("doc-1", 2, nodes);
        let store = MemoryStore::new();
        store
            .put("doc-1", &snapshot.encode().unwrap(), "{}", None)
            .await
            .unwrap();

        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "허위 신고는 제외됩니다.".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine.find_exceptions("doc-1", "허위 신고", 5).await.unwrap();

        assert_eq!(payload.highlighted_sources.len(), 1);
        assert_eq!(
            payload.highlighted_sources[0].found_exception_keywords,
            vec!["다만".to_string(), "제외".to_string()]
        );
    }

    #[tokio::test]
    async fn ask_against_missing_document_is_retrieval_error() {
        let store = MemoryStore::new();
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "answer".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let err = engine.ask("missing", "question", 5).await.unwrap_err();
        assert!(matches!(err, QaError::Retrieval(_)));
    }

    #[tokio::test]
    async fn decompose_query_parses_bullets_without_retrieval() {
        let store = MemoryStore::new();
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "- 하위 질문 1\n- 하위 질문 2".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine.decompose_query("복합 질문").await.unwrap();
        assert_eq!(payload.sub_queries.len(), 2);
    }

    #[tokio::test]
    async fn multi_retrieval_skips_disabled_channels() {
        let store = seeded_store().await;
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "unused".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine
            .multi_retrieval("doc-1", "질문", 5, true, false, false)
            .await
            .unwrap();
        assert_eq!(payload.channels.len(), 1);
        assert!(payload.channels.contains_key("본문"));
    }

    #[tokio::test]
    async fn advanced_query_answers_each_sub_query_independently() {
        let store = seeded_store().await;
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "- 하위 질문 1".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine
            .advanced_query("doc-1", "복합 질문", 5, true, true, true)
            .await
            .unwrap();
        assert_eq!(payload.decomposition.sub_queries.len(), 1);
        assert_eq!(payload.sub_query_results.len(), 1);
        assert!(!payload.sub_query_results[0].sources.is_empty());
        assert!(!payload.final_answer.is_empty());
    }

    #[tokio::test]
    async fn advanced_query_skips_disabled_channels_per_sub_query() {
        let store = seeded_store().await;
        let embedding_model = MockEmbeddingModel;
        let generator = MockGenerator {
            reply: "- 하위 질문 1".to_string(),
        };
        let engine = QaEngine::new(&embedding_model, &generator, &store);
        let payload = engine
            .advanced_query("doc-1", "복합 질문", 5, true, false, false)
            .await
            .unwrap();
        assert_eq!(payload.sub_query_results[0].sources.len(), 1);
    }
}
