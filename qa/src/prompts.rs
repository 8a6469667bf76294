//! Korean-language prompt templates for each question-answering operation.
//!
//! Every template follows the same shape: a short instruction, the retrieved
//! context, and a closing directive telling the model to answer only from
//! that context and to cite sources with the `"[참조 n: 문단 p-c]"` markers
//! already attached to each [`policyrag_retrieval::SourceReference`].

use policyrag_retrieval::SourceReference;

use crate::types::AnswerPayload;

/// Renders `sources` as a numbered context block, one entry per source.
#[must_use]
pub fn render_context(sources: &[SourceReference]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            format!(
                "[{}] {} (출처: {})\n{}",
                i + 1,
                source.citation(),
                source.citation(),
                source.parent_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prompt for a direct question-answering turn.
#[must_use]
pub fn qa_prompt(context: &str, question: &str) -> String {
    format!(
        "다음은 정책 문서에서 검색된 내용입니다.\n\n{context}\n\n\
         위 내용을 바탕으로 다음 질문에 답하세요. 문서에 없는 내용은 추측하지 말고 \
         \"문서에서 확인할 수 없습니다\"라고 답하세요. 답변 근거가 된 부분은 \
         \"[참조 n: 문단 p-c]\" 형식으로 인용하세요.\n\n질문: {question}"
    )
}

/// Prompt for summarizing a document's retrieved context to roughly `max_length` characters.
#[must_use]
pub fn summary_prompt(context: &str, max_length: usize) -> String {
    format!(
        "다음은 정책 문서의 주요 내용입니다.\n\n{context}\n\n\
         위 내용을 {max_length}자 이내로 요약하세요. 핵심 조항과 적용 대상을 \
         빠뜨리지 마세요."
    )
}

/// Prompt for extracting the notable issues raised by a document.
#[must_use]
pub fn issue_extraction_prompt(context: &str) -> String {
    format!(
        "다음은 정책 문서에서 검색된 내용입니다.\n\n{context}\n\n\
         위 내용에서 주요 쟁점(이슈)을 항목별로 추출하세요. 각 항목은 \
         \"- \"로 시작하는 한 줄로 작성하고, 근거가 된 부분을 \
         \"[참조 n: 문단 p-c]\" 형식으로 인용하세요."
    )
}

/// Prompt for locating the clause(s) that govern a described situation.
#[must_use]
pub fn clause_prompt(context: &str, situation: &str) -> String {
    format!(
        "다음은 정책 문서의 조항입니다.\n\n{context}\n\n\
         다음 상황에 적용되는 조항을 찾아 조항 번호와 내용을 인용하세요. \
         해당하는 조항이 없으면 \"해당 조항을 찾을 수 없습니다\"라고 답하세요.\n\n상황: {situation}"
    )
}

/// Prompt for explaining the stated reason or rationale behind a provision.
#[must_use]
pub fn reason_prompt(context: &str, provision: &str) -> String {
    format!(
        "다음은 정책 문서의 내용입니다.\n\n{context}\n\n\
         다음 조항 또는 조건이 설정된 이유나 근거를 문서에서 찾아 설명하세요. \
         문서에 명시적인 이유가 없으면 그렇게 답하세요.\n\n조항/조건: {provision}"
    )
}

/// Prompt for surfacing exception conditions related to a rule.
#[must_use]
pub fn exception_prompt(context: &str, rule: &str) -> String {
    format!(
        "다음은 정책 문서의 내용입니다.\n\n{context}\n\n\
         다음 규정에 대한 예외 조건이 있는지 찾아 나열하세요. 예외가 없으면 \
         \"예외 조건이 명시되어 있지 않습니다\"라고 답하세요.\n\n규정: {rule}"
    )
}

/// Prompt for decomposing a complex question into independent sub-questions.
#[must_use]
pub fn decompose_prompt(question: &str) -> String {
    format!(
        "다음 질문을 독립적으로 검색 가능한 하위 질문들로 분해하세요. \
         각 하위 질문은 \"- \"로 시작하는 한 줄로 작성하세요. \
         분해가 필요 없는 단순한 질문이면 원래 질문을 그대로 한 줄로 반환하세요.\n\n질문: {question}"
    )
}

/// Prompt for fusing per-channel retrieval results into one coherent answer.
#[must_use]
pub fn fuse_prompt(channel_contexts: &str, question: &str) -> String {
    format!(
        "다음은 표, 본문, 구조화된 데이터 등 여러 경로에서 검색된 내용입니다.\n\n\
         {channel_contexts}\n\n\
         위 내용을 종합하여 다음 질문에 답하세요. 서로 다른 경로의 정보가 \
         상충하면 그 사실을 명시하세요.\n\n질문: {question}"
    )
}

/// Renders each sub-question alongside the answer produced for it, for
/// assembly into the advanced query's final integration prompt.
#[must_use]
pub fn render_sub_answers(sub_queries: &[String], results: &[AnswerPayload]) -> String {
    sub_queries
        .iter()
        .zip(results)
        .enumerate()
        .map(|(i, (sub_query, result))| {
            format!("[하위 질문 {}] {}\n답변: {}", i + 1, sub_query, result.answer)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prompt for integrating independently-answered sub-questions into one
/// final answer to the original compound question.
#[must_use]
pub fn integration_prompt(sub_answers: &str, question: &str) -> String {
    format!(
        "다음은 복합 질문을 하위 질문으로 나누어 각각 답변한 결과입니다.\n\n\
         {sub_answers}\n\n\
         위 하위 질문별 답변을 종합하여 원래 질문에 대한 최종 답변을 작성하세요. \
         하위 답변 간에 상충하는 내용이 있으면 그 사실을 명시하세요.\n\n질문: {question}"
    )
}

/// Prompt for judging how significant the document's tables are to its overall content.
#[must_use]
pub fn table_importance_prompt(context: &str) -> String {
    format!(
        "다음은 정책 문서에서 검색된 표와 그 주변 내용입니다.\n\n{context}\n\n\
         이 표들이 문서의 핵심 내용을 이해하는 데 얼마나 중요한지 평가하고, \
         표가 없으면 놓치게 되는 정보를 설명하세요."
    )
}

/// Prompt for comparing table rows/columns against a named criterion.
#[must_use]
pub fn table_criteria_prompt(context: &str, criteria: &str) -> String {
    format!(
        "다음은 정책 문서에서 검색된 표 내용입니다.\n\n{context}\n\n\
         위 표를 \"{criteria}\" 기준으로 비교하고, 어느 항목이 이 기준에서 \
         더 엄격하거나 유리한지 근거와 함께 설명하세요."
    )
}

/// Prompt for producing a structured executive-style report summary.
#[must_use]
pub fn report_summary_prompt(context: &str) -> String {
    format!(
        "다음은 정책 문서의 주요 내용입니다.\n\n{context}\n\n\
         위 내용을 보고서 형식으로 요약하세요. \"배경\", \"주요 내용\", \"시사점\" \
         세 항목으로 나누어 작성하세요."
    )
}

/// Prompt for generating a compliance-style checklist from the document.
#[must_use]
pub fn checklist_prompt(context: &str) -> String {
    format!(
        "다음은 정책 문서의 주요 내용입니다.\n\n{context}\n\n\
         이 문서를 준수하기 위해 확인해야 할 항목을 체크리스트로 작성하세요. \
         각 항목은 \"- \"로 시작하는 한 줄로 작성하고, 반드시 확인해야 하는 \
         필수 항목에는 앞에 \"⚠️\"를 붙이세요."
    )
}

/// Prompt for clarifying ambiguous wording found in the document.
#[must_use]
pub fn ambiguous_text_prompt(context: &str, text: &str) -> String {
    format!(
        "다음은 정책 문서에서 검색된 내용입니다.\n\n{context}\n\n\
         다음 문구가 중의적이거나 불명확한 이유를 설명하고, 문서의 다른 내용을 \
         근거로 가능한 해석들을 제시하세요.\n\n문구: {text}"
    )
}

/// Prompt for generating frequently-asked questions and answers from the document.
#[must_use]
pub fn faq_prompt(context: &str) -> String {
    format!(
        "다음은 정책 문서의 주요 내용입니다.\n\n{context}\n\n\
         이 문서에 대해 사람들이 자주 물어볼 만한 질문과 답변을 \"Q: \"와 \"A: \" \
         접두사를 사용하여 항목별로 작성하세요."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_prompt_includes_context_and_question() {
        let prompt = qa_prompt("본문", "질문 내용");
        assert!(prompt.contains("본문"));
        assert!(prompt.contains("질문 내용"));
    }

    #[test]
    fn summary_prompt_includes_max_length() {
        let prompt = summary_prompt("본문", 200);
        assert!(prompt.contains("200"));
    }

    #[test]
    fn render_context_numbers_each_source() {
        let sources = vec![
            SourceReference {
                doc_id: "doc-1".to_string(),
                node_id: "c0-0".to_string(),
                reference_number: 1,
                parent_index: 0,
                chunk_index: 0,
                text: "child text".to_string(),
                parent_text: "parent text".to_string(),
                score: 0.9,
            },
        ];
        let rendered = render_context(&sources);
        assert!(rendered.starts_with("[1]"));
        assert!(rendered.contains("parent text"));
    }
}
