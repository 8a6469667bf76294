//! Lenient parsers for the model's free-text output.
//!
//! None of these ever return an error: a malformed or unexpected response
//! degrades to the most reasonable fallback (usually treating the whole
//! response as a single item) rather than failing the request outright.

/// Splits `text` into bullet items, one per line starting with `- ` or `• `.
/// Falls back to the whole trimmed text as a single item if no bullet lines
/// are found.
#[must_use]
pub fn parse_bullet_list(text: &str) -> Vec<String> {
    let items: Vec<String> = text
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("• "))
                .map(|rest| rest.trim().to_string())
        })
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        let whole = text.trim();
        if whole.is_empty() {
            Vec::new()
        } else {
            vec![whole.to_string()]
        }
    } else {
        items
    }
}

/// Marker a checklist line carries when the model flags it as mandatory.
const CRITICAL_MARKER: &str = "⚠️";
/// Section heading under which every item is implicitly critical.
const CRITICAL_SECTION_HEADER: &str = "필수 확인 사항";

/// Parses checklist bullet lines into [`crate::types::ChecklistItem`]s,
/// marking an item critical if it carries [`CRITICAL_MARKER`] or falls under
/// a [`CRITICAL_SECTION_HEADER`] heading.
#[must_use]
pub fn parse_checklist(text: &str) -> Vec<crate::types::ChecklistItem> {
    let mut under_critical_header = false;
    let mut items = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.contains(CRITICAL_SECTION_HEADER) {
            under_critical_header = true;
            continue;
        }
        let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("• "))
        else {
            continue;
        };
        let critical = under_critical_header || rest.contains(CRITICAL_MARKER);
        let cleaned = rest.replace(CRITICAL_MARKER, "").trim().to_string();
        if !cleaned.is_empty() {
            items.push(crate::types::ChecklistItem { text: cleaned, critical });
        }
    }

    if items.is_empty() {
        items = parse_bullet_list(text)
            .into_iter()
            .map(|text| crate::types::ChecklistItem { text, critical: false })
            .collect();
    }
    items
}

/// Parses `"Q: ..."`/`"A: ..."` (or `"Q1."`/`"A1."`-numbered) line pairs into
/// [`crate::types::FaqEntry`] entries. A trailing unanswered question is dropped.
#[must_use]
pub fn parse_faq(text: &str) -> Vec<crate::types::FaqEntry> {
    let mut entries = Vec::new();
    let mut pending_question: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(question) = strip_qa_prefix(trimmed, 'Q') {
            pending_question = Some(question.to_string());
        } else if let Some(answer) = strip_qa_prefix(trimmed, 'A') {
            if let Some(question) = pending_question.take() {
                entries.push(crate::types::FaqEntry {
                    question,
                    answer: answer.to_string(),
                });
            }
        }
    }

    entries
}

/// Strips a `"Q: "`, `"Q1. "`, `"Q1: "`, or `"Q1) "` style prefix for `letter` ('Q' or 'A').
fn strip_qa_prefix(line: &str, letter: char) -> Option<&str> {
    let rest = line.strip_prefix(letter)?;
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = rest
        .strip_prefix(':')
        .or_else(|| rest.strip_prefix('.'))
        .or_else(|| rest.strip_prefix(')'))?;
    Some(rest.trim())
}

/// The canonical set of Korean exception-clause markers an exception search
/// filters source text against.
pub const EXCEPTION_KEYWORDS: &[&str] =
    &["다만", "단서", "예외", "제외", "이 경우", "특례", "불구하고"];

/// Every [`EXCEPTION_KEYWORDS`] entry that appears as a substring of `text`, in
/// canonical order.
#[must_use]
pub fn find_exception_keywords(text: &str) -> Vec<String> {
    EXCEPTION_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| (*keyword).to_string())
        .collect()
}

/// Extracts every `"[참조 n: 문단 p-c]"`-shaped citation marker from `text`, in order.
#[must_use]
pub fn extract_citations(text: &str) -> Vec<String> {
    let mut citations = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(']') else {
            break;
        };
        let candidate = &after_open[..close];
        if is_citation_shape(candidate) {
            citations.push(format!("[{candidate}]"));
        }
        rest = &after_open[close + 1..];
    }
    citations
}

fn is_citation_shape(candidate: &str) -> bool {
    let Some(rest) = candidate.strip_prefix("참조 ") else {
        return false;
    };
    let Some((reference_number, rest)) = rest.split_once(": 문단 ") else {
        return false;
    };
    if reference_number.is_empty() || !reference_number.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let Some((parent, child)) = rest.split_once('-') else {
        return false;
    };
    !parent.is_empty()
        && !child.is_empty()
        && parent.chars().all(|c| c.is_ascii_digit())
        && child.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dash_bullets() {
        let text = "- first item\n- second item\n";
        assert_eq!(
            parse_bullet_list(text),
            vec!["first item".to_string(), "second item".to_string()]
        );
    }

    #[test]
    fn falls_back_to_whole_text_when_no_bullets() {
        let text = "just one paragraph of prose";
        assert_eq!(parse_bullet_list(text), vec![text.to_string()]);
    }

    #[test]
    fn empty_text_yields_empty_list() {
        assert_eq!(parse_bullet_list("   "), Vec::<String>::new());
    }

    #[test]
    fn extracts_well_formed_citations() {
        let text = "근거는 [참조 1: 문단 2-0]과 [참조 2: 문단 3-1]에 있습니다.";
        assert_eq!(
            extract_citations(text),
            vec![
                "[참조 1: 문단 2-0]".to_string(),
                "[참조 2: 문단 3-1]".to_string()
            ]
        );
    }

    #[test]
    fn ignores_brackets_that_are_not_citations() {
        let text = "[참고] 이 문장은 인용이 아닙니다.";
        assert!(extract_citations(text).is_empty());
    }

    #[test]
    fn checklist_marks_warning_emoji_items_critical() {
        let text = "- 일반 확인 사항\n- ⚠️ 개인정보 처리 동의 확인";
        let items = parse_checklist(text);
        assert_eq!(items.len(), 2);
        assert!(!items[0].critical);
        assert!(items[1].critical);
        assert_eq!(items[1].text, "개인정보 처리 동의 확인");
    }

    #[test]
    fn checklist_marks_items_under_critical_header() {
        let text = "[필수 확인 사항]\n- 신고 기한 준수\n- 서명 확인";
        let items = parse_checklist(text);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.critical));
    }

    #[test]
    fn faq_pairs_questions_with_following_answers() {
        let text = "Q1. 신청 기한은 언제까지인가요?\nA1. 접수일로부터 30일 이내입니다.\nQ2: 수수료가 있나요?\nA2: 없습니다.";
        let entries = parse_faq(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "신청 기한은 언제까지인가요?");
        assert_eq!(entries[0].answer, "접수일로부터 30일 이내입니다.");
        assert_eq!(entries[1].answer, "없습니다.");
    }

    #[test]
    fn faq_drops_trailing_unanswered_question() {
        let text = "Q: 답 없는 질문입니다.";
        assert!(parse_faq(text).is_empty());
    }

    #[test]
    fn finds_every_matching_exception_keyword() {
        let text = "다만, 허위 신고의 경우 제외한다.";
        assert_eq!(
            find_exception_keywords(text),
            vec!["다만".to_string(), "제외".to_string()]
        );
    }

    #[test]
    fn no_keywords_found_yields_empty_list() {
        assert!(find_exception_keywords("일반적인 규정 내용입니다.").is_empty());
    }
}
