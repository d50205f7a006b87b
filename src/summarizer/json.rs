//! Recovering JSON from free-form LLM output.

use serde_json::Value;

/// Outcome of reading an LLM reply as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmJson {
    Parsed(Value),
    ParseFailure { raw: String },
}

/// Strict parse first, then balanced `{...}` / `[...]` spans that parse, then
/// the widest outer span. Never fails past this point.
///
/// Outermost spans are tried before nested ones, and objects before arrays,
/// so a citation like `[1]` in the preamble does not shadow the real object.
pub fn parse_llm_json(raw: &str) -> LlmJson {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return LlmJson::Parsed(value);
    }

    if let Some(value) = balanced_spans(trimmed)
        .into_iter()
        .find_map(|span| serde_json::from_str::<Value>(&trimmed[span.start..=span.end]).ok())
    {
        return LlmJson::Parsed(value);
    }

    if let Some(value) = outer_span(trimmed).and_then(|span| serde_json::from_str::<Value>(span).ok()) {
        return LlmJson::Parsed(value);
    }

    LlmJson::ParseFailure { raw: raw.to_string() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
    nested: bool,
    object: bool,
}

impl Span {
    fn rank(&self) -> (bool, bool, usize) {
        (self.nested, !self.object, self.start)
    }
}

/// Every matched bracket pair in one scan, ordered by preference.
///
/// Quotes only open a string inside a bracket. A mismatched closer drops
/// everything still open.
fn balanced_spans(text: &str) -> Vec<Span> {
    let mut open: Vec<(usize, char)> = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push((i, '}')),
            '[' => open.push((i, ']')),
            '}' | ']' => match open.pop() {
                Some((start, close)) if close == c => spans.push(Span {
                    start,
                    end: i,
                    nested: !open.is_empty(),
                    object: c == '}',
                }),
                Some(_) => open.clear(),
                None => {}
            },
            _ => {}
        }
    }

    spans.sort_unstable_by_key(Span::rank);
    spans
}

/// From the first opening bracket to the last matching-kind closing bracket.
fn outer_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn strict_json_parses_directly() {
        assert_eq!(
            parse_llm_json(r#"{"pros": ["a"], "cons": []}"#),
            LlmJson::Parsed(json!({"pros": ["a"], "cons": []}))
        );
    }

    #[test]
    fn object_embedded_in_prose() {
        let raw = "Here is the analysis you asked for:\n{\"final_judgment\": \"Affirmed {in part}\", \"pros\": [\"x\"]}\nLet me know if you need more.";
        assert_eq!(
            parse_llm_json(raw),
            LlmJson::Parsed(json!({"final_judgment": "Affirmed {in part}", "pros": ["x"]}))
        );
    }

    #[test]
    fn array_embedded_in_prose() {
        let raw = "Themes: [\"contract\", \"tort\"] were dominant.";
        assert_eq!(parse_llm_json(raw), LlmJson::Parsed(json!(["contract", "tort"])));
    }

    #[test]
    fn fenced_code_block() {
        let raw = "```json\n{\"case_count\": \"3\"}\n```";
        assert_eq!(parse_llm_json(raw), LlmJson::Parsed(json!({"case_count": "3"})));
    }

    #[test]
    fn skips_unparsable_brackets_before_the_real_object() {
        let raw = "Note [see above] then {\"pros\": []}";
        assert_eq!(parse_llm_json(raw), LlmJson::Parsed(json!({"pros": []})));
    }

    #[test]
    fn citation_before_the_object_is_not_taken() {
        let raw = "As noted in [1], here is the analysis:\n{\"pros\": [\"Strong precedent\"], \"cons\": [], \"final_judgment\": \"Affirmed\"}";
        assert_eq!(
            parse_llm_json(raw),
            LlmJson::Parsed(json!({"pros": ["Strong precedent"], "cons": [], "final_judgment": "Affirmed"}))
        );
    }

    #[test]
    fn array_of_objects_is_kept_whole() {
        let raw = "Results: [{\"case\": \"a\"}, {\"case\": \"b\"}] end.";
        assert_eq!(
            parse_llm_json(raw),
            LlmJson::Parsed(json!([{"case": "a"}, {"case": "b"}]))
        );
    }

    #[test]
    fn object_inside_an_unclosed_bracket_is_found() {
        let raw = "Note [see {\"pros\": [\"x\"]}";
        assert_eq!(parse_llm_json(raw), LlmJson::Parsed(json!({"pros": ["x"]})));
    }

    #[test]
    fn spans_are_collected_in_one_scan() {
        let text = "[1] {\"a\": [2]}";
        let spans = balanced_spans(text);
        let found: Vec<&str> = spans.iter().map(|s| &text[s.start..=s.end]).collect();
        assert_eq!(found, vec!["{\"a\": [2]}", "[1]", "[2]"]);
    }

    #[test]
    fn mismatched_closer_resets_the_scan() {
        let text = "{oops] then [\"ok\"]";
        let spans = balanced_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..=spans[0].end], "[\"ok\"]");
    }

    #[test]
    fn no_json_returns_raw_verbatim() {
        let raw = "  I could not produce JSON for these {documents. ";
        assert_eq!(
            parse_llm_json(raw),
            LlmJson::ParseFailure { raw: raw.to_string() }
        );
    }
}
