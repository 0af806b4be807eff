use localforge_core::SearchResult;

const PREAMBLE: &str = "You are LocalForge, an offline-first coding assistant.\n\
Use the context below to answer the user question.\n\n";

/// Builds the retrieval-augmented prompt: one `Source:` block per result,
/// followed by the question.
pub fn build_rag_prompt(question: &str, context: &[SearchResult]) -> String {
    let blocks = context
        .iter()
        .map(|result| {
            format!(
                "Source: {}\n{}",
                result.document.id, result.document.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{PREAMBLE}Context:\n{blocks}\n\nQuestion: {question}\nAnswer:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use localforge_core::Document;

    #[test]
    fn prompt_lists_sources_in_rank_order() {
        let context = vec![
            SearchResult {
                document: Document::new("a.md", "alpha"),
                score: 0.9,
            },
            SearchResult {
                document: Document::new("b.md", "beta"),
                score: 0.1,
            },
        ];

        let prompt = build_rag_prompt("what?", &context);
        assert!(prompt.starts_with("You are LocalForge"));
        assert!(prompt.contains("Context:\nSource: a.md\nalpha\n\nSource: b.md\nbeta\n\n"));
        assert!(prompt.ends_with("Question: what?\nAnswer:"));
    }

    #[test]
    fn prompt_with_no_context_still_asks_question() {
        let prompt = build_rag_prompt("hello", &[]);
        assert!(prompt.contains("Context:\n\n\nQuestion: hello"));
    }
}
