use localforge_core::{Document, SearchResult, Value};
use serde_json::json;

#[test]
fn document_builder_sets_metadata_and_embedding() {
    let doc = Document::new("doc-1", "hello")
        .with_metadata("path", "/tmp/a.md")
        .with_embedding(vec![0.5, 0.5]);

    assert_eq!(doc.metadata.get("path"), Some(&Value::from("/tmp/a.md")));
    assert_eq!(doc.dimension(), Some(2));
}

#[test]
fn document_deserializes_without_metadata_or_embedding() {
    let doc: Document = serde_json::from_value(json!({"id": "a", "content": "text"})).unwrap();
    assert!(doc.metadata.is_empty());
    assert_eq!(doc.embedding, None);
}

#[test]
fn search_result_serializes_flat() {
    let result = SearchResult {
        document: Document::new("a", "alpha").with_metadata("lang", "md"),
        score: 0.25,
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({"id": "a", "content": "alpha", "metadata": {"lang": "md"}, "score": 0.25})
    );
}
