use localforge_core::EmbeddingError;
use localforge_embeddings::EmbeddingProviderError;

#[test]
fn embedding_provider_error_maps_to_embedding_error() {
    let invalid: EmbeddingError =
        EmbeddingProviderError::InvalidResponse("bad rows".to_string()).into();
    assert!(matches!(
        &invalid,
        EmbeddingError::InvalidResponse(message) if message == "bad rows"
    ));
    assert_eq!(format!("{invalid}"), "Embedding invalid response: bad rows");

    let load: EmbeddingError =
        EmbeddingProviderError::ModelLoad("missing config.json".to_string()).into();
    assert!(matches!(&load, EmbeddingError::Unavailable(_)));

    let inference: EmbeddingError =
        EmbeddingProviderError::Inference("shape mismatch".to_string()).into();
    assert_eq!(
        format!("{inference}"),
        "Embedding provider error: shape mismatch"
    );
}
