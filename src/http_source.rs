//! HTTP-based score sources that call a remote model service

use crate::error::InferenceError;
use crate::scoring::cosine_similarity;
use crate::sources::ScoreSource;
use crate::types::{BackendKind, Category, ScoreMap};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Response from the classifier service
#[derive(Debug, Deserialize)]
struct InferResponse {
    scores: HashMap<String, f32>,
}

/// Response from the embedding service
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Remote multi-class classifier: one POST per image, probability-like
/// scores come back ready for ranking
pub struct HttpClassifierSource {
    service_url: String,
    client: reqwest::Client,
}

impl HttpClassifierSource {
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            client: reqwest::Client::new(),
        }
    }

    fn parse_scores(&self, raw: HashMap<String, f32>) -> Result<ScoreMap, InferenceError> {
        let mut scores = ScoreMap::new();
        for (label, score) in raw {
            let Some(category) = Category::from_label(&label) else {
                return Err(InferenceError::InvalidOutput(format!(
                    "unknown label '{}' from classifier service",
                    label
                )));
            };
            scores.insert(category, score);
        }
        Ok(scores)
    }
}

#[async_trait]
impl ScoreSource for HttpClassifierSource {
    fn name(&self) -> &'static str {
        "http_classifier"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Classifier
    }

    async fn infer(&self, image: &[u8]) -> Result<ScoreMap, InferenceError> {
        let url = format!("{}/infer", self.service_url);
        let response = self
            .client
            .post(&url)
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| InferenceError::ModelUnavailable(e.to_string()))?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(InferenceError::NoFaceDetected);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::ModelUnavailable(format!(
                "classifier service error ({}): {}",
                status, body
            )));
        }

        let parsed: InferResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidOutput(e.to_string()))?;

        tracing::debug!(
            "Classifier service returned {} labels",
            parsed.scores.len()
        );

        self.parse_scores(parsed.scores)
    }

    async fn healthy(&self) -> bool {
        let url = format!("{}/health", self.service_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Remote embedding model plus local per-category mean embeddings.
/// Raw scores are cosine similarities, so the engine applies the
/// similarity calibration sequence to them.
pub struct HttpEmbeddingSource {
    service_url: String,
    client: reqwest::Client,
    mean_embeddings: HashMap<Category, Vec<f32>>,
}

impl HttpEmbeddingSource {
    pub fn new(service_url: String, mean_embeddings: HashMap<Category, Vec<f32>>) -> Self {
        Self {
            service_url,
            client: reqwest::Client::new(),
            mean_embeddings,
        }
    }

    /// Load mean embeddings from a JSON file mapping label -> vector
    pub fn from_embeddings_file(service_url: String, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mean embeddings from {}", path.display()))?;
        let raw: HashMap<String, Vec<f32>> =
            serde_json::from_str(&json).context("Failed to parse mean embeddings JSON")?;

        let mut mean_embeddings = HashMap::new();
        for (label, embedding) in raw {
            let category = Category::from_label(&label).with_context(|| {
                format!("Unknown label '{}' in {}", label, path.display())
            })?;
            mean_embeddings.insert(category, embedding);
        }

        tracing::info!(
            "Loaded mean embeddings for {} categories from {}",
            mean_embeddings.len(),
            path.display()
        );

        Ok(Self::new(service_url, mean_embeddings))
    }
}

#[async_trait]
impl ScoreSource for HttpEmbeddingSource {
    fn name(&self) -> &'static str {
        "http_embedding"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Similarity
    }

    async fn infer(&self, image: &[u8]) -> Result<ScoreMap, InferenceError> {
        let url = format!("{}/embed", self.service_url);
        let response = self
            .client
            .post(&url)
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| InferenceError::ModelUnavailable(e.to_string()))?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(InferenceError::NoFaceDetected);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::ModelUnavailable(format!(
                "embedding service error ({}): {}",
                status, body
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidOutput(e.to_string()))?;

        let mut scores = ScoreMap::new();
        for (&category, mean) in &self.mean_embeddings {
            if mean.len() != parsed.embedding.len() {
                return Err(InferenceError::InvalidOutput(format!(
                    "embedding length mismatch for '{}': got {}, expected {}",
                    category,
                    parsed.embedding.len(),
                    mean.len()
                )));
            }
            scores.insert(category, cosine_similarity(&parsed.embedding, mean));
        }

        Ok(scores)
    }

    async fn healthy(&self) -> bool {
        let url = format!("{}/health", self.service_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scores_rejects_unknown_label() {
        let source = HttpClassifierSource::new("http://127.0.0.1:8091".to_string());
        let mut raw = HashMap::new();
        raw.insert("bear".to_string(), 0.9);
        raw.insert("dragon".to_string(), 0.1);

        let err = source.parse_scores(raw).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));
    }

    #[test]
    fn test_parse_scores_full_label_set() {
        let source = HttpClassifierSource::new("http://127.0.0.1:8091".to_string());
        let raw: HashMap<String, f32> = Category::ALL
            .iter()
            .map(|c| (c.label().to_string(), 0.1))
            .collect();

        let scores = source.parse_scores(raw).unwrap();
        assert_eq!(scores.len(), 11);
    }

    #[tokio::test]
    #[ignore] // Requires running model service
    async fn test_classifier_source_integration() {
        let source = HttpClassifierSource::new("http://127.0.0.1:8091".to_string());
        assert!(source.healthy().await);
    }
}
