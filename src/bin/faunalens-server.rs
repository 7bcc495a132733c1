//! Faunalens HTTP server binary

use faunalens::{
    Category, HttpClassifierSource, HttpEmbeddingSource, MockClassifierSource, RankingEngine,
    ScoreMap, ScoreSource,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("Faunalens Animal-Face Ranking Service");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    // Check for --use-real flag
    let use_real = std::env::args().any(|arg| arg == "--use-real");

    let engine = if use_real {
        println!("✓ Mode: REAL backends (remote model services)");
        let classifier_url = std::env::var("CLASSIFIER_SERVICE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8091".to_string());

        println!("✓ Classifier service: {}", classifier_url);

        // Test connection to classifier service
        let client = reqwest::Client::new();
        match client
            .get(format!("{}/health", classifier_url))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                println!("✓ Classifier service is healthy");
            }
            Ok(resp) => {
                eprintln!("⚠️  Classifier service returned status: {}", resp.status());
            }
            Err(e) => {
                eprintln!("❌ Failed to connect to classifier service: {}", e);
                eprintln!("   Make sure it's running and CLASSIFIER_SERVICE_URL is set");
                return Err(e.into());
            }
        }

        let mut sources: Vec<Box<dyn ScoreSource>> =
            vec![Box::new(HttpClassifierSource::new(classifier_url))];

        // Optional similarity fallback: embedding service + mean embeddings file
        if let Ok(embeddings_path) = std::env::var("MEAN_EMBEDDINGS_PATH") {
            let embedding_url = std::env::var("EMBEDDING_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8092".to_string());

            let source =
                HttpEmbeddingSource::from_embeddings_file(embedding_url.clone(), Path::new(&embeddings_path))?;
            sources.push(Box::new(source));

            println!("✓ Similarity fallback enabled: {}", embedding_url);
            println!("✓ Mean embeddings: {}", embeddings_path);
        }

        RankingEngine::new(sources)
    } else {
        println!("✓ Mode: MOCK backend (demo scores)");

        let scores: ScoreMap = [
            (Category::Bear, 0.62),
            (Category::Dog, 0.21),
            (Category::Wolf, 0.09),
            (Category::Tiger, 0.05),
            (Category::Cat, 0.03),
        ]
        .into_iter()
        .collect();

        RankingEngine::new(vec![Box::new(MockClassifierSource::new(scores))])
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8090);

    faunalens::server::run_server(engine, port).await
}
