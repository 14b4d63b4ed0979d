use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::output::key_value_table;
use crate::domain::models::Config;
use crate::infrastructure::logging::mask_key;
use crate::infrastructure::vector::VectorStore;

#[derive(Debug, Serialize)]
struct StatusReport {
    index_path: String,
    index_exists: bool,
    records: usize,
    sources: Vec<String>,
    index_model: Option<String>,
    chat_model: String,
    embedding_model: String,
    openai_api_key: Option<String>,
    auth_enabled: bool,
    auth_key_configured: bool,
    persona_exists: bool,
}

/// Handle the status command
pub async fn execute(config: Config, json: bool) -> Result<()> {
    let index_dir = Path::new(&config.rag.index_path);
    let mut report = StatusReport {
        index_path: config.rag.index_path.clone(),
        index_exists: VectorStore::exists(index_dir),
        records: 0,
        sources: Vec::new(),
        index_model: None,
        chat_model: config.llm.model.clone(),
        embedding_model: config.embedding.model.clone(),
        openai_api_key: config.openai.credential().map(mask_key),
        auth_enabled: config.auth.enabled,
        auth_key_configured: config.auth.secret().is_some(),
        persona_exists: Path::new(&config.rag.persona_path).is_file(),
    };

    if report.index_exists {
        let store = VectorStore::open_read_only(index_dir).await?;
        report.records = store.count().await?;
        report.sources = store.sources().await?;
        report.index_model = store.meta().await?.map(|meta| meta.model);
        store.close().await;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let yes_no = |value: bool| if value { "yes" } else { "no" }.to_string();
    println!(
        "{}",
        key_value_table([
            ("Index path", report.index_path.clone()),
            ("Index present", yes_no(report.index_exists)),
            ("Records", report.records.to_string()),
            ("Sources", report.sources.join(", ")),
            ("Index model", report.index_model.clone().unwrap_or_else(|| "-".to_string())),
            ("Chat model", report.chat_model.clone()),
            ("Embedding model", report.embedding_model.clone()),
            (
                "OpenAI API key",
                report.openai_api_key.clone().unwrap_or_else(|| "not set".to_string()),
            ),
            ("Endpoint auth", yes_no(report.auth_enabled)),
            ("Auth key set", yes_no(report.auth_key_configured)),
            ("Persona PDF present", yes_no(report.persona_exists)),
        ])
    );

    Ok(())
}
