//! Knowledge-base lookup by free-text name.

use tracing::{info, warn};

use crate::contract::{KnowledgeBase, KnowledgeBaseApi};
use crate::error::{KbError, KbResult};

/// Pick the first knowledge base whose name contains `query`, ignoring case.
///
/// When several names match, API order decides; the rest are only reported in the log.
pub fn match_knowledge_base(kbs: &[KnowledgeBase], query: &str) -> KbResult<KnowledgeBase> {
    let needle = query.to_lowercase();
    let mut matches = kbs
        .iter()
        .filter(|kb| kb.name.to_lowercase().contains(&needle));

    let first = matches
        .next()
        .ok_or_else(|| KbError::NotFound(query.to_string()))?;

    let others: Vec<&str> = matches.map(|kb| kb.name.as_str()).collect();
    if !others.is_empty() {
        warn!(
            query,
            chosen = %first.name,
            ?others,
            "Several knowledge bases match; using the first one"
        );
    }
    Ok(first.clone())
}

/// Fetch all knowledge bases and resolve `query` against them.
pub async fn find_knowledge_base<A>(api: &A, query: &str) -> KbResult<KnowledgeBase>
where
    A: KnowledgeBaseApi + ?Sized,
{
    info!(query, "Looking up knowledge base by name");
    let kbs = api.list_knowledge_bases().await?;
    let kb = match_knowledge_base(&kbs, query)?;
    info!(kb_id = %kb.id, name = %kb.name, "Found knowledge base");
    Ok(kb)
}
