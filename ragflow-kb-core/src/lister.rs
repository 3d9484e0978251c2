//! Drives paginated document listing to completion.

use tracing::{debug, info};

use crate::contract::{DocumentRecord, KnowledgeBaseApi};
use crate::error::KbResult;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Fetch every document in `kb_id`, page by page, in response order.
///
/// Stops after a page reports no more results or comes back empty. Any failed page
/// aborts the listing; partial results are discarded.
pub async fn list_all_documents<A>(
    api: &A,
    kb_id: &str,
    page_size: u32,
) -> KbResult<Vec<DocumentRecord>>
where
    A: KnowledgeBaseApi + ?Sized,
{
    info!(kb_id, page_size, "Fetching documents");
    let mut all_docs = Vec::new();
    let mut page = 1;

    loop {
        let result = api.list_documents(kb_id, page, page_size).await?;
        if result.docs.is_empty() {
            debug!(kb_id, page, "Empty page, listing complete");
            break;
        }
        all_docs.extend(result.docs);
        info!(kb_id, page, fetched = all_docs.len(), "Fetched page");

        if !result.has_more {
            break;
        }
        page += 1;
    }

    info!(kb_id, total = all_docs.len(), "Fetched all documents");
    Ok(all_docs)
}
