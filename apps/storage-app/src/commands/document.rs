//! # Document Commands
//!
//! Document list, CRUD and plain-text rendering. Creating a document raises
//! the `document` notification when that toggle is on.

use chrono::Utc;
use tracing::{info, warn};

use super::ApiResult;
use crate::context::AppContext;
use storage_core::filter::DocumentFilter;
use storage_core::receipt::render_document;
use storage_core::validation::validate_document;
use storage_core::Document;

/// Documents matching `filter`, newest first.
pub async fn list_documents(ctx: &AppContext, filter: &DocumentFilter) -> ApiResult<Vec<Document>> {
    let documents = ctx.db().records::<Document>().all().await?;
    Ok(filter.apply(documents))
}

pub async fn get_document(ctx: &AppContext, id: i64) -> ApiResult<Document> {
    Ok(ctx.db().records::<Document>().require(id).await?)
}

pub async fn create_document(ctx: &AppContext, mut document: Document) -> ApiResult<Document> {
    validate_document(&document)?;
    let now = Utc::now();
    document.id = None;
    document.created_at = Some(now);
    document.updated_at = Some(now);

    let document = ctx.db().records::<Document>().create(&document).await?;
    info!(id = document.id, title = %document.title, "Document created");

    // The document is stored either way
    if let Err(e) = ctx.engine().raise_document(&document).await {
        warn!(error = %e, "Document notification failed");
    }
    Ok(document)
}

pub async fn update_document(ctx: &AppContext, id: i64, mut document: Document) -> ApiResult<Document> {
    validate_document(&document)?;
    let records = ctx.db().records::<Document>();
    let existing = records.require(id).await?;

    document.id = Some(id);
    document.created_at = existing.created_at;
    document.updated_at = Some(Utc::now());

    let document = records.update(id, &document).await?;
    info!(id, status = ?document.status, "Document updated");
    Ok(document)
}

pub async fn delete_document(ctx: &AppContext, id: i64) -> ApiResult<()> {
    ctx.db().records::<Document>().delete(id).await?;
    info!(id, "Document deleted");
    Ok(())
}

/// Printable text of a stored document.
pub async fn document_text(ctx: &AppContext, id: i64) -> ApiResult<String> {
    let document = get_document(ctx, id).await?;
    Ok(render_document(&document))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_context;
    use storage_core::{AlertSettings, DocumentType, NotificationCategory};

    #[tokio::test]
    async fn test_create_raises_notification() {
        let ctx = test_context().await;
        let doc = create_document(&ctx, Document::new("March supply", DocumentType::Invoice, "x"))
            .await
            .unwrap();
        assert!(doc.created_at.is_some());

        let info = ctx.engine().notifications(Some(NotificationCategory::Info)).await;
        assert_eq!(info.len(), 1);
        assert!(info[0].message.contains("March supply"));
    }

    #[tokio::test]
    async fn test_document_toggle_off_stays_quiet() {
        let ctx = test_context().await;
        ctx.engine()
            .update_settings(AlertSettings {
                document: false,
                ..AlertSettings::default()
            })
            .await
            .unwrap();

        create_document(&ctx, Document::new("Lease", DocumentType::Contract, ""))
            .await
            .unwrap();
        assert!(ctx.engine().notifications(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_filter_and_render() {
        let ctx = test_context().await;
        create_document(&ctx, Document::new("First", DocumentType::Report, "a"))
            .await
            .unwrap();
        let second = create_document(&ctx, Document::new("Second", DocumentType::Act, "b"))
            .await
            .unwrap();

        let all = list_documents(&ctx, &DocumentFilter::default()).await.unwrap();
        assert_eq!(all[0].title, "Second");

        let acts = DocumentFilter {
            document_type: Some(DocumentType::Act),
            ..Default::default()
        };
        assert_eq!(list_documents(&ctx, &acts).await.unwrap().len(), 1);

        let text = document_text(&ctx, second.id.unwrap()).await.unwrap();
        assert!(text.contains("Title: Second"));
        assert!(text.contains("CERTIFICATE OF COMPLETION"));
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let ctx = test_context().await;
        let err = create_document(&ctx, Document::new("", DocumentType::Report, ""))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
