//! # Settings Commands
//!
//! Theme preference. Alert toggles live in [`alerts`](super::alerts).

use tracing::info;

use super::ApiResult;
use crate::context::AppContext;
use storage_core::Theme;

/// Stored theme, `windows95` when never set.
pub async fn get_theme(ctx: &AppContext) -> ApiResult<Theme> {
    Ok(ctx.db().settings().theme().await?)
}

pub async fn set_theme(ctx: &AppContext, theme: Theme) -> ApiResult<()> {
    ctx.db().settings().save_theme(theme).await?;
    info!(?theme, "Theme changed");
    Ok(())
}
