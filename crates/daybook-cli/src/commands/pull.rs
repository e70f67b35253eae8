use crate::cli::GlobalFlags;
use crate::cli::root_commands::PullArgs;
use crate::commands::shared::date_or_today;
use crate::context::AppContext;
use crate::output::output_result;

/// Handle `daybook pull`.
pub async fn handle(
    args: &PullArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let date = date_or_today(args.date);
    let result = ctx.reconciler.pull(date, args.cache).await;
    if result.is_degraded() {
        tracing::warn!(%date, "remote store unavailable; result served from local cache");
    }
    output_result(&result, flags.format)
}
