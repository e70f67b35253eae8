use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `daybook check`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let check = ctx.reconciler.check_connection().await;
    output(&check, flags.format)?;
    if !check.ok {
        anyhow::bail!("{}", check.message);
    }
    Ok(())
}
