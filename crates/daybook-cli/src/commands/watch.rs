use std::time::Duration;

use chrono::{DateTime, Utc};
use daybook_core::{DailyTaskSet, TaskDate};
use daybook_sync::{DailyRecord, RemoteError, RemoteStore};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WatchArgs;
use crate::commands::shared::date_or_today;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct WatchEvent<'a> {
    date: TaskDate,
    poll: u32,
    updated_at: Option<DateTime<Utc>>,
    set: &'a DailyTaskSet,
}

/// Handle `daybook watch`.
///
/// No push transport is bundled, so the watch polls the remote record and
/// feeds each change through the reconciler's change handler. Runs until
/// `--iterations` polls have completed or the process is interrupted.
pub async fn handle(
    args: &WatchArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let date = date_or_today(args.date);
    let subscription = ctx.reconciler.subscribe(date)?;
    tracing::info!(id = %subscription.id, %date, interval = args.interval, "watching for changes");

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    let mut last_seen: Option<DateTime<Utc>> = None;
    let mut poll = 0_u32;

    let outcome = loop {
        if args.iterations.is_some_and(|limit| poll >= limit) {
            break Ok(());
        }
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }
        poll += 1;

        match fetch(ctx, date).await {
            Ok(Some(record)) => {
                if record.updated_at.is_some() && record.updated_at == last_seen {
                    continue;
                }
                last_seen = record.updated_at;
                let updated_at = record.updated_at;
                match ctx.reconciler.apply_remote_change(record) {
                    Ok(Some(set)) => {
                        let event = WatchEvent { date, poll, updated_at, set: &set };
                        if let Err(error) = output(&event, flags.format) {
                            break Err(error);
                        }
                    }
                    Ok(None) => {}
                    Err(error) => tracing::warn!(%date, %error, "ignoring invalid remote record"),
                }
            }
            Ok(None) => tracing::debug!(%date, poll, "no remote record yet"),
            Err(error) => tracing::warn!(%date, %error, "poll failed; will retry"),
        }
    };

    ctx.reconciler.unsubscribe(&subscription.id);
    outcome
}

async fn fetch(ctx: &AppContext, date: TaskDate) -> Result<Option<DailyRecord>, RemoteError> {
    let timeout = ctx.config.store.timeout();
    tokio::time::timeout(timeout, ctx.reconciler.store().fetch(date))
        .await
        .unwrap_or_else(|_| Err(RemoteError::connection(format!("poll for {date} timed out"))))
}
