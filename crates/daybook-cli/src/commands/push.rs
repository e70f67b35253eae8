use std::io::Read;
use std::path::Path;

use anyhow::Context;
use daybook_core::payload::tasks_from_payloads;
use daybook_core::{PlannerConfig, RawTaskPayload, Task, TaskDate};
use daybook_sync::{ErrorReason, SyncFailure, SyncResult};
use serde::Deserialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PushArgs;
use crate::commands::shared::date_or_today;
use crate::context::AppContext;
use crate::output::output_result;

/// Accepted shapes of a push input file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PushInput {
    Payloads(Vec<RawTaskPayload>),
    Wrapped { tasks: Vec<RawTaskPayload> },
}

impl PushInput {
    fn into_payloads(self) -> Vec<RawTaskPayload> {
        match self {
            Self::Payloads(payloads) | Self::Wrapped { tasks: payloads } => payloads,
        }
    }
}

/// Handle `daybook push`.
pub async fn handle(
    args: &PushArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let date = date_or_today(args.date);

    let result = match &args.file {
        Some(path) => {
            let raw = read_input(path)?;
            let tasks = parse_tasks(&raw, &ctx.config.planner)
                .with_context(|| format!("invalid task payloads in {}", path.display()))?;
            warn_over_budget(&tasks, &ctx.config.planner);
            ctx.reconciler.push(tasks, date).await
        }
        None => match ctx.reconciler.cache().load(date) {
            Some(set) => {
                warn_over_budget(set.tasks(), &ctx.config.planner);
                ctx.reconciler.push_set(set).await
            }
            None => missing_snapshot(ctx, date),
        },
    };

    output_result(&result, flags.format)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read task payloads from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_tasks(raw: &str, planner: &PlannerConfig) -> anyhow::Result<Vec<Task>> {
    let input: PushInput = serde_json::from_str(raw).context("expected a JSON array of tasks")?;
    Ok(tasks_from_payloads(input.into_payloads(), planner)?)
}

fn missing_snapshot(ctx: &AppContext, date: TaskDate) -> SyncResult {
    let path = ctx.reconciler.cache().path_for(date);
    SyncResult::Failed {
        message: format!("No cached tasks for {date}; pass --file to push new tasks"),
        failure: SyncFailure::new(
            ErrorReason::NotFound,
            format!("no snapshot at {}", path.display()),
        ),
        warnings: Vec::new(),
    }
}

/// Warn when the day's estimates exceed the configured work hours.
fn warn_over_budget(tasks: &[Task], planner: &PlannerConfig) {
    let Ok(available) = planner.available_minutes() else {
        return;
    };
    let planned: u64 = tasks.iter().map(|task| u64::from(task.estimated_minutes())).sum();
    if planned > u64::from(available) {
        tracing::warn!(
            planned,
            available,
            "estimated work exceeds available hours for the day"
        );
    }
}

#[cfg(test)]
mod tests {
    use daybook_core::{Category, Priority, PlannerConfig};
    use pretty_assertions::assert_eq;

    use super::parse_tasks;

    #[test]
    fn parses_bare_array_with_hints() {
        let raw = r#"[
            {"title": "Ship sync API", "priority": "high", "category": "development", "estimated_minutes": 120},
            {"title": "Expenses", "priority_hint": "P2", "category_hint": "admin", "size": "large"}
        ]"#;
        let tasks = parse_tasks(raw, &PlannerConfig::default()).expect("payloads should parse");

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].priority(), Priority::P1);
        assert_eq!(tasks[0].category(), Category::Development);
        assert_eq!(tasks[1].estimated_minutes(), 60);
    }

    #[test]
    fn parses_wrapped_object() {
        let raw = r#"{"tasks": [{"title": "Plan sprint", "subtasks": ["review board", "draft goals"]}]}"#;
        let tasks = parse_tasks(raw, &PlannerConfig::default()).expect("payloads should parse");
        assert_eq!(tasks[0].subtasks().len(), 2);
        assert_eq!(tasks[0].estimated_minutes(), 30);
    }

    #[test]
    fn reports_payload_index_on_invalid_hint() {
        let raw = r#"[{"title": "ok"}, {"title": "bad", "priority": "someday"}]"#;
        let err = parse_tasks(raw, &PlannerConfig::default()).expect_err("should fail");
        assert!(format!("{err:#}").contains("tasks[1].priority"), "{err:#}");
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_tasks("title: nope", &PlannerConfig::default()).is_err());
    }
}
