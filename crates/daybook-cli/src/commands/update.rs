use daybook_sync::{TaskPatch, TaskPatchBuilder};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UpdateArgs;
use crate::commands::shared::{date_or_today, parse_assignments};
use crate::context::AppContext;
use crate::output::output_result;

/// Handle `daybook update`.
pub async fn handle(
    args: &UpdateArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let patch = build_patch(args)?;
    let date = date_or_today(args.date);
    let result = ctx.reconciler.update_task(&args.id, &patch, date).await;
    output_result(&result, flags.format)
}

/// Merge typed flags and `--set` assignments into one patch. An assignment
/// overrides the typed flag for the same field.
fn build_patch(args: &UpdateArgs) -> anyhow::Result<TaskPatch> {
    let mut builder = TaskPatchBuilder::new();
    if let Some(title) = &args.title {
        builder = builder.title(title);
    }
    if let Some(description) = &args.description {
        builder = builder.description(description);
    }
    if let Some(priority) = args.priority {
        builder = builder.priority(priority);
    }
    if let Some(status) = args.status {
        builder = builder.status(status);
    }
    if let Some(progress) = args.progress {
        builder = builder.progress(progress);
    }
    if let Some(category) = args.category {
        builder = builder.category(category);
    }
    if let Some(minutes) = args.estimate {
        builder = builder.estimated_minutes(minutes);
    }
    if let Some(minutes) = args.actual {
        builder = builder.actual_minutes(minutes);
    }
    if let Some(block) = args.time_block {
        builder = builder.time_block(Some(block));
    }
    if let Some(note) = &args.note {
        builder = builder.note(note);
    }
    if let Some(subtask_id) = &args.complete_subtask {
        builder = builder.complete_subtask(subtask_id);
    }

    let mut patch = builder.build();
    if !args.set.is_empty() {
        let serde_json::Value::Object(mut fields) = serde_json::to_value(&patch)? else {
            anyhow::bail!("task patch did not serialize to an object");
        };
        fields.extend(parse_assignments(&args.set)?);
        patch = TaskPatch::from_fields(fields)?;
    }

    if patch.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field flag or --set FIELD=VALUE");
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use daybook_core::{Priority, TaskStatus};
    use daybook_sync::TaskPatchBuilder;
    use pretty_assertions::assert_eq;

    use super::build_patch;
    use crate::cli::{Cli, Commands};
    use crate::cli::root_commands::UpdateArgs;

    fn args(argv: &[&str]) -> UpdateArgs {
        let mut full = vec!["daybook", "update", "tsk-0a1b2c3d"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).expect("cli should parse").command {
            Commands::Update(args) => args,
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn rejects_noop_update() {
        let err = build_patch(&args(&[])).expect_err("should fail");
        assert!(err.to_string().contains("nothing to update"));
    }

    #[test]
    fn typed_flags_build_patch() {
        let patch = build_patch(&args(&["--status", "completed", "--priority", "p1"])).unwrap();
        assert_eq!(
            patch,
            TaskPatchBuilder::new()
                .priority(Priority::P1)
                .status(TaskStatus::Completed)
                .build()
        );
    }

    #[test]
    fn assignment_overrides_typed_flag() {
        let patch = build_patch(&args(&["--progress", "10", "--set", "progress=70"])).unwrap();
        assert_eq!(patch.progress, Some(70));
    }

    #[test]
    fn unknown_assignment_is_rejected() {
        let err = build_patch(&args(&["--set", "colour=red"])).expect_err("should fail");
        assert!(err.to_string().contains("colour"), "{err}");
    }
}
