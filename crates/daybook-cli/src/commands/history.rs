use daybook_core::{DailyTaskSet, Summary, TaskDate};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    date: TaskDate,
    summary: &'a Summary,
}

#[derive(Debug, Serialize)]
struct HistoryResponse<'a> {
    days: u32,
    found: usize,
    entries: Vec<HistoryEntry<'a>>,
}

/// Handle `daybook history`.
pub async fn handle(
    args: &HistoryArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let sets = ctx.reconciler.history(args.days, TaskDate::today()).await;
    output(&response(args.days, &sets), flags.format)
}

fn response(days: u32, sets: &[DailyTaskSet]) -> HistoryResponse<'_> {
    HistoryResponse {
        days,
        found: sets.len(),
        entries: sets
            .iter()
            .map(|set| HistoryEntry {
                date: set.date(),
                summary: set.summary(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use daybook_core::{DailyTaskSet, Task};
    use pretty_assertions::assert_eq;

    use super::response;

    #[test]
    fn lists_summaries_in_given_order() {
        let newer = DailyTaskSet::from_tasks(
            "2025-01-29".parse().unwrap(),
            vec![Task::new("Standup").unwrap()],
        )
        .unwrap();
        let older = DailyTaskSet::new("2025-01-27".parse().unwrap());
        let sets = vec![newer, older];

        let json = serde_json::to_value(response(7, &sets)).unwrap();
        assert_eq!(json["found"], 2);
        assert_eq!(json["entries"][0]["date"], "2025-01-29");
        assert_eq!(json["entries"][0]["summary"]["total_tasks"], 1);
        assert_eq!(json["entries"][1]["date"], "2025-01-27");
    }
}
