//! Tabular run summary

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use crew_workflow::PipelineOutput;

const PREVIEW_CHARS: usize = 60;

/// Per-task table: role, duration, tokens, tool calls and an answer preview
pub fn summary_table(output: &PipelineOutput) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Agent", "Time (s)", "Tokens", "Tools", "Answer"]);

    for task in &output.tasks_output {
        table.add_row(vec![
            (task.index + 1).to_string(),
            task.role.clone(),
            format_seconds(task.duration().num_milliseconds()),
            task.usage.total().to_string(),
            task.tool_calls.to_string(),
            preview(&task.raw),
        ]);
    }

    table.add_row(vec![
        String::new(),
        "Total".to_string(),
        format_seconds(output.duration().num_milliseconds()),
        output.token_usage.total().to_string(),
        output
            .tasks_output
            .iter()
            .map(|t| t.tool_calls)
            .sum::<usize>()
            .to_string(),
        String::new(),
    ]);

    table
}

fn format_seconds(millis: i64) -> String {
    format!("{}.{:01}", millis / 1000, (millis % 1000) / 100)
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}
