use dashboard_core::{AnalysisResult, AppViewModel, DetailView, RequestStatus, ViewState};

const TOP_COMMENTS_SHOWN: usize = 3;

pub fn render(view: &AppViewModel) -> Vec<String> {
    match view.view {
        ViewState::Input => render_input(view),
        ViewState::List => render_list(view),
        ViewState::Detail => match &view.detail {
            Some(detail) => render_detail(detail),
            None => render_input(view),
        },
    }
}

fn render_input(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec!["== Analyze Sentiment Context ==".to_string()];
    lines.extend(view.input.lines().map(|line| format!("  | {line}")));
    lines.push(format!("{} URL(s) detected", view.detected_targets));

    match view.status {
        RequestStatus::Loading => {
            lines.push(format!(
                "Processing {} URL(s)...",
                view.loading_targets.len()
            ));
        }
        RequestStatus::Error => {
            if let Some(error) = &view.error {
                lines.push(format!("Error: {error}"));
            }
        }
        RequestStatus::Idle | RequestStatus::Success => {}
    }
    if view.can_submit && view.status != RequestStatus::Loading {
        lines.push("Ready: :submit to analyze".to_string());
    }
    lines
}

fn render_list(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![format!("== Analysis Results ({}) ==", view.entries.len())];
    for (position, entry) in view.entries.iter().enumerate() {
        lines.push(format!(
            "[{}] {} | {} | {} comments | {:.2}s",
            position + 1,
            entry.platform.to_uppercase(),
            entry.title,
            entry.total_comments,
            entry.processing_time
        ));
    }
    if view.hidden_failures > 0 {
        lines.push(format!(
            "({} entr{} could not be analyzed)",
            view.hidden_failures,
            if view.hidden_failures == 1 { "y" } else { "ies" }
        ));
    }
    lines.push(":open <n> for insights, :reset for a new analysis".to_string());
    lines
}

fn render_detail(detail: &DetailView) -> Vec<String> {
    let result = &detail.result;
    let back = if detail.from_list {
        ":back  Back to Results"
    } else {
        ":back  Analyze Another"
    };

    let mut lines = vec![
        format!("== {} ==", result.display_title()),
        format!("Platform: {}", result.platform.to_uppercase()),
        format!("Total comments: {}", result.summary.total_comments),
        format!("Processing time: {:.2}s", result.processing_time),
        format!(
            "Context: {}",
            result
                .post_context
                .as_ref()
                .and_then(|ctx| ctx.summary_text())
                .unwrap_or("No specific context available.")
        ),
    ];
    lines.extend(sentiment_lines(result));
    for (category, comments) in &result.top_comments {
        if comments.is_empty() {
            continue;
        }
        lines.push(format!("-- {category} --"));
        lines.extend(
            comments
                .iter()
                .take(TOP_COMMENTS_SHOWN)
                .map(|comment| format!("  \"{comment}\"")),
        );
    }
    lines.push(back.to_string());
    lines
}

/// Non-zero categories, largest first, keys exactly as sent by the backend.
fn sentiment_lines(result: &AnalysisResult) -> Vec<String> {
    let mut counts: Vec<(&String, &u64)> = result
        .summary
        .categories
        .iter()
        .filter(|(_, count)| **count > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    if counts.is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["Sentiment:".to_string()];
    lines.extend(
        counts
            .into_iter()
            .map(|(category, count)| format!("  {category}: {count}")),
    );
    lines
}
