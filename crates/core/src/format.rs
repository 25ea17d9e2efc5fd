use crate::types::{Importance, VideoAnalysis};

/// Format seconds as MM:SS, or HH:MM:SS from one hour on
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Parse "MM:SS" or "HH:MM:SS" into seconds.
///
/// Any other number of groups, or a group that is not a non-negative integer, yields 0.
pub fn parse_timestamp(time: &str) -> u64 {
    let groups: Option<Vec<u64>> = time
        .split(':')
        .map(|group| group.trim().parse::<u64>().ok())
        .collect();

    match groups.as_deref() {
        Some([m, s]) => m.saturating_mul(60).saturating_add(*s),
        Some([h, m, s]) => h
            .saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(*s),
        _ => 0,
    }
}

/// Format an analysis as human-readable markdown
pub fn format_analysis_readable(analysis: &VideoAnalysis) -> String {
    format_analysis_with(analysis, |importance| {
        importance.as_str().to_uppercase()
    })
}

/// Same as [`format_analysis_readable`] with a caller-supplied importance label.
pub fn format_analysis_with<F>(analysis: &VideoAnalysis, importance_label: F) -> String
where
    F: Fn(Importance) -> String,
{
    let mut output = String::new();

    output.push_str("## Summary\n\n");
    output.push_str(&analysis.summary);
    output.push_str("\n\n");

    output.push_str(&format!("**Sentiment:** {}\n\n", analysis.sentiment));

    if !analysis.key_points.is_empty() {
        output.push_str("## Key Points\n\n");
        for point in &analysis.key_points {
            output.push_str(&format!("• {}\n", point));
        }
        output.push('\n');
    }

    if !analysis.topics.is_empty() {
        output.push_str("## Topics\n\n");
        output.push_str(&analysis.topics.join(", "));
        output.push_str("\n\n");
    }

    if !analysis.timestamps.is_empty() {
        output.push_str("## Key Moments\n\n");
        for (i, ts) in analysis.timestamps.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. [{}] ({}s) {} {}\n",
                i + 1,
                ts.time,
                ts.seconds(),
                importance_label(ts.importance),
                ts.description
            ));
        }
        output.push('\n');
    }

    if !analysis.detailed_analysis.is_empty() {
        output.push_str("## Detailed Analysis\n\n");
        for section in &analysis.detailed_analysis {
            output.push_str(&format!("### {}\n\n", section.title));
            output.push_str(&format!("{}\n\n", section.content.trim()));
        }
    }

    if !analysis.key_insights.is_empty() {
        output.push_str("## Key Insights\n\n");
        for (i, insight) in analysis.key_insights.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, insight));
        }
        output.push('\n');
    }

    output
}
