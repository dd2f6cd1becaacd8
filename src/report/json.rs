use crate::report::RunSummary;

pub const TOOL_NAME: &str = "kira-rotamer-eval";

pub fn render_summary_json(summary: &RunSummary) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(summary)?;
    out.push('\n');
    Ok(out)
}
