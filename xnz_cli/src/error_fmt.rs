//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use xnz_core::error::{BuildError, XnzError};
    use xnz_sim::SimError;

    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or a detent CSV that does not match the quadrant.\nHow to fix: Edit the config file or recalibrate the detents, then rerun."
        );
    }

    if let Some(xe) = err.downcast_ref::<XnzError>() {
        return match xe {
            XnzError::UnsupportedHost(why) => format!(
                "What happened: The host is too old ({why}).\nLikely causes: Simulator or plugin SDK predates array properties.\nHow to fix: Update the simulator."
            ),
            XnzError::Binding(path) => format!(
                "What happened: A required host binding is missing ({path}).\nLikely causes: Wrong simulator version or an add-on that changed its interface.\nHow to fix: Re-run with --log-level=debug to see which integration was selected."
            ),
            XnzError::Config(msg) => format!(
                "What happened: Configuration could not be used ({msg}).\nLikely causes: Missing file or malformed TOML.\nHow to fix: Check the --config path and the file contents."
            ),
            XnzError::State(msg) => format!(
                "What happened: {msg}.\nLikely causes: Detents or shares produce a curve that steps backwards.\nHow to fix: Check [calibration] and [shares] in the config."
            ),
        };
    }

    if let Some(SimError::UnknownPreset(name)) = err.downcast_ref::<SimError>() {
        return format!(
            "What happened: Unknown aircraft preset '{name}'.\nHow to fix: Use one of laminar, toliss, ff320, md80, zibo, ixeg, turboprop."
        );
    }

    // String-based heuristics for errors coming from config files
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("detent csv must have headers") {
        return "Invalid headers in detent CSV. Expected 'detent,raw'.".to_string();
    }
    if lower.contains("trace csv must have headers") {
        return "Invalid headers in lever trace CSV. Expected 'left,right'.".to_string();
    }
    if lower.contains("unknown curve variant") {
        return format!(
            "What happened: {msg}.\nHow to fix: Use one of generic, nl-rev, w-rev, ddcl30, toliss."
        );
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 for config problems, 3 for curve checks, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use xnz_core::error::{BuildError, XnzError};
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<XnzError>() {
        Some(XnzError::Config(_)) => 2,
        Some(XnzError::State(_)) => 3,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use xnz_core::error::{BuildError, XnzError};
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<XnzError>() {
        Some(XnzError::Binding(_)) => "Binding",
        Some(XnzError::Config(_)) => "Config",
        Some(XnzError::State(_)) => "NonMonotonic",
        Some(XnzError::UnsupportedHost(_)) => "UnsupportedHost",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
