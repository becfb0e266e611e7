use serde_json::Value;
use tracing::debug;

use crate::data::ParsedOutput;
use crate::error::GenerationError;

/// Interprets raw tool output.
///
/// Output that is not JSON at all is taken verbatim as test code with no
/// metadata. A JSON reply must carry the generated code as a string
/// `result`; any other JSON (error replies, `null`, scalars) is a tool
/// failure so nothing gets written.
///
/// # Errors
/// * `GenerationError::ExternalToolFailure` - JSON reply without result text
pub fn parse_output(raw: &str) -> Result<ParsedOutput, GenerationError> {
    let reply: Value = match serde_json::from_str(raw) {
        Ok(reply) => reply,
        Err(e) => {
            debug!("Tool output is not structured ({}), using it as plain text", e);
            return Ok(ParsedOutput::plain(raw));
        }
    };

    let Some(test_code) = reply.get("result").and_then(Value::as_str) else {
        let detail = reply
            .get("subtype")
            .and_then(Value::as_str)
            .map(|subtype| format!(" (subtype: {})", subtype))
            .unwrap_or_default();
        return Err(GenerationError::ExternalToolFailure(format!(
            "Tool reply has no result text{}",
            detail
        )));
    };

    Ok(ParsedOutput {
        test_code: test_code.to_string(),
        session_id: reply
            .get("session_id")
            .and_then(Value::as_str)
            .map(str::to_string),
        cost: reply.get("total_cost_usd").and_then(Value::as_f64),
        duration_ms: reply.get("duration_ms").and_then(Value::as_f64),
    })
}
