use serde_json::Value;

pub const NO_RESPONSE_FALLBACK: &str = "No response received";

/// Reads `outputs[0].outputs[0].results.message.data.text` from a run reply.
pub fn reply_text(reply: &Value) -> Option<&str> {
    reply
        .get("outputs")?
        .get(0)?
        .get("outputs")?
        .get(0)?
        .get("results")?
        .get("message")?
        .get("data")?
        .get("text")?
        .as_str()
}

pub fn reply_text_or_fallback(reply: &Value) -> String {
    reply_text(reply)
        .unwrap_or(NO_RESPONSE_FALLBACK)
        .to_string()
}
