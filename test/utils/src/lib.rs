use std::env;
use std::fs;
use std::path;

use serde_json::json;
use uuid::Uuid;

/// Creates an empty, uniquely named directory under the system temp dir.
pub fn temp_dir() -> path::PathBuf {
    let dir = env::temp_dir().join(format!("chatgui-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    return dir;
}

/// Builds an OpenAI compatible streamed completion body, one `data:` line per
/// chunk, terminated with `[DONE]`.
pub fn completion_stream_body(chunks: &[&str]) -> String {
    let mut lines = chunks
        .iter()
        .map(|chunk| {
            let payload = json!({
                "choices": [{ "index": 0, "delta": { "content": chunk } }]
            });
            return format!("data: {payload}\n");
        })
        .collect::<Vec<String>>();

    lines.push("data: [DONE]\n".to_string());
    return lines.join("\n");
}

pub fn settings_fixture() -> &'static str {
    return r#"
{
    "sidebar_show": true,
    "gpt_model_default": "gpt-4",
    "temperature": {
        "min_value": 0.0,
        "max_value": 1.0,
        "value": 0.5,
        "step": 0.1
    },
    "bucket_name": "chat-transcripts"
}
"#
    .trim();
}
