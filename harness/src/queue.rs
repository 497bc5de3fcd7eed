use crate::{backend::Backend, config::RunConfig};

/// Creates the topic and its line with empty values. Either key already
/// existing is the normal case, so failures are only logged.
pub async fn prepare_queue<B: Backend>(backend: &mut B, config: &RunConfig) {
    let line_key = config.read_key();
    for key in [config.write_key(), line_key.as_str()] {
        if let Err(e) = backend.add(key, "").await {
            tracing::warn!("add error: {} {}", key, e);
        }
    }
}
