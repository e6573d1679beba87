use serde::Serialize;

use crate::error::ExtractError;

/// Renders `items` as a pretty-printed JSON array.
///
/// serde_json writes non-ASCII characters verbatim, so Hebrew text stays
/// readable in the output.
pub fn render_json<T: Serialize>(items: &[T]) -> Result<Vec<u8>, ExtractError> {
    let mut buf = serde_json::to_vec_pretty(items)?;
    buf.push(b'\n');
    Ok(buf)
}
