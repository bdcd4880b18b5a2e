use reqwest::Url;
use serde_json::Value;

/// Builds the `/view` URL of the first image found in a finished history
/// entry.
///
/// Output nodes are scanned in document order and the first with a
/// non-empty `images` array whose first image carries a `filename` wins.
/// `subfolder` defaults to `""` and `type` to `"output"`.
#[must_use]
pub fn extract_image_url(base_url: &Url, entry: &Value) -> Option<String> {
    let outputs = entry.get("outputs")?.as_object()?;

    let (filename, image) = outputs.values().find_map(|node| {
        let image = node.get("images")?.as_array()?.first()?;
        let filename = image.get("filename")?.as_str()?;
        Some((filename, image))
    })?;

    let subfolder = image.get("subfolder").and_then(Value::as_str).unwrap_or("");
    let kind = image.get("type").and_then(Value::as_str).unwrap_or("output");

    let mut url = base_url.join("view").ok()?;
    url.query_pairs_mut()
        .append_pair("filename", filename)
        .append_pair("subfolder", subfolder)
        .append_pair("type", kind);
    Some(url.to_string())
}
