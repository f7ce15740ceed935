//! Best-effort scalar recovery from unparseable metadata.
//!
//! When structured decoding fails outright, these scanners pull
//! individual `"field": value` occurrences straight out of the raw text,
//! independent of overall structural validity. Kept separate from the
//! main decode path so it cannot mask bugs there.

use regex::Regex;

use crate::domain::ModelMeta;

/// Recover what scalar fields we can from raw text.
///
/// Starts from a fully-initialized, schema-current empty record and
/// fills in whichever scalars are found. Never fails; worst case the
/// empty record comes back unchanged.
pub fn extract(raw: &str) -> ModelMeta {
    let mut meta = ModelMeta::empty();

    if let Some(v) = scan_string(raw, "version") {
        meta.version = v;
    }
    if let Some(v) = scan_string(raw, "description") {
        meta.description = v;
    }
    if let Some(v) = scan_string(raw, "author") {
        meta.author = v;
    }
    if let Some(v) = scan_string(raw, "installPath") {
        meta.install_path = v;
    }
    if let Some(v) = scan_string(raw, "relativePath") {
        meta.relative_path = v;
    }
    if let Some(v) = scan_string(raw, "previewImagePath") {
        meta.preview_image_path = v;
    }

    if let Some(v) = scan_integer(raw, "createdTime") {
        meta.created_time = v;
    }
    if let Some(v) = scan_integer(raw, "updatedTime") {
        meta.updated_time = v;
    }
    if let Some(v) = scan_integer(raw, "uploadTime") {
        meta.upload_time = v;
    }
    if let Some(v) = scan_integer(raw, "vertexCount") {
        meta.vertex_count = v.max(0) as u64;
    }
    if let Some(v) = scan_integer(raw, "triangleCount") {
        meta.triangle_count = v.max(0) as u64;
    }

    meta
}

/// Find the first `"name": "value"` occurrence and return the value.
///
/// Escapes inside the value are not interpreted; the scan stops at the
/// first unescaped quote, which is fidelity enough for recovery.
fn scan_string(raw: &str, field: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(field));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(raw)?.get(1)?.as_str();
    if value.is_empty() {
        return None;
    }
    Some(value.replace("\\\"", "\"").replace("\\\\", "\\"))
}

/// Find the first `"name": 123` occurrence and return the number.
fn scan_integer(raw: &str, field: &str) -> Option<i64> {
    let pattern = format!(r#""{}"\s*:\s*(-?\d+)"#, regex::escape(field));
    let re = Regex::new(&pattern).ok()?;
    re.captures(raw)?.get(1)?.as_str().parse().ok()
}
