//! URL segment helpers: query stripping, file-name and extension extraction.
//!
//! Each helper is total. Malformed input falls back to the unchanged string or
//! an empty segment, and every result is written to the trace.

use crate::trace::TraceLog;

/// Drop everything from the first `?` on.
pub fn remove_url_params(url: &str, trace: &mut TraceLog) -> String {
    match url.split_once('?') {
        Some((path, _)) => trace.record("remove-url-params", path.to_string()),
        None => trace.record("remove-url-params-noparams", url.to_string()),
    }
}

/// Last `/`-separated segment that contains a `.` and no `?`.
///
/// Returns an empty string when no segment qualifies; Liferay-style links
/// such as `/documents/37101/0/report.pdf/3f2a` carry the file name before a
/// trailing UUID segment, which is why the scan goes from the end.
pub fn extract_file_name(url: &str, trace: &mut TraceLog) -> String {
    match url
        .split('/')
        .rev()
        .find(|segment| segment.contains('.') && !segment.contains('?'))
    {
        Some(segment) => trace.record("extract-file-name", segment.to_string()),
        None => trace.record("extract-file-name-fallback", String::new()),
    }
}

/// Extension from the last `.`, with the dot turned into `-` (`.pdf` → `-pdf`).
pub fn get_extension(filename: &str, trace: &mut TraceLog) -> String {
    match filename.rfind('.') {
        Some(idx) => trace.record("get-extension", format!("-{}", &filename[idx + 1..])),
        None => trace.record("get-extension-noext", String::new()),
    }
}

/// File name without its last extension.
pub fn strip_extension(filename: &str) -> &str {
    filename
        .rfind('.')
        .map_or(filename, |idx| &filename[..idx])
}

/// Repair a trailing `2` left behind by a mangled `%28...%29` in the source
/// pages: `name2` becomes `name282-29`. Nothing else is touched.
pub fn adjust_file_name(name: &str, trace: &mut TraceLog) -> String {
    let adjusted = match name.strip_suffix('2') {
        Some(stem) => format!("{stem}282-29"),
        None => name.to_string(),
    };
    trace.record("adjust-file-name", adjusted)
}
