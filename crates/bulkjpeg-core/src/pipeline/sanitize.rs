//! Output filename handling.
//!
//! Names arrive from uploads and from user edits, so anything that could be
//! read as a path separator or is otherwise illegal on common filesystems is
//! replaced with `_`.

use std::collections::HashSet;

/// Characters that are replaced by [`sanitize_filename`].
pub const FORBIDDEN_CHARS: [char; 9] = ['/', '\\', '*', '?', '<', '>', '|', '"', ':'];

/// Extension every output file carries.
pub const OUTPUT_EXTENSION: &str = ".jpg";

/// Suffix appended to the source stem to form the default output name.
pub const DEFAULT_NAME_SUFFIX: &str = "_fd";

/// Base name used when sanitizing leaves nothing behind.
pub const FALLBACK_BASE_NAME: &str = "image";

/// Replace every forbidden character with an underscore.
///
/// Total over all strings; the output has the same number of characters as
/// the input and case is untouched.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Split off the extension of a single path component.
///
/// The extension starts at the last `.` that is not part of a leading run of
/// dots, so `.hidden` has no extension and `a.tar.gz` has `.gz`.
fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(pos) => name.split_at(leading + pos),
        None => (name, ""),
    }
}

/// Default editable base name for an upload: `photo.PNG` becomes `photo_fd`.
pub fn default_output_base(source_name: &str) -> String {
    let safe = sanitize_filename(source_name).to_lowercase();
    let (stem, _ext) = split_extension(&safe);
    format!("{stem}{DEFAULT_NAME_SUFFIX}")
}

/// Resolve a (possibly user-edited) base name into the final output filename.
///
/// The sanitized base is used as typed, so `shot.jpg` becomes `shot.jpg.jpg`.
/// A base that is empty or only whitespace becomes `image`.
pub fn output_filename(base: &str) -> String {
    let safe = sanitize_filename(base);
    if safe.trim().is_empty() {
        return format!("{FALLBACK_BASE_NAME}{OUTPUT_EXTENSION}");
    }
    format!("{safe}{OUTPUT_EXTENSION}")
}

/// First name not yet in `used`: `name.jpg`, then `name_2.jpg`, `name_3.jpg`, ...
///
/// Shared by the archive entries and the files written to disk so both end up
/// with the same names.
pub fn unique_name(name: &str, used: &HashSet<String>) -> String {
    if !used.contains(name) {
        return name.to_string();
    }
    let stem = name.strip_suffix(OUTPUT_EXTENSION).unwrap_or(name);
    (2..)
        .map(|n| format!("{stem}_{n}{OUTPUT_EXTENSION}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
