//! Output file naming.
//!
//! Every derived output is named from the primary output's name by inserting a
//! suffix between the stem and the extension:
//!
//! - `photo.jpg` + `-small` → `photo-small.jpg`
//! - `out/photo.v2.png` + `-t` → `out/photo.v2-t.png`
//! - `noext` + `-small` → `noext-small`
//!
//! The extension is everything from the last `.` of the final path component,
//! so directory names containing dots never split the name.

/// Split a name into `(base, extension)` where `extension` keeps its leading dot.
fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match name[file_start..].rfind('.') {
        Some(dot) => name.split_at(file_start + dot),
        None => (name, ""),
    }
}

/// Insert `suffix` before the extension of `name`.
pub fn derive_name(name: &str, suffix: &str) -> String {
    let (base, ext) = split_extension(name);
    format!("{base}{suffix}{ext}")
}
