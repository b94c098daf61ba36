//! # Sidecar Matcher
//!
//! Pairs media file names with their JSON sidecars inside a single directory.
//!
//! The export corrupts sidecar names in two systematic ways, and both can
//! occur on the same file:
//!
//! 1. Edited copies carry a marker (`-edited`, `-bearbeitet`, `_edited`,
//!    `_bearbeitet`) before the extension, but share the sidecar of the
//!    original: `b-edited.jpg` → `b.json`.
//! 2. Duplicate counters move behind the extension in the sidecar name:
//!    `name(1).jpg` → `name.jpg(1).json`.
//!
//! Lookup is an exact, case-sensitive membership test against the names of
//! the directory. Candidates are tried for `.json` first, then `.JSON`; for
//! each casing every edit variant is tried, and for each variant the full
//! name form (`IMG_1.jpg.json`) comes before the base form (`IMG_1.json`).
//! The first hit wins.

use crate::models::MediaKind;
use std::collections::HashSet;

/// Edit markers, in the order they are tried
pub const EDIT_MARKERS: [&str; 4] = ["-bearbeitet.", "-edited.", "_bearbeitet.", "_edited."];

/// Sidecar extension casings, in the order they are tried
pub const SIDECAR_EXTENSIONS: [&str; 2] = [".json", ".JSON"];

const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "dng", "cr2"];
const VIDEO_EXTENSIONS: [&str; 6] = ["mov", "mp4", "mpg", "3gp", "gif", "avi"];

/// How a file name is treated by the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Media(MediaKind),
    /// Lookup target only, never a work item
    Sidecar,
    Unsupported,
}

/// Text after the last `.`, or `None` when the name has no dot
pub fn extension(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx + 1..])
}

/// Case-insensitive classification by extension
pub fn classify(file_name: &str) -> FileClass {
    let Some(ext) = extension(file_name) else {
        return FileClass::Unsupported;
    };
    let ext = ext.to_ascii_lowercase();

    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        FileClass::Media(MediaKind::Photo)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        FileClass::Media(MediaKind::Video)
    } else if ext == "json" {
        FileClass::Sidecar
    } else {
        FileClass::Unsupported
    }
}

/// A media file of the directory and the sidecar found for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedMedia {
    pub file_name: String,
    pub kind: MediaKind,
    pub sidecar: Option<String>,
}

/// A file name skipped because of its extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedName {
    pub file_name: String,
    /// Extension without the dot, empty when the name has none
    pub extension: String,
}

/// Result of matching one directory, both lists in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryMatch {
    pub media: Vec<MatchedMedia>,
    pub unsupported: Vec<UnsupportedName>,
}

/// Classify every name of a directory and find sidecars for the media.
///
/// `file_names` must be the plain names (no directory part) of all regular
/// files in the directory.
pub fn match_directory<S: AsRef<str>>(file_names: &[S]) -> DirectoryMatch {
    let siblings: HashSet<&str> = file_names.iter().map(AsRef::as_ref).collect();
    let mut result = DirectoryMatch::default();

    for name in file_names.iter().map(AsRef::as_ref) {
        match classify(name) {
            FileClass::Media(kind) => result.media.push(MatchedMedia {
                file_name: name.to_string(),
                kind,
                sidecar: find_sidecar(name, &siblings),
            }),
            FileClass::Sidecar => {}
            FileClass::Unsupported => result.unsupported.push(UnsupportedName {
                file_name: name.to_string(),
                extension: extension(name).unwrap_or_default().to_string(),
            }),
        }
    }

    result
}

/// First candidate of [`sidecar_candidates`] present in `siblings`
pub fn find_sidecar(file_name: &str, siblings: &HashSet<&str>) -> Option<String> {
    sidecar_candidates(file_name)
        .into_iter()
        .find(|candidate| siblings.contains(candidate.as_str()))
}

/// Every sidecar name that may belong to `file_name`, in lookup order.
pub fn sidecar_candidates(file_name: &str) -> Vec<String> {
    let variants = edit_variants(file_name);
    let mut candidates = Vec::with_capacity(SIDECAR_EXTENSIONS.len() * variants.len() * 2);

    for casing in SIDECAR_EXTENSIONS {
        for variant in &variants {
            let (stem, ext) = split_extension(variant);
            let full = match relocate_counter(stem, ext) {
                Some(relocated) => format!("{}{}", relocated, casing),
                None => format!("{}{}", variant, casing),
            };
            let base = format!("{}{}", stem, casing);

            for candidate in [full, base] {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
    }

    candidates
}

/// Names with edit markers replaced by `.`.
///
/// A name carrying no marker yields itself once. A marked name yields one
/// variant per marker it contains, so the marked form is never looked up.
fn edit_variants(file_name: &str) -> Vec<String> {
    let variants: Vec<String> = EDIT_MARKERS
        .iter()
        .filter(|marker| file_name.contains(*marker))
        .map(|marker| file_name.replace(marker, "."))
        .collect();

    if variants.is_empty() {
        vec![file_name.to_string()]
    } else {
        variants
    }
}

/// Split at the last dot into stem and `.ext` (dot included)
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) => file_name.split_at(idx),
        None => (file_name, ""),
    }
}

/// `name(1)` + `.jpg` → `name.jpg(1)`; `None` unless the stem ends with a
/// bracketed counter
fn relocate_counter(stem: &str, ext: &str) -> Option<String> {
    if !stem.ends_with(')') {
        return None;
    }
    let open = stem.rfind('(')?;
    let (prefix, counter) = stem.split_at(open);
    Some(format!("{}{}{}", prefix, ext, counter))
}
