//! Argument list for copying the photo-taken timestamp out of a sidecar.

use std::ffi::OsString;
use std::path::Path;

/// Build the tool arguments that copy `PhotoTakenTimeTimestamp` from
/// `sidecar` into the original-date tag and the filesystem modify date of
/// `target`, rewriting `target` in place.
///
/// Order matters: `-dateFormat` must precede the tag copies and the target
/// path is always last. Paths are passed through byte for byte.
pub fn timestamp_arguments(sidecar: &Path, target: &Path) -> Vec<OsString> {
    vec![
        "-dateFormat".into(),
        "%s".into(),
        "-tagsfromfile".into(),
        sidecar.as_os_str().to_owned(),
        "-DateTimeOriginal<PhotoTakenTimeTimestamp".into(),
        "-FileModifyDate<PhotoTakenTimeTimestamp".into(),
        "-overwrite_original".into(),
        "-F".into(),
        target.as_os_str().to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_argument_order() {
        let args = timestamp_arguments(
            Path::new("/in/2019/IMG_1.jpg.json"),
            Path::new("/out/2019/IMG_1.jpg"),
        );

        let expected: Vec<OsString> = [
            "-dateFormat",
            "%s",
            "-tagsfromfile",
            "/in/2019/IMG_1.jpg.json",
            "-DateTimeOriginal<PhotoTakenTimeTimestamp",
            "-FileModifyDate<PhotoTakenTimeTimestamp",
            "-overwrite_original",
            "-F",
            "/out/2019/IMG_1.jpg",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_paths_with_spaces_stay_single_arguments() {
        let args = timestamp_arguments(
            Path::new("/in/Photos from 2019/a b.json"),
            Path::new("/out/Photos from 2019/a b.jpg"),
        );

        assert_eq!(args.len(), 9);
        assert_eq!(args[3], OsString::from("/in/Photos from 2019/a b.json"));
        assert_eq!(args.last(), Some(&OsString::from("/out/Photos from 2019/a b.jpg")));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_are_kept_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let folder = std::ffi::OsStr::from_bytes(b"/in/Fotos \xff 2019");
        let sidecar = Path::new(folder).join("a.json");
        let target = Path::new("/out").join(std::ffi::OsStr::from_bytes(b"\xff.jpg"));

        let args = timestamp_arguments(&sidecar, &target);
        assert_eq!(args[3].as_bytes(), b"/in/Fotos \xff 2019/a.json");
        assert_eq!(args[8].as_bytes(), b"/out/\xff.jpg");
    }
}
