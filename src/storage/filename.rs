/// Reduces a client-supplied filename to a single safe path component.
///
/// Path separators become word breaks, whitespace runs collapse to `_`, and
/// only ASCII alphanumerics plus `_`, `.` and `-` survive. Leading and trailing
/// dots and underscores are stripped, so `..` and hidden-file names cannot
/// escape. The result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ordinary_names() {
        assert_eq!(sanitize_filename("cat.png"), "cat.png");
        assert_eq!(sanitize_filename("my-photo_01.JPG"), "my-photo_01.JPG");
    }

    #[test]
    fn strips_traversal_sequences() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\windows\\system.ini"), "windows_system.ini");
        assert_eq!(sanitize_filename("/abs/path.png"), "abs_path.png");
    }

    #[test]
    fn collapses_whitespace_and_drops_unsafe_characters() {
        assert_eq!(sanitize_filename("my  holiday\tpic.png"), "my_holiday_pic.png");
        assert_eq!(sanitize_filename("a;b|c$d.png"), "abcd.png");
        assert_eq!(sanitize_filename("café.png"), "caf.png");
    }

    #[test]
    fn may_reduce_to_nothing() {
        assert_eq!(sanitize_filename(".."), "");
        assert_eq!(sanitize_filename("日本語"), "");
    }
}
