//! リンクソース。起動引数の中からスキームの一致する最初のリンクを拾い上げる。

use std::ffi::OsString;

use url::Url;

/// OS表現の引数列からUTF-8として解釈できるものだけを取り出す。
/// 起動リンクは必ず有効なUTF-8なので、変換できない引数は読み飛ばして構わない。
pub(crate) fn utf8_args<I>(args: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter().filter_map(|arg| arg.into_string().ok())
}

/// 引数列を先頭から走査し、設定済みスキームに一致する最初のリンクを返す。
///
/// 一致判定はスキームのみで行い、大文字小文字は区別しない。返す文字列は
/// 受け取った引数そのままで、URLとしての再整形はしない。
pub(crate) fn find_launch_link<I, S>(args: I, schemes: &[String]) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if schemes.is_empty() {
        return None;
    }

    args.into_iter().find_map(|arg| {
        let candidate = arg.as_ref().trim();
        // `--flag`系の引数はURLとして解釈させない。
        if candidate.is_empty() || candidate.starts_with('-') {
            return None;
        }
        let parsed = Url::parse(candidate).ok()?;
        let scheme = parsed.scheme().to_ascii_lowercase();
        schemes
            .iter()
            .any(|wanted| wanted == &scheme)
            .then(|| candidate.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemes(list: &[&str]) -> Vec<String> {
        list.iter().map(|scheme| scheme.to_string()).collect()
    }

    #[test]
    fn first_matching_argument_wins() {
        let args = ["myapp://ignored", "app://open?id=1", "app://open?id=2"];
        assert_eq!(
            find_launch_link(args, &schemes(&["app"])).as_deref(),
            Some("app://open?id=1")
        );
    }

    #[test]
    fn scheme_match_is_case_insensitive_but_link_is_verbatim() {
        let args = ["APP://Open?Id=1"];
        assert_eq!(
            find_launch_link(args, &schemes(&["app"])).as_deref(),
            Some("APP://Open?Id=1")
        );
    }

    #[test]
    fn flags_are_never_links() {
        let args = ["--app://open?id=1", "-v", "app://open?id=2"];
        assert_eq!(
            find_launch_link(args, &schemes(&["app"])).as_deref(),
            Some("app://open?id=2")
        );
    }

    #[test]
    fn windows_drive_paths_do_not_match() {
        let args = [r"C:\Users\demo\file.txt"];
        assert_eq!(find_launch_link(args, &schemes(&["app"])), None);
    }

    #[test]
    fn plain_arguments_are_skipped() {
        let args = ["/usr/bin/demo", "open", "app://open?id=1"];
        assert_eq!(
            find_launch_link(args, &schemes(&["app"])).as_deref(),
            Some("app://open?id=1")
        );
    }

    #[test]
    fn empty_scheme_list_yields_no_link() {
        let args = ["app://open?id=1"];
        assert_eq!(find_launch_link(args, &[]), None);
    }

    #[test]
    fn unrelated_scheme_yields_no_link() {
        let args = ["https://example.com/"];
        assert_eq!(find_launch_link(args, &schemes(&["app", "myapp"])), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from_vec(vec![0xFF, 0xFE]),
            OsString::from("app://open?id=1"),
        ];
        assert_eq!(
            find_launch_link(utf8_args(args), &schemes(&["app"])).as_deref(),
            Some("app://open?id=1")
        );
    }
}
