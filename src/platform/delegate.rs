//! # macOS Event Delegator
//!
//! macOS does not pass a `hutt://` URL in `argv`. It sends the handler app
//! a `GetURL` Apple Event instead. The handler app is therefore a tiny
//! AppleScript applet whose `on open location` handler re-runs
//! `hutt-open` as a subprocess with the URL as its only argument.
//!
//! The only thing that can go wrong is quoting. The URL is quoted at event
//! time with AppleScript's `quoted form of`, which is POSIX single-quote
//! quoting: `&`, `?`, `;`, spaces and `'` all reach us as one argument.
//! The shim path is fixed when the applet is generated and is embedded as
//! an AppleScript string literal, quoted the same way at runtime.

use std::path::Path;

/// AppleScript source for the URL handler applet.
///
/// Compile it with `osacompile -o "Hutt Opener.app"` and register `hutt`
/// under `CFBundleURLTypes` in the bundle's `Info.plist`.
pub fn applet_source(shim: &Path) -> String {
    let shim = applescript_string(&shim.to_string_lossy());
    format!(
        r#"-- Forwards hutt:// URLs to hutt-open.
on open location this_URL
	try
		do shell script (quoted form of {shim}) & " " & (quoted form of this_URL)
	end try
end open location

on run
end run
"#
    )
}

/// The shell command the applet runs for `url`, as `/bin/sh` will see it.
pub fn forward_command_line(shim: &Path, url: &str) -> String {
    format!("{} {}", shell_quote(&shim.to_string_lossy()), shell_quote(url))
}

/// POSIX single-quote quoting, identical to AppleScript's `quoted form of`.
pub fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// An AppleScript string literal: double-quoted, `\` and `"` escaped.
pub fn applescript_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_shell_quote_keeps_query_separators_together() {
        assert_eq!(
            shell_quote("hutt://compose?to=a@b.com&subject=Hi there"),
            "'hutt://compose?to=a@b.com&subject=Hi there'"
        );
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(
            shell_quote("hutt://search/it's"),
            r#"'hutt://search/it'\''s'"#
        );
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_applescript_string_escapes() {
        assert_eq!(applescript_string(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_applet_embeds_shim_and_quotes_url_at_runtime() {
        let shim = "/Applications/Hutt Opener.app/Contents/MacOS/hutt-open";
        let source = applet_source(&PathBuf::from(shim));
        assert!(source.contains("on open location this_URL"));
        assert!(source.contains(&format!(
            r#"do shell script (quoted form of "{shim}") & " " & (quoted form of this_URL)"#
        )));
    }

    #[test]
    fn test_forward_command_line() {
        assert_eq!(
            forward_command_line(
                &PathBuf::from("/usr/local/bin/hutt-open"),
                "hutt://compose?to=x@y.com&subject=a b"
            ),
            "'/usr/local/bin/hutt-open' 'hutt://compose?to=x@y.com&subject=a b'"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_quoted_url_survives_a_real_shell_as_one_argument() {
        let url = "hutt://compose?to=o'brien@x.com&subject=Tea & cake; now";
        let script = format!("printf '%s\\n' \"$#\" {}", shell_quote(url));
        let out = std::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(format!("set -- {}; {}", shell_quote(url), script))
            .output()
            .unwrap();
        let stdout = String::from_utf8(out.stdout).unwrap();
        assert_eq!(stdout, format!("1\n{url}\n"));
    }
}
