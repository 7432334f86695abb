use std::path::Path;

use crate::i18n::tr;
use crate::model::Selection;

/// En space, en dash, en space
const TITLE_SEPARATOR: &str = "\u{2002}\u{2013}\u{2002}";

/// Window title of the editor dialog for `selection`.
pub fn window_title(selection: &Selection, home: Option<&Path>) -> String {
    let generic = tr("Annotations");
    match selection.entries() {
        [] => generic,
        [only] => format!("{}{}{}", shown_path(&only.path, home), TITLE_SEPARATOR, generic),
        _ => tr("Annotations shared between multiple files"),
    }
}

/// Path as shown to the user, with home directories abbreviated:
/// `$HOME/doc.md` -> `~/doc.md`, `/home/lisa/doc.md` -> `~lisa/doc.md`,
/// `/root/doc.md` -> `~root/doc.md`.
pub fn shown_path(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home.filter(|h| !h.as_os_str().is_empty())
        && let Ok(rest) = path.strip_prefix(home)
    {
        return tilde_join("~", rest);
    }
    if let Ok(rest) = path.strip_prefix("/home") {
        let mut components = rest.components();
        if let Some(user) = components.next() {
            let user = user.as_os_str().to_string_lossy();
            return tilde_join(&format!("~{}", user), components.as_path());
        }
    }
    if let Ok(rest) = path.strip_prefix("/root") {
        return tilde_join("~root", rest);
    }
    path.to_string_lossy().into_owned()
}

fn tilde_join(prefix: &str, rest: &Path) -> String {
    if rest.as_os_str().is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, rest.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;

    const HOME: &str = "/home/me";

    fn shown(path: &str) -> String {
        shown_path(Path::new(path), Some(Path::new(HOME)))
    }

    #[test]
    fn abbreviates_current_user() {
        assert_eq!(shown("/home/me/doc.md"), "~/doc.md");
        assert_eq!(shown("/home/me/Videos/clip.mkv"), "~/Videos/clip.mkv");
        assert_eq!(shown("/home/me"), "~");
    }

    #[test]
    fn abbreviates_other_users_and_root() {
        assert_eq!(shown("/home/john/doc.md"), "~john/doc.md");
        assert_eq!(shown("/home/lisa"), "~lisa");
        assert_eq!(shown("/root/Videos"), "~root/Videos");
        assert_eq!(shown("/root"), "~root");
    }

    #[test]
    fn leaves_other_paths_alone() {
        assert_eq!(shown("/etc/fstab"), "/etc/fstab");
        assert_eq!(shown("/home"), "/home");
        assert_eq!(shown("/home2/x"), "/home2/x");
        assert_eq!(shown("/rootfs/x"), "/rootfs/x");
        // Sibling of $HOME sharing a string prefix is another user
        assert_eq!(shown("/home/me2/x"), "~me2/x");
    }

    #[test]
    fn root_home_collapses_to_plain_tilde() {
        let shown = shown_path(Path::new("/root/notes"), Some(Path::new("/root")));
        assert_eq!(shown, "~/notes");
    }

    #[test]
    fn titles() {
        let home = Some(Path::new(HOME));
        assert_eq!(window_title(&Selection::default(), home), "Annotations");
        assert_eq!(
            window_title(&Selection::single(Entry::file("/home/me/a.txt")), home),
            "~/a.txt\u{2002}\u{2013}\u{2002}Annotations"
        );
        let many = Selection::new(vec![Entry::file("/a"), Entry::file("/b")]);
        assert_eq!(
            window_title(&many, home),
            "Annotations shared between multiple files"
        );
    }
}
