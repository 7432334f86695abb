//! Message lookup for user-facing strings.
//!
//! No translation catalog is bundled, so lookups pass the message through
//! untouched and plural selection follows the English rule.

/// Translate a message.
pub fn tr(msg: &str) -> String {
    msg.to_string()
}

/// Translate a message with a plural form chosen by `n`.
pub fn ntr(singular: &str, plural: &str, n: usize) -> String {
    if n > 1 {
        plural.to_string()
    } else {
        singular.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_only_above_one() {
        assert_eq!(ntr("file", "files", 0), "file");
        assert_eq!(ntr("file", "files", 1), "file");
        assert_eq!(ntr("file", "files", 2), "files");
    }

    #[test]
    fn tr_is_identity() {
        assert_eq!(tr("_Edit"), "_Edit");
    }
}
