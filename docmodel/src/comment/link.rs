use crate::comment::{DocLink, LinkLookup};

/// Interpret bracketed link text as a doc link target.
///
/// Accepted forms, each optionally prefixed with `*`:
/// `Name`, `Recv.Name`, `pkg.Name`, `pkg.Recv.Name`,
/// `import/path.Name` and `import/path.Recv.Name`.
/// Returns `None` when the text names nothing known to `lookup`.
pub fn parse_doc_link(label: &str, lookup: &dyn LinkLookup) -> Option<DocLink> {
    let target = label.strip_prefix('*').unwrap_or(label);
    let (qualifier, name) = split_doc_name(target)?;

    let Some(qualifier) = qualifier else {
        return lookup
            .lookup_sym("", name)
            .then(|| DocLink::new("", "", name));
    };

    if is_ident(qualifier) && lookup.lookup_sym(qualifier, name) {
        return Some(DocLink::new("", qualifier, name));
    }

    let last_element = qualifier.rsplit('/').next().unwrap_or(qualifier);
    if last_element.contains('.') {
        if let Some((Some(pkg), recv)) = split_doc_name(qualifier) {
            if let Some(path) = resolve_import(pkg, lookup) {
                return Some(DocLink::new(path, recv, name));
            }
        }
    }

    resolve_import(qualifier, lookup).map(|path| DocLink::new(path, "", name))
}

/// Split `text` at its last dot into an optional qualifier and a name.
fn split_doc_name(text: &str) -> Option<(Option<&str>, &str)> {
    match text.rfind('.') {
        Some(i) => {
            let (before, name) = (&text[..i], &text[i + 1..]);
            (is_ident(name) && !before.is_empty()).then_some((Some(before), name))
        }
        None => is_ident(text).then_some((None, text)),
    }
}

/// A package qualifier: a short package name known to `lookup`, or a
/// literal import path.
fn resolve_import(text: &str, lookup: &dyn LinkLookup) -> Option<String> {
    if is_ident(text) {
        lookup.lookup_package(text).map(str::to_string)
    } else if is_import_path(text) {
        Some(text.to_string())
    } else {
        None
    }
}

fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_import_path(text: &str) -> bool {
    text.contains('/')
        && !text.starts_with('/')
        && !text.ends_with('/')
        && !text.contains("//")
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '/'))
}
