use docmodel::comment::DocLink;
use docmodel::resolve::{anchor, strip_module_root};
use docmodel::{Package, PackageSet, Resolution, Resolver, SymbolKind};

const ROOT: &str = "example.com/mod/";

fn current() -> Package {
    Package::new("example.com/mod/cur")
        .with_const(["A", "B"])
        .with_var(["Debug"])
        .with_func("", "New")
        .with_func("T", "Method")
        .with_type("T")
}

fn other() -> Package {
    Package::new("example.com/mod/pkg")
        .with_func("Recv", "Name")
        .with_type("Recv")
        .with_const(["Shared"])
        .with_type("Shared")
}

fn packages() -> PackageSet {
    PackageSet::new(vec![current(), other()])
}

fn resolve(link: DocLink) -> Resolution {
    let cur = current();
    let set = packages();
    Resolver::new(&cur, &set, ROOT).resolve(&link)
}

#[test]
fn same_package_type() {
    let r = resolve(DocLink::new("", "", "T"));
    assert_eq!(r.kind, Some(SymbolKind::Type));
    assert_eq!(r.path, "");
    assert_eq!(r.anchor, "type T");
}

#[test]
fn same_package_kinds() {
    assert_eq!(resolve(DocLink::new("", "", "B")).anchor, "const B");
    assert_eq!(resolve(DocLink::new("", "", "Debug")).anchor, "var Debug");
    assert_eq!(resolve(DocLink::new("", "", "New")).anchor, "func New");
    assert_eq!(resolve(DocLink::new("", "T", "Method")).anchor, "func T Method");
}

#[test]
fn cross_package_method() {
    let r = resolve(DocLink::new("example.com/mod/pkg", "Recv", "Name"));
    assert_eq!(r.kind, Some(SymbolKind::Func));
    assert_eq!(r.path, "pkg");
    assert_eq!(r.anchor, "func Recv Name");
}

#[test]
fn unresolved_symbol() {
    let r = resolve(DocLink::new("", "", "Missing"));
    assert_eq!(r, Resolution::unresolved());
    assert!(!r.is_resolved());

    let r = resolve(DocLink::new("example.com/mod/pkg", "", "Missing"));
    assert_eq!(r.kind, None);
    assert_eq!(r.path, "");
    assert_eq!(r.anchor, "");
}

#[test]
fn unknown_import_path() {
    let r = resolve(DocLink::new("example.com/elsewhere", "", "T"));
    assert_eq!(r.kind, None);
}

#[test]
fn const_takes_precedence_over_type() {
    let r = resolve(DocLink::new("example.com/mod/pkg", "", "Shared"));
    assert_eq!(r.kind, Some(SymbolKind::Const));
    assert_eq!(r.anchor, "const Shared");
}

#[test]
fn method_requires_matching_receiver() {
    // Name exists only as a method of Recv.
    let r = resolve(DocLink::new("example.com/mod/pkg", "", "Name"));
    assert_eq!(r.kind, None);
    let r = resolve(DocLink::new("example.com/mod/pkg", "Other", "Name"));
    assert_eq!(r.kind, None);
}

#[test]
fn explicit_self_reference_is_cross_package() {
    let r = resolve(DocLink::new("example.com/mod/cur", "", "T"));
    assert_eq!(r.kind, Some(SymbolKind::Type));
    assert_eq!(r.path, "cur");
    assert_eq!(r.anchor, "type T");
}

#[test]
fn shared_import_path_needs_the_symbol() {
    let stale = Package::new("example.com/mod/dup").with_type("Old");
    let fresh = Package::new("example.com/mod/dup").with_func("", "Fresh");
    let cur = current();
    let set = PackageSet::new(vec![stale, fresh.clone()]);
    let resolver = Resolver::new(&cur, &set, ROOT);

    let link = DocLink::new("example.com/mod/dup", "", "Fresh");
    assert_eq!(resolver.target_package(&link), Some(&fresh));
    let r = resolver.resolve(&link);
    assert_eq!(r.anchor, "func Fresh");
    assert_eq!(r.path, "dup");
}

#[test]
fn module_root_removed_once() {
    assert_eq!(strip_module_root("example.com/mod/pkg", ROOT), "pkg");
    assert_eq!(strip_module_root("example.com/mod/a/example.com/mod/b", ROOT), "a/example.com/mod/b");
    assert_eq!(strip_module_root("other.org/x", ROOT), "other.org/x");
    assert_eq!(strip_module_root("other.org/x", ""), "other.org/x");
}

#[test]
fn anchor_omits_empty_receiver() {
    assert_eq!(anchor(SymbolKind::Type, "", "T"), "type T");
    assert_eq!(anchor(SymbolKind::Func, "R", "M"), "func R M");
}

#[test]
fn package_short_names() {
    assert_eq!(other().short_name(), "pkg");
    let mut named = other();
    named.name = "alias".into();
    assert_eq!(named.short_name(), "alias");
}

#[test]
fn metadata_from_toml() {
    let source = r#"
[[package]]
import_path = "example.com/mod/pkg"
consts = [{ names = ["A", "B"] }]
funcs = [{ name = "Name", recv = "Recv" }, { name = "New" }]
types = [{ name = "Recv" }]

[[package]]
name = "other"
import_path = "example.com/mod/v2"
"#;
    let set = PackageSet::from_toml(source, 0).expect("metadata should load");
    assert_eq!(set.len(), 2);
    let pkg = set.get("example.com/mod/pkg").expect("package present");
    assert!(pkg.has_symbol("Recv", "Name"));
    assert!(pkg.has_symbol("", "New"));
    assert!(pkg.has_symbol("", "B"));
    assert!(!pkg.has_symbol("", "Name"));
    assert_eq!(set.by_name("other").map(|p| p.import_path.as_str()), Some("example.com/mod/v2"));
}

#[test]
fn metadata_errors() {
    let err = PackageSet::from_toml("[[package]]\nimport_path = \n", 7).unwrap_err();
    assert_eq!(err.file_id, 7);
    assert!(err.span.is_some(), "toml errors carry a span");

    let err = PackageSet::from_toml("[[package]]\nimport_path = \"\"\n", 0).unwrap_err();
    assert!(err.to_string().contains("empty import_path"), "got: {}", err);
    let diagnostic = err.to_diagnostic();
    assert!(diagnostic.labels.is_empty());
}
