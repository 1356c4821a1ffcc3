use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use docmodel::{Config, Document, Package, PackageSet};
use render::{FormatKind, Renderer};

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Import path of the package the comment belongs to.
    /// Defaults to the first `[[package]]` table.
    #[serde(default)]
    pub current: Option<String>,

    /// Prefix stripped from cross-package link paths.
    #[serde(default)]
    pub module_root: String,

    /// Heading level for headers in the comment.
    #[serde(default = "default_level")]
    pub level: usize,

    /// Output format name. Defaults to "github".
    #[serde(default = "default_format")]
    pub format: String,

    /// Symbol tables visible to the comment.
    #[serde(default, rename = "package")]
    pub packages: Vec<Package>,

    /// Expected rendered output (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Expected block kinds in key order, e.g. `["paragraph", "code"]`.
    #[serde(default)]
    pub expect_blocks: Option<Vec<String>>,

    /// Expected first-sentence summary.
    #[serde(default)]
    pub expect_summary: Option<String>,
}

fn default_level() -> usize {
    1
}

fn default_format() -> String {
    "github".to_string()
}

/// Parse a `.test.md` file into its TOML config and comment text.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    let Some(after_open) = content.strip_prefix("---") else {
        return Err("missing opening --- frontmatter delimiter".into());
    };
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let outcome = check(&config, source);
    TestResult {
        path: path.to_path_buf(),
        description: config.description,
        outcome,
    }
}

fn check(config: &TestConfig, source: &str) -> TestOutcome {
    let kind: FormatKind = match config.format.parse() {
        Ok(k) => k,
        Err(e) => return TestOutcome::Fail(e.to_string()),
    };

    let packages = PackageSet::new(config.packages.clone());
    let current = match &config.current {
        Some(import_path) => match packages.get(import_path) {
            Some(p) => p.clone(),
            None => {
                return TestOutcome::Fail(format!(
                    "current package '{}' has no [[package]] table",
                    import_path
                ));
            }
        },
        None => packages.packages().first().cloned().unwrap_or_default(),
    };

    let settings = Config::new(config.level, config.module_root.clone());
    let doc = Document::from_text(&settings, &current, &packages, source);

    if let Some(expected) = &config.expect_blocks {
        let mut blocks: Vec<_> = doc.blocks().iter().collect();
        blocks.sort_by_key(|b| b.key);
        let actual: Vec<&str> = blocks.iter().map(|b| b.kind.name()).collect();
        if actual != *expected {
            return TestOutcome::Fail(format!(
                "block kinds mismatch:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ));
        }
    }

    if let Some(expected) = &config.expect_summary {
        let actual = doc.summary().unwrap_or_default();
        if actual != *expected {
            return TestOutcome::Fail(format!(
                "summary mismatch:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ));
        }
    }

    if let Some(expected) = &config.expect_output {
        let actual = match Renderer::from_kind(kind).render(&doc) {
            Ok(text) => text,
            Err(e) => return TestOutcome::Fail(format!("render error: {}", e)),
        };
        let expected = expected.trim();
        let actual = actual.trim();
        if actual != expected {
            return TestOutcome::Fail(format!(
                "output mismatch:\n--- expected ---\n{}\n--- actual ---\n{}",
                expected, actual
            ));
        }
    }

    TestOutcome::Pass
}

/// `.test.md` files under `root`, grouped by the subfolder they live in.
/// Files directly in `root` belong to the "" category.
fn discover(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut found: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    walk(root, root, &mut found);
    for files in found.values_mut() {
        files.sort();
    }
    found
}

fn walk(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::warn!("cannot read directory {}", dir.display());
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            walk(&path, root, out);
            continue;
        }
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".test.md"));
        if is_test {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// Print the categories found under `path`.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// Keep the categories equal to, or nested under, one of `requested`.
fn select<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }

    let mut selected = BTreeMap::new();
    for wanted in requested {
        let wanted = wanted.trim_matches('/');
        let nested = format!("{}/", wanted);
        let before = selected.len();
        for (category, files) in all {
            if category == wanted || category.starts_with(&nested) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            let available: Vec<&str> = all.keys().map(|k| category_label(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                wanted,
                available.join(", ")
            );
        }
    }
    selected
}

struct Palette {
    no_color: bool,
}

impl Palette {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }
}

fn label(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("?")
    })
}

/// Run every `.test.md` file under `path` (or `path` itself when it is a
/// file), optionally restricted to `categories`. Returns the process exit
/// code: 0 when everything passed.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let palette = Palette { no_color };

    let all = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover(path)
    };
    if all.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    let selected = if path.is_file() {
        select(&all, &[])
    } else {
        select(&all, categories)
    };
    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let show_headers = !path.is_file();
    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &selected {
        if show_headers {
            eprintln!();
            eprintln!("{}", palette.bold(category_label(category)));
        }
        for file in *files {
            let result = run_single_test(file);
            match result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", palette.pass(), label(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", palette.fail(), label(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for result in &failures {
            eprintln!();
            eprintln!("  --- {} ---", result.path.display());
            if let TestOutcome::Fail(reason) = &result.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            palette.paint("32", "ok"),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            palette.paint("31", "FAILED"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}
