mod test_runner;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use docmodel::{Config, Document, Package, PackageSet};
use render::{FormatKind, Renderer};

const SUBCOMMANDS: &[&str] = &["render", "blocks", "test", "help"];

/// Options whose value is the following argument.
const VALUE_OPTIONS: &[&str] = &[
    "-p",
    "--packages",
    "--package",
    "--config",
    "--module-root",
    "--go-mod",
    "--level",
    "-f",
    "--format",
    "-c",
    "--category",
];

#[derive(Parser)]
#[command(
    name = "docmodel",
    version,
    about = "Convert documentation comments into rendered markdown"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log resolution details (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a documentation comment as markdown
    Render(DocArgs),

    /// Dump the block model built from a documentation comment
    Blocks(DocArgs),

    /// Run .test.md golden files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct DocArgs {
    /// Comment text file, or - to read stdin
    file: String,

    /// TOML file with [[package]] symbol tables
    #[arg(short, long)]
    packages: Option<PathBuf>,

    /// Import path of the package the comment belongs to
    /// (defaults to the first package in --packages)
    #[arg(long)]
    package: Option<String>,

    /// TOML file with `level` and `module_root` settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Import path prefix stripped from cross-package links
    #[arg(long)]
    module_root: Option<String>,

    /// Read the module root from a go.mod file
    #[arg(long, conflicts_with = "module_root")]
    go_mod: Option<PathBuf>,

    /// Heading level for headers inside the comment
    #[arg(long)]
    level: Option<usize>,

    /// Output format: github, azure-devops or plain
    #[arg(short, long, default_value = "github")]
    format: String,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let args = with_default_subcommand(std::env::args().collect());
    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    match cli.command {
        Command::Render(doc_args) => {
            let doc = build(&doc_args, cli.no_color);
            let kind = parse_format(&doc_args.format);
            match Renderer::from_kind(kind).render(&doc) {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
        }
        Command::Blocks(doc_args) => {
            let doc = build(&doc_args, cli.no_color);
            println!("{:#?}", doc);
        }
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// `docmodel [options] file.txt` works like `docmodel render [options] file.txt`.
fn with_default_subcommand(mut args: Vec<String>) -> Vec<String> {
    let mut rest = args.iter().skip(1);
    let mut first_positional = None;
    while let Some(arg) = rest.next() {
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            rest.next();
        } else if arg == "-" || !arg.starts_with('-') {
            first_positional = Some(arg.as_str());
            break;
        }
    }
    let wants_render = match first_positional {
        Some(arg) => !SUBCOMMANDS.contains(&arg),
        None => false,
    };
    if wants_render {
        args.insert(1.min(args.len()), "render".to_string());
    }
    args
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn parse_format(name: &str) -> FormatKind {
    match name.parse() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    }
}

fn read_input(file: &str) -> String {
    let result = if file == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s).map(|_| s)
    } else {
        std::fs::read_to_string(file)
    };
    match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    }
}

fn load_config(args: &DocArgs) -> Config {
    let mut config = match &args.config {
        Some(path) => match Config::load_from_path(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(root) = &args.module_root {
        config.module_root = root.clone();
    }
    if let Some(go_mod) = &args.go_mod {
        let contents = read_input(&go_mod.to_string_lossy());
        match Config::module_from_go_mod(&contents) {
            Some(root) => config.module_root = root,
            None => {
                eprintln!("error: no module directive in '{}'", go_mod.display());
                process::exit(1);
            }
        }
    }

    log::debug!(
        "level {}, module root {:?}",
        config.level,
        config.module_root
    );
    config
}

fn load_packages(path: &Path, no_color: bool) -> PackageSet {
    let name = path.display().to_string();
    let source = read_input(&name);

    let mut files = SimpleFiles::new();
    let file_id = files.add(name, source.clone());

    match PackageSet::from_toml(&source, file_id) {
        Ok(set) => set,
        Err(error) => {
            let color_choice = if no_color {
                ColorChoice::Never
            } else {
                ColorChoice::Auto
            };
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            let diagnostic = error.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            process::exit(1);
        }
    }
}

fn build(args: &DocArgs, no_color: bool) -> Document {
    let config = load_config(args);
    let packages = match &args.packages {
        Some(path) => load_packages(path, no_color),
        None => PackageSet::default(),
    };

    let current = match &args.package {
        Some(import_path) => match packages.get(import_path) {
            Some(p) => p.clone(),
            None => {
                log::warn!(
                    "package {} has no metadata; links to its symbols stay unresolved",
                    import_path
                );
                Package::new(import_path.clone())
            }
        },
        None => packages.packages().first().cloned().unwrap_or_default(),
    };

    let source = read_input(&args.file);
    Document::from_text(&config, &current, &packages, &source)
}
