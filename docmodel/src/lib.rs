pub mod builder;
pub mod comment;
pub mod config;
pub mod document;
pub mod package;
pub mod resolve;

pub use builder::build_document;
pub use config::Config;
pub use document::{Block, BlockKind, Document, ListRole};
pub use document::text::{Span, Text};
pub use package::{Package, PackageSet};
pub use resolve::{Resolution, Resolver, SymbolKind};
