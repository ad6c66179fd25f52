pub mod batch;
pub mod compare;
pub mod init;
pub mod predict;
pub mod score;
pub mod search;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};

use ronbun_core::config::RonbunConfig;
use ronbun_core::model::Catalog;
use ronbun_core::parser;

/// Load the catalog named by `--catalog`, falling back to the config.
fn load_catalog(flag: Option<PathBuf>, config: &RonbunConfig) -> Result<Catalog> {
    let path = flag.or_else(|| config.catalog.clone()).context(
        "no catalog given; pass --catalog, set `catalog` in ronbun.toml, or set RONBUN_CATALOG",
    )?;
    parser::load_catalog(&path)
}
