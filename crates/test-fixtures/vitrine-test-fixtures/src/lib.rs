//! Test doubles and page fixtures for the carousel engine.
//!
//! `MemoryTree`, `VirtualTimers` and `RecordingRenderer` implement the core's
//! host traits; `Page` bundles them. Stored page layouts live under the
//! repository `fixtures/` directory and are listed in `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod page;
pub mod renderer;
pub mod timers;
pub mod tree;

pub use page::{image_carousel, property_section, track_of, Page, SectionLayout};
pub use renderer::RecordingRenderer;
pub use timers::VirtualTimers;
pub use tree::{ElementSpec, MemoryTree, NodeId};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    pages: HashMap<String, String>,
    configs: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a String> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod pages {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.pages.keys().cloned().collect()
    }

    pub fn specs(name: &str) -> Result<Vec<ElementSpec>> {
        let rel = lookup(&MANIFEST.pages, "page", name)?;
        super::load_json(rel)
    }

    /// Page layout loaded into a fresh [`MemoryTree`].
    pub fn tree(name: &str) -> Result<MemoryTree> {
        Ok(MemoryTree::from_specs(&specs(name)?))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.pages, "page", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        read_to_string(rel)
    }

    pub fn load(name: &str) -> Result<vitrine_carousel_core::Config> {
        let text = json(name)?;
        vitrine_carousel_core::Config::from_json(&text)
            .with_context(|| format!("invalid carousel config fixture '{name}'"))
    }
}
