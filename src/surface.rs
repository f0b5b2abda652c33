//! Surface configuration: which modules are exposed and how they are described.
//!
//! The visible set is computed once at startup from the full catalog and two
//! optional raw tag lists:
//!
//! ```text
//! visible = (include ? catalog ∩ include : catalog) − exclude
//! ```
//!
//! The resulting [`Surface`] is immutable and is handed by reference to the
//! router builder and the OpenAPI builder.

use crate::catalog::{Capability, Module};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Fixed preamble of the rendered API description.
pub const DESCRIPTION_PREAMBLE: &str = "
A typed REST proxy for the Interactive Brokers Web API.
This API provides a clean, modern interface to interact with various IBKR functionalities.
";

/// Heading placed between the preamble and the module list.
const MODULE_LIST_HEADING: &str = "\n**Available Modules:**\n\n";

/// A parsed set of module names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Parses a raw comma-separated tag list.
    ///
    /// Newlines and double quotes are stripped before splitting, tokens are
    /// trimmed and empty tokens are dropped, so values copied from YAML or
    /// shell snippets parse the same as a plain list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let cleaned: String = raw.chars().filter(|c| !matches!(c, '\n' | '"')).collect();
        Self(
            cleaned
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Returns true if the set contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no names were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(tag)?;
        }
        Ok(())
    }
}

/// Parses an optional raw tag list. Absent and empty strings mean no filter.
fn parse_filter(raw: Option<&str>) -> Option<TagSet> {
    raw.filter(|s| !s.is_empty()).map(TagSet::parse)
}

/// The set of modules exposed by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface<C: Capability = Module> {
    visible: Vec<C>,
}

impl<C: Capability> Surface<C> {
    /// Computes the visible modules from a catalog and raw include/exclude lists.
    ///
    /// Names that do not match any catalog entry are ignored.
    #[must_use]
    pub fn compute(catalog: &[C], include: Option<&str>, exclude: Option<&str>) -> Self {
        let include = parse_filter(include);
        let exclude = parse_filter(exclude);

        for (label, tags) in [("include", &include), ("exclude", &exclude)] {
            if let Some(tags) = tags {
                for unknown in tags
                    .iter()
                    .filter(|tag| !catalog.iter().any(|c| c.name() == *tag))
                {
                    debug!("Ignoring unknown {} tag: {}", label, unknown);
                }
            }
        }

        let mut visible: Vec<C> = catalog
            .iter()
            .copied()
            .filter(|c| include.as_ref().is_none_or(|tags| tags.contains(c.name())))
            .filter(|c| !exclude.as_ref().is_some_and(|tags| tags.contains(c.name())))
            .collect();
        visible.sort_by(|a, b| a.name().cmp(b.name()));
        visible.dedup();

        Self { visible }
    }

    /// A surface exposing the whole catalog.
    #[must_use]
    pub fn all(catalog: &[C]) -> Self {
        Self::compute(catalog, None, None)
    }

    /// Visible modules, sorted by name.
    #[must_use]
    pub fn modules(&self) -> &[C] {
        &self.visible
    }

    /// Returns true if `module` is exposed.
    #[must_use]
    pub fn is_visible(&self, module: C) -> bool {
        self.visible.contains(&module)
    }

    /// Renders one `* **name**: description` line per visible module.
    #[must_use]
    pub fn render_module_list(&self) -> String {
        self.visible
            .iter()
            .map(|c| format!("* **{}**: {}\n", c.name(), c.description()))
            .collect()
    }

    /// Renders the full API description: preamble, heading and module list.
    #[must_use]
    pub fn render_description(&self) -> String {
        format!(
            "{}{}{}",
            DESCRIPTION_PREAMBLE,
            MODULE_LIST_HEADING,
            self.render_module_list()
        )
    }
}

impl Surface<Module> {
    /// Computes the production surface over [`Module::ALL`].
    #[must_use]
    pub fn from_tags(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self::compute(&Module::ALL, include, exclude)
    }
}
