//! Changelog aggregation and rendering
//!
//! Commits are grouped by type, then by scope. Rendering is driven by five
//! `%s` templates so the same tree can come out as plain text or Markdown.

use crate::domain::commit::parse_all;
use crate::domain::ParsedCommit;
use crate::error::{Result, SemtagError};
use tracing::debug;

/// Scope used for commits without one
pub const UNDEFINED_SCOPE: &str = "other";

/// Placeholder substituted in every format template
pub const PLACEHOLDER: &str = "%s";

/// Types rendered before every other type, in this order
const LEADING_TYPES: [&str; 2] = ["feat", "fix"];

/// The five templates driving changelog rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub title: String,
    pub r#type: String,
    pub scope: String,
    pub list: String,
    pub item: String,
}

impl FormatSpec {
    /// Build a format spec, rejecting templates without `%s`
    pub fn new(
        title: impl Into<String>,
        r#type: impl Into<String>,
        scope: impl Into<String>,
        list: impl Into<String>,
        item: impl Into<String>,
    ) -> Result<Self> {
        let spec = FormatSpec {
            title: title.into(),
            r#type: r#type.into(),
            scope: scope.into(),
            list: list.into(),
            item: item.into(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// The Markdown preset
    pub fn markdown() -> Self {
        FormatSpec {
            title: "# %s".to_string(),
            r#type: "## %s".to_string(),
            scope: "### %s".to_string(),
            list: "%s".to_string(),
            item: "- %s".to_string(),
        }
    }

    /// Check that every template carries the placeholder
    pub fn validate(&self) -> Result<()> {
        let templates = [
            ("title", &self.title),
            ("type", &self.r#type),
            ("scope", &self.scope),
            ("list", &self.list),
            ("item", &self.item),
        ];

        for (name, template) in templates {
            if !template.contains(PLACEHOLDER) {
                return Err(SemtagError::config(format!(
                    "The {} format '{}' must contain '{}'",
                    name, template, PLACEHOLDER
                )));
            }
        }
        Ok(())
    }
}

impl Default for FormatSpec {
    fn default() -> Self {
        FormatSpec {
            title: "# %s".to_string(),
            r#type: "= %s".to_string(),
            scope: "- %s".to_string(),
            list: "%s".to_string(),
            item: "* %s".to_string(),
        }
    }
}

fn apply(template: &str, value: &str) -> String {
    template.replacen(PLACEHOLDER, value, 1)
}

/// Upper-case the first character and lower-case the rest
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScopeSection {
    scope: String,
    items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeSection {
    r#type: String,
    scopes: Vec<ScopeSection>,
}

impl TypeSection {
    fn push(&mut self, scope: &str, item: String) {
        match self.scopes.iter_mut().find(|section| section.scope == scope) {
            Some(section) => section.items.push(item),
            None => self.scopes.push(ScopeSection {
                scope: scope.to_string(),
                items: vec![item],
            }),
        }
    }
}

/// Commits grouped by type, then scope, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogTree {
    types: Vec<TypeSection>,
}

impl ChangelogTree {
    /// Group commit subjects, oldest first.
    ///
    /// Subjects that are not conventional commits are left out.
    pub fn from_subjects<S: AsRef<str>>(subjects: &[S]) -> Self {
        let mut tree = ChangelogTree::default();
        for commit in parse_all(subjects) {
            tree.insert(&commit);
        }
        debug!(subjects = subjects.len(), types = tree.types.len(), "built changelog tree");
        tree
    }

    fn insert(&mut self, commit: &ParsedCommit) {
        let scope = commit.scope.as_deref().unwrap_or(UNDEFINED_SCOPE);
        let item = capitalize(commit.summary.trim());

        match self.types.iter_mut().find(|section| section.r#type == commit.r#type) {
            Some(section) => section.push(scope, item),
            None => {
                let mut section = TypeSection {
                    r#type: commit.r#type.clone(),
                    scopes: Vec::new(),
                };
                section.push(scope, item);
                self.types.push(section);
            }
        }
    }

    /// Whether no conventional commit was collected
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types in rendering order
    pub fn types(&self) -> Vec<&str> {
        self.ordered().map(|section| section.r#type.as_str()).collect()
    }

    /// Scopes of a type, in first-seen order
    pub fn scopes(&self, r#type: &str) -> Vec<&str> {
        self.section(r#type)
            .map(|section| section.scopes.iter().map(|s| s.scope.as_str()).collect())
            .unwrap_or_default()
    }

    /// Items of a type and scope, in input order
    pub fn items(&self, r#type: &str, scope: &str) -> &[String] {
        self.section(r#type)
            .and_then(|section| section.scopes.iter().find(|s| s.scope == scope))
            .map(|section| section.items.as_slice())
            .unwrap_or(&[])
    }

    fn section(&self, r#type: &str) -> Option<&TypeSection> {
        self.types.iter().find(|section| section.r#type == r#type)
    }

    fn ordered(&self) -> impl Iterator<Item = &TypeSection> {
        let leading = LEADING_TYPES.iter().filter_map(move |name| self.section(name));
        let rest = self
            .types
            .iter()
            .filter(|section| !LEADING_TYPES.contains(&section.r#type.as_str()));
        leading.chain(rest)
    }

    /// Render the tree under a title
    pub fn render(&self, title: &str, format: &FormatSpec) -> String {
        let type_blocks: Vec<String> = self
            .ordered()
            .map(|section| {
                let scope_blocks: Vec<String> = section
                    .scopes
                    .iter()
                    .map(|scope| {
                        let items: Vec<String> =
                            scope.items.iter().map(|item| apply(&format.item, item)).collect();
                        format!(
                            "{}\n{}\n",
                            apply(&format.scope, &scope.scope),
                            apply(&format.list, &items.join("\n"))
                        )
                    })
                    .collect();

                format!(
                    "{}\n{}\n",
                    apply(&format.r#type, &section.r#type),
                    scope_blocks.join("\n").trim()
                )
            })
            .collect();

        format!(
            "{}\n{}\n",
            apply(&format.title, title),
            type_blocks.join("\n").trim()
        )
    }
}

/// Changelog title for a starting version
pub fn title_for(since: Option<&str>) -> String {
    match since {
        Some(version) => format!("Changelog from version {}", version),
        None => "Changelog from first commit".to_string(),
    }
}
