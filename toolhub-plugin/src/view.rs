//! Declarative view model returned by capability UI entry points
//!
//! Capabilities describe what they want shown; the host decides how to draw
//! it. A plain-text renderer is provided for terminal hosts.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Primary content of a capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel title
    pub title: String,
    /// Ordered sections
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A titled group of items inside a panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Optional heading
    pub heading: Option<String>,
    /// Ordered items
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A single renderable element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// Free text
    Text { text: String },
    /// Labelled input field
    Field {
        label: String,
        value: String,
        #[serde(default)]
        kind: FieldKind,
    },
    /// On/off switch
    Toggle { label: String, enabled: bool },
    /// Health or state indicator
    Status { label: String, level: StatusLevel },
}

/// Input field flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    /// Rendered masked
    Secret,
}

/// Severity shown by a status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Ok,
    Warning,
    Error,
}

/// Toolbar contributed by a capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "actions", rename_all = "snake_case")]
pub enum Toolbar {
    /// The capability contributes no toolbar
    None,
    /// Ordered toolbar actions
    Actions(Vec<Action>),
}

/// A toolbar button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Identifier passed back to the capability when triggered
    pub id: String,
    /// Display label
    pub label: String,
}

const SECRET_MASK: &str = "********";

impl Panel {
    /// Create an empty panel
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Render the panel as indented plain text
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.chars().count()));

        for section in &self.sections {
            out.push('\n');
            if let Some(ref heading) = section.heading {
                let _ = writeln!(out, "{}", heading);
                let _ = writeln!(out, "{}", "-".repeat(heading.chars().count()));
            }
            for item in &section.items {
                let _ = writeln!(out, "  {}", item.render_text());
            }
        }

        out
    }
}

impl Section {
    /// Create a section with a heading
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            items: Vec::new(),
        }
    }

    /// Append an item
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}

impl Item {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn field(label: impl Into<String>, value: impl Into<String>, kind: FieldKind) -> Self {
        Self::Field {
            label: label.into(),
            value: value.into(),
            kind,
        }
    }

    pub fn toggle(label: impl Into<String>, enabled: bool) -> Self {
        Self::Toggle {
            label: label.into(),
            enabled,
        }
    }

    pub fn status(label: impl Into<String>, level: StatusLevel) -> Self {
        Self::Status {
            label: label.into(),
            level,
        }
    }

    fn render_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Field { label, value, kind } => match kind {
                FieldKind::Secret if !value.is_empty() => format!("{}: {}", label, SECRET_MASK),
                _ => format!("{}: {}", label, value),
            },
            Self::Toggle { label, enabled } => {
                format!("[{}] {}", if *enabled { "x" } else { " " }, label)
            }
            Self::Status { label, level } => {
                let marker = match level {
                    StatusLevel::Ok => "OK",
                    StatusLevel::Warning => "WARN",
                    StatusLevel::Error => "ERROR",
                };
                format!("{} ({})", label, marker)
            }
        }
    }
}

impl Toolbar {
    /// Whether there is anything to draw
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Actions(actions) => actions.is_empty(),
        }
    }

    /// Render as a single line of buttons, `None` when empty
    pub fn render_text(&self) -> Option<String> {
        match self {
            Self::Actions(actions) if !actions.is_empty() => Some(
                actions
                    .iter()
                    .map(|action| format!("[ {} ]", action.label))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

impl Action {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
