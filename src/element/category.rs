use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Structural role of an element on the page. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Topbar,
    Sidebar,
    Nav,
    Submenu,
    Button,
    Link,
    Form,
    Table,
    Content,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Topbar,
        Category::Sidebar,
        Category::Nav,
        Category::Submenu,
        Category::Button,
        Category::Link,
        Category::Form,
        Category::Table,
        Category::Content,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Topbar => "TOPBAR",
            Category::Sidebar => "SIDEBAR",
            Category::Nav => "NAV",
            Category::Submenu => "SUBMENU",
            Category::Button => "BUTTON",
            Category::Link => "LINK",
            Category::Form => "FORM",
            Category::Table => "TABLE",
            Category::Content => "CONTENT",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
