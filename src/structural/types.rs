//! Structural path types
//!
//! Format: `/html/body/div[2]/p[1]/text()[3]` or `//*[@id="intro"]/text()[1]`

use std::fmt;

/// Where evaluation of a path starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStart {
    /// The document node (`/...`)
    Document,
    /// The element carrying this id (`//*[@id="..."]`)
    Id(String),
}

/// A single step in a structural path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Child element with this tag; `index` is 1-based among same-tag
    /// siblings, `None` means the first one
    Element { tag: String, index: Option<usize> },
    /// Text child; `index` is 1-based among text siblings
    Text { index: usize },
}

/// A parsed structural path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralPath {
    pub start: PathStart,
    pub steps: Vec<PathStep>,
}

impl StructuralPath {
    /// Empty path from the document node
    pub fn document() -> Self {
        Self {
            start: PathStart::Document,
            steps: Vec::new(),
        }
    }

    /// Path starting at an element id
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            start: PathStart::Id(id.into()),
            steps: Vec::new(),
        }
    }

    /// Fixed path of the document body: `/html/body`
    pub fn body() -> Self {
        Self::document()
            .child_element("html", None)
            .child_element("body", None)
    }

    pub fn child_element(mut self, tag: impl Into<String>, index: Option<usize>) -> Self {
        self.steps.push(PathStep::Element {
            tag: tag.into(),
            index,
        });
        self
    }

    pub fn child_text(mut self, index: usize) -> Self {
        self.steps.push(PathStep::Text { index });
        self
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Element { tag, index: None } => write!(f, "/{}", tag),
            PathStep::Element {
                tag,
                index: Some(index),
            } => write!(f, "/{}[{}]", tag, index),
            PathStep::Text { index } => write!(f, "/text()[{}]", index),
        }
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let PathStart::Id(id) = &self.start {
            write!(f, "//*[@id=\"")?;
            for ch in id.chars() {
                if ch == '"' || ch == '\\' {
                    write!(f, "\\")?;
                }
                write!(f, "{}", ch)?;
            }
            write!(f, "\"]")?;
        }
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_body_token() {
        assert_eq!(StructuralPath::body().to_string(), "/html/body");
    }

    #[test]
    fn test_display_steps() {
        let path = StructuralPath::body()
            .child_element("div", Some(2))
            .child_text(1);
        assert_eq!(path.to_string(), "/html/body/div[2]/text()[1]");
    }

    #[test]
    fn test_display_escapes_id() {
        let path = StructuralPath::from_id(r#"a"b"#).child_text(2);
        assert_eq!(path.to_string(), r#"//*[@id="a\"b"]/text()[2]"#);
    }

    #[test]
    fn test_document_path_is_empty() {
        assert_eq!(StructuralPath::document().to_string(), "");
    }
}
