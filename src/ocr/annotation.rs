use serde::{Deserialize, Serialize};

use crate::core::geometry::Region;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
    Page,
    Block,
    Paragraph,
    Word,
    Symbol,
}

/// Recognized text with its bounds, without hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub bounds: Region,
    pub text: String,
}

/// A node of the OCR tree. `text` is the concatenation of the children's text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HierarchicalAnnotation {
    pub bounds: Region,
    pub text: String,
    pub level: AnnotationLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchicalAnnotation>,
}

impl HierarchicalAnnotation {
    pub fn leaf(level: AnnotationLevel, bounds: Region, text: impl Into<String>) -> Self {
        Self {
            bounds,
            text: text.into(),
            level,
            children: Vec::new(),
        }
    }

    /// Builds a node whose text is composed from its children, in order.
    pub fn with_children(
        level: AnnotationLevel,
        bounds: Region,
        children: Vec<HierarchicalAnnotation>,
    ) -> Self {
        let text = children.iter().map(|child| child.text.as_str()).collect();
        Self {
            bounds,
            text,
            level,
            children,
        }
    }

    /// Text with every whitespace run collapsed to a single space.
    pub fn normalized_text(&self) -> String {
        normalize_whitespace(&self.text)
    }

    pub fn annotation(&self) -> Annotation {
        Annotation {
            bounds: self.bounds.clone(),
            text: self.text.clone(),
        }
    }

    /// All Block-level nodes below (and including) this one, in document order.
    pub fn blocks(&self) -> Vec<&HierarchicalAnnotation> {
        self.descendants_at(AnnotationLevel::Block)
    }

    pub fn descendants_at(&self, level: AnnotationLevel) -> Vec<&HierarchicalAnnotation> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.level == level {
                found.push(node);
                continue;
            }
            if node.level > level {
                continue;
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word(text: &str) -> HierarchicalAnnotation {
        HierarchicalAnnotation::leaf(AnnotationLevel::Word, Region::rect(0, 0, 1, 1), text)
    }

    #[test]
    fn composes_text_from_children() {
        let para = HierarchicalAnnotation::with_children(
            AnnotationLevel::Paragraph,
            Region::default(),
            vec![word("Fresh "), word("Lemons\n")],
        );
        assert_eq!(para.text, "Fresh Lemons\n");
        assert_eq!(para.normalized_text(), "Fresh Lemons");
    }

    #[test]
    fn finds_blocks_in_document_order() {
        let block = |text: &str| {
            HierarchicalAnnotation::with_children(
                AnnotationLevel::Block,
                Region::default(),
                vec![word(text)],
            )
        };
        let page = HierarchicalAnnotation::with_children(
            AnnotationLevel::Page,
            Region::rect(0, 0, 100, 100),
            vec![block("first "), block("second "), block("third")],
        );

        let texts: Vec<_> = page.blocks().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["first ", "second ", "third"]);
    }
}
