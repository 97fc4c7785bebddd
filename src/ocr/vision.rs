use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::core::geometry::{Region, Vertex};
use crate::ocr::annotation::{Annotation, AnnotationLevel, HierarchicalAnnotation};

/// Subset of a Cloud Vision `AnnotateImageResponse` used to build annotation trees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionResponse {
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub full_text_annotation: Option<TextAnnotation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub pages: Vec<VisionPage>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionPage {
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub blocks: Vec<VisionBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionBlock {
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
    #[serde(default)]
    pub paragraphs: Vec<VisionParagraph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionParagraph {
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
    #[serde(default)]
    pub words: Vec<VisionWord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionWord {
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
    #[serde(default)]
    pub symbols: Vec<VisionSymbol>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionSymbol {
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub property: Option<TextProperty>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperty {
    #[serde(default)]
    pub detected_break: Option<DetectedBreak>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBreak {
    #[serde(rename = "type", default)]
    pub break_type: BreakType,
    #[serde(default)]
    pub is_prefix: bool,
}

/// Break kind, either as the provider's numeric code or its enum name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BreakType {
    Code(u32),
    Name(String),
}

impl Default for BreakType {
    fn default() -> Self {
        BreakType::Code(0)
    }
}

impl BreakType {
    pub fn code(&self) -> u32 {
        match self {
            BreakType::Code(code) => *code,
            BreakType::Name(name) => match name.as_str() {
                "SPACE" => 1,
                "SURE_SPACE" => 2,
                "EOL_SURE_SPACE" => 3,
                "HYPHEN" => 4,
                "LINE_BREAK" => 5,
                _ => 0,
            },
        }
    }
}

pub fn break_character(code: u32) -> Option<char> {
    match code {
        0 => None,
        4 => Some('-'),
        5 => Some('\n'),
        _ => Some(' '),
    }
}

pub fn load_vision_response(path: &Path) -> Result<VisionResponse> {
    let data = fs::read_to_string(path)?;
    parse_vision_response(&data)
}

pub fn parse_vision_response(json: &str) -> Result<VisionResponse> {
    Ok(serde_json::from_str(json)?)
}

/// One Page-level tree per page of the response.
pub fn response_to_pages(response: &VisionResponse) -> Vec<HierarchicalAnnotation> {
    response
        .full_text_annotation
        .as_ref()
        .map(|annotation| annotation.pages.iter().map(compose_page).collect())
        .unwrap_or_default()
}

pub fn response_to_flat_annotations(response: &VisionResponse) -> Vec<Annotation> {
    response
        .text_annotations
        .iter()
        .map(|entity| Annotation {
            bounds: poly_region(&entity.bounding_poly),
            text: entity.description.clone(),
        })
        .collect()
}

pub fn compose_page(page: &VisionPage) -> HierarchicalAnnotation {
    let blocks = page.blocks.iter().map(compose_block).collect();
    HierarchicalAnnotation::with_children(
        AnnotationLevel::Page,
        Region::rect(0, 0, page.width, page.height),
        blocks,
    )
}

fn compose_block(block: &VisionBlock) -> HierarchicalAnnotation {
    let paragraphs = block.paragraphs.iter().map(compose_paragraph).collect();
    HierarchicalAnnotation::with_children(
        AnnotationLevel::Block,
        poly_region(&block.bounding_box),
        paragraphs,
    )
}

fn compose_paragraph(paragraph: &VisionParagraph) -> HierarchicalAnnotation {
    let words = paragraph.words.iter().map(compose_word).collect();
    HierarchicalAnnotation::with_children(
        AnnotationLevel::Paragraph,
        poly_region(&paragraph.bounding_box),
        words,
    )
}

fn compose_word(word: &VisionWord) -> HierarchicalAnnotation {
    let symbols = word.symbols.iter().map(compose_symbol).collect();
    HierarchicalAnnotation::with_children(
        AnnotationLevel::Word,
        poly_region(&word.bounding_box),
        symbols,
    )
}

fn compose_symbol(symbol: &VisionSymbol) -> HierarchicalAnnotation {
    let detected = symbol
        .property
        .as_ref()
        .and_then(|property| property.detected_break.as_ref());

    let mut text = String::with_capacity(symbol.text.len() + 1);
    match detected.and_then(|b| break_character(b.break_type.code()).map(|c| (c, b.is_prefix))) {
        Some((c, true)) => {
            text.push(c);
            text.push_str(&symbol.text);
        }
        Some((c, false)) => {
            text.push_str(&symbol.text);
            text.push(c);
        }
        None => text.push_str(&symbol.text),
    }

    HierarchicalAnnotation::leaf(AnnotationLevel::Symbol, poly_region(&symbol.bounding_box), text)
}

fn poly_region(poly: &Option<BoundingPoly>) -> Region {
    poly.as_ref()
        .map(|p| Region::new(p.vertices.clone()))
        .unwrap_or_default()
}
