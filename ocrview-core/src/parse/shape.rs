use serde_json::Value;

use crate::{consts::RENDERED_PAGE, layout::element::BoxKind};

/// The three page layouts a box fragment may come in.
///
/// The variant is decided once from the top-level type and the first element,
/// anything else is rejected by [`PageShape::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageShape<'a> {
    /// `{"pages": [{"page": 0, "blocks": [...]}, ...]}`
    PagesMap(&'a [Value]),
    /// `[{"page": 0, "boxes": [...]}, ...]`
    PageList(&'a [Value]),
    /// `[{"bbox": [...], ...}, ...]`, an implicit page 0.
    FlatBoxList(&'a [Value]),
}

/// One page of a fragment before its items are parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPage<'a> {
    pub page_no: Option<i64>,
    pub items: &'a [Value],
}

impl<'a> PageShape<'a> {
    pub fn resolve(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => map
                .get("pages")
                .and_then(Value::as_array)
                .map(|pages| PageShape::PagesMap(pages)),
            Value::Array(items) => match items.first() {
                None => Some(PageShape::PageList(items)),
                Some(Value::Object(first)) if first.contains_key("bbox") => {
                    Some(PageShape::FlatBoxList(items))
                }
                Some(Value::Object(first))
                    if first.contains_key("boxes") || first.contains_key("blocks") =>
                {
                    Some(PageShape::PageList(items))
                }
                Some(_) => None,
            },
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageShape::PagesMap(_) => "pages-map",
            PageShape::PageList(_) => "page-list",
            PageShape::FlatBoxList(_) => "flat-box-list",
        }
    }

    /// Splits the fragment into pages, reading items from `kind`'s keys.
    ///
    /// Non-object page entries are skipped.
    pub fn raw_pages(&self, kind: BoxKind) -> Vec<RawPage<'a>> {
        match *self {
            PageShape::FlatBoxList(items) => vec![RawPage {
                page_no: Some(RENDERED_PAGE),
                items,
            }],
            PageShape::PagesMap(pages) | PageShape::PageList(pages) => pages
                .iter()
                .filter_map(Value::as_object)
                .map(|page| {
                    let items = kind
                        .items_keys()
                        .iter()
                        .find_map(|key| page.get(*key).and_then(Value::as_array))
                        .map(Vec::as_slice)
                        .unwrap_or_default();

                    RawPage {
                        page_no: page.get("page").and_then(page_index),
                        items,
                    }
                })
                .collect(),
        }
    }
}

/// Page index given as an integer, or as a float with no fractional part.
fn page_index(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
