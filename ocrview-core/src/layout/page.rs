use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page_no: i64,
    pub boxes: Vec<T>,
}
