use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_messages: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn new(current_page: i64, page_size: i64, total_messages: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_messages + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            current_page,
            total_pages,
            total_messages,
            page_size,
        }
    }
}
