// src/domain/listing.rs

/// A row of the `hotels` table, as read for prompt construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub room_type: String,
    pub price: String,
    pub rating: Option<f64>,
}

impl ListingRecord {
    /// Same listing with the title swapped for the rewritten one.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Rating as shown to the model; `N/A` when the listing has none.
    pub fn rating_display(&self) -> String {
        match self.rating {
            Some(r) => format!("{r}"),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteResult {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
}

/// `rating` always lies in [1, 5].
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub rating: f64,
    pub review: String,
}
