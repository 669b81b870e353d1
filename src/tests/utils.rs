use crate::db::connection::{init_db, Database};
use crate::domain::ListingRecord;
use crate::gemini::{GeminiError, TextGenerator};
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Fresh in-memory DB with the production schema applied.
pub fn init_test_db() -> Database {
    let mut db = Database::open_in_memory()
        .unwrap_or_else(|e| panic!("Database open failed: {e}"));

    init_db(&mut db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn insert_listing(conn: &Connection, id: i64, title: &str, rating: Option<f64>) {
    conn.execute(
        r#"
        INSERT INTO hotels (id, property_title, rating, location, room_type, price, image_path)
        VALUES (?1, ?2, ?3, 'Lisbon', 'Double', '€80', '')
        "#,
        params![id, title, rating],
    )
    .unwrap_or_else(|e| panic!("insert listing {id} failed: {e}"));
}

pub fn listing(id: i64, title: &str) -> ListingRecord {
    ListingRecord {
        id,
        title: title.to_string(),
        location: "Lisbon".to_string(),
        room_type: "Double".to_string(),
        price: "€80".to_string(),
        rating: None,
    }
}

/// Replays canned replies in order and records every prompt it was sent.
/// Once the script runs dry every call fails with `EmptyResponse`.
pub struct ScriptedGenerator {
    replies: RefCell<VecDeque<Result<String, GeminiError>>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<&str, GeminiError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().map(|r| r.map(str::to_string)).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn rate_limit() -> GeminiError {
        GeminiError::RateLimited {
            status: 429,
            message: "Resource has been exhausted".to_string(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(GeminiError::EmptyResponse))
    }
}
