use serde::{Deserialize, Serialize};

// request
//  └── contents[]
//       └── parts[]
//            └── text
//
// response
//  ├── candidates[]
//  │    ├── content
//  │    │    └── parts[]
//  │    │         └── text
//  │    └── finishReason
//  └── error (only on failure)
//       ├── code
//       ├── message
//       └── status

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined in order.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Why the first candidate stopped (`STOP`, `SAFETY`, `MAX_TOKENS`, ...).
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_contents_parts_text() {
        let req = GenerateRequest::from_prompt("hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn first_text_joins_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "TITLE: A\n" }, { "text": "DESCRIPTION: B" }] },
                  "finishReason": "STOP" },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }"#;
        let resp: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("TITLE: A\nDESCRIPTION: B"));
        assert_eq!(resp.finish_reason(), Some("STOP"));
    }

    #[test]
    fn blocked_candidate_has_reason_but_no_text() {
        let body = r#"{ "candidates": [{ "finishReason": "SAFETY" }] }"#;
        let resp: GenerateResponse = serde_json::from_str(body).unwrap();
        assert!(resp.first_text().is_none());
        assert_eq!(resp.finish_reason(), Some("SAFETY"));
    }

    #[test]
    fn first_text_is_none_without_candidates() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert!(resp.first_text().is_none());
        assert!(resp.finish_reason().is_none());
    }
}
