// src/processor/processor.rs
use tracing::debug;

use crate::domain::{ListingRecord, ReviewResult, RewriteResult, SummaryResult};
use crate::errors::RewriteError;
use crate::gemini::{GeminiError, TextGenerator};
use crate::processor::parse::{parse_rating_review, parse_titled_response, Field};
use crate::processor::prompts::{review_prompt, rewrite_prompt, summary_prompt};
use crate::processor::retry::{call_with_retry, RetryPolicy};
use crate::processor::ParseError;

/// Turns listings into prompts, sends them through the injected generator
/// with rate-limit retries, and parses the replies.
pub struct ResponseProcessor<'g, G: TextGenerator + ?Sized> {
    generator: &'g G,
    policy: RetryPolicy,
}

impl<'g, G: TextGenerator + ?Sized> ResponseProcessor<'g, G> {
    pub fn new(generator: &'g G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// One remote generation, retried while rate limited.
    pub fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        call_with_retry(&self.policy, || self.generator.generate(prompt))
    }

    /// New title and description; the title falls back to the current one.
    pub fn rewrite(&self, listing: &ListingRecord) -> Result<RewriteResult, RewriteError> {
        let text = self.generate(&rewrite_prompt(listing))?;
        debug!(listing_id = listing.id, "rewrite reply: {text}");

        let mut fields = parse_titled_response(
            &text,
            &[
                Field::new("TITLE").with_fallback(&listing.title),
                Field::new("DESCRIPTION"),
            ],
        );

        Ok(RewriteResult {
            title: fields.take("TITLE"),
            description: fields.take("DESCRIPTION"),
        })
    }

    /// Summary text; an unlabelled reply is taken whole.
    pub fn summarize(&self, listing: &ListingRecord) -> Result<SummaryResult, RewriteError> {
        let text = self.generate(&summary_prompt(listing))?;
        debug!(listing_id = listing.id, "summary reply: {text}");

        let whole = text.trim();
        let mut fields =
            parse_titled_response(&text, &[Field::new("SUMMARY").with_fallback(whole)]);
        let summary = fields.take("SUMMARY");

        if summary.is_empty() {
            return Err(ParseError::MissingField("SUMMARY".to_string()).into());
        }

        Ok(SummaryResult { summary })
    }

    /// Rating in [1, 5] plus review text. Fails when either label is missing.
    pub fn review(&self, listing: &ListingRecord) -> Result<ReviewResult, RewriteError> {
        let text = self.generate(&review_prompt(listing))?;
        debug!(listing_id = listing.id, "review reply: {text}");

        let (rating, review) = parse_rating_review(&text)?;
        Ok(ReviewResult { rating, review })
    }
}
