// src/processor/prompts.rs
use crate::domain::ListingRecord;

pub fn rewrite_prompt(listing: &ListingRecord) -> String {
    format!(
        "Please rewrite the following property information in a more engaging way.\n\
         Title: {title}\n\
         Location: {location}\n\
         Room Type: {room_type}\n\
         Price: {price}\n\
         \n\
         Answer in exactly this format:\n\
         TITLE: [new title on one line]\n\
         DESCRIPTION: [engaging description]\n",
        title = listing.title,
        location = listing.location,
        room_type = listing.room_type,
        price = listing.price,
    )
}

pub fn summary_prompt(listing: &ListingRecord) -> String {
    format!(
        "Generate a comprehensive summary for the following property.\n\
         Title: {title}\n\
         Location: {location}\n\
         Room Type: {room_type}\n\
         Price: {price}\n\
         Rating: {rating}\n\
         \n\
         Answer in exactly this format:\n\
         SUMMARY: [summary]\n",
        title = listing.title,
        location = listing.location,
        room_type = listing.room_type,
        price = listing.price,
        rating = listing.rating_display(),
    )
}

pub fn review_prompt(listing: &ListingRecord) -> String {
    format!(
        "Based on the following property information, generate a detailed review and rating.\n\
         Title: {title}\n\
         Location: {location}\n\
         Room Type: {room_type}\n\
         Price: {price}\n\
         Current Rating: {rating}\n\
         \n\
         Answer in exactly this format:\n\
         RATING: [number from 1 to 5]\n\
         REVIEW: [detailed review]\n",
        title = listing.title,
        location = listing.location,
        room_type = listing.room_type,
        price = listing.price,
        rating = listing.rating_display(),
    )
}
