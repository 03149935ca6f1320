//! Content classification.
//!
//! Pure, synchronous functions mapping message content to classification
//! results: calendar-invite detection with event-id extraction, and
//! quote/forwarded-content boundary detection. No state, no I/O; cheap
//! enough to run on every render of a single message.

mod invite;
mod quote;

pub use invite::{classify, extract_event_id, is_invite, InviteClassification};
pub use quote::{
    annotate_quotes, detect_quote_regions, has_quoted_content, QuoteMarker, QuoteRegion,
};
