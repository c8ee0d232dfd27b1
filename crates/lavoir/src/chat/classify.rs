//! Reply classification for the cleaning flow.
//!
//! The cleaning endpoint does not label its replies, so the kind is
//! inferred from the message text: a greeting means the backend only
//! chatted, anything else is treated as an action on the data.

use super::backend::ResponseKind;

/// Greeting keywords, French and English. Substring match, so a greeting
/// embedded anywhere in the message classifies the whole reply; greetings
/// in other languages classify as `action`. Known limitation.
const GREETING_KEYWORDS: &[&str] = &["bonjour", "salut", "hello", "hi"];

/// Classify a cleaning-endpoint message.
pub fn classify_reply(message: &str) -> ResponseKind {
    let lowered = message.to_lowercase();
    if GREETING_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        ResponseKind::Conversation
    } else {
        ResponseKind::Action
    }
}
