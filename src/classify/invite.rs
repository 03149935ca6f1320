//! Calendar invitation detection and event-id extraction.
//!
//! Detection is the logical OR of three independent signals, each alone
//! sufficient: a calendar attachment, a known calendar sender, or
//! invitation markers in the subject or body. Extraction pulls the durable
//! event identifier out of the opaque `eid=` parameter of a Google
//! Calendar event link; any malformation yields `None` rather than an
//! error, since a missing id merely disables the RSVP affordance.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::domain::Message;

/// Attachment filename suffix marking a calendar payload.
const ICS_SUFFIX: &str = ".ics";

/// MIME types marking a calendar attachment.
const CALENDAR_MIME_TYPES: [&str; 2] = ["text/calendar", "application/ics"];

/// Sender addresses historically used for Google Calendar notifications.
const CALENDAR_SENDERS: [&str; 2] = [
    "calendar-notification@google.com",
    "calendar-noreply@google.com",
];

/// Subject prefixes marking an invitation, matched case-insensitively.
const INVITE_SUBJECT_MARKERS: [&str; 2] = ["invitation:", "updated invitation:"];

/// Body tokens marking inline iCalendar content.
const INVITE_BODY_MARKERS: [&str; 2] = ["VCALENDAR", "BEGIN:VEVENT"];

static EVENT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://(?:www\.)?calendar\.google\.com/[^\s"'<>]+"#)
        .expect("event link pattern is valid")
});

/// The result of running invite classification over a message.
///
/// Computed fresh per message, never cached across message mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteClassification {
    /// Whether the message is a calendar invitation.
    pub is_invite: bool,
    /// Durable event identifier, when one could be extracted.
    pub event_id: Option<String>,
}

impl InviteClassification {
    /// A classification for a message that is not an invite.
    pub fn not_invite() -> Self {
        Self {
            is_invite: false,
            event_id: None,
        }
    }
}

/// Classifies a message as a calendar invitation or not, extracting the
/// event id when it is one.
pub fn classify(message: &Message) -> InviteClassification {
    if !is_invite(message) {
        return InviteClassification::not_invite();
    }
    InviteClassification {
        is_invite: true,
        event_id: extract_event_id(&message.combined_body()),
    }
}

/// Returns true if the message looks like a calendar invitation.
pub fn is_invite(message: &Message) -> bool {
    has_calendar_attachment(message)
        || has_calendar_sender(message)
        || has_invite_markers(message)
}

fn has_calendar_attachment(message: &Message) -> bool {
    message.attachments.iter().any(|a| {
        a.filename.to_ascii_lowercase().ends_with(ICS_SUFFIX)
            || CALENDAR_MIME_TYPES
                .iter()
                .any(|mime| a.content_type.eq_ignore_ascii_case(mime))
    })
}

fn has_calendar_sender(message: &Message) -> bool {
    let sender = message.from.email.to_ascii_lowercase();
    CALENDAR_SENDERS.iter().any(|addr| sender.contains(addr))
}

fn has_invite_markers(message: &Message) -> bool {
    if let Some(subject) = &message.subject {
        let subject = subject.to_ascii_lowercase();
        if INVITE_SUBJECT_MARKERS.iter().any(|m| subject.contains(m)) {
            return true;
        }
    }
    let body = message.combined_body();
    INVITE_BODY_MARKERS.iter().any(|m| body.contains(m))
}

/// Extracts the event identifier from the first calendar-event link in
/// the given body text that carries an `eid=` query parameter.
///
/// Plain calendar links (home pages, "open your calendar" footers) are
/// skipped; extraction stops at the first link whose `eid` decodes.
///
/// The `eid` parameter is URL-safe base64 over a space-separated
/// `"<event id> <attendee email>"` record; only the first field is kept.
/// Returns `None` on any malformation.
pub fn extract_event_id(body: &str) -> Option<String> {
    EVENT_LINK.find_iter(body).find_map(|m| {
        // hrefs in HTML bodies carry entity-escaped separators
        let link = m.as_str().replace("&amp;", "&");
        let url = Url::parse(&link).ok()?;
        let eid = url
            .query_pairs()
            .find(|(key, _)| key == "eid")
            .map(|(_, value)| value.into_owned())?;
        decode_event_payload(&eid)
    })
}

fn decode_event_payload(eid: &str) -> Option<String> {
    let standard = eid
        .replace('-', "+")
        .replace('_', "/")
        .trim_end_matches('=')
        .to_string();
    let bytes = STANDARD_NO_PAD.decode(standard).ok()?;
    let payload = String::from_utf8(bytes).ok()?;
    let id = payload.split_whitespace().next()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Attachment, LabelId, MessageId, ThreadId};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn make_message() -> Message {
        Message {
            id: MessageId::from("msg-1"),
            thread_id: ThreadId::from("thread-1"),
            from: Address::new("sender@example.com"),
            to: vec![Address::new("me@example.com")],
            cc: vec![],
            subject: Some("Lunch".to_string()),
            body_text: Some("See you there".to_string()),
            body_html: None,
            date: Utc::now(),
            is_read: false,
            labels: vec![LabelId::from("INBOX")],
            attachments: vec![],
        }
    }

    #[test]
    fn plain_message_is_not_invite() {
        let msg = make_message();
        let result = classify(&msg);
        assert_eq!(result, InviteClassification::not_invite());
    }

    #[test]
    fn ics_attachment_marks_invite() {
        let mut msg = make_message();
        msg.attachments.push(Attachment {
            id: "att-1".to_string(),
            filename: "Meeting.ICS".to_string(),
            content_type: "application/octet-stream".to_string(),
            size_bytes: 256,
        });
        assert!(is_invite(&msg));
    }

    #[test]
    fn calendar_mime_marks_invite() {
        let mut msg = make_message();
        msg.attachments.push(Attachment {
            id: "att-1".to_string(),
            filename: "invite.dat".to_string(),
            content_type: "text/calendar".to_string(),
            size_bytes: 256,
        });
        assert!(is_invite(&msg));
    }

    #[test]
    fn calendar_sender_marks_invite() {
        let mut msg = make_message();
        msg.from = Address::new("calendar-notification@google.com");
        assert!(is_invite(&msg));
    }

    #[test]
    fn invitation_subject_marks_invite() {
        let mut msg = make_message();
        msg.subject = Some("Invitation: Sync @ Tue".to_string());
        assert!(is_invite(&msg));

        msg.subject = Some("Updated invitation: Sync @ Wed".to_string());
        assert!(is_invite(&msg));
    }

    #[test]
    fn vevent_body_marks_invite() {
        let mut msg = make_message();
        msg.body_text = Some("BEGIN:VEVENT\nDTSTART:20240101".to_string());
        assert!(is_invite(&msg));
    }

    #[test]
    fn extracts_event_id_from_link() {
        // payload decodes to "ABC123 foo@bar.com"
        let body = "RSVP here: \
            https://calendar.google.com/calendar/event?eid=QUJDMTIzIGZvb0BiYXIuY29t";
        assert_eq!(extract_event_id(body), Some("ABC123".to_string()));
    }

    #[test]
    fn scenario_invitation_subject_with_eid_link() {
        let mut msg = make_message();
        msg.subject = Some("Invitation: Sync".to_string());
        msg.body_text = Some(
            "https://calendar.google.com/calendar/event?eid=QUJDMTIzIGZvb0BiYXIuY29t".to_string(),
        );

        let result = classify(&msg);
        assert!(result.is_invite);
        assert_eq!(result.event_id, Some("ABC123".to_string()));
    }

    #[test]
    fn extracts_from_html_escaped_href() {
        let body = "<a href=\"https://calendar.google.com/calendar/event?\
            action=VIEW&amp;eid=QUJDMTIzIGZvb0BiYXIuY29t\">View</a>";
        assert_eq!(extract_event_id(body), Some("ABC123".to_string()));
    }

    #[test]
    fn url_safe_alphabet_is_normalized() {
        // "AB?~ me@x.co" base64url-encodes with '-' and '_'
        let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("AB?~ me@x.co");
        assert!(encoded.contains('-') || encoded.contains('_'));
        let body = format!("https://calendar.google.com/calendar/event?eid={encoded}");
        assert_eq!(extract_event_id(&body), Some("AB?~".to_string()));
    }

    #[test]
    fn malformed_base64_yields_none() {
        let body = "https://calendar.google.com/calendar/event?eid=!!!not-base64!!!";
        assert_eq!(extract_event_id(body), None);
    }

    #[test]
    fn missing_eid_parameter_yields_none() {
        let body = "https://calendar.google.com/calendar/r/week";
        assert_eq!(extract_event_id(body), None);
    }

    #[test]
    fn plain_calendar_link_before_event_link_is_skipped() {
        // footer-style calendar home link precedes the real event link
        let body = "Open your calendar: https://calendar.google.com/calendar/r \
            https://calendar.google.com/calendar/event?eid=QUJDMTIzIGZvb0BiYXIuY29t";
        assert_eq!(extract_event_id(body), Some("ABC123".to_string()));
    }

    #[test]
    fn undecodable_eid_falls_through_to_next_link() {
        let body = "https://calendar.google.com/calendar/event?eid=!!!garbage!!! \
            https://calendar.google.com/calendar/event?eid=QUJDMTIzIGZvb0BiYXIuY29t";
        assert_eq!(extract_event_id(body), Some("ABC123".to_string()));
    }

    #[test]
    fn empty_payload_yields_none() {
        // " " (a single space) has no first field
        let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode(" ");
        let body = format!("https://calendar.google.com/calendar/event?eid={encoded}");
        assert_eq!(extract_event_id(&body), None);
    }

    #[test]
    fn first_link_wins() {
        let body = "\
            https://calendar.google.com/calendar/event?eid=Rmlyc3QgYUB4LmNv \
            https://calendar.google.com/calendar/event?eid=U2Vjb25kIGJAeC5jbw==";
        // payloads decode to "First a@x.co" and "Second b@x.co"
        assert_eq!(extract_event_id(body), Some("First".to_string()));
    }

    #[test]
    fn non_invite_skips_extraction() {
        let mut msg = make_message();
        msg.body_text = Some(
            "https://calendar.google.com/calendar/event?eid=QUJDMTIzIGZvb0BiYXIuY29t".to_string(),
        );
        // no invite signal present, so the link alone does not classify
        let result = classify(&msg);
        assert!(!result.is_invite);
        assert_eq!(result.event_id, None);
    }
}
