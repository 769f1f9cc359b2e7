// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-supplied routing inputs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Device the user is chatting from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    #[default]
    Desktop,
    Unknown,
}

/// Optional session metadata. Absent fields fall back to a first desktop turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    pub turn_count: Option<u32>,
    pub is_first_message: Option<bool>,
    pub device_type: Option<DeviceType>,
}

impl SessionContext {
    pub fn turn_count(&self) -> u32 {
        self.turn_count.unwrap_or(1)
    }

    pub fn is_first_message(&self) -> bool {
        self.is_first_message.unwrap_or(true)
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type.unwrap_or_default()
    }
}

/// Optional summary of the conversation so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentContext {
    pub last_assistant_message: Option<String>,
    pub conversation_depth: Option<u32>,
}

impl RecentContext {
    pub fn is_empty(&self) -> bool {
        self.last_assistant_message
            .as_deref()
            .is_none_or(|m| m.trim().is_empty())
            && self.conversation_depth.is_none()
    }
}

/// Kind of an attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Pdf,
    Audio,
    Video,
    File,
}

impl AttachmentKind {
    /// Audio and video can only be consumed by the media model.
    pub fn forces_media_model(self) -> bool {
        matches!(self, AttachmentKind::Audio | AttachmentKind::Video)
    }
}

/// An attachment descriptor. Only the kind and MIME type matter for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub mime_type: String,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, mime_type: impl Into<String>) -> Self {
        Self {
            kind,
            mime_type: mime_type.into(),
        }
    }
}

/// Parses `kind:mime`, e.g. `audio:audio/mp3`. A bare kind gets an empty MIME type.
impl FromStr for Attachment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, mime) = s.split_once(':').unwrap_or((s, ""));
        let kind = AttachmentKind::from_str(kind.trim()).map_err(|_| {
            format!("unknown attachment kind `{kind}`; expected image, pdf, audio, video or file")
        })?;
        Ok(Attachment::new(kind, mime.trim()))
    }
}

/// Everything the Concierge needs to route one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRequest {
    /// Raw user query, possibly empty.
    pub query: String,
    pub attachments: Vec<Attachment>,
    pub session: Option<SessionContext>,
    pub recent: Option<RecentContext>,
}

impl RoutingRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_recent(mut self, recent: RecentContext) -> Self {
        self.recent = Some(recent);
        self
    }

    /// Session context with defaults applied when the caller supplied none.
    pub fn session_or_default(&self) -> SessionContext {
        self.session.clone().unwrap_or_default()
    }

    /// First audio or video attachment kind, if any.
    pub fn media_attachment(&self) -> Option<AttachmentKind> {
        self.attachments
            .iter()
            .map(|a| a.kind)
            .find(|kind| kind.forces_media_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_defaults() {
        let session = SessionContext::default();
        assert_eq!(session.turn_count(), 1);
        assert!(session.is_first_message());
        assert_eq!(session.device_type(), DeviceType::Desktop);
    }

    #[test]
    fn partial_session_keeps_supplied_fields() {
        let session: SessionContext =
            serde_json::from_str(r#"{"turn_count": 7, "device_type": "mobile"}"#).unwrap();
        assert_eq!(session.turn_count(), 7);
        assert!(session.is_first_message());
        assert_eq!(session.device_type(), DeviceType::Mobile);
    }

    #[test]
    fn parse_attachment_argument() {
        let a: Attachment = "audio:audio/mp3".parse().unwrap();
        assert_eq!(a.kind, AttachmentKind::Audio);
        assert_eq!(a.mime_type, "audio/mp3");

        let b: Attachment = "PDF".parse().unwrap();
        assert_eq!(b.kind, AttachmentKind::Pdf);
        assert_eq!(b.mime_type, "");

        assert!("spreadsheet:text/csv".parse::<Attachment>().is_err());
    }

    #[test]
    fn media_attachment_picks_audio_or_video() {
        let req = RoutingRequest::new("look")
            .with_attachment(Attachment::new(AttachmentKind::Image, "image/png"))
            .with_attachment(Attachment::new(AttachmentKind::Video, "video/mp4"));
        assert_eq!(req.media_attachment(), Some(AttachmentKind::Video));

        let req = RoutingRequest::new("look")
            .with_attachment(Attachment::new(AttachmentKind::Pdf, "application/pdf"));
        assert_eq!(req.media_attachment(), None);
    }

    #[test]
    fn request_deserializes_with_missing_fields() {
        let req: RoutingRequest = serde_json::from_str(r#"{"query": "hi"}"#).unwrap();
        assert_eq!(req.query, "hi");
        assert!(req.attachments.is_empty());
        assert!(req.session.is_none());
    }

    #[test]
    fn recent_context_emptiness() {
        assert!(RecentContext::default().is_empty());
        assert!(
            RecentContext {
                last_assistant_message: Some("  ".into()),
                conversation_depth: None,
            }
            .is_empty()
        );
        assert!(
            !RecentContext {
                last_assistant_message: None,
                conversation_depth: Some(3),
            }
            .is_empty()
        );
    }
}
