// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message classification and content extraction.
//!
//! Maps a Telegram message onto the closed content-kind set, keeping
//! media as opaque file-id references (nothing is downloaded). Message
//! types outside the set (stickers, locations, ...) return `None` and
//! are answered with a notice upstream.

use ombud_core::types::ContentKind;
use teloxide::prelude::*;

/// Whether the message is the `/start` command.
pub fn is_start_command(msg: &Message) -> bool {
    matches!(msg.text(), Some(text) if text == "/start" || text.starts_with("/start "))
}

/// Extract the content kind and opaque payload from a client message.
///
/// Text carries the raw text; photo/video/voice carry the transport
/// file reference. For photos, Telegram provides multiple sizes and the
/// last one is the largest.
pub fn extract_content(msg: &Message) -> Option<(ContentKind, String)> {
    if let Some(text) = msg.text() {
        return Some((ContentKind::Text, text.to_string()));
    }
    if let Some(photos) = msg.photo() {
        let largest = photos.last()?;
        return Some((ContentKind::Photo, largest.file.id.to_string()));
    }
    if let Some(video) = msg.video() {
        return Some((ContentKind::Video, video.file.id.to_string()));
    }
    if let Some(voice) = msg.voice() {
        return Some((ContentKind::Voice, voice.file.id.to_string()));
    }
    None
}
