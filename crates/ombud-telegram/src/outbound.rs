// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound delivery: the [`Messenger`] implementation over the Bot API.
//!
//! Media delivery picks the call sequence per payload shape: photo and
//! video references travel as albums (2-10 items per Bot API call, a
//! lone item via its single-send method), voice notes are sent
//! individually since albums do not accept them. Submission order is
//! preserved within each sequence.

use async_trait::async_trait;

use ombud_core::OmbudError;
use ombud_core::types::{Button, ContentKind, MediaRef};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia,
    InputMediaPhoto, InputMediaVideo, Recipient,
};

const ALBUM_LIMIT: usize = 10;

/// [`Messenger`] implementation backed by a teloxide [`Bot`].
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ombud_core::Messenger for TelegramMessenger {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        buttons: Option<Vec<Button>>,
    ) -> Result<(), OmbudError> {
        let request = self.bot.send_message(Recipient::Id(ChatId(chat_id)), text);
        let result = match buttons {
            Some(buttons) => request.reply_markup(keyboard(&buttons)).await,
            None => request.await,
        };
        result.map_err(|e| OmbudError::Delivery {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }

    async fn send_media_group(&self, chat_id: i64, items: &[MediaRef]) -> Result<(), OmbudError> {
        let recipient = Recipient::Id(ChatId(chat_id));
        let plan = plan_media(items);

        for album in &plan.albums {
            if album.len() == 1 {
                self.send_single(recipient.clone(), &album[0]).await?;
                continue;
            }
            let media: Vec<InputMedia> = album
                .iter()
                .map(|item| {
                    let file = InputFile::file_id(FileId(item.file_id.clone()));
                    match item.kind {
                        ContentKind::Video => InputMedia::Video(InputMediaVideo::new(file)),
                        _ => InputMedia::Photo(InputMediaPhoto::new(file)),
                    }
                })
                .collect();
            self.bot
                .send_media_group(recipient.clone(), media)
                .await
                .map_err(|e| OmbudError::Delivery {
                    message: format!("failed to send media group: {e}"),
                    source: Some(Box::new(e)),
                })?;
        }

        for voice in &plan.voices {
            self.bot
                .send_voice(
                    recipient.clone(),
                    InputFile::file_id(FileId(voice.file_id.clone())),
                )
                .await
                .map_err(|e| OmbudError::Delivery {
                    message: format!("failed to send voice note: {e}"),
                    source: Some(Box::new(e)),
                })?;
        }

        Ok(())
    }
}

impl TelegramMessenger {
    async fn send_single(&self, recipient: Recipient, item: &MediaRef) -> Result<(), OmbudError> {
        let file = InputFile::file_id(FileId(item.file_id.clone()));
        let result = match item.kind {
            ContentKind::Video => self.bot.send_video(recipient, file).await,
            _ => self.bot.send_photo(recipient, file).await,
        };
        result.map_err(|e| OmbudError::Delivery {
            message: format!("failed to send media item: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }
}

/// One inline button per row, preserving order.
pub(crate) fn keyboard(buttons: &[Button]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        buttons
            .iter()
            .map(|b| vec![InlineKeyboardButton::callback(b.label.clone(), b.payload.clone())]),
    )
}

/// How a media roster maps onto Bot API calls.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MediaPlan {
    /// Photo/video runs, each at most [`ALBUM_LIMIT`] long.
    pub albums: Vec<Vec<MediaRef>>,
    /// Voice notes, sent one call each.
    pub voices: Vec<MediaRef>,
}

/// Split a media roster into album chunks and voice sends.
pub(crate) fn plan_media(items: &[MediaRef]) -> MediaPlan {
    let mut albums = Vec::new();
    let mut voices = Vec::new();
    let mut current: Vec<MediaRef> = Vec::new();

    for item in items {
        match item.kind {
            ContentKind::Voice => voices.push(item.clone()),
            ContentKind::Photo | ContentKind::Video => {
                if current.len() == ALBUM_LIMIT {
                    albums.push(std::mem::take(&mut current));
                }
                current.push(item.clone());
            }
            ContentKind::Text => {}
        }
    }
    if !current.is_empty() {
        albums.push(current);
    }

    MediaPlan { albums, voices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> MediaRef {
        MediaRef {
            kind: ContentKind::Photo,
            file_id: id.to_string(),
        }
    }

    fn voice(id: &str) -> MediaRef {
        MediaRef {
            kind: ContentKind::Voice,
            file_id: id.to_string(),
        }
    }

    #[test]
    fn keyboard_has_one_button_per_row() {
        let markup = keyboard(&[
            Button::new("Send", "confirm_send_123456"),
            Button::new("Edit", "edit_message_123456"),
        ]);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
        assert_eq!(markup.inline_keyboard[0][0].text, "Send");
        assert_eq!(markup.inline_keyboard[1][0].text, "Edit");
    }

    #[test]
    fn plan_separates_voices_from_albums() {
        let plan = plan_media(&[photo("p1"), voice("v1"), photo("p2")]);
        assert_eq!(plan.albums, vec![vec![photo("p1"), photo("p2")]]);
        assert_eq!(plan.voices, vec![voice("v1")]);
    }

    #[test]
    fn plan_keeps_submission_order() {
        let plan = plan_media(&[
            photo("p1"),
            MediaRef {
                kind: ContentKind::Video,
                file_id: "vid1".to_string(),
            },
            photo("p2"),
        ]);
        let ids: Vec<&str> = plan.albums[0].iter().map(|m| m.file_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "vid1", "p2"]);
    }

    #[test]
    fn plan_chunks_large_albums() {
        let items: Vec<MediaRef> = (0..23).map(|i| photo(&format!("p{i}"))).collect();
        let plan = plan_media(&items);
        assert_eq!(plan.albums.len(), 3);
        assert_eq!(plan.albums[0].len(), 10);
        assert_eq!(plan.albums[1].len(), 10);
        assert_eq!(plan.albums[2].len(), 3);
    }

    #[test]
    fn plan_for_empty_roster_is_empty() {
        let plan = plan_media(&[]);
        assert!(plan.albums.is_empty());
        assert!(plan.voices.is_empty());
    }
}
