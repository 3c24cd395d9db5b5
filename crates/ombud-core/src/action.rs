// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagged actions carried in interactive button payloads.
//!
//! Button payloads are short strings encoding an action tag plus
//! identifiers (`"branch_<name>"`, `"confirm_send_<requestId>"`, ...).
//! They are parsed exactly once, at the transport boundary, into
//! [`Action`]; nothing downstream re-parses the raw string.

use crate::error::OmbudError;
use crate::types::{ClientId, RequestId};

/// An action decoded from an interactive button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a new request (main menu).
    NewRequest,
    /// Show the informational blurb (main menu).
    About,
    /// Route the in-progress request to the named branch.
    ChooseBranch { branch: String },
    /// Client confirms the accumulated draft for dispatch.
    ConfirmSend { request_id: RequestId },
    /// Client discards the draft items and starts composing again.
    EditMessage { request_id: RequestId },
    /// Client keeps the draft items and appends more.
    AddMore { request_id: RequestId },
    /// Staff opens a reply cycle for a dispatched request.
    ReplyToClient {
        client_id: ClientId,
        request_id: RequestId,
    },
    /// Staff confirms delivery of the recorded reply to the client.
    SendToClient {
        client_id: ClientId,
        request_id: RequestId,
    },
    /// Staff discards the recorded reply text and types a new one.
    EditResponse {
        client_id: ClientId,
        request_id: RequestId,
    },
}

impl Action {
    /// Parse a raw button payload.
    ///
    /// Malformed payloads (unknown tag, missing or non-numeric
    /// identifiers) are a [`OmbudError::Validation`].
    pub fn parse(payload: &str) -> Result<Action, OmbudError> {
        match payload {
            "new_request" => return Ok(Action::NewRequest),
            "about" => return Ok(Action::About),
            _ => {}
        }

        if let Some(branch) = payload.strip_prefix("branch_") {
            if branch.is_empty() {
                return Err(malformed(payload));
            }
            return Ok(Action::ChooseBranch {
                branch: branch.to_string(),
            });
        }
        if let Some(rest) = payload.strip_prefix("confirm_send_") {
            return Ok(Action::ConfirmSend {
                request_id: parse_request_id(payload, rest)?,
            });
        }
        if let Some(rest) = payload.strip_prefix("edit_message_") {
            return Ok(Action::EditMessage {
                request_id: parse_request_id(payload, rest)?,
            });
        }
        if let Some(rest) = payload.strip_prefix("add_more_") {
            return Ok(Action::AddMore {
                request_id: parse_request_id(payload, rest)?,
            });
        }
        if let Some(rest) = payload.strip_prefix("reply-to-client_") {
            let (client_id, request_id) = parse_id_pair(payload, rest)?;
            return Ok(Action::ReplyToClient {
                client_id,
                request_id,
            });
        }
        if let Some(rest) = payload.strip_prefix("send-to-client_") {
            let (client_id, request_id) = parse_id_pair(payload, rest)?;
            return Ok(Action::SendToClient {
                client_id,
                request_id,
            });
        }
        if let Some(rest) = payload.strip_prefix("edit-response_") {
            let (client_id, request_id) = parse_id_pair(payload, rest)?;
            return Ok(Action::EditResponse {
                client_id,
                request_id,
            });
        }

        Err(malformed(payload))
    }

    /// Encode this action back into its button payload form.
    pub fn encode(&self) -> String {
        match self {
            Action::NewRequest => "new_request".to_string(),
            Action::About => "about".to_string(),
            Action::ChooseBranch { branch } => format!("branch_{branch}"),
            Action::ConfirmSend { request_id } => format!("confirm_send_{request_id}"),
            Action::EditMessage { request_id } => format!("edit_message_{request_id}"),
            Action::AddMore { request_id } => format!("add_more_{request_id}"),
            Action::ReplyToClient {
                client_id,
                request_id,
            } => format!("reply-to-client_{client_id}_{request_id}"),
            Action::SendToClient {
                client_id,
                request_id,
            } => format!("send-to-client_{client_id}_{request_id}"),
            Action::EditResponse {
                client_id,
                request_id,
            } => format!("edit-response_{client_id}_{request_id}"),
        }
    }
}

fn malformed(payload: &str) -> OmbudError {
    OmbudError::Validation(format!("malformed button payload `{payload}`"))
}

fn parse_request_id(payload: &str, rest: &str) -> Result<RequestId, OmbudError> {
    rest.parse::<i64>()
        .map(RequestId)
        .map_err(|_| malformed(payload))
}

fn parse_id_pair(payload: &str, rest: &str) -> Result<(ClientId, RequestId), OmbudError> {
    let (client, request) = rest.split_once('_').ok_or_else(|| malformed(payload))?;
    let client_id = client
        .parse::<i64>()
        .map(ClientId)
        .map_err(|_| malformed(payload))?;
    let request_id = request
        .parse::<i64>()
        .map(RequestId)
        .map_err(|_| malformed(payload))?;
    Ok((client_id, request_id))
}
