use super::error::MessageError;
use super::model::{ForwardOrigin, ForwardedUser, InboundMessage};

/// Pull the text to voice out of a message.
///
/// Forwarded posts get a spoken prefix naming the channel or the user they
/// came from, separated from the body by a blank line.
pub fn extract_text(message: &InboundMessage) -> Result<String, MessageError> {
    let text = message
        .text
        .as_deref()
        .or(message.caption.as_deref())
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(MessageError::unsupported)?;

    if let Some(channel_name) = forwarded_channel_name(message) {
        let prefix = if channel_name.is_empty() {
            "Пост из канала.".to_string()
        } else {
            format!("Пост из канала {}.", channel_name)
        };
        return Ok(format!("{}\n\n{}", prefix, text));
    }

    if let Some(user_name) = forwarded_user_name(message) {
        let prefix = if user_name.is_empty() {
            "Сообщение от пользователя.".to_string()
        } else {
            format!("Сообщение от пользователя {}.", user_name)
        };
        return Ok(format!("{}\n\n{}", prefix, text));
    }

    Ok(text.to_string())
}

/// `Some("")` means forwarded from a channel whose name is unknown
fn forwarded_channel_name(message: &InboundMessage) -> Option<String> {
    if let Some(ForwardOrigin::Channel { chat }) = &message.forward_origin {
        let name = chat
            .as_ref()
            .and_then(|chat| non_empty(&chat.title).or(non_empty(&chat.username)))
            .unwrap_or_default();
        return Some(name.to_string());
    }

    let legacy_chat = message
        .forward_from_chat
        .as_ref()
        .filter(|chat| chat.chat_type.as_deref() == Some("channel"))?;
    let name = non_empty(&legacy_chat.title)
        .or(non_empty(&legacy_chat.username))
        .unwrap_or_default();
    Some(name.to_string())
}

fn forwarded_user_name(message: &InboundMessage) -> Option<String> {
    if let Some(ForwardOrigin::User { sender_user }) = &message.forward_origin {
        return Some(build_user_name(sender_user.as_ref(), None));
    }

    let sender_name = non_empty(&message.forward_sender_name);
    if message.forward_from.is_some() || sender_name.is_some() {
        return Some(build_user_name(message.forward_from.as_ref(), sender_name));
    }

    None
}

/// `@username`, else "first last", else the fallback name
fn build_user_name(user: Option<&ForwardedUser>, fallback_name: Option<&str>) -> String {
    if let Some(username) = user.and_then(|user| non_empty(&user.username)) {
        return format!("@{}", username);
    }

    let full_name = user
        .map(|user| {
            [non_empty(&user.first_name), non_empty(&user.last_name)]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string()
        })
        .unwrap_or_default();
    if !full_name.is_empty() {
        return full_name;
    }

    fallback_name.unwrap_or_default().to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
