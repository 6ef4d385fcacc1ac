use serde::{Deserialize, Serialize};

/// Message as delivered by the chat platform, reduced to the fields the
/// relay reads. Forward metadata comes in both the current `forward_origin`
/// shape and the legacy `forward_from*` fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_origin: Option<ForwardOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_from_chat: Option<ForwardedChat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_from: Option<ForwardedUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_sender_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForwardOrigin {
    Channel {
        #[serde(default)]
        chat: Option<ForwardedChat>,
    },
    User {
        #[serde(default)]
        sender_user: Option<ForwardedUser>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardedChat {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chat_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardedUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}
