//! Notification domain types
//!
//! The JSON shape accepted by the chat sink's webhook endpoint.

use serde::{Deserialize, Serialize};

/// Body posted to the sink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// Wrap embeds with the empty `content` the sink expects
    pub fn new(embeds: Vec<Embed>) -> Self {
        Self {
            content: String::new(),
            embeds,
        }
    }
}

/// One notification document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// Characters this embed contributes to the sink's per-message total
    pub fn char_count(&self) -> usize {
        self.title.chars().count()
            + self.description.as_deref().map_or(0, |d| d.chars().count())
            + self.footer.as_ref().map_or(0, |f| f.text.chars().count())
            + self.fields.iter().map(EmbedField::char_count).sum::<usize>()
    }
}

/// One section of a notification document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }

    pub fn char_count(&self) -> usize {
        self.name.chars().count() + self.value.chars().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_members_are_omitted() {
        let embed = Embed {
            title: "Backup Complete".to_string(),
            color: 2123412,
            ..Default::default()
        };
        let json = serde_json::to_value(WebhookPayload::new(vec![embed])).unwrap();

        assert_eq!(json["content"], "");
        let embed = &json["embeds"][0];
        assert_eq!(embed["title"], "Backup Complete");
        assert_eq!(embed["color"], 2123412);
        assert!(embed.get("description").is_none());
        assert!(embed.get("fields").is_none());
        assert!(embed.get("footer").is_none());
    }

    #[test]
    fn test_char_count_covers_all_text() {
        let embed = Embed {
            title: "abc".to_string(),
            description: Some("de".to_string()),
            fields: vec![EmbedField::new("f", "ghij")],
            color: 0,
            footer: Some(EmbedFooter {
                text: "é".to_string(),
            }),
        };
        assert_eq!(embed.char_count(), 3 + 2 + 1 + 4 + 1);
    }
}
