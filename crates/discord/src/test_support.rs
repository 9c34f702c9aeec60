//! Gateway payload fixtures.

use {
    serde_json::{Value, json},
    serenity::all::Message,
};

/// A MESSAGE_CREATE payload as Discord sends it.
pub fn message_from(author: Value, content: &str, embeds: Value) -> Message {
    serde_json::from_value(json!({
        "id": "1300000000000000001",
        "channel_id": "1455072323437723790",
        "author": author,
        "content": content,
        "timestamp": "2025-01-01T12:00:00.000000+00:00",
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "attachments": [],
        "mention_channels": [],
        "embeds": embeds,
        "reactions": [],
        "sticker_items": [],
        "components": [],
        "pinned": false,
        "type": 0,
        "flags": 0
    }))
    .expect("gateway message")
}

/// A plain user message carrying `embeds` rich embeds.
pub fn gateway_message(content: &str, embeds: usize) -> Message {
    let embeds: Vec<Value> = (0..embeds)
        .map(|i| json!({ "type": "rich", "title": format!("embed {i}") }))
        .collect();
    message_from(
        json!({
            "id": "80351110224678912",
            "username": "shady",
            "discriminator": "0",
            "avatar": null
        }),
        content,
        Value::Array(embeds),
    )
}
