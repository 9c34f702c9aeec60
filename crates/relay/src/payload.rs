//! Outbound payload construction: rewrite, brand, cap.

use {
    kyron_config::BrandingConfig,
    kyron_rewrite::{Rewriter, rewrite_strings},
    serde_json::{Value, json},
};

use crate::message::{EMBED_LIMIT, IncomingMessage, OutboundPayload};

/// Stamp the branding footer and default color on `embed`, then rewrite every
/// string in it.
///
/// The footer is always replaced; the color is only set when missing or null.
pub fn brand_embed(mut embed: Value, branding: &BrandingConfig, rewriter: &Rewriter) -> Value {
    if let Value::Object(map) = &mut embed {
        if map.get("color").is_none_or(Value::is_null) {
            map.insert("color".into(), Value::from(branding.default_color));
        }
        map.insert(
            "footer".into(),
            json!({
                "text": branding.footer_text,
                "icon_url": branding.footer_icon_url,
            }),
        );
    }
    rewrite_strings(rewriter, &mut embed);
    embed
}

/// Build the webhook payload for `message`.
///
/// Returns `None` when there is nothing to send (empty content and no embeds
/// after rewriting). At most [`EMBED_LIMIT`] embeds are kept, in order.
pub fn build_payload(
    message: IncomingMessage,
    webhook_url: &str,
    branding: &BrandingConfig,
    rewriter: &Rewriter,
) -> Option<OutboundPayload> {
    let content = if message.content.is_empty() {
        String::new()
    } else {
        rewriter.rewrite(&message.content)
    };

    let embeds: Vec<Value> = message
        .embeds
        .into_iter()
        .take(EMBED_LIMIT)
        .map(|embed| brand_embed(embed, branding, rewriter))
        .collect();

    if content.is_empty() && embeds.is_empty() {
        return None;
    }

    Some(OutboundPayload {
        webhook_url: webhook_url.to_string(),
        content,
        username: branding.username.clone(),
        avatar_url: message.author_avatar_url,
        embeds,
    })
}
