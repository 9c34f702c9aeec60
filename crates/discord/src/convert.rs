use {kyron_relay::IncomingMessage, serenity::all::Message};

/// Flatten a gateway message into the relay's transport-neutral form.
///
/// Embeds keep their wire JSON shape so the relay can brand and rewrite them
/// without knowing serenity's types.
pub fn to_incoming(msg: &Message) -> serde_json::Result<IncomingMessage> {
    let embeds = msg
        .embeds
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IncomingMessage {
        channel_id: msg.channel_id.get(),
        content: msg.content.clone(),
        author_name: msg.author.display_name().to_string(),
        author_avatar_url: msg.author.face(),
        author_is_bot: msg.author.bot,
        embeds,
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::test_support::message_from, serde_json::json};

    #[test]
    fn converts_content_channel_and_author() {
        let msg = message_from(
            json!({
                "id": "80351110224678912",
                "username": "shady",
                "global_name": "xvshady",
                "discriminator": "0",
                "avatar": "8342729096ea3675442027381ff50dfe"
            }),
            "𝐃enkai drop incoming",
            json!([]),
        );

        let incoming = to_incoming(&msg).unwrap();
        assert_eq!(incoming.channel_id, 1455072323437723790);
        assert_eq!(incoming.content, "𝐃enkai drop incoming");
        assert_eq!(incoming.author_name, "xvshady");
        assert!(
            incoming
                .author_avatar_url
                .contains("8342729096ea3675442027381ff50dfe")
        );
        assert!(!incoming.author_is_bot);
        assert!(incoming.embeds.is_empty());
    }

    #[test]
    fn keeps_embeds_as_json() {
        let msg = message_from(
            json!({
                "id": "80351110224678912",
                "username": "relay-bot",
                "discriminator": "0",
                "avatar": null,
                "bot": true
            }),
            "",
            json!([{
                "type": "rich",
                "title": "Denkai restock",
                "description": "limited",
                "color": 16711680
            }]),
        );

        let incoming = to_incoming(&msg).unwrap();
        assert!(incoming.author_is_bot);
        assert_eq!(incoming.author_name, "relay-bot");
        assert!(!incoming.author_avatar_url.is_empty());
        assert_eq!(incoming.embeds.len(), 1);
        assert_eq!(incoming.embeds[0]["title"], "Denkai restock");
        assert_eq!(incoming.embeds[0]["color"], 16711680);
    }
}
