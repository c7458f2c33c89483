use std::time::Duration;

use poise::serenity_prelude as serenity;

/// Prompt the invoking user with Confirm/Cancel buttons and wait for their
/// choice. Returns the confirming interaction, or `None` when the prompt was
/// cancelled or timed out (the prompt message is rewritten accordingly).
pub async fn confirm_or_cancel<U, E>(
    ctx: poise::Context<'_, U, E>,
    content: impl Into<String>,
    embed: serenity::CreateEmbed,
    timeout: Duration,
    timed_out_text: &str,
    cancelled_text: &str,
    processing_text: &str,
) -> Result<Option<serenity::ComponentInteraction>, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let ctx_id = ctx.id();
    let confirm_id = format!("{}_confirm", ctx_id);
    let cancel_id = format!("{}_cancel", ctx_id);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(content)
                .embed(embed)
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new(&confirm_id)
                        .label("Confirm")
                        .style(serenity::ButtonStyle::Danger),
                    serenity::CreateButton::new(&cancel_id)
                        .label("Cancel")
                        .style(serenity::ButtonStyle::Secondary),
                ])]),
        )
        .await?;

    let message = reply.message().await?.into_owned();
    let interaction = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(timeout)
        .await;

    let Some(interaction) = interaction else {
        message
            .channel_id
            .edit_message(
                ctx.http(),
                message.id,
                serenity::EditMessage::new()
                    .content(timed_out_text)
                    .embeds(vec![])
                    .components(vec![]),
            )
            .await?;
        return Ok(None);
    };

    let (text, confirmed) = if interaction.data.custom_id == confirm_id {
        (processing_text, true)
    } else {
        (cancelled_text, false)
    };

    interaction
        .create_response(
            ctx.http(),
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(text)
                    .embeds(vec![])
                    .components(vec![]),
            ),
        )
        .await?;

    if confirmed {
        Ok(Some(interaction))
    } else {
        Ok(None)
    }
}
