use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::embed::DEFAULT_EMBED_COLOR;

const NAV_TIMEOUT_SECS: u64 = 120;

/// Embed for one page of a listing. `footer` is omitted on single-page posts.
fn page_embed(
    title: &str,
    body: &str,
    icon_url: Option<&str>,
    footer: Option<String>,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(body.to_owned());

    embed = match icon_url {
        Some(url) => embed.author(serenity::CreateEmbedAuthor::new(title).icon_url(url)),
        None => embed.title(title.to_owned()),
    };

    if let Some(text) = footer {
        embed = embed.footer(serenity::CreateEmbedFooter::new(text));
    }

    embed
}

fn page_footer(page: usize, total: usize) -> Option<String> {
    (total > 1).then(|| format!("Page {} of {}", page + 1, total))
}

fn nav_buttons(scope: u64, page: usize, total: usize) -> Vec<serenity::CreateActionRow> {
    let at_start = page == 0;
    let at_end = page + 1 >= total;

    let button = |suffix: &str, label: &str, disabled: bool| {
        serenity::CreateButton::new(format!("{scope}_{suffix}"))
            .label(label)
            .style(serenity::ButtonStyle::Secondary)
            .disabled(disabled)
    };

    vec![serenity::CreateActionRow::Buttons(vec![
        button("first", "«", at_start),
        button("prev", "Prev", at_start),
        button("next", "Next", at_end),
        button("last", "»", at_end),
    ])]
}

pub async fn send_paged_embed<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    send_paged_embed_with_icon(ctx, title, pages, start_page, None).await
}

/// Post `pages` behind first/prev/next/last buttons. Only the invoking
/// user can navigate, and the buttons are removed once the collector
/// times out. `start_page` is 1-based and clamped into range.
pub async fn send_paged_embed_with_icon<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
    icon_url: Option<&str>,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let total = pages.len();

    if total == 0 {
        return Ok(());
    }

    let mut page = start_page.clamp(1, total) - 1;

    if total == 1 {
        ctx.send(poise::CreateReply::default().embed(page_embed(title, &pages[0], icon_url, None)))
            .await?;

        return Ok(());
    }

    let scope = ctx.id();
    let scope_prefix = format!("{scope}_");

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(page_embed(
                    title,
                    &pages[page],
                    icon_url,
                    page_footer(page, total),
                ))
                .components(nav_buttons(scope, page, total)),
        )
        .await?;

    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;
    let author_id = ctx.author().id;

    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .filter({
            let scope_prefix = scope_prefix.clone();
            move |interaction| {
                interaction.message.id == message_id
                    && interaction.user.id == author_id
                    && interaction.data.custom_id.starts_with(&scope_prefix)
            }
        })
        .timeout(Duration::from_secs(NAV_TIMEOUT_SECS))
        .await
    {
        page = match press.data.custom_id.strip_prefix(&scope_prefix) {
            Some("first") => 0,
            Some("prev") => page.saturating_sub(1),
            Some("next") => (page + 1).min(total - 1),
            Some("last") => total - 1,
            _ => continue,
        };

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(page_embed(
                            title,
                            &pages[page],
                            icon_url,
                            page_footer(page, total),
                        ))
                        .components(nav_buttons(scope, page, total)),
                ),
            )
            .await?;
    }

    // Timed out; strip the nav buttons.
    let _ = channel_id
        .edit_message(
            ctx.http(),
            message_id,
            serenity::EditMessage::new()
                .embed(page_embed(
                    title,
                    &pages[page],
                    icon_url,
                    page_footer(page, total),
                ))
                .components(Vec::new()),
        )
        .await;

    Ok(())
}
