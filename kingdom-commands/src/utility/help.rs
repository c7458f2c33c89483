use kingdom_core::{Context, Error};
use kingdom_utils::pagination::send_paged_embed;

use crate::utility::embeds::{bad_category_reply, bad_page_reply, help_page_body};
use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Browse every command, grouped by category.",
    category: "utility",
    usage: "!help [page|category]",
};

const COMMANDS_PER_PAGE: usize = 12;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Page number or category"] query: Option<String>,
) -> Result<(), Error> {
    let query = query.as_deref().map(str::trim);
    let wanted_page = query
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|page| *page >= 1);
    let wanted_category = match wanted_page {
        None => query.map(str::to_ascii_lowercase),
        Some(_) => None,
    };

    let mut known: Vec<&str> = COMMANDS.iter().map(|meta| meta.category).collect();
    known.sort_unstable();
    known.dedup();

    if let Some(wanted) = wanted_category.as_deref()
        && !known.contains(&wanted)
    {
        ctx.say(bad_category_reply(wanted, &known)).await?;
        return Ok(());
    }

    let listing = directory(wanted_category.as_deref());
    let pages = listing
        .chunks(COMMANDS_PER_PAGE)
        .map(help_page_body)
        .collect::<Vec<_>>();

    let page = wanted_page.unwrap_or(1);
    if page > pages.len() {
        ctx.say(bad_page_reply(pages.len())).await?;
        return Ok(());
    }

    send_paged_embed(ctx, "Command Directory", &pages, page).await?;
    Ok(())
}

fn directory(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut listing: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|meta| category.is_none_or(|wanted| meta.category == wanted))
        .collect();

    listing.sort_unstable_by_key(|meta| (meta.category, meta.name));
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sorts_by_category_then_name() {
        let listing = directory(None);

        assert_eq!(listing.len(), COMMANDS.len());
        for pair in listing.windows(2) {
            assert!((pair[0].category, pair[0].name) <= (pair[1].category, pair[1].name));
        }
    }

    #[test]
    fn directory_filters_to_one_category() {
        let listing = directory(Some("utility"));

        assert!(!listing.is_empty());
        assert!(listing.iter().all(|meta| meta.category == "utility"));
    }
}
