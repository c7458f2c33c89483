use crate::CommandMeta;

/// One help page: command lines grouped under their category headings.
pub fn help_page_body(commands: &[&CommandMeta]) -> String {
    let mut body = String::new();
    let mut open_category: Option<&str> = None;

    for meta in commands {
        if open_category != Some(meta.category) {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&format!("**{}**\n", category_title(meta.category)));
            open_category = Some(meta.category);
        }

        body.push_str(&format!("• `{}` — {}\n", meta.name, meta.desc));
    }

    body.trim_end().to_owned()
}

pub fn bad_category_reply(wanted: &str, known: &[&str]) -> String {
    let listing = known
        .iter()
        .map(|category| format!("`{category}`"))
        .collect::<Vec<_>>()
        .join(", ");

    format!("There is no `{wanted}` category. Pick one of: {listing}.")
}

pub fn bad_page_reply(total: usize) -> String {
    format!("That page is empty. The directory runs to page {total}.")
}

fn category_title(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_page_groups_by_category() {
        let first = CommandMeta {
            name: "rank",
            desc: "Check a rank.",
            category: "leveling",
            usage: "!rank",
        };
        let second = CommandMeta {
            name: "ping",
            desc: "Pong.",
            category: "utility",
            usage: "!ping",
        };

        let body = help_page_body(&[&first, &second]);

        assert!(body.starts_with("**Leveling**"));
        assert!(body.contains("• `rank` — Check a rank."));
        assert!(body.contains("**Utility**"));
        assert!(!body.ends_with('\n'));
    }

    #[test]
    fn bad_category_lists_known_names() {
        let reply = bad_category_reply("music", &["leveling", "utility"]);
        assert!(reply.contains("`music`"));
        assert!(reply.contains("`leveling`, `utility`"));
    }
}
