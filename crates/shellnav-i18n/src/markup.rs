//! `data-i18n` substitution over HTML fragments
//!
//! Only elements carrying the translation attribute are touched: their
//! children are replaced by a single text node holding the translation.
//! Markup without such elements is returned as is.

use scraper::node::Text;
use scraper::{Html, Node, Selector, StrTendril};

pub const TRANSLATION_ATTR: &str = "data-i18n";

/// Rewrite `markup`, replacing the text of every `data-i18n` element with `lookup(key)`.
pub fn translate_markup<F>(markup: &str, lookup: F) -> String
where
    F: Fn(&str) -> String,
{
    let Ok(selector) = Selector::parse(&format!("[{TRANSLATION_ATTR}]")) else {
        return markup.to_string();
    };

    let mut fragment = Html::parse_fragment(markup);
    let targets: Vec<_> = fragment
        .select(&selector)
        .filter_map(|el| {
            let key = el.value().attr(TRANSLATION_ATTR)?.trim();
            (!key.is_empty()).then(|| (el.id(), lookup(key)))
        })
        .collect();

    if targets.is_empty() {
        return markup.to_string();
    }

    for (id, text) in targets {
        let Some(mut node) = fragment.tree.get_mut(id) else {
            continue;
        };
        while let Some(mut child) = node.first_child() {
            child.detach();
        }
        node.append(Node::Text(Text {
            text: StrTendril::from(text),
        }));
    }

    fragment.root_element().inner_html()
}
