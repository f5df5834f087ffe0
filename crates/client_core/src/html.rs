//! HTML projection of a [`BoardView`], using the same card classes the
//! board stylesheet targets (`order-batch-card`, `drink-card`, `selected`).

use std::{collections::HashMap, fmt::Write as _};

use crate::view::{BoardView, CardHeader, DrinkCard, EntryCard};

/// Milk type to CSS color, e.g. `OatMilk -> #c8a165`.
pub type MilkPalette = HashMap<String, String>;

pub fn render_board(view: &BoardView, palette: &MilkPalette) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class=\"order-summary\"><span class=\"order-count\">{}</span><span class=\"drink-count\">{}</span></div>",
        escape(&view.orders_counter),
        escape(&view.drinks_counter)
    );
    out.push_str("<div id=\"orderList\">");
    for card in &view.cards {
        render_entry(&mut out, card, palette);
    }
    out.push_str("</div>");
    out
}

/// Full page wrapper for surfaces that write a standalone file.
pub fn render_page(view: &BoardView, palette: &MilkPalette, notices: &[&str]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Order Board</title></head><body>",
    );
    for notice in notices {
        let _ = write!(out, "<p class=\"notice\">{}</p>", escape(notice));
    }
    out.push_str(&render_board(view, palette));
    out.push_str("</body></html>");
    out
}

fn render_entry(out: &mut String, card: &EntryCard, palette: &MilkPalette) {
    let selected = if card.selected { " selected" } else { "" };
    let _ = write!(
        out,
        "<div class=\"order-batch-card{selected}\" id=\"order-{}\">",
        card.index
    );
    out.push_str("<div class=\"order-batch-card-header\">");
    match &card.header {
        CardHeader::Order { customer, received } => {
            let _ = write!(
                out,
                "<h2>Order</h2><h3>{}</h3><h6>{}</h6>",
                escape(customer),
                escape(received)
            );
        }
        CardHeader::Batch { heading } => {
            let _ = write!(out, "<h2>{}</h2>", escape(heading));
        }
    }
    out.push_str("</div><div class=\"order-batch-card-body\"><ul>");
    for drink in &card.drinks {
        render_drink(out, drink, palette);
    }
    out.push_str("</ul></div></div>");
}

fn render_drink(out: &mut String, drink: &DrinkCard, palette: &MilkPalette) {
    let selected = if drink.selected { " selected" } else { "" };
    let milk_class = drink.milk_class.as_deref().unwrap_or("NoMilk");
    let style = palette
        .get(milk_class)
        .map(|color| format!(" style=\"background-color: {}\"", escape(color)))
        .unwrap_or_default();

    let _ = write!(
        out,
        "<li><div class=\"drink-card{selected}\" id=\"drink-{}\">",
        escape(drink.identifier.as_str())
    );
    let _ = write!(
        out,
        "<div class=\"drink-card-header {}\"{style}><span class=\"drink-name\">{}</span></div>",
        escape(milk_class),
        escape(&drink.name)
    );
    out.push_str("<div class=\"drink-card-body\"><ul><li class=\"drink-card-text-info\">");
    if let Some(customer) = &drink.customer {
        let _ = write!(out, "<p class=\"drink-customer\">{}</p>", escape(customer));
    }
    let _ = write!(out, "<p>{}</p>", escape(&drink.milk_label));
    for option in &drink.options {
        let _ = write!(out, "<p>{}</p>", escape(option));
    }
    out.push_str("</li></ul></div></div></li>");
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
