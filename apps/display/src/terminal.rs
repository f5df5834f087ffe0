use std::{
    fmt::Write as _,
    fs,
    io::{self, Write},
    path::PathBuf,
};

use client_core::{
    html::{self, MilkPalette},
    BoardView, CardHeader, DisplaySurface, Notice,
};
use tracing::warn;

/// Prints the board to stdout and optionally mirrors it as an HTML page.
pub struct TerminalSurface {
    html: Option<HtmlMirror>,
}

struct HtmlMirror {
    path: PathBuf,
    palette: MilkPalette,
    view: BoardView,
    /// Stale-feed warning, kept until the feed recovers.
    feed_notice: Option<String>,
    /// Result of the last user action, dropped on the next render.
    notice: Option<String>,
}

impl HtmlMirror {
    fn write(&self) {
        let notices: Vec<&str> = self
            .feed_notice
            .iter()
            .chain(self.notice.iter())
            .map(String::as_str)
            .collect();
        let page = html::render_page(&self.view, &self.palette, &notices);
        if let Err(err) = fs::write(&self.path, page) {
            warn!(path = %self.path.display(), error = %err, "display: failed to write html board");
        }
    }
}

impl TerminalSurface {
    pub fn new(html_output: Option<PathBuf>, palette: MilkPalette) -> Self {
        Self {
            html: html_output.map(|path| HtmlMirror {
                path,
                palette,
                view: BoardView::default(),
                feed_notice: None,
                notice: None,
            }),
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn replace_queue(&mut self, view: &BoardView) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(format_board(view).as_bytes());
        let _ = out.flush();

        if let Some(mirror) = &mut self.html {
            mirror.view = view.clone();
            mirror.notice = None;
            mirror.write();
        }
    }

    fn show_notice(&mut self, notice: &Notice) {
        println!("! {notice}");

        if let Some(mirror) = &mut self.html {
            if notice.is_feed_status() {
                mirror.feed_notice = Some(notice.to_string());
            } else {
                mirror.notice = Some(notice.to_string());
            }
            mirror.write();
        }
    }

    fn clear_feed_notice(&mut self) {
        if let Some(mirror) = &mut self.html {
            mirror.feed_notice = None;
            mirror.write();
        }
    }
}

/// Plain-text board. Entries are numbered from 1, selected items end in `*`.
pub fn format_board(view: &BoardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}   {}", view.orders_counter, view.drinks_counter);
    if view.cards.is_empty() {
        out.push_str("  (queue empty)\n");
    }

    for card in &view.cards {
        let title = match &card.header {
            CardHeader::Order { customer, received } => format!("{customer} {received}"),
            CardHeader::Batch { heading } => heading.clone(),
        };
        let _ = writeln!(out, "[{}] {title}{}", card.index + 1, mark(card.selected));

        for drink in &card.drinks {
            let _ = write!(out, "    - {} {} ({})", drink.identifier, drink.name, drink.milk_label);
            if let Some(customer) = &drink.customer {
                let _ = write!(out, " for {customer}");
            }
            if !drink.options.is_empty() {
                let _ = write!(out, ": {}", drink.options.join(", "));
            }
            let _ = writeln!(out, "{}", mark(drink.selected));
        }
    }
    out
}

fn mark(selected: bool) -> &'static str {
    if selected {
        " *"
    } else {
        ""
    }
}
