//! Line-wise Markdown rendering for generated plans.
//!
//! Covers what plan text actually uses: ATX headings, pipe tables, bullet and
//! numbered lists, horizontal rules and paragraphs. Inline `[label](url)`
//! links and bare `http(s)://` URLs become clickable; emphasis markers are
//! stripped rather than styled.

use super::style;
use eframe::egui::{self, RichText};

/// A run of inline content.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum Span {
    Text(String),
    Link { label: String, url: String },
}

pub(super) type Inline = Vec<Span>;

#[derive(Clone, Debug, PartialEq)]
pub(super) enum Block {
    Heading { level: usize, text: String },
    Table(Vec<Vec<Inline>>),
    Bullet(Inline),
    Numbered { marker: String, text: Inline },
    Paragraph(Inline),
    Rule,
    Blank,
}

pub(super) fn parse_blocks(source: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut table: Vec<Vec<Inline>> = Vec::new();
    for raw in source.lines() {
        let line = raw.trim();
        if line.starts_with('|') {
            if !is_separator_row(line) {
                table.push(split_row(line));
            }
            continue;
        }
        if !table.is_empty() {
            blocks.push(Block::Table(std::mem::take(&mut table)));
        }
        blocks.push(parse_line(line));
    }
    if !table.is_empty() {
        blocks.push(Block::Table(table));
    }
    blocks
}

fn parse_line(line: &str) -> Block {
    if line.is_empty() {
        return Block::Blank;
    }
    if is_rule(line) {
        return Block::Rule;
    }
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
        return Block::Heading {
            level: hashes,
            text: plain_text(&parse_inline(line[hashes..].trim())),
        };
    }
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
    {
        return Block::Bullet(parse_inline(rest));
    }
    if let Some((marker, rest)) = line.split_once(". ") {
        if !marker.is_empty() && marker.chars().all(|c| c.is_ascii_digit()) {
            return Block::Numbered {
                marker: format!("{marker}."),
                text: parse_inline(rest),
            };
        }
    }
    Block::Paragraph(parse_inline(line))
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && (compact.chars().all(|c| c == '-')
            || compact.chars().all(|c| c == '*')
            || compact.chars().all(|c| c == '_'))
}

fn is_separator_row(line: &str) -> bool {
    line.chars()
        .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
        && line.contains('-')
}

fn split_row(line: &str) -> Vec<Inline> {
    let inner = line.trim_matches('|');
    inner.split('|').map(|cell| parse_inline(cell.trim())).collect()
}

/// Split text into plain runs and links, after dropping emphasis markers.
pub(super) fn parse_inline(text: &str) -> Inline {
    let text = strip_markers(text);
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text.as_str();
    while let Some(ch) = rest.chars().next() {
        let at_word_start = plain.chars().last().is_none_or(char::is_whitespace);
        let link = split_link(rest)
            .or_else(|| at_word_start.then(|| split_bare_url(rest)).flatten());
        if let Some((label, url, tail)) = link {
            if !plain.is_empty() {
                spans.push(Span::Text(std::mem::take(&mut plain)));
            }
            spans.push(Span::Link {
                label: label.to_string(),
                url: url.to_string(),
            });
            rest = tail;
        } else {
            plain.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    if !plain.is_empty() {
        spans.push(Span::Text(plain));
    }
    spans
}

/// `[label](url)` at the start of `text`: returns label, url and the remainder.
fn split_link(text: &str) -> Option<(&str, &str, &str)> {
    let body = text.strip_prefix('[')?;
    let close = body.find("](")?;
    let label = &body[..close];
    if label.is_empty() || label.contains('[') || label.contains(']') {
        return None;
    }
    let after = &body[close + 2..];
    let end = after.find(')')?;
    let url = after[..end].trim();
    if url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }
    Some((label, url, &after[end + 1..]))
}

/// Bare `http(s)://` URL at the start of `text`, minus trailing punctuation.
fn split_bare_url(text: &str) -> Option<(&str, &str, &str)> {
    if !(text.starts_with("https://") || text.starts_with("http://")) {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let url = text[..end].trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
    if url.ends_with("://") {
        return None;
    }
    Some((url, url, &text[url.len()..]))
}

fn plain_text(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(text) => text.as_str(),
            Span::Link { label, .. } => label.as_str(),
        })
        .collect()
}

/// Drop emphasis/code markers and turn `<br>` into line breaks.
fn strip_markers(text: &str) -> String {
    let text = text
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("**", "")
        .replace("__", "")
        .replace('`', "");
    strip_single_stars(&text)
}

/// Remove `*` pairs that wrap a word (`*free*`); lone or spaced stars stay.
fn strip_single_stars(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut dropped = vec![false; chars.len()];
    let mut open: Option<usize> = None;
    for (index, ch) in chars.iter().enumerate() {
        if *ch != '*' {
            continue;
        }
        match open {
            Some(start) if index > start + 1 && !chars[index - 1].is_whitespace() => {
                dropped[start] = true;
                dropped[index] = true;
                open = None;
            }
            _ => {
                if chars.get(index + 1).is_some_and(|next| !next.is_whitespace()) {
                    open = Some(index);
                }
            }
        }
    }
    chars
        .into_iter()
        .zip(dropped)
        .filter_map(|(ch, dropped)| (!dropped).then_some(ch))
        .collect()
}

pub(super) fn render(ui: &mut egui::Ui, source: &str) {
    let palette = style::palette();
    for (index, block) in parse_blocks(source).into_iter().enumerate() {
        match block {
            Block::Heading { level, text } => {
                let size = match level {
                    1 => 22.0,
                    2 => 19.0,
                    3 => 17.0,
                    _ => 15.0,
                };
                ui.add_space(6.0);
                ui.label(RichText::new(text).size(size).strong());
            }
            Block::Table(rows) => render_table(ui, index, &rows),
            Block::Bullet(text) => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("\u{2022} ").color(palette.accent));
                    render_inline(ui, &text, false);
                });
            }
            Block::Numbered { marker, text } => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{marker} ")).color(palette.accent));
                    render_inline(ui, &text, false);
                });
            }
            Block::Paragraph(text) => {
                ui.horizontal_wrapped(|ui| render_inline(ui, &text, false));
            }
            Block::Rule => {
                ui.separator();
            }
            Block::Blank => ui.add_space(4.0),
        }
    }
}

/// Lay spans out as one flowing line; call inside a horizontal layout.
fn render_inline(ui: &mut egui::Ui, spans: &[Span], strong: bool) {
    ui.spacing_mut().item_spacing.x = 0.0;
    for span in spans {
        match span {
            Span::Text(text) => {
                let text = RichText::new(text);
                ui.label(if strong { text.strong() } else { text });
            }
            Span::Link { label, url } => {
                ui.hyperlink_to(label.as_str(), url);
            }
        }
    }
}

fn render_table(ui: &mut egui::Ui, index: usize, rows: &[Vec<Inline>]) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return;
    }
    ui.add_space(4.0);
    egui::ScrollArea::horizontal()
        .id_salt(("plan_table_scroll", index))
        .show(ui, |ui| {
            egui::Grid::new(("plan_table", index))
                .striped(true)
                .num_columns(columns)
                .spacing([18.0, 4.0])
                .show(ui, |ui| {
                    for (row_index, row) in rows.iter().enumerate() {
                        for column in 0..columns {
                            let cell = row.get(column).map(Vec::as_slice).unwrap_or(&[]);
                            ui.horizontal_wrapped(|ui| render_inline(ui, cell, row_index == 0));
                        }
                        ui.end_row();
                    }
                });
        });
    ui.add_space(4.0);
}
