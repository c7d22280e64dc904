//! Screen view models and their composition onto the panel.

pub mod strings;
pub mod widgets;

use core::fmt::Write;

use heapless::String;
use log::debug;

use crate::{
    ascii,
    canvas::PixelSink,
    font::{FontInfo, GlyphSource},
    text::{DEFAULT_CHINESE_SIZE, FontRenderContext},
};

const TITLE_DIVIDER_Y: i32 = 10;
const LIST_TOP: i32 = 14;
const CHINESE_ROWS: usize = 3;
const CHINESE_ROW_HEIGHT: i32 = 18;
const ASCII_ROWS: usize = 5;
const ASCII_ROW_HEIGHT: i32 = 10;
const ITEM_TEXT_X: i32 = 6;
const SELECTION_STRIPE_W: i32 = 3;
const SCROLL_RAIL_X: i32 = 123;
const SCROLL_THUMB_H: i32 = 8;
const CHINESE_MESSAGE_ROWS: [i32; 3] = [0, 20, 40];
const ASCII_MESSAGE_TOP: i32 = 16;
const ASCII_MESSAGE_PITCH: i32 = 16;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimelapseStatusView {
    pub running: bool,
    pub captured: u32,
    pub total: u32,
    pub interval_s: u32,
    pub next_shot_s: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SystemInfoView<'a> {
    pub battery_pct: u8,
    pub charging: bool,
    pub wifi_connected: bool,
    pub sd_mounted: bool,
    pub ip_addr: Option<&'a str>,
    pub font: Option<FontInfo>,
}

/// App-level view model consumed by [`ScreenRenderer`].
#[derive(Clone, Copy, Debug)]
pub enum Screen<'a> {
    /// Up to three lines of GB2312, UTF-8, or ASCII text.
    Message { lines: [Option<&'a [u8]>; 3] },
    Menu {
        items: &'a [&'a [u8]],
        selected: usize,
    },
    TimelapseStatus(TimelapseStatusView),
    SystemInfo(SystemInfoView<'a>),
    Preview {
        gray: &'a [u8],
        width: usize,
        height: usize,
    },
}

impl<'a> Screen<'a> {
    pub const fn message(line1: &'a [u8], line2: Option<&'a [u8]>, line3: Option<&'a [u8]>) -> Self {
        Self::Message {
            lines: [Some(line1), line2, line3],
        }
    }
}

/// Clears the sink and draws one screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenRenderer;

impl ScreenRenderer {
    pub const fn new() -> Self {
        Self
    }

    pub fn render<G, S>(&self, screen: &Screen<'_>, ctx: &mut FontRenderContext<G>, sink: &mut S)
    where
        G: GlyphSource,
        S: PixelSink + ?Sized,
    {
        let (w, h) = (sink.width(), sink.height());
        sink.fill_rect(0, 0, w, h, false);

        match *screen {
            Screen::Message { lines } => render_message(ctx, sink, &lines),
            Screen::Menu { items, selected } => render_menu(ctx, sink, items, selected),
            Screen::TimelapseStatus(view) => render_status(sink, &view),
            Screen::SystemInfo(view) => render_system_info(sink, &view),
            Screen::Preview {
                gray,
                width,
                height,
            } => {
                if !widgets::draw_dithered(sink, gray, width, height) {
                    debug!("ui: preview frame rejected ({width}x{height})");
                    ascii::draw_string(sink, 0, ASCII_MESSAGE_TOP, b"Preview\nFailed!", 1, true);
                }
            }
        }
    }
}

fn render_message<G, S>(ctx: &mut FontRenderContext<G>, sink: &mut S, lines: &[Option<&[u8]>; 3])
where
    G: GlyphSource,
    S: PixelSink + ?Sized,
{
    if ctx.is_chinese_available() {
        for (line, y) in lines.iter().zip(CHINESE_MESSAGE_ROWS) {
            if let Some(text) = line {
                ctx.draw_mixed_string(sink, 0, y, text, DEFAULT_CHINESE_SIZE, true);
            }
        }
        return;
    }

    let mut y = ASCII_MESSAGE_TOP;
    for text in lines.iter().flatten() {
        ascii::draw_string(sink, 0, y, text, 1, true);
        y += ASCII_MESSAGE_PITCH;
    }
}

fn render_title<S: PixelSink + ?Sized>(sink: &mut S, title: &[u8]) {
    ascii::draw_string(sink, 0, 0, title, 1, true);
    let w = sink.width();
    sink.hline(0, TITLE_DIVIDER_Y, w, true);
}

/// First visible row so that `selected` stays on screen.
fn first_visible(selected: usize, visible: usize) -> usize {
    (selected + 1).saturating_sub(visible)
}

fn render_menu<G, S>(ctx: &mut FontRenderContext<G>, sink: &mut S, items: &[&[u8]], selected: usize)
where
    G: GlyphSource,
    S: PixelSink + ?Sized,
{
    if items.is_empty() {
        return;
    }

    render_title(sink, b"MENU");

    let has_chinese = items[0].iter().any(|b| *b >= 0x80);
    let use_font = has_chinese && ctx.is_chinese_available();
    let (visible, row_h) = if has_chinese {
        (CHINESE_ROWS, CHINESE_ROW_HEIGHT)
    } else {
        (ASCII_ROWS, ASCII_ROW_HEIGHT)
    };

    let selected = selected.min(items.len() - 1);
    let start = first_visible(selected, visible);
    let width = sink.width();

    for (row, (index, item)) in items.iter().enumerate().skip(start).take(visible).enumerate() {
        let y = LIST_TOP + row as i32 * row_h;
        let is_selected = index == selected;

        if is_selected {
            sink.fill_rect(0, y - 1, width, row_h, true);
        }

        if use_font {
            ctx.draw_mixed_string(sink, ITEM_TEXT_X, y, item, DEFAULT_CHINESE_SIZE, !is_selected);
        } else {
            ascii::draw_string(sink, ITEM_TEXT_X, y, item, 1, !is_selected);
        }

        if is_selected {
            sink.fill_rect(0, y - 1, SELECTION_STRIPE_W, row_h, false);
        }
    }

    if items.len() > visible {
        let rail_h = (visible as i32 * row_h).min(sink.height() - LIST_TOP);
        let pos = (rail_h - SCROLL_THUMB_H) * selected as i32 / (items.len() as i32 - 1);
        sink.rect(SCROLL_RAIL_X, LIST_TOP, 4, rail_h, true);
        sink.fill_rect(SCROLL_RAIL_X + 1, LIST_TOP + pos, 2, SCROLL_THUMB_H, true);
    }
}

fn render_status<S: PixelSink + ?Sized>(sink: &mut S, view: &TimelapseStatusView) {
    render_title(sink, b"TIMELAPSE");

    if view.running {
        ascii::draw_string(sink, 100, 0, b"RUN", 1, true);
        widgets::camera(sink, 85, 0, true);
    } else {
        ascii::draw_string(sink, 92, 0, b"STOP", 1, true);
    }

    let mut buf: String<32> = String::new();
    let _ = write!(buf, "{}/{}", view.captured, view.total);
    ascii::draw_string(sink, 0, 16, buf.as_bytes(), 2, true);

    let percent = if view.total > 0 {
        (view.captured as u64 * 100 / view.total as u64) as i32
    } else {
        0
    };
    let width = sink.width();
    widgets::progress_bar(sink, 0, 38, width, 10, percent);

    if view.running && view.next_shot_s > 0 {
        buf.clear();
        let _ = write!(buf, "Next: {}s", view.next_shot_s);
        ascii::draw_string(sink, 0, 52, buf.as_bytes(), 1, true);
    }

    buf.clear();
    let _ = write!(buf, "Int: {}s", view.interval_s);
    ascii::draw_string(sink, 72, 52, buf.as_bytes(), 1, true);
}

fn render_system_info<S: PixelSink + ?Sized>(sink: &mut S, view: &SystemInfoView<'_>) {
    render_title(sink, b"SYSTEM INFO");

    widgets::battery(sink, 0, 16, view.battery_pct, view.charging);
    widgets::wifi(sink, 20, 16, view.wifi_connected);
    widgets::sd_card(sink, 36, 16, view.sd_mounted);

    let mut buf: String<32> = String::new();
    let _ = write!(buf, "{}%", view.battery_pct);
    ascii::draw_string(sink, 50, 16, buf.as_bytes(), 1, true);

    match view.font {
        Some(font) => {
            buf.clear();
            let _ = write!(buf, "GB{}", font.pixel_size);
            ascii::draw_string(sink, 88, 16, buf.as_bytes(), 1, true);
        }
        None => {
            ascii::draw_string(sink, 88, 16, b"ASCII", 1, true);
        }
    }

    if let (Some(ip), true) = (view.ip_addr, view.wifi_connected) {
        ascii::draw_string(sink, 0, 32, b"IP:", 1, true);
        ascii::draw_string(sink, 24, 32, ip.as_bytes(), 1, true);
    }

    ascii::draw_string(sink, 0, 52, b"K1:Menu K2:Start K3:Stop", 1, true);
}
