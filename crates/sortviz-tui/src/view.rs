#![forbid(unsafe_code)]

//! Bar chart rendering.
//!
//! Layout is computed by pure functions ([`bar_heights`], [`bar_columns`])
//! and drawn with crossterm commands into any [`Write`], so frames can be
//! rendered into a buffer in tests.
//!
//! ```text
//! row 0        title + status
//! row 1        size, delay, complexity
//! row 2        definition
//! rows 3..h-1  bars, bottom-aligned
//! row h-1      run summary or key hints
//! ```

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use sortviz_core::{Algorithm, Role, RunSummary, VALUE_MAX};

const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 1;
const BAR: &str = "█";

const HELP_LINES: &[&str] = &[
    "Keys",
    "",
    "Space   start / stop",
    "r       new array",
    "1-6     algorithm",
    "[ ]     size -5 / +5",
    "- +     slower / faster",
    "?       close help",
    "q       quit",
    "",
    "Colors",
    "",
    "red     compared / moved",
    "yellow  candidate",
    "magenta pivot",
    "green   sorted",
];

/// Everything one frame shows.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    pub array: &'a [u32],
    /// Role per position; shorter than `array` means no role for the rest.
    pub roles: &'a [Option<Role>],
    pub algorithm: Algorithm,
    pub status: &'a str,
    pub size: usize,
    pub delay_ms: u64,
    pub summary: Option<RunSummary>,
    pub error: Option<&'a str>,
    pub help: bool,
}

/// Bar color for a highlight role.
#[must_use]
pub const fn role_color(role: Option<Role>) -> Color {
    match role {
        None => Color::Blue,
        Some(Role::Active) => Color::Red,
        Some(Role::Candidate) => Color::Yellow,
        Some(Role::Pivot) => Color::Magenta,
        Some(Role::Sorted) => Color::Green,
    }
}

/// Height in rows of each bar, scaled so `VALUE_MAX` (or the largest value,
/// if bigger) fills `rows`. Non-zero values are at least one row tall.
#[must_use]
pub fn bar_heights(values: &[u32], rows: u16) -> Vec<u16> {
    let scale = u64::from(values.iter().copied().max().unwrap_or(0).max(VALUE_MAX));
    values
        .iter()
        .map(|&value| {
            if value == 0 || rows == 0 {
                return 0;
            }
            let scaled = (u64::from(value) * u64::from(rows)).div_ceil(scale);
            scaled.clamp(1, u64::from(rows)) as u16
        })
        .collect()
}

/// Horizontal layout of the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    /// Bars that fit on screen, from the left.
    pub visible: usize,
    pub bar_width: u16,
    pub gap: u16,
    /// Left padding that centers the chart.
    pub offset: u16,
}

/// Fit `count` bars into `width` columns.
///
/// Bars get a one-column gap when each slot is at least three wide. When
/// there are more bars than columns only the first `width` are shown.
#[must_use]
pub fn bar_columns(count: usize, width: u16) -> Columns {
    if count == 0 || width == 0 {
        return Columns {
            visible: 0,
            bar_width: 0,
            gap: 0,
            offset: 0,
        };
    }
    let visible = count.min(usize::from(width));
    let slot = width / visible as u16;
    let (bar_width, gap) = if slot >= 3 { (slot - 1, 1) } else { (slot, 0) };
    let used = visible as u16 * (bar_width + gap) - gap;
    Columns {
        visible,
        bar_width,
        gap,
        offset: (width - used) / 2,
    }
}

/// Keep at most `width` characters.
fn clip(text: &str, width: u16) -> String {
    text.chars().take(usize::from(width)).collect()
}

/// Draw a full frame of `width` x `height` cells.
pub fn render<W: Write>(out: &mut W, model: &ViewModel<'_>, width: u16, height: u16) -> io::Result<()> {
    queue!(out, ResetColor, Clear(ClearType::All))?;
    if width == 0 || height == 0 {
        return out.flush();
    }

    let info = model.algorithm.info();
    let title = format!("sortviz · {}  [{}]", info.name, model.status);
    queue!(
        out,
        MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        Print(clip(&title, width)),
        SetAttribute(Attribute::Reset)
    )?;
    if height > 1 {
        let details = format!(
            "size {}  delay {}ms  best {}  avg {}  worst {}  space {}",
            model.size, model.delay_ms, info.best, info.average, info.worst, info.space
        );
        queue!(out, MoveTo(0, 1), Print(clip(&details, width)))?;
    }
    if height > 2 {
        queue!(
            out,
            MoveTo(0, 2),
            SetForegroundColor(Color::DarkGrey),
            Print(clip(info.definition, width)),
            ResetColor
        )?;
    }

    if height > HEADER_ROWS + FOOTER_ROWS {
        let rows = height - HEADER_ROWS - FOOTER_ROWS;
        draw_bars(out, model, width, rows)?;
    }

    let footer = if let Some(error) = model.error {
        format!("error: {error}")
    } else if let Some(summary) = model.summary {
        format!(
            "steps {}  comparisons {}  swaps {}  writes {}   ? help",
            summary.steps, summary.comparisons, summary.swaps, summary.overwrites
        )
    } else {
        "space start/stop  r new  1-6 algorithm  [ ] size  - + speed  ? help  q quit".to_string()
    };
    queue!(out, MoveTo(0, height - 1), Print(clip(&footer, width)))?;

    if model.help {
        draw_help(out, width, height)?;
    }

    queue!(out, ResetColor)?;
    out.flush()
}

fn draw_bars<W: Write>(out: &mut W, model: &ViewModel<'_>, width: u16, rows: u16) -> io::Result<()> {
    let columns = bar_columns(model.array.len(), width);
    let heights = bar_heights(&model.array[..columns.visible], rows);
    let cell = BAR.repeat(usize::from(columns.bar_width));
    let bottom = HEADER_ROWS + rows - 1;

    for (index, &bar_height) in heights.iter().enumerate() {
        let role = model.roles.get(index).copied().flatten();
        let x = columns.offset + index as u16 * (columns.bar_width + columns.gap);
        queue!(out, SetForegroundColor(role_color(role)))?;
        for level in 0..bar_height {
            queue!(out, MoveTo(x, bottom - level), Print(&cell))?;
        }
    }
    queue!(out, ResetColor)
}

fn draw_help<W: Write>(out: &mut W, width: u16, height: u16) -> io::Result<()> {
    let inner = HELP_LINES.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4;
    let box_width = inner.min(width);
    let box_height = (HELP_LINES.len() as u16 + 2).min(height);
    let left = (width - box_width) / 2;
    let top = (height - box_height) / 2;

    let blank = " ".repeat(usize::from(box_width));
    queue!(out, SetForegroundColor(Color::White))?;
    for row in 0..box_height {
        queue!(out, MoveTo(left, top + row), Print(&blank))?;
    }
    for (i, line) in HELP_LINES.iter().enumerate().take(usize::from(box_height.saturating_sub(2))) {
        queue!(
            out,
            MoveTo(left + 2, top + 1 + i as u16),
            Print(clip(line, box_width.saturating_sub(2)))
        )?;
    }
    queue!(out, ResetColor)
}
