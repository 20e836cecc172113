use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use life_braille::{Frame, Session};
use std::io::{self, Write};

pub(crate) const MARQUEE_LEN: usize = 8;
const MARQUEE_SLOT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Write only the cells that changed since the last present.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/// Logical grid size for a terminal, two columns and four rows of cells per
/// character above the status bar.
pub(crate) fn logical_size(cols: u16, rows: u16, status_rows: u16) -> (usize, usize) {
    let w = cols as usize * 2;
    let h = rows.saturating_sub(status_rows) as usize * 4;
    (w, h)
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg: Color::Black });
    }
}

pub(crate) fn draw_frame(buf: &mut CellBuffer, frame: &Frame, enable_color: bool) {
    for row in 0..frame.rows.min(buf.h as usize) {
        for col in 0..frame.cols.min(buf.w as usize) {
            let is_cursor = frame.cursor == Some((col, row));
            let fg = match (enable_color, is_cursor) {
                (true, true) => Color::Yellow,
                (true, false) => Color::Green,
                (false, _) => Color::White,
            };
            buf.set(
                col as u16,
                row as u16,
                Cell {
                    ch: frame.glyph(col, row),
                    fg,
                    bg: Color::Black,
                },
            );
        }
    }
}

/// Status bar text: counters, a rotating window of shape previews with their
/// keys underneath, and the current speed.
pub(crate) fn status_lines(session: &Session, marquee_index: usize) -> Vec<String> {
    let stats = session.stats();
    let catalog = session.catalog();
    let shapes = catalog.shapes();

    let mut previews = String::new();
    let mut keys = String::new();
    for i in 0..MARQUEE_LEN.min(shapes.len()) {
        let shape = &shapes[(marquee_index + i) % shapes.len()];
        let preview = catalog.preview(shape, session.renderer());
        previews.push_str(&pad_end(&preview, MARQUEE_SLOT));
        keys.push_str(&pad_end(&format!("{:>2}", shape.key), MARQUEE_SLOT));
    }
    keys.push_str(&format!("Speed: {} gen/s", stats.generations_per_sec));

    vec![
        format!(
            "Living: {}, Longest: {} TK",
            stats.total_living, stats.longest_living
        ),
        previews,
        keys,
        String::new(),
        "arrows move  space toggle  1-9 speed  q quit".to_string(),
    ]
}

fn pad_end(s: &str, width: usize) -> String {
    let n = s.chars().count();
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(n)));
    out
}

pub(crate) fn draw_status(buf: &mut CellBuffer, top: u16, lines: &[String], enable_color: bool) {
    let fg = if enable_color { Color::Cyan } else { Color::White };
    for (i, line) in lines.iter().enumerate() {
        let y = top.saturating_add(i as u16);
        if y >= buf.h {
            break;
        }
        draw_text(buf, 0, y, line, fg);
    }
}
