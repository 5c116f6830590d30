//! Board listings
//!
//! Styling goes through a [`Palette`] value handed to the [`Renderer`], so
//! nothing here touches global terminal state and tests can render plain
//! text into a buffer.

use std::io::{self, Write};

use crossterm::style::{StyledContent, Stylize};

use crate::domain::matcher::BoardView;
use crate::domain::{Stats, Task};

/// Colors for listings; a disabled palette returns text unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint<'a>(&self, text: &'a str, style: fn(&'a str) -> StyledContent<&'a str>) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Done markers and counts
    pub fn done(&self, text: &str) -> String {
        self.paint(text, |s| s.green())
    }

    /// Open markers and counts
    pub fn open(&self, text: &str) -> String {
        self.paint(text, |s| s.magenta())
    }

    /// Ids and finished task texts
    pub fn muted(&self, text: &str) -> String {
        self.paint(text, |s| s.dark_grey())
    }

    /// Board names
    pub fn heading(&self, text: &str) -> String {
        self.paint(text, |s| s.underlined())
    }
}

/// Writes board listings
pub struct Renderer {
    palette: Palette,
    indent: usize,
}

impl Renderer {
    pub fn new(palette: Palette, indent: usize) -> Self {
        Self { palette, indent }
    }

    /// Renders boards with their tasks followed by the completion summary.
    ///
    /// With `hide_empty`, boards without tasks in the view are skipped.
    pub fn render(
        &self,
        out: &mut impl Write,
        boards: &[BoardView<'_>],
        stats: Stats,
        hide_empty: bool,
    ) -> io::Result<()> {
        let shown: Vec<_> = boards
            .iter()
            .filter(|b| !hide_empty || !b.tasks.is_empty())
            .collect();

        if shown.is_empty() {
            if hide_empty {
                writeln!(out, "No matching tasks")?;
            } else {
                writeln!(out, "No tasks")?;
            }
            return Ok(());
        }

        let margin = " ".repeat(self.indent / 2);
        for board in shown {
            writeln!(out, "{}@{}", margin, self.palette.heading(board.name))?;
            for task in &board.tasks {
                self.render_task(out, task)?;
            }
            writeln!(out)?;
        }

        self.render_stats(out, stats)
    }

    fn render_task(&self, out: &mut impl Write, task: &Task) -> io::Result<()> {
        let id = format!("{}.", task.id);
        let pad = " ".repeat(self.indent.saturating_sub(id.chars().count()));
        let p = &self.palette;

        if task.done {
            writeln!(out, "{}{} {} {}", pad, p.muted(&id), p.done("[✓]"), p.muted(&task.text))
        } else {
            writeln!(out, "{}{} {} {}", pad, p.muted(&id), p.open("[ ]"), task.text)
        }
    }

    fn render_stats(&self, out: &mut impl Write, stats: Stats) -> io::Result<()> {
        let margin = " ".repeat(self.indent / 2);
        writeln!(out, "{}{}% of all tasks complete", margin, stats.percent_done())?;
        writeln!(
            out,
            "{}{} done | {} in progress",
            margin,
            self.palette.done(&stats.done.to_string()),
            self.palette.open(&stats.open.to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matcher::filter;
    use crate::domain::{now, Store};

    fn render_to_string(store: &Store, pattern: &str) -> String {
        let renderer = Renderer::new(Palette::plain(), 10);
        let mut buf = Vec::new();
        renderer
            .render(&mut buf, &filter(store, pattern), store.stats(), !pattern.is_empty())
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample_store() -> Store {
        let mut store = Store::new();
        store.create_board("actual").unwrap();
        store.add_task("buy milk", "actual", now()).unwrap();
        store.add_task("call mom", "actual", now()).unwrap();
        store.board_mut("actual").unwrap().tasks[1].complete();
        store
    }

    #[test]
    fn renders_boards_and_tasks() {
        let text = render_to_string(&sample_store(), "");

        assert!(text.contains("     @actual\n"));
        assert!(text.contains("        1. [ ] buy milk\n"));
        assert!(text.contains("        2. [✓] call mom\n"));
        assert!(text.contains("50% of all tasks complete"));
        assert!(text.contains("1 done | 1 in progress"));
    }

    #[test]
    fn pattern_hides_other_tasks() {
        let text = render_to_string(&sample_store(), "milk");

        assert!(text.contains("buy milk"));
        assert!(!text.contains("call mom"));
    }

    #[test]
    fn empty_store() {
        assert_eq!(render_to_string(&Store::new(), ""), "No tasks\n");
    }

    #[test]
    fn nothing_matches() {
        assert_eq!(render_to_string(&sample_store(), "zebra"), "No matching tasks\n");
    }

    #[test]
    fn plain_palette_leaves_text_alone() {
        let palette = Palette::plain();
        assert_eq!(palette.done("[✓]"), "[✓]");
        assert_eq!(palette.heading("actual"), "actual");
    }

    #[test]
    fn enabled_palette_adds_escape_codes() {
        let palette = Palette::new(true);
        let painted = palette.heading("actual");
        assert!(painted.contains("actual"));
        assert!(painted.contains('\u{1b}'));
    }
}
