// src/ports/terminal.rs
use crate::constants::SUMMARY_MAX_CHARS;
use crate::domain::Note;
use crate::util::text::summarize;

/// One line per note: id, name, description summary, image marker
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_line(&self, note: &Note) -> String {
        let marker = if note.has_image() { "\t[image]" } else { "" };
        format!(
            "{}\t{}\t{}{}",
            note.id,
            note.name,
            summarize(&note.description, SUMMARY_MAX_CHARS),
            marker
        )
    }

    pub fn render(&self, notes: &[Note]) -> String {
        notes
            .iter()
            .map(|n| self.render_line(n))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{note, note_with_image};

    #[test]
    fn given_notes_when_rendering_then_one_line_each_in_board_order() {
        let notes = vec![
            note("2", "Bread", "rye\nsliced"),
            note_with_image("1", "Milk", "2%", "pic.png"),
        ];

        let out = TerminalPresenter::new().render(&notes);

        assert_eq!(out, "2\tBread\trye\n1\tMilk\t2%\t[image]");
    }

    #[test]
    fn given_no_notes_when_rendering_then_empty_output() {
        assert_eq!(TerminalPresenter::new().render(&[]), "");
    }
}
