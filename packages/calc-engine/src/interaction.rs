use crate::error::CalcError;
use crate::registry::Registry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::{BufRead, Write};

#[async_trait]
pub trait CalculatorInteraction {
    /// Prompt for one line of input. `None` means the input is exhausted.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Block until the user acknowledges the last result.
    async fn pause(&mut self) -> Result<()>;

    fn clear_screen(&mut self) -> Result<()>;

    /// Display the banner and every operation the registry offers.
    fn show_menu(&mut self, title: &str, registry: &Registry) -> Result<()>;

    /// Display an already formatted result.
    fn show_result(&mut self, value: &str) -> Result<()>;

    fn show_error(&mut self, error: &CalcError) -> Result<()>;

    fn farewell(&mut self) -> Result<()>;
}

/// Menu lines shared by every front end, quit entry last.
pub fn menu_lines(registry: &Registry) -> Vec<String> {
    registry
        .iter()
        .map(|op| format!("{} - {}", op.selector, op.name))
        .chain(std::iter::once("q - Quit".to_string()))
        .collect()
}

/// Unknown selectors read as a hint, everything else as an error.
pub fn render_error(error: &CalcError) -> String {
    match error {
        CalcError::UnknownSelector(_) => error.to_string(),
        _ => format!("Error: {}", error),
    }
}

/// Plain-text interaction over any reader/writer pair. Used for piped stdin
/// and for driving the session in tests.
pub struct LineInteraction<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LineInteraction<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> CalculatorInteraction for LineInteraction<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        // Undecodable bytes become U+FFFD and get reported as bad input.
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read from input")?;
        if read == 0 {
            writeln!(self.writer)?;
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    // Nobody is there to press Enter on a pipe.
    async fn pause(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        Ok(())
    }

    fn show_menu(&mut self, title: &str, registry: &Registry) -> Result<()> {
        writeln!(self.writer, "=== {} ===", title)?;
        writeln!(self.writer, "Available operations:")?;
        for line in menu_lines(registry) {
            writeln!(self.writer, "{}", line)?;
        }
        Ok(())
    }

    fn show_result(&mut self, value: &str) -> Result<()> {
        writeln!(self.writer, "Result: {}", value)?;
        Ok(())
    }

    fn show_error(&mut self, error: &CalcError) -> Result<()> {
        writeln!(self.writer, "{}", render_error(error))?;
        Ok(())
    }

    fn farewell(&mut self) -> Result<()> {
        writeln!(self.writer, "Goodbye!")?;
        self.writer.flush()?;
        Ok(())
    }
}

// Exposed for testing
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Prompt(String),
        Cleared,
        Menu(usize),
        Result(String),
        Error(CalcError),
        Paused,
        Farewell,
    }

    /// Answers prompts from a script and records everything shown.
    #[derive(Default, Clone)]
    pub struct MockInteraction {
        pub inputs: VecDeque<String>,
        pub events: Vec<Event>,
    }

    impl MockInteraction {
        pub fn new<I, S>(inputs: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                inputs: inputs.into_iter().map(Into::into).collect(),
                events: Vec::new(),
            }
        }

        pub fn results(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Result(v) => Some(v.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn errors(&self) -> Vec<&CalcError> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Error(err) => Some(err),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl CalculatorInteraction for MockInteraction {
        async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
            self.events.push(Event::Prompt(prompt.to_string()));
            Ok(self.inputs.pop_front())
        }

        async fn pause(&mut self) -> Result<()> {
            self.events.push(Event::Paused);
            Ok(())
        }

        fn clear_screen(&mut self) -> Result<()> {
            self.events.push(Event::Cleared);
            Ok(())
        }

        fn show_menu(&mut self, _title: &str, registry: &Registry) -> Result<()> {
            self.events.push(Event::Menu(registry.len()));
            Ok(())
        }

        fn show_result(&mut self, value: &str) -> Result<()> {
            self.events.push(Event::Result(value.to_string()));
            Ok(())
        }

        fn show_error(&mut self, error: &CalcError) -> Result<()> {
            self.events.push(Event::Error(error.clone()));
            Ok(())
        }

        fn farewell(&mut self) -> Result<()> {
            self.events.push(Event::Farewell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use std::io::Cursor;

    #[test]
    fn test_menu_lines() {
        let lines = menu_lines(&Registry::standard());
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "+ - Addition");
        assert!(lines.contains(&"L - Logarithm base 10".to_string()));
        assert_eq!(lines.last().unwrap(), "q - Quit");
    }

    #[test]
    fn test_render_error() {
        assert_eq!(
            render_error(&CalcError::Domain(DomainError::NegativeSquareRoot)),
            "Error: Square root of negative number!"
        );
        assert_eq!(
            render_error(&CalcError::UnknownSelector("z".into())),
            "Unknown operation 'z'! Please try again."
        );
    }

    #[tokio::test]
    async fn test_line_interaction_reads_until_eof() {
        let input = Cursor::new("+\r\n2 3\n");
        let mut ui = LineInteraction::new(input, Vec::new());

        assert_eq!(ui.read_line("Enter operation").await.unwrap().as_deref(), Some("+"));
        assert_eq!(ui.read_line("Enter two numbers").await.unwrap().as_deref(), Some("2 3"));
        assert_eq!(ui.read_line("Enter operation").await.unwrap(), None);

        let out = String::from_utf8(ui.into_writer()).unwrap();
        assert!(out.starts_with("Enter operation: Enter two numbers: "));
    }

    #[tokio::test]
    async fn test_line_interaction_replaces_invalid_utf8() {
        let input = Cursor::new(b"\xff\n1 \xfe2\n".to_vec());
        let mut ui = LineInteraction::new(input, Vec::new());

        assert_eq!(
            ui.read_line("Enter operation").await.unwrap().as_deref(),
            Some("\u{FFFD}")
        );
        assert_eq!(
            ui.read_line("Enter two numbers").await.unwrap().as_deref(),
            Some("1 \u{FFFD}2")
        );
        assert_eq!(ui.read_line("Enter operation").await.unwrap(), None);
    }
}
