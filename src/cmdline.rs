use crate::{interpreter, reader};
use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::path::PathBuf;

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("mal")?;
    interface.set_prompt("user> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".mal_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn report_error<T: Terminal>(interface: &Interface<T>, error: &dyn fmt::Display) {
    let message = format!("Error: {}", error);
    if atty::is(atty::Stream::Stdout) {
        writeln!(interface, "{}", Colour::Red.paint(message)).ok();
    } else {
        writeln!(interface, "{}", message).ok();
    }
}

/// Feed each input line to `processor` until end of input. Errors are shown
/// and the loop carries on; lines holding only whitespace or comments are skipped.
pub fn repl<T: Terminal>(
    interface: &Interface<T>,
    mut processor: impl FnMut(&str) -> interpreter::Result<String>,
) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if !reader::has_form(&line) {
                    continue;
                }
                interface.add_history_unique(line.clone());
                match processor(&line) {
                    Ok(output) => {
                        writeln!(interface, "{}", output).ok();
                    }
                    Err(e) => report_error(interface, &e),
                }
            }
            Err(e) => {
                report_error(interface, &e);
                break;
            }
        }
    }
}

/// Set up the terminal, run the loop, and save history on the way out.
pub fn run(processor: impl FnMut(&str) -> interpreter::Result<String>) -> std::io::Result<()> {
    let interface = setup()?;
    repl(&interface, processor);
    save_history(&interface)
}
