use crate::court::types::PixelPoint;
use crate::errors::{ShotCallError, ShotCallResult};

pub const HELP: &str = "\
Commands:
  <px> <py>                         click at surface pixel (origin top-left)
  click <px> <py>                   same as above
  at <clientX> <clientY> <left> <top>
                                    click at viewport pixel, surface placed at (left, top)
  status                            show login state and the current result
  help                              show this message
  quit | exit                       leave";

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click(PixelPoint),
    Status,
    Help,
    Quit,
}

/// Parses an input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> ShotCallResult<Option<Command>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "status" => no_args(Command::Status, head, rest)?,
        "help" | "?" => no_args(Command::Help, head, rest)?,
        "quit" | "exit" | "q" => no_args(Command::Quit, head, rest)?,
        "click" => {
            let [px, py] = numbers::<2>(rest)?;
            Command::Click(PixelPoint::new(px, py))
        }
        "at" => {
            let [client_x, client_y, left, top] = numbers::<4>(rest)?;
            let point = PixelPoint::from_viewport(client_x, client_y, left, top);
            if !(point.px.is_finite() && point.py.is_finite()) {
                return Err(ShotCallError::Input(format!(
                    "viewport position ({client_x}, {client_y}) relative to ({left}, {top}) is out of range"
                )));
            }
            Command::Click(point)
        }
        _ => {
            let [px, py] = numbers::<2>(&words)?;
            Command::Click(PixelPoint::new(px, py))
        }
    };
    Ok(Some(command))
}

fn no_args(command: Command, head: &str, rest: &[&str]) -> ShotCallResult<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ShotCallError::Input(format!("'{head}' takes no arguments")))
    }
}

fn numbers<const N: usize>(words: &[&str]) -> ShotCallResult<[f64; N]> {
    if words.len() != N {
        return Err(ShotCallError::Input(format!(
            "expected {N} numbers, got {}; type 'help' for usage",
            words.len()
        )));
    }
    let mut out = [0.0; N];
    for (slot, word) in out.iter_mut().zip(words) {
        let value: f64 = word
            .trim_end_matches(',')
            .parse()
            .map_err(|_| ShotCallError::Input(format!("'{word}' is not a number")))?;
        if !value.is_finite() {
            return Err(ShotCallError::Input(format!("'{word}' is not a finite number")));
        }
        *slot = value;
    }
    Ok(out)
}
