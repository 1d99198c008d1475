//! SVG path data (`d` attribute) to vertex list.
//!
//! Every drawing command contributes its end point(s) as vertices; the
//! control points of curve commands are skipped, since the knot
//! re-derives its own smooth curve through the vertices. Relative
//! commands are resolved against the current point, so the output is
//! always in absolute coordinates.
//!
//! Parsing is a fold of [`PathState`] over the command list. Only the
//! first subpath is used: commands after the first close are ignored.

use knotwork_pipeline::Point;

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

/// One command letter with all of its numeric arguments.
#[derive(Debug, Clone, PartialEq)]
struct Command {
    letter: char,
    args: Vec<f64>,
}

/// Parse path data into absolute vertices of the first subpath.
///
/// When the path closes right after a curve command, the curve's end
/// point is dropped: it lands back on the subpath start, which is
/// already the first vertex. A trailing vertex that equals the first
/// one is dropped for the same reason.
///
/// # Errors
///
/// Returns [`ImportError::InvalidNumber`] for unparseable numbers,
/// [`ImportError::MissingCommand`] if the data does not start with a
/// command, [`ImportError::UnsupportedCommand`] for arcs and unknown
/// letters, and [`ImportError::BadArgumentCount`] for commands with the
/// wrong number of arguments.
///
/// # Examples
///
/// ```
/// use knotwork_import::parse_path_data;
/// use knotwork_pipeline::Point;
///
/// let vertices = parse_path_data("m 10,10 20,0 0,20 z")?;
/// assert_eq!(
///     vertices,
///     vec![Point::new(10.0, 10.0), Point::new(30.0, 10.0), Point::new(30.0, 30.0)],
/// );
/// # Ok::<(), knotwork_import::ImportError>(())
/// ```
pub fn parse_path_data(d: &str) -> Result<Vec<Point>, ImportError> {
    let commands = group_commands(tokenize(d)?)?;
    let state = commands
        .into_iter()
        .try_fold(PathState::default(), PathState::apply)?;

    if state.ignored > 0 {
        log::warn!(
            "ignoring {} path command(s) after the first closed subpath",
            state.ignored
        );
    }

    Ok(state.finish())
}

/// Running state threaded through the command list.
#[derive(Debug, Clone, Default)]
struct PathState {
    /// Current absolute position.
    current: Point,
    /// Where the current subpath started.
    subpath_start: Point,
    /// The previous command letter.
    previous: Option<char>,
    /// Vertices collected so far.
    vertices: Vec<Point>,
    /// Set once a close command was seen.
    closed: bool,
    /// Commands skipped after closing.
    ignored: usize,
}

impl PathState {
    fn apply(mut self, command: Command) -> Result<Self, ImportError> {
        if self.closed {
            self.ignored += 1;
            return Ok(self);
        }

        let upper = command.letter.to_ascii_uppercase();
        let relative = command.letter.is_ascii_lowercase();
        let arity = arity(command.letter)?;

        if arity == 0 {
            if !command.args.is_empty() {
                return Err(bad_count(&command, arity));
            }
            self.close();
            return Ok(self);
        }

        if command.args.is_empty() || command.args.len() % arity != 0 {
            return Err(bad_count(&command, arity));
        }

        for chunk in command.args.chunks(arity) {
            let origin = if relative {
                self.current
            } else {
                Point::default()
            };
            let target = match upper {
                'H' => Point::new(chunk[0] + origin.x, self.current.y),
                'V' => Point::new(self.current.x, chunk[0] + origin.y),
                // End point is the last pair; anything before it is a
                // control point.
                _ => Point::new(chunk[arity - 2] + origin.x, chunk[arity - 1] + origin.y),
            };

            if self.vertices.is_empty() {
                self.subpath_start = target;
            }
            self.vertices.push(target);
            self.current = target;
        }

        self.previous = Some(command.letter);
        Ok(self)
    }

    fn close(&mut self) {
        if self.previous.is_some_and(is_curve) {
            self.vertices.pop();
        }
        self.current = self.subpath_start;
        self.closed = true;
    }

    fn finish(mut self) -> Vec<Point> {
        if self.vertices.len() > 1 && self.vertices.first() == self.vertices.last() {
            self.vertices.pop();
        }
        self.vertices
    }
}

const fn is_curve(letter: char) -> bool {
    matches!(letter.to_ascii_uppercase(), 'C' | 'S' | 'Q' | 'T')
}

/// Numbers consumed per repetition of a command.
fn arity(letter: char) -> Result<usize, ImportError> {
    match letter.to_ascii_uppercase() {
        'Z' => Ok(0),
        'H' | 'V' => Ok(1),
        'M' | 'L' | 'T' => Ok(2),
        'S' | 'Q' => Ok(4),
        'C' => Ok(6),
        _ => Err(ImportError::UnsupportedCommand(letter)),
    }
}

fn bad_count(command: &Command, arity: usize) -> ImportError {
    ImportError::BadArgumentCount {
        command: command.letter,
        arity,
        count: command.args.len(),
    }
}

fn group_commands(tokens: Vec<Token>) -> Result<Vec<Command>, ImportError> {
    let mut commands: Vec<Command> = Vec::new();
    for token in tokens {
        match token {
            Token::Command(letter) => commands.push(Command {
                letter,
                args: Vec::new(),
            }),
            Token::Number(value) => match commands.last_mut() {
                Some(command) => command.args.push(value),
                None => return Err(ImportError::MissingCommand(value.to_string())),
            },
        }
    }
    Ok(commands)
}

fn tokenize(d: &str) -> Result<Vec<Token>, ImportError> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() || b == b',' {
            i += 1;
        } else if b.is_ascii_alphabetic() && b != b'e' && b != b'E' {
            tokens.push(Token::Command(char::from(b)));
            i += 1;
        } else {
            let end = scan_number(bytes, i);
            if end == i {
                let text = d[i..].chars().next().map(String::from).unwrap_or_default();
                return Err(ImportError::InvalidNumber { text, offset: i });
            }
            let text = &d[i..end];
            let value = text.parse::<f64>().map_err(|_| ImportError::InvalidNumber {
                text: text.to_string(),
                offset: i,
            })?;
            tokens.push(Token::Number(value));
            i = end;
        }
    }

    Ok(tokens)
}

/// End of the number starting at `start`, or `start` if there is none.
///
/// A sign or a second decimal point ends the number, so `1-2` and
/// `.5.5` each scan as two numbers.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let mut digit_count = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        digit_count += frac_end - (i + 1);
        i = frac_end;
    }

    if digit_count == 0 {
        return start;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    i
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    // --- tokenizer ---

    #[test]
    fn tokenize_handles_juxtaposed_numbers() {
        let tokens = tokenize("M1-2.5.5e1-.25").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number(1.0),
                Token::Number(-2.5),
                Token::Number(5.0),
                Token::Number(-0.25),
            ]
        );
    }

    #[test]
    fn tokenize_rejects_garbage() {
        assert_eq!(
            tokenize("M 1 # 2"),
            Err(ImportError::InvalidNumber {
                text: "#".to_string(),
                offset: 4
            })
        );
    }

    #[test]
    fn tokenize_rejects_lone_sign() {
        assert!(matches!(
            tokenize("M - 2"),
            Err(ImportError::InvalidNumber { offset: 2, .. })
        ));
    }

    // --- commands ---

    #[test]
    fn absolute_lines() {
        let vertices = parse_path_data("M 0,0 L 10,0 L 10,10 L 0,10 Z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]));
    }

    #[test]
    fn implicit_line_to_after_move() {
        let vertices = parse_path_data("M0 0 10 0 10 10z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn relative_move_and_lines() {
        let vertices = parse_path_data("m 5,5 l 10,0 0,10 -10,0 z").unwrap();
        assert_eq!(vertices, pts(&[(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)]));
    }

    #[test]
    fn horizontal_and_vertical() {
        let vertices = parse_path_data("M 1,1 H 11 v 10 h -10 Z").unwrap();
        assert_eq!(vertices, pts(&[(1.0, 1.0), (11.0, 1.0), (11.0, 11.0), (1.0, 11.0)]));
    }

    #[test]
    fn cubic_keeps_only_end_points() {
        let vertices = parse_path_data("M 0,0 C 1,1 2,2 10,0 C 11,1 12,2 10,10").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn relative_cubic_chains_from_current_point() {
        let vertices =
            parse_path_data("m 0,0 c 1,1 2,2 10,0 1,1 2,2 0,10 -1,1 -8,3 -10,-10 z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn close_after_curve_drops_landing_point() {
        // The last curve lands back on the start.
        let vertices =
            parse_path_data("M 0,0 C 3,-3 7,-3 10,0 C 13,3 13,7 10,10 C 7,13 -3,7 0,0 Z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn close_after_curve_drops_even_when_not_on_start() {
        let vertices = parse_path_data("M 0,0 L 10,0 L 10,10 C 5,12 2,8 1,5 Z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn explicit_return_to_start_is_dropped() {
        let vertices = parse_path_data("M 0,0 L 10,0 L 10,10 L 0,0 Z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn smooth_and_quadratic_commands() {
        let vertices = parse_path_data("M 0,0 Q 5,-5 10,0 T 10,10 S 2,12 0,10 Z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn only_first_subpath_is_used() {
        let vertices =
            parse_path_data("M 0,0 L 10,0 L 10,10 Z M 50,50 L 60,50 L 60,60 Z").unwrap();
        assert_eq!(vertices, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn unclosed_path_is_accepted() {
        let vertices = parse_path_data("M 0,0 L 10,0 L 10,10").unwrap();
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn arc_is_rejected() {
        assert_eq!(
            parse_path_data("M 0,0 A 5 5 0 0 1 10 0 Z"),
            Err(ImportError::UnsupportedCommand('A'))
        );
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert_eq!(
            parse_path_data("M 0,0 L 10"),
            Err(ImportError::BadArgumentCount {
                command: 'L',
                arity: 2,
                count: 1
            })
        );
        assert!(matches!(
            parse_path_data("M 0,0 C 1,1 2,2"),
            Err(ImportError::BadArgumentCount { command: 'C', .. })
        ));
        assert!(matches!(
            parse_path_data("M 0,0 L 1,1 Z 4"),
            Err(ImportError::BadArgumentCount { command: 'Z', .. })
        ));
    }

    #[test]
    fn leading_number_is_rejected() {
        assert!(matches!(
            parse_path_data("10 10 L 5 5"),
            Err(ImportError::MissingCommand(_))
        ));
    }

    #[test]
    fn empty_data_yields_no_vertices() {
        assert!(parse_path_data("").unwrap().is_empty());
        assert!(parse_path_data("   ").unwrap().is_empty());
    }
}
