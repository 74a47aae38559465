//! Styled text: colors and the markup parser used by the Text widget.

/// Terminal-palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Black.
    Black,
    /// Dark grey.
    DarkGrey,
    /// Bright red.
    Red,
    /// Dark red.
    DarkRed,
    /// Bright green.
    Green,
    /// Dark green.
    DarkGreen,
    /// Bright yellow.
    Yellow,
    /// Dark yellow.
    DarkYellow,
    /// Bright blue.
    Blue,
    /// Dark blue.
    DarkBlue,
    /// Bright magenta.
    Magenta,
    /// Dark magenta.
    DarkMagenta,
    /// Bright cyan.
    Cyan,
    /// Dark cyan.
    DarkCyan,
    /// White.
    White,
    /// Grey.
    Grey,
}

impl Color {
    /// Look up a color by its markup tag name.
    fn from_tag(name: &str) -> Option<Self> {
        Some(match name {
            "black" => Self::Black,
            "darkgrey" => Self::DarkGrey,
            "red" => Self::Red,
            "darkred" => Self::DarkRed,
            "green" => Self::Green,
            "darkgreen" => Self::DarkGreen,
            "yellow" => Self::Yellow,
            "darkyellow" => Self::DarkYellow,
            "blue" => Self::Blue,
            "darkblue" => Self::DarkBlue,
            "magenta" => Self::Magenta,
            "darkmagenta" => Self::DarkMagenta,
            "cyan" => Self::Cyan,
            "darkcyan" => Self::DarkCyan,
            "white" => Self::White,
            "grey" => Self::Grey,
            _ => return None,
        })
    }
}

/// A run of text drawn in a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// The run's text. Never contains a newline.
    pub text: String,
    /// Foreground color, or the backend default.
    pub fg: Option<Color>,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, fg: Option<Color>) -> Self {
        Self {
            text: text.into(),
            fg,
        }
    }

    /// An unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

/// Parse markup into styled runs. `<color>` opens a color, `</color>` closes
/// the innermost matching one, and `<<` escapes a literal `<`. Unrecognized
/// tags, and close tags with no matching open, pass through as literal text:
/// malformed markup degrades, it never fails.
pub fn parse_markup(input: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut stack: Vec<Color> = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    let mut flush = |text: &mut String, stack: &[Color]| {
        if !text.is_empty() {
            runs.push(StyledRun::new(std::mem::take(text), stack.last().copied()));
        }
    };

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        let after = &rest[lt + 1..];
        if let Some(tail) = after.strip_prefix('<') {
            text.push('<');
            rest = tail;
            continue;
        }
        let Some(gt) = after.find('>') else {
            // Unterminated tag: literal.
            text.push('<');
            rest = after;
            continue;
        };
        let tag = &after[..gt];
        let tail = &after[gt + 1..];
        if let Some(name) = tag.strip_prefix('/') {
            if stack.last().copied() == Color::from_tag(name) && !stack.is_empty() {
                flush(&mut text, &stack);
                stack.pop();
            } else {
                text.push_str(&rest[lt..lt + 2 + tag.len()]);
            }
        } else if let Some(color) = Color::from_tag(tag) {
            flush(&mut text, &stack);
            stack.push(color);
        } else {
            text.push_str(&rest[lt..lt + 2 + tag.len()]);
        }
        rest = tail;
    }
    text.push_str(rest);
    flush(&mut text, &stack);
    runs
}

/// The concatenated plain text of a run sequence.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain() {
        assert_eq!(parse_markup("hello"), vec![StyledRun::plain("hello")]);
        assert_eq!(parse_markup(""), Vec::<StyledRun>::new());
    }

    #[test]
    fn colored() {
        assert_eq!(
            parse_markup("a <red>b</red> c"),
            vec![
                StyledRun::plain("a "),
                StyledRun::new("b", Some(Color::Red)),
                StyledRun::plain(" c"),
            ]
        );
    }

    #[test]
    fn nested() {
        assert_eq!(
            parse_markup("<blue>a<red>b</red>c</blue>"),
            vec![
                StyledRun::new("a", Some(Color::Blue)),
                StyledRun::new("b", Some(Color::Red)),
                StyledRun::new("c", Some(Color::Blue)),
            ]
        );
    }

    #[test]
    fn escapes_and_unknown_tags() {
        assert_eq!(parse_markup("a << b"), vec![StyledRun::plain("a < b")]);
        assert_eq!(
            parse_markup("x <bogus> y"),
            vec![StyledRun::plain("x <bogus> y")]
        );
        assert_eq!(
            parse_markup("dangling </red> close"),
            vec![StyledRun::plain("dangling </red> close")]
        );
        assert_eq!(parse_markup("open <red"), vec![StyledRun::plain("open <red")]);
    }
}
