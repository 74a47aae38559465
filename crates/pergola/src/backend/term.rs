//! Crossterm-backed character-grid backend and event source.

use std::io::{Stdout, Write, stdout};
use std::rc::Rc;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor as ccursor, event as cevent, style as cstyle,
    terminal,
};
use geom::{Point, Region, Size};

use crate::{
    Result,
    event::{Event, EventSource, key, mouse},
    image::Tile,
    render::Backend,
    style::{Color, StyledRun},
    text::{CellMetrics, TextMetrics},
};

/// Translate an engine color into a crossterm color.
fn translate_color(c: Color) -> cstyle::Color {
    match c {
        Color::Black => cstyle::Color::Black,
        Color::DarkGrey => cstyle::Color::DarkGrey,
        Color::Red => cstyle::Color::Red,
        Color::DarkRed => cstyle::Color::DarkRed,
        Color::Green => cstyle::Color::Green,
        Color::DarkGreen => cstyle::Color::DarkGreen,
        Color::Yellow => cstyle::Color::Yellow,
        Color::DarkYellow => cstyle::Color::DarkYellow,
        Color::Blue => cstyle::Color::Blue,
        Color::DarkBlue => cstyle::Color::DarkBlue,
        Color::Magenta => cstyle::Color::Magenta,
        Color::DarkMagenta => cstyle::Color::DarkMagenta,
        Color::Cyan => cstyle::Color::Cyan,
        Color::DarkCyan => cstyle::Color::DarkCyan,
        Color::White => cstyle::Color::White,
        Color::Grey => cstyle::Color::Grey,
    }
}

/// The character-grid backend: one layout unit is one terminal cell. Entering
/// claims the terminal (raw mode, alternate screen, hidden cursor); dropping
/// the backend restores it.
pub struct TermBackend {
    out: Stdout,
    size: Size,
    metrics: Rc<CellMetrics>,
}

impl TermBackend {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cevent::EnableMouseCapture)?;
        out.execute(ccursor::Hide)?;
        let (w, h) = terminal::size()?;
        Ok(Self {
            out,
            size: Size::new(i32::from(w), i32::from(h)),
            metrics: Rc::new(CellMetrics),
        })
    }

    fn move_to(&mut self, p: Point) -> Result<()> {
        self.out
            .queue(ccursor::MoveTo(p.x.max(0) as u16, p.y.max(0) as u16))?;
        Ok(())
    }

    fn set_color(&mut self, fg: Option<Color>) -> Result<()> {
        match fg {
            Some(c) => self.out.queue(cstyle::SetForegroundColor(translate_color(c)))?,
            None => self.out.queue(cstyle::ResetColor)?,
        };
        Ok(())
    }
}

impl Drop for TermBackend {
    fn drop(&mut self) {
        let _ = self.out.execute(cevent::DisableMouseCapture);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = self.out.execute(ccursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl Backend for TermBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn metrics(&self) -> Rc<dyn TextMetrics> {
        self.metrics.clone()
    }

    fn reset(&mut self) -> Result<()> {
        self.out
            .queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn fill(&mut self, region: Region, ch: char, fg: Option<Color>) -> Result<()> {
        if region.is_empty() {
            return Ok(());
        }
        self.set_color(fg)?;
        let row: String = std::iter::repeat_n(ch, region.w.max(0) as usize).collect();
        for y in region.tl.y..region.bottom() {
            self.move_to(Point::new(region.tl.x, y))?;
            self.out.queue(cstyle::Print(&row))?;
        }
        Ok(())
    }

    fn text_run(&mut self, origin: Point, runs: &[StyledRun]) -> Result<()> {
        self.move_to(origin)?;
        for run in runs {
            self.set_color(run.fg)?;
            self.out.queue(cstyle::Print(&run.text))?;
        }
        Ok(())
    }

    fn image(&mut self, region: Region, _tile: &Tile) -> Result<()> {
        // The character grid has no pixels; show the image's footprint.
        self.fill(region, '\u{2592}', None)
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Blocking event source reading from the terminal.
pub struct TermEvents;

fn translate_mods(m: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: m.contains(cevent::KeyModifiers::SHIFT),
        ctrl: m.contains(cevent::KeyModifiers::CONTROL),
        alt: m.contains(cevent::KeyModifiers::ALT),
    }
}

fn translate_key(k: cevent::KeyEvent) -> Option<key::Key> {
    if k.kind == cevent::KeyEventKind::Release {
        return None;
    }
    let code = match k.code {
        cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
        cevent::KeyCode::Enter => key::KeyCode::Enter,
        cevent::KeyCode::Esc => key::KeyCode::Esc,
        cevent::KeyCode::Backspace => key::KeyCode::Backspace,
        cevent::KeyCode::Tab => key::KeyCode::Tab,
        cevent::KeyCode::Up => key::KeyCode::Up,
        cevent::KeyCode::Down => key::KeyCode::Down,
        cevent::KeyCode::Left => key::KeyCode::Left,
        cevent::KeyCode::Right => key::KeyCode::Right,
        cevent::KeyCode::PageUp => key::KeyCode::PageUp,
        cevent::KeyCode::PageDown => key::KeyCode::PageDown,
        cevent::KeyCode::Home => key::KeyCode::Home,
        cevent::KeyCode::End => key::KeyCode::End,
        _ => return None,
    };
    Some(key::Key {
        mods: translate_mods(k.modifiers),
        code,
    })
}

fn translate_mouse(m: cevent::MouseEvent) -> Option<mouse::MouseEvent> {
    let (action, button) = match m.kind {
        cevent::MouseEventKind::Down(b) => (mouse::Action::Down, translate_button(b)),
        cevent::MouseEventKind::Up(b) => (mouse::Action::Up, translate_button(b)),
        cevent::MouseEventKind::Drag(b) => (mouse::Action::Drag, translate_button(b)),
        cevent::MouseEventKind::Moved => (mouse::Action::Moved, mouse::Button::None),
        cevent::MouseEventKind::ScrollDown => (mouse::Action::ScrollDown, mouse::Button::None),
        cevent::MouseEventKind::ScrollUp => (mouse::Action::ScrollUp, mouse::Button::None),
        _ => return None,
    };
    Some(mouse::MouseEvent {
        action,
        button,
        mods: translate_mods(m.modifiers),
        pos: Point::new(i32::from(m.column), i32::from(m.row)),
    })
}

fn translate_button(b: cevent::MouseButton) -> mouse::Button {
    match b {
        cevent::MouseButton::Left => mouse::Button::Left,
        cevent::MouseButton::Right => mouse::Button::Right,
        cevent::MouseButton::Middle => mouse::Button::Middle,
    }
}

impl EventSource for TermEvents {
    fn next(&mut self) -> Option<Event> {
        loop {
            match cevent::read() {
                Ok(cevent::Event::Key(k)) => {
                    if let Some(key) = translate_key(k) {
                        return Some(Event::Key(key));
                    }
                }
                Ok(cevent::Event::Mouse(m)) => {
                    if let Some(me) = translate_mouse(m) {
                        return Some(Event::Mouse(me));
                    }
                }
                Ok(cevent::Event::Resize(w, h)) => {
                    return Some(Event::Resize(Size::new(i32::from(w), i32::from(h))));
                }
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }
}
