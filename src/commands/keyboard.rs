use super::listener::{Command, CommandDiscriminants};
use crate::config::KeyBindingsConfig;
use crossterm::event::{
    poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use serde_with::DeserializeFromStr;
use std::{fmt, io, iter, mem, str::FromStr, time::Duration};

// Aliases accepted within `<...>` tags, compared case-insensitively.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("page_up", KeyCode::PageUp),
    ("pageup", KeyCode::PageUp),
    ("page_down", KeyCode::PageDown),
    ("pagedown", KeyCode::PageDown),
    ("cr", KeyCode::Enter),
    ("enter", KeyCode::Enter),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("esc", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
];

/// Listens for terminal input events and turns them into commands.
pub(crate) struct InputListener {
    bindings: CommandKeyBindings,
    events: Vec<KeyEvent>,
}

impl InputListener {
    pub(crate) fn new(bindings: CommandKeyBindings) -> Self {
        Self { bindings, events: Vec::new() }
    }

    /// Polls for the next input command.
    pub(crate) fn poll_next_command(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if poll(timeout)? {
            let event = read()?;
            Ok(self.process_event(event))
        } else {
            Ok(None)
        }
    }

    fn process_event(&mut self, event: Event) -> Option<Command> {
        match event {
            // Ignore release events
            Event::Key(event) if event.kind == KeyEventKind::Release => None,
            Event::Key(event) => {
                let mut events = mem::take(&mut self.events);
                events.push(event);
                match self.bindings.apply(&events) {
                    InputAction::Emit(command) => Some(command),
                    InputAction::Buffer => {
                        self.events = events;
                        None
                    }
                    InputAction::Reset => None,
                }
            }
            Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                self.events.clear();
                Some(Command::Click { column, row })
            }
            Event::Resize(..) => Some(Command::Redraw),
            _ => None,
        }
    }
}

enum InputAction {
    Buffer,
    Reset,
    Emit(Command),
}

/// The key bindings for every command.
#[derive(Debug)]
pub(crate) struct CommandKeyBindings {
    bindings: Vec<(KeyBinding, CommandDiscriminants)>,
}

impl CommandKeyBindings {
    fn apply(&self, events: &[KeyEvent]) -> InputAction {
        let mut any_partials = false;
        for (binding, discriminant) in &self.bindings {
            match binding.match_events(events) {
                BindingMatch::Full(number) => {
                    return match Self::instantiate(*discriminant, number) {
                        Some(command) => InputAction::Emit(command),
                        None => InputAction::Reset,
                    };
                }
                BindingMatch::Partial => any_partials = true,
                BindingMatch::None => (),
            }
        }
        if any_partials { InputAction::Buffer } else { InputAction::Reset }
    }

    fn instantiate(discriminant: CommandDiscriminants, number: Option<u32>) -> Option<Command> {
        use CommandDiscriminants::*;
        let command = match discriminant {
            Redraw => Command::Redraw,
            Next => Command::Next,
            Previous => Command::Previous,
            FirstSlide => Command::FirstSlide,
            LastSlide => Command::LastSlide,
            // a binding without a number is rejected at construction time
            GoToSlide => Command::GoToSlide(number?),
            Export => Command::Export,
            CloseModal => Command::CloseModal,
            Suspend => Command::Suspend,
            Exit => Command::Exit,
            // clicks only come from the mouse
            Click => return None,
        };
        Some(command)
    }

    fn validate_conflicts<'a>(
        bindings: impl Iterator<Item = &'a KeyBinding>,
    ) -> Result<(), KeyBindingsValidationError> {
        let bindings: Vec<_> = bindings.collect();
        for (index, first) in bindings.iter().enumerate() {
            for second in &bindings[index + 1..] {
                if first.is_prefix_of(second) || second.is_prefix_of(first) {
                    return Err(KeyBindingsValidationError::Conflict((*first).clone(), (*second).clone()));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<KeyBindingsConfig> for CommandKeyBindings {
    type Error = KeyBindingsValidationError;

    fn try_from(config: KeyBindingsConfig) -> Result<Self, Self::Error> {
        let zip = |discriminant, bindings: Vec<KeyBinding>| bindings.into_iter().zip(iter::repeat(discriminant));
        if !config.go_to_slide.iter().all(KeyBinding::expects_number) {
            return Err(KeyBindingsValidationError::Invalid("go_to_slide", "<number> matcher required"));
        }
        let bindings: Vec<_> = iter::empty()
            .chain(zip(CommandDiscriminants::Next, config.next))
            .chain(zip(CommandDiscriminants::Previous, config.previous))
            .chain(zip(CommandDiscriminants::FirstSlide, config.first_slide))
            .chain(zip(CommandDiscriminants::LastSlide, config.last_slide))
            .chain(zip(CommandDiscriminants::GoToSlide, config.go_to_slide))
            .chain(zip(CommandDiscriminants::Export, config.export))
            .chain(zip(CommandDiscriminants::CloseModal, config.close_modal))
            .chain(zip(CommandDiscriminants::Exit, config.exit))
            .chain(zip(CommandDiscriminants::Suspend, config.suspend))
            .collect();
        Self::validate_conflicts(bindings.iter().map(|(binding, _)| binding))?;
        Ok(Self { bindings })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyBindingsValidationError {
    #[error("invalid binding for {0}: {1}")]
    Invalid(&'static str, &'static str),

    #[error("conflicting keybindings: {0} and {1}")]
    Conflict(KeyBinding, KeyBinding),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum BindingMatch {
    /// A full match, along with the number that was typed, if the binding has a `<number>`.
    Full(Option<u32>),
    Partial,
    None,
}

/// A sequence of keys that triggers a command, e.g. `gg`, `<c-c>`, or `<number>G`.
#[derive(Clone, Debug, PartialEq, Eq, DeserializeFromStr)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct KeyBinding(#[cfg_attr(feature = "json-schema", schemars(with = "String"))] Vec<KeyMatcher>);

impl KeyBinding {
    fn match_events(&self, mut events: &[KeyEvent]) -> BindingMatch {
        let mut number = None;
        for (index, matcher) in self.0.iter().enumerate() {
            let Some((matched_number, rest)) = matcher.try_match_events(events) else {
                return BindingMatch::None;
            };
            number = number.or(matched_number);
            events = rest;

            // We still have matchers left but no events to feed them.
            if index != self.0.len() - 1 && events.is_empty() {
                return BindingMatch::Partial;
            }
        }
        BindingMatch::Full(number)
    }

    fn expects_number(&self) -> bool {
        self.0.contains(&KeyMatcher::Number)
    }

    fn is_prefix_of(&self, other: &KeyBinding) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingParseError;

    fn from_str(mut input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(KeyBindingParseError::NoInput);
        }
        let mut matchers = Vec::new();
        while !input.is_empty() {
            let (matcher, rest) = KeyMatcher::parse(input)?;
            // We don't want more than one <number> matcher
            if matcher == KeyMatcher::Number && matchers.contains(&KeyMatcher::Number) {
                return Err(KeyBindingParseError::TooManyNumbers);
            }
            matchers.push(matcher);
            input = rest;
        }
        Ok(Self(matchers))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for matcher in &self.0 {
            write!(f, "{matcher}")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyBindingParseError {
    #[error("no input")]
    NoInput,

    #[error("not a valid key: {0}")]
    InvalidKey(char),

    #[error("unknown key name: {0}")]
    UnknownKeyName(String),

    #[error("too many number placeholders")]
    TooManyNumbers,

    #[error("unterminated key tag")]
    Unterminated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum KeyMatcher {
    Key(KeyCombination),
    Number,
}

impl KeyMatcher {
    fn try_match_events<'a>(&self, events: &'a [KeyEvent]) -> Option<(Option<u32>, &'a [KeyEvent])> {
        match self {
            Self::Key(combo) => {
                let (event, rest) = events.split_first()?;
                combo.matches(event).then_some((None, rest))
            }
            Self::Number => Self::try_match_number(events),
        }
    }

    fn try_match_number(mut events: &[KeyEvent]) -> Option<(Option<u32>, &[KeyEvent])> {
        let mut number: Option<u32> = None;
        while let Some((head, rest)) = events.split_first() {
            let KeyCode::Char(c) = head.code else { break };
            let Some(digit) = c.to_digit(10) else { break };
            // if we overflow we're done
            let next = number.unwrap_or(0).checked_mul(10)?.checked_add(digit)?;
            number = Some(next);
            events = rest;
        }
        number.map(|number| (Some(number), events))
    }

    fn parse(input: &str) -> Result<(Self, &str), KeyBindingParseError> {
        let mut chars = input.chars();
        let next = chars.next().ok_or(KeyBindingParseError::NoInput)?;
        match next {
            '<' => {
                let (tag, rest) = input[1..].split_once('>').ok_or(KeyBindingParseError::Unterminated)?;
                Ok((Self::parse_tag(tag)?, rest))
            }
            '>' => Err(KeyBindingParseError::InvalidKey(next)),
            c if c.is_alphanumeric() || c.is_ascii_punctuation() || c == ' ' => {
                Ok((Self::Key(KeyCombination::from(KeyCode::Char(c))), chars.as_str()))
            }
            c => Err(KeyBindingParseError::InvalidKey(c)),
        }
    }

    fn parse_tag(tag: &str) -> Result<Self, KeyBindingParseError> {
        let lowercase = tag.to_lowercase();
        if lowercase == "number" {
            return Ok(Self::Number);
        }
        if lowercase.starts_with("c-") {
            let mut chars = tag[2..].chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_alphanumeric() => {
                    Ok(Self::Key(KeyCombination { key: KeyCode::Char(c), control: true }))
                }
                _ => Err(KeyBindingParseError::UnknownKeyName(tag.into())),
            };
        }
        if let Some(number) = lowercase.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&number) {
                return Ok(Self::Key(KeyCode::F(number).into()));
            }
        }
        NAMED_KEYS
            .iter()
            .find(|(name, _)| *name == lowercase)
            .map(|(_, key)| Self::Key((*key).into()))
            .ok_or(KeyBindingParseError::UnknownKeyName(tag.into()))
    }
}

impl fmt::Display for KeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let combo = match self {
            Self::Number => return write!(f, "<number>"),
            Self::Key(combo) => combo,
        };
        match (combo.key, combo.control) {
            (KeyCode::Char(c), true) => write!(f, "<c-{c}>"),
            (KeyCode::Char(c), false) => write!(f, "{c}"),
            (KeyCode::F(number), _) => write!(f, "<f{number}>"),
            (key, _) => match NAMED_KEYS.iter().find(|(_, named)| *named == key) {
                Some((name, _)) => write!(f, "<{name}>"),
                None => write!(f, "<{key:?}>"),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct KeyCombination {
    key: KeyCode,
    control: bool,
}

impl KeyCombination {
    fn matches(&self, event: &KeyEvent) -> bool {
        let is_control = event.modifiers.contains(KeyModifiers::CONTROL);
        self.key == event.code && self.control == is_control
    }
}

impl From<KeyCode> for KeyCombination {
    fn from(key: KeyCode) -> Self {
        Self { key, control: false }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crossterm::event::KeyEventState;
    use rstest::rstest;

    trait KeyEventSource {
        fn into_event(self) -> KeyEvent;
    }

    impl KeyEventSource for KeyCode {
        fn into_event(self) -> KeyEvent {
            KeyEvent { code: self, modifiers: KeyModifiers::empty(), kind: KeyEventKind::Press, state: KeyEventState::NONE }
        }
    }

    impl KeyEventSource for char {
        fn into_event(self) -> KeyEvent {
            KeyCode::Char(self).into_event()
        }
    }

    fn with_control(mut event: KeyEvent) -> KeyEvent {
        event.modifiers = KeyModifiers::CONTROL;
        event
    }

    fn key(code: KeyCode) -> KeyMatcher {
        KeyMatcher::Key(code.into())
    }

    fn listener() -> InputListener {
        let bindings = CommandKeyBindings::try_from(KeyBindingsConfig::default()).expect("invalid bindings");
        InputListener::new(bindings)
    }

    #[rstest]
    #[case::number("<number>", vec![KeyMatcher::Number])]
    #[case::char("w", vec![key(KeyCode::Char('w'))])]
    #[case::space(" ", vec![key(KeyCode::Char(' '))])]
    #[case::control("<c-w>", vec![KeyMatcher::Key(KeyCombination { key: KeyCode::Char('w'), control: true })])]
    #[case::control_uppercase("<C-w>", vec![KeyMatcher::Key(KeyCombination { key: KeyCode::Char('w'), control: true })])]
    #[case::multi("gg", vec![key(KeyCode::Char('g')), key(KeyCode::Char('g'))])]
    #[case::page_up("<PageUp>", vec![key(KeyCode::PageUp)])]
    #[case::page_down("<page_down>", vec![key(KeyCode::PageDown)])]
    #[case::enter("<CR>", vec![key(KeyCode::Enter)])]
    #[case::right("<Right>", vec![key(KeyCode::Right)])]
    #[case::esc("<esc>", vec![key(KeyCode::Esc)])]
    #[case::f12("<f12>", vec![key(KeyCode::F(12))])]
    #[case::number_then_key("<number>G", vec![KeyMatcher::Number, key(KeyCode::Char('G'))])]
    fn parse_key_binding(#[case] pattern: &str, #[case] matchers: Vec<KeyMatcher>) {
        let binding = KeyBinding::from_str(pattern).expect("failed to parse");
        assert_eq!(binding, KeyBinding(matchers));
    }

    #[rstest]
    #[case::empty("")]
    #[case::invalid_tag("<hi>")]
    #[case::invalid_char("🚀")]
    #[case::too_many_numbers("<number><number>")]
    #[case::unterminated("<c-w")]
    #[case::f13("<f13>")]
    #[case::closing(">")]
    fn invalid_key_bindings(#[case] input: &str) {
        KeyBinding::from_str(input).expect_err("not an error");
    }

    #[rstest]
    #[case::single("G", &['G'.into_event()], BindingMatch::Full(None))]
    #[case::multi("gg", &['g'.into_event(), 'g'.into_event()], BindingMatch::Full(None))]
    #[case::control("<c-c>", &[with_control('c'.into_event())], BindingMatch::Full(None))]
    #[case::control_missing("<c-c>", &['c'.into_event()], BindingMatch::None)]
    #[case::partial("gg", &['g'.into_event()], BindingMatch::Partial)]
    #[case::number("<number>", &['4'.into_event(), '2'.into_event()], BindingMatch::Full(Some(42)))]
    #[case::number_partial("<number>G", &['4'.into_event()], BindingMatch::Partial)]
    #[case::number_full("<number>G", &['4'.into_event(), 'G'.into_event()], BindingMatch::Full(Some(4)))]
    #[case::number_mismatch("<number>G", &['4'.into_event(), 'K'.into_event()], BindingMatch::None)]
    fn matching(#[case] pattern: &str, #[case] events: &[KeyEvent], #[case] expected: BindingMatch) {
        let binding = KeyBinding::from_str(pattern).expect("failed to parse");
        assert_eq!(binding.match_events(events), expected);
    }

    #[rstest]
    #[case(&["<number>G", "other", "<number>Go"])]
    #[case(&["<c-w>", "<c-w>a"])]
    #[case(&["q", "q"])]
    fn conflicts(#[case] patterns: &[&str]) {
        let bindings: Vec<_> = patterns.iter().map(|p| KeyBinding::from_str(p).unwrap()).collect();
        let result = CommandKeyBindings::validate_conflicts(bindings.iter());
        assert!(result.is_err(), "not an error: {result:?}");
    }

    #[rstest]
    #[case(&["<number>Ga", "<number>Go"])]
    #[case(&["g", "<c-g>"])]
    fn no_conflicts(#[case] patterns: &[&str]) {
        let bindings: Vec<_> = patterns.iter().map(|p| KeyBinding::from_str(p).unwrap()).collect();
        let result = CommandKeyBindings::validate_conflicts(bindings.iter());
        assert!(result.is_ok(), "got error: {result:?}");
    }

    #[rstest]
    #[case("<number>G")]
    #[case("<page_up>x")]
    #[case("<esc><c-w><f3>")]
    fn display(#[case] pattern: &str) {
        let binding = KeyBinding::from_str(pattern).expect("invalid pattern");
        assert_eq!(binding.to_string(), pattern);
    }

    #[test]
    fn go_to_requires_number() {
        let config = KeyBindingsConfig { go_to_slide: vec!["G".parse().unwrap()], ..Default::default() };
        let result = CommandKeyBindings::try_from(config);
        assert!(matches!(result, Err(KeyBindingsValidationError::Invalid("go_to_slide", _))), "{result:?}");
    }

    #[rstest]
    #[case::next(&['l'.into_event()], Command::Next)]
    #[case::arrow(&[KeyCode::Right.into_event()], Command::Next)]
    #[case::previous(&[KeyCode::Left.into_event()], Command::Previous)]
    #[case::first(&['g'.into_event(), 'g'.into_event()], Command::FirstSlide)]
    #[case::last(&['G'.into_event()], Command::LastSlide)]
    #[case::select(&['3'.into_event()], Command::GoToSlide(3))]
    #[case::export(&['e'.into_event()], Command::Export)]
    #[case::close(&[KeyCode::Esc.into_event()], Command::CloseModal)]
    #[case::exit(&[with_control('c'.into_event())], Command::Exit)]
    fn default_commands(#[case] events: &[KeyEvent], #[case] expected: Command) {
        let mut listener = listener();
        let (last, rest) = events.split_last().unwrap();
        for event in rest {
            assert_eq!(listener.process_event(Event::Key(*event)), None);
        }
        assert_eq!(listener.process_event(Event::Key(*last)), Some(expected));
    }

    #[test]
    fn unbound_key_resets() {
        let mut listener = listener();
        assert_eq!(listener.process_event(Event::Key('g'.into_event())), None);
        assert_eq!(listener.process_event(Event::Key('x'.into_event())), None);
        // the buffered 'g' was dropped so this is a fresh partial match
        assert_eq!(listener.process_event(Event::Key('g'.into_event())), None);
        assert_eq!(listener.process_event(Event::Key('g'.into_event())), Some(Command::FirstSlide));
    }

    #[test]
    fn releases_are_ignored() {
        let mut listener = listener();
        let mut event = 'l'.into_event();
        event.kind = KeyEventKind::Release;
        assert_eq!(listener.process_event(Event::Key(event)), None);
    }

    #[test]
    fn mouse_clicks() {
        let mut listener = listener();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 1,
            modifiers: KeyModifiers::empty(),
        };
        assert_eq!(listener.process_event(Event::Mouse(click)), Some(Command::Click { column: 4, row: 1 }));

        let scroll = MouseEvent { kind: MouseEventKind::ScrollDown, ..click };
        assert_eq!(listener.process_event(Event::Mouse(scroll)), None);
    }

    #[test]
    fn resize_redraws() {
        let mut listener = listener();
        assert_eq!(listener.process_event(Event::Resize(80, 24)), Some(Command::Redraw));
    }
}
