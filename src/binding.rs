//! Key chords, the binding table and the binding registry.
//!
//! The [`BindingTable`] is built once from a [`Keymap`] and never changes
//! afterwards.  The [`BindingRegistry`] hands the table's chords to a
//! [`KeyRegistrar`] on [`start`](BindingRegistry::start) and takes them
//! back on [`stop`](BindingRegistry::stop) or drop, so the host keeps the
//! bindings exactly as long as the registry is held.

use crate::command::Action;
use crate::partition::Partition;
use crate::traits::KeyRegistrar;
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

//  Chords

/// A modifier key.  Order is irrelevant inside a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Control,
    Alt,
    /// The platform "command" / "super" key.
    Command,
    Shift,
}

impl Modifier {
    fn name(self) -> &'static str {
        match self {
            Modifier::Control => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Command => "cmd",
            Modifier::Shift => "shift",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "ctrl" | "control" => Some(Modifier::Control),
            "alt" | "option" | "opt" => Some(Modifier::Alt),
            "cmd" | "command" | "super" | "meta" => Some(Modifier::Command),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }
}

/// The non-modifier part of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Return,
    /// An ASCII letter, stored upper-case.
    Letter(char),
    /// A numeric-keypad digit `0..=9`.
    Keypad(u8),
    KeypadEnter,
}

impl Key {
    /// Letter key; lower-case input is normalised.
    pub fn letter(c: char) -> Self {
        Key::Letter(c.to_ascii_uppercase())
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "return" | "enter" => Some(Key::Return),
            "padenter" | "kpenter" => Some(Key::KeypadEnter),
            _ => {
                if let Some(digit) = s.strip_prefix("pad").or_else(|| s.strip_prefix("kp")) {
                    return match digit.parse::<u8>() {
                        Ok(d) if d <= 9 => Some(Key::Keypad(d)),
                        _ => None,
                    };
                }
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Some(Key::letter(c)),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Return => write!(f, "return"),
            Key::Letter(c) => write!(f, "{}", c.to_ascii_lowercase()),
            Key::Keypad(d) => write!(f, "pad{}", d),
            Key::KeypadEnter => write!(f, "padenter"),
        }
    }
}

/// A key plus a set of modifiers.
///
/// The textual form is `+`-separated modifiers followed by the key, e.g.
/// `"ctrl+alt+left"` or `"shift+cmd+ctrl+alt+u"`; parsing is
/// case-insensitive and accepts modifiers in any order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chord {
    pub key: Key,
    pub modifiers: BTreeSet<Modifier>,
}

impl Chord {
    pub fn new(modifiers: &[Modifier], key: Key) -> Self {
        Self {
            key,
            modifiers: modifiers.iter().copied().collect(),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m.name())?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for Chord {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let mut parts: Vec<&str> = lowered.split('+').map(str::trim).collect();
        let key_part = parts
            .pop()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| BindingError::InvalidChord(s.to_string()))?;
        let key = Key::parse(key_part).ok_or_else(|| BindingError::InvalidChord(s.to_string()))?;
        let modifiers = parts
            .into_iter()
            .map(|p| Modifier::parse(p).ok_or_else(|| BindingError::InvalidChord(s.to_string())))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Chord { key, modifiers })
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//  Binding table

/// Which set of chords to install.
///
/// Both keymaps bind the same actions; they differ only in how the four
/// corner quarters are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keymap {
    /// Corners on the arrow keys, told apart by modifier set.
    #[default]
    Classic,
    /// Corners on `U I J K` under the shared modifier set.
    Diagonal,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("invalid chord: {0:?}")]
    InvalidChord(String),
    #[error("chord {chord} bound to both {first} and {second}")]
    Conflict {
        chord: Chord,
        first: Action,
        second: Action,
    },
    #[error("failed to register {chord}: {reason}")]
    Registration { chord: Chord, reason: String },
}

/// Immutable chord ↔ action mapping.
#[derive(Debug, Clone)]
pub struct BindingTable {
    keymap: Keymap,
    /// Action → chords, in the order the keymap lists them.
    bindings: Vec<(Action, Vec<Chord>)>,
    by_chord: HashMap<Chord, Action>,
}

const CA: &[Modifier] = &[Modifier::Control, Modifier::Alt];
const CAS: &[Modifier] = &[Modifier::Control, Modifier::Alt, Modifier::Shift];
const CAM: &[Modifier] = &[Modifier::Control, Modifier::Alt, Modifier::Command];

fn chord(modifiers: &[Modifier], key: Key) -> Chord {
    Chord::new(modifiers, key)
}

fn letter(modifiers: &[Modifier], c: char) -> Chord {
    Chord::new(modifiers, Key::letter(c))
}

fn pad(d: u8) -> Chord {
    Chord::new(CA, Key::Keypad(d))
}

fn move_to(p: Partition) -> Action {
    Action::MoveTo(p)
}

/// The bindings `keymap` installs.
fn keymap_bindings(keymap: Keymap) -> Vec<(Action, Vec<Chord>)> {
    use Partition::*;

    let corners = match keymap {
        Keymap::Classic => vec![
            (move_to(TopLeft), vec![chord(CAS, Key::Left), pad(7)]),
            (move_to(TopRight), vec![chord(CAS, Key::Right), pad(9)]),
            (move_to(BottomLeft), vec![chord(CAM, Key::Left), pad(1)]),
            (move_to(BottomRight), vec![chord(CAM, Key::Right), pad(3)]),
        ],
        Keymap::Diagonal => vec![
            (move_to(TopLeft), vec![letter(CA, 'u'), pad(7)]),
            (move_to(TopRight), vec![letter(CA, 'i'), pad(9)]),
            (move_to(BottomLeft), vec![letter(CA, 'j'), pad(1)]),
            (move_to(BottomRight), vec![letter(CA, 'k'), pad(3)]),
        ],
    };

    let mut bindings = vec![
        (move_to(Left), vec![chord(CA, Key::Left), pad(4)]),
        (move_to(Right), vec![chord(CA, Key::Right), pad(6)]),
        (move_to(Up), vec![chord(CA, Key::Up), pad(8)]),
        (move_to(Down), vec![chord(CA, Key::Down), pad(2)]),
    ];
    bindings.extend(corners);
    bindings.extend(vec![
        (move_to(Centre), vec![letter(CA, 'c'), pad(5)]),
        (
            Action::Maximize,
            vec![chord(CA, Key::Return), chord(CA, Key::KeypadEnter)],
        ),
        (move_to(LeftThird), vec![letter(CA, 'd')]),
        (move_to(CentreThird), vec![letter(CA, 'f')]),
        (move_to(RightThird), vec![letter(CA, 'g')]),
        (move_to(Left2Thirds), vec![letter(CA, 'e')]),
        (move_to(Right2Thirds), vec![letter(CA, 't')]),
        (move_to(TopLeftSix), vec![letter(CAM, 'u')]),
        (move_to(TopCentreSix), vec![letter(CAM, 'i')]),
        (move_to(TopRightSix), vec![letter(CAM, 'o')]),
        (move_to(BotLeftSix), vec![letter(CAM, 'j')]),
        (move_to(BotCentreSix), vec![letter(CAM, 'k')]),
        (move_to(BotRightSix), vec![letter(CAM, 'l')]),
        (
            Action::NextScreen { keep_maximized: false },
            vec![letter(CA, 'n')],
        ),
        (
            Action::NextScreen { keep_maximized: true },
            vec![letter(CAS, 'n')],
        ),
    ]);
    bindings
}

impl BindingTable {
    /// Build the table for one of the stock keymaps.
    pub fn build(keymap: Keymap) -> Result<Self, BindingError> {
        Self::from_bindings(keymap, keymap_bindings(keymap))
    }

    /// Build a table from explicit bindings.
    ///
    /// A chord listed twice for the same action is kept once; a chord
    /// listed for two different actions is a [`BindingError::Conflict`].
    pub fn from_bindings(
        keymap: Keymap,
        bindings: Vec<(Action, Vec<Chord>)>,
    ) -> Result<Self, BindingError> {
        let mut by_chord: HashMap<Chord, Action> = HashMap::new();
        let mut merged: Vec<(Action, Vec<Chord>)> = Vec::new();

        for (action, chords) in bindings {
            let slot = match merged.iter().position(|(a, _)| *a == action) {
                Some(i) => i,
                None => {
                    merged.push((action, Vec::new()));
                    merged.len() - 1
                }
            };
            for chord in chords {
                match by_chord.get(&chord) {
                    Some(existing) if *existing == action => continue,
                    Some(existing) => {
                        return Err(BindingError::Conflict {
                            chord,
                            first: *existing,
                            second: action,
                        })
                    }
                    None => {
                        by_chord.insert(chord.clone(), action);
                        merged[slot].1.push(chord);
                    }
                }
            }
        }

        debug!("built {:?} binding table: {} chords", keymap, by_chord.len());
        Ok(Self {
            keymap,
            bindings: merged,
            by_chord,
        })
    }

    pub fn keymap(&self) -> Keymap {
        self.keymap
    }

    /// The action bound to `chord`, if any.
    pub fn action_for(&self, chord: &Chord) -> Option<Action> {
        self.by_chord.get(chord).copied()
    }

    /// Every chord bound to `action` (empty if it is unbound).
    pub fn chords_for(&self, action: &Action) -> &[Chord] {
        self.bindings
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, chords)| chords.as_slice())
            .unwrap_or(&[])
    }

    /// `(action, chords)` pairs in keymap order.
    pub fn bindings(&self) -> &[(Action, Vec<Chord>)] {
        &self.bindings
    }

    /// All bound chords, in keymap order.
    pub fn chords(&self) -> impl Iterator<Item = &Chord> {
        self.bindings.iter().flat_map(|(_, chords)| chords.iter())
    }

    /// Number of bound chords.
    pub fn len(&self) -> usize {
        self.by_chord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chord.is_empty()
    }
}

//  Registry

/// Owns the host-side registration of every chord in a [`BindingTable`].
///
/// Bindings exist between [`start`](Self::start) and
/// [`stop`](Self::stop).  Dropping a started registry stops it.
pub struct BindingRegistry<R: KeyRegistrar> {
    registrar: R,
    chords: Vec<Chord>,
    handles: Vec<R::Handle>,
    active: bool,
}

impl<R: KeyRegistrar> BindingRegistry<R> {
    pub fn new(registrar: R, table: &BindingTable) -> Self {
        Self {
            registrar,
            chords: table.chords().cloned().collect(),
            handles: Vec::new(),
            active: false,
        }
    }

    /// Register every chord with the host.
    ///
    /// Calling `start` on a running registry does nothing.  If any chord
    /// fails, the ones already registered are released again and the
    /// registry stays stopped.
    pub fn start(&mut self) -> Result<(), BindingError> {
        if self.active {
            return Ok(());
        }
        let mut failure = None;
        for chord in &self.chords {
            match self.registrar.register(chord) {
                Ok(handle) => self.handles.push(handle),
                Err(e) => {
                    failure = Some((chord.clone(), e.to_string()));
                    break;
                }
            }
        }
        if let Some((chord, reason)) = failure {
            warn!("could not register {}: {}", chord, reason);
            self.release();
            return Err(BindingError::Registration { chord, reason });
        }
        self.active = true;
        info!("registered {} key bindings", self.handles.len());
        Ok(())
    }

    /// Release every registered chord.  A no-op when not started.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        let count = self.handles.len();
        self.release();
        self.active = false;
        info!("released {} key bindings", count);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The chords this registry manages.
    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Shared reference to the underlying registrar.
    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    fn release(&mut self) {
        for handle in self.handles.drain(..) {
            if let Err(e) = self.registrar.unregister(handle) {
                warn!("could not unregister key binding: {}", e);
            }
        }
    }
}

impl<R: KeyRegistrar> Drop for BindingRegistry<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn chord_text_round_trip() {
        let c = Chord::new(&[Modifier::Alt, Modifier::Control], Key::Left);
        assert_eq!(c.to_string(), "ctrl+alt+left");
        assert_eq!("ctrl+alt+left".parse::<Chord>(), Ok(c));
    }

    #[test]
    fn chord_modifier_order_is_irrelevant() {
        let a: Chord = "Shift+Ctrl+Alt+N".parse().unwrap();
        let b: Chord = "alt+ctrl+shift+n".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key, Key::Letter('N'));
    }

    #[test]
    fn chord_aliases() {
        let c: Chord = "control+option+super+pad7".parse().unwrap();
        assert_eq!(
            c,
            Chord::new(&[Modifier::Control, Modifier::Alt, Modifier::Command], Key::Keypad(7))
        );
        let c: Chord = "ctrl+alt+enter".parse().unwrap();
        assert_eq!(c.key, Key::Return);
    }

    #[test]
    fn invalid_chords() {
        for s in ["", "ctrl+", "ctrl+hyper+a", "ctrl+alt+pad10", "ctrl+alt+ab"] {
            assert!(s.parse::<Chord>().is_err(), "{:?} should not parse", s);
        }
    }

    #[test]
    fn chord_serde_uses_text_form() {
        let c = Chord::new(CA, Key::KeypadEnter);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#""ctrl+alt+padenter""#);
        let back: Chord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn both_keymaps_build_without_conflicts() {
        for keymap in [Keymap::Classic, Keymap::Diagonal] {
            let table = BindingTable::build(keymap).unwrap();
            assert_eq!(table.keymap(), keymap);
            assert!(!table.is_empty());
        }
    }

    #[test]
    fn every_partition_is_bound() {
        for keymap in [Keymap::Classic, Keymap::Diagonal] {
            let table = BindingTable::build(keymap).unwrap();
            for p in Partition::ALL {
                assert!(
                    !table.chords_for(&Action::MoveTo(p)).is_empty(),
                    "{} unbound in {:?}",
                    p,
                    keymap
                );
            }
            assert!(!table.chords_for(&Action::Maximize).is_empty());
            assert!(!table
                .chords_for(&Action::NextScreen { keep_maximized: true })
                .is_empty());
        }
    }

    #[test]
    fn primary_and_keypad_share_an_action() {
        let table = BindingTable::build(Keymap::Classic).unwrap();
        let left = Action::MoveTo(Partition::Left);
        assert_eq!(table.action_for(&"ctrl+alt+left".parse().unwrap()), Some(left));
        assert_eq!(table.action_for(&"ctrl+alt+pad4".parse().unwrap()), Some(left));
        assert_eq!(table.chords_for(&left).len(), 2);
    }

    #[test]
    fn classic_corners_use_modifiers() {
        let table = BindingTable::build(Keymap::Classic).unwrap();
        assert_eq!(
            table.action_for(&"ctrl+alt+shift+left".parse().unwrap()),
            Some(Action::MoveTo(Partition::TopLeft))
        );
        assert_eq!(
            table.action_for(&"ctrl+alt+cmd+right".parse().unwrap()),
            Some(Action::MoveTo(Partition::BottomRight))
        );
        assert_eq!(table.action_for(&"ctrl+alt+u".parse().unwrap()), None);
    }

    #[test]
    fn diagonal_corners_use_letters() {
        let table = BindingTable::build(Keymap::Diagonal).unwrap();
        assert_eq!(
            table.action_for(&"ctrl+alt+u".parse().unwrap()),
            Some(Action::MoveTo(Partition::TopLeft))
        );
        assert_eq!(
            table.action_for(&"ctrl+alt+k".parse().unwrap()),
            Some(Action::MoveTo(Partition::BottomRight))
        );
        assert_eq!(table.action_for(&"ctrl+alt+shift+left".parse().unwrap()), None);
        // Sixths keep their own modifier set and do not collide.
        assert_eq!(
            table.action_for(&"ctrl+alt+cmd+u".parse().unwrap()),
            Some(Action::MoveTo(Partition::TopLeftSix))
        );
    }

    #[test]
    fn conflicting_chord_is_rejected() {
        let c = Chord::new(CA, Key::Left);
        let err = BindingTable::from_bindings(
            Keymap::Classic,
            vec![
                (Action::MoveTo(Partition::Left), vec![c.clone()]),
                (Action::Maximize, vec![c.clone()]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            BindingError::Conflict {
                chord: c,
                first: Action::MoveTo(Partition::Left),
                second: Action::Maximize,
            }
        );
    }

    #[test]
    fn duplicate_chord_for_same_action_is_merged() {
        let c = Chord::new(CA, Key::Left);
        let table = BindingTable::from_bindings(
            Keymap::Classic,
            vec![
                (Action::Maximize, vec![c.clone()]),
                (Action::Maximize, vec![c.clone(), Chord::new(CA, Key::Return)]),
            ],
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.bindings().len(), 1);
        assert_eq!(table.chords_for(&Action::Maximize).len(), 2);
    }

    //  Registry

    #[derive(Debug, thiserror::Error)]
    #[error("mock registrar refused {0}")]
    struct MockError(String);

    /// Records live registrations; optionally refuses one chord.
    #[derive(Default, Clone)]
    struct MockRegistrar {
        live: Rc<RefCell<Vec<Chord>>>,
        refuse: Option<Chord>,
    }

    impl KeyRegistrar for MockRegistrar {
        type Error = MockError;
        type Handle = Chord;

        fn register(&mut self, chord: &Chord) -> Result<Chord, MockError> {
            if self.refuse.as_ref() == Some(chord) {
                return Err(MockError(chord.to_string()));
            }
            self.live.borrow_mut().push(chord.clone());
            Ok(chord.clone())
        }

        fn unregister(&mut self, handle: Chord) -> Result<(), MockError> {
            self.live.borrow_mut().retain(|c| *c != handle);
            Ok(())
        }
    }

    #[test]
    fn start_registers_every_chord_and_stop_releases() {
        let table = BindingTable::build(Keymap::Classic).unwrap();
        let mock = MockRegistrar::default();
        let live = mock.live.clone();
        let mut registry = BindingRegistry::new(mock, &table);

        registry.start().unwrap();
        assert!(registry.is_active());
        assert_eq!(live.borrow().len(), table.len());

        // Idempotent.
        registry.start().unwrap();
        assert_eq!(live.borrow().len(), table.len());

        registry.stop();
        assert!(!registry.is_active());
        assert!(live.borrow().is_empty());
    }

    #[test]
    fn drop_releases_bindings() {
        let table = BindingTable::build(Keymap::Diagonal).unwrap();
        let mock = MockRegistrar::default();
        let live = mock.live.clone();
        {
            let mut registry = BindingRegistry::new(mock, &table);
            registry.start().unwrap();
            assert!(!live.borrow().is_empty());
        }
        assert!(live.borrow().is_empty());
    }

    #[test]
    fn failed_start_rolls_back() {
        let table = BindingTable::build(Keymap::Classic).unwrap();
        let refused: Chord = "ctrl+alt+c".parse().unwrap();
        let mock = MockRegistrar {
            refuse: Some(refused.clone()),
            ..Default::default()
        };
        let live = mock.live.clone();
        let mut registry = BindingRegistry::new(mock, &table);

        let err = registry.start().unwrap_err();
        assert!(matches!(err, BindingError::Registration { ref chord, .. } if *chord == refused));
        assert!(!registry.is_active());
        assert!(live.borrow().is_empty());
    }
}
