//! Sink selection policies
//!
//! Pure functions over an inventory snapshot; nothing here talks to the
//! audio server or the filesystem.

use crate::pulse::Sink;
use crate::state::GroupState;

/// Pick the sink after the current one, wrapping to the front
///
/// "Current" is the LAST sink whose `selected` flag is set, since the whole
/// list is scanned and later matches overwrite earlier ones. With nothing
/// selected the first sink is returned. `None` only for an empty list.
#[must_use]
pub fn select_next(sinks: &[Sink]) -> Option<&Sink> {
    let current = sinks.iter().rposition(|s| s.selected);
    match current {
        Some(i) => sinks.get((i + 1) % sinks.len()),
        None => sinks.first(),
    }
}

/// First sink whose name contains `needle` (case-sensitive, unanchored)
#[must_use]
pub fn select_by_name<'a>(sinks: &'a [Sink], needle: &str) -> Option<&'a Sink> {
    sinks.iter().find(|s| s.name.contains(needle))
}

/// Next entry of a rotation group after the last one matched
///
/// Wraps past the end. When the remembered name is absent (or not part of
/// this group) rotation starts from the first entry. `None` for an empty group.
#[must_use]
pub fn select_next_in_group<'a, S: AsRef<str>>(
    group: &'a [S],
    state: &GroupState,
) -> Option<&'a str> {
    let position = state
        .last_matched_name
        .as_deref()
        .and_then(|last| group.iter().position(|g| <S as AsRef<str>>::as_ref(g) == last));

    let next = match position {
        Some(i) => (i + 1) % group.len(),
        None => 0,
    };

    group.get(next).map(<S as AsRef<str>>::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sinks(states: &[&str]) -> Vec<Sink> {
        states
            .iter()
            .enumerate()
            .map(|(i, state)| Sink::new(i as u32, format!("Sink {i}"), *state))
            .collect()
    }

    fn state(last: Option<&str>) -> GroupState {
        GroupState {
            last_matched_name: last.map(String::from),
            notification_handle: 0,
        }
    }

    // select_next() tests
    #[test_case(&["RUNNING", "SUSPENDED", "SUSPENDED"], 1 ; "first selected")]
    #[test_case(&["SUSPENDED", "IDLE", "SUSPENDED"], 2 ; "middle selected")]
    #[test_case(&["SUSPENDED", "SUSPENDED", "RUNNING"], 0 ; "last selected wraps")]
    #[test_case(&["SUSPENDED", "SUSPENDED", "SUSPENDED"], 0 ; "none selected picks first")]
    #[test_case(&["RUNNING", "SUSPENDED", "IDLE", "SUSPENDED"], 3 ; "last selected wins")]
    #[test_case(&["RUNNING"], 0 ; "single sink selects itself")]
    fn test_select_next(states: &[&str], expected: u32) {
        let list = sinks(states);
        assert_eq!(select_next(&list).map(|s| s.index), Some(expected));
    }

    #[test]
    fn test_select_next_empty_returns_none() {
        assert_eq!(select_next(&[]), None);
    }

    #[test]
    fn test_select_next_speakers_to_headphones() {
        let list = vec![
            Sink::new(0, "Speakers", "RUNNING"),
            Sink::new(1, "Headphones", "IDLE"),
        ];
        // Both look selected; the later one decides, so rotation wraps to Speakers
        assert_eq!(select_next(&list).map(|s| s.index), Some(0));

        let list = vec![
            Sink::new(0, "Speakers", "RUNNING"),
            Sink::new(1, "Headphones", "SUSPENDED"),
        ];
        assert_eq!(select_next(&list).map(|s| s.name.as_str()), Some("Headphones"));
    }

    // select_by_name() tests
    #[test]
    fn test_select_by_name_substring_first_match() {
        let list = vec![
            Sink::new(4, "Built-in Audio", "IDLE"),
            Sink::new(5, "USB Audio DAC", "SUSPENDED"),
            Sink::new(6, "USB Headset", "SUSPENDED"),
        ];
        assert_eq!(select_by_name(&list, "USB").map(|s| s.index), Some(5));
        assert_eq!(select_by_name(&list, "Headset").map(|s| s.index), Some(6));
    }

    #[test]
    fn test_select_by_name_is_case_sensitive() {
        let list = vec![Sink::new(0, "USB DAC", "IDLE")];
        assert!(select_by_name(&list, "usb").is_none());
    }

    #[test]
    fn test_select_by_name_no_match() {
        let list = vec![Sink::new(0, "Speakers", "IDLE")];
        assert!(select_by_name(&list, "USB").is_none());
        assert!(select_by_name(&[], "USB").is_none());
    }

    // select_next_in_group() tests
    #[test_case(Some("A"), "B" ; "advances")]
    #[test_case(Some("B"), "C" ; "advances from middle")]
    #[test_case(Some("C"), "A" ; "wraps past end")]
    #[test_case(Some("Z"), "A" ; "unknown name starts at first")]
    #[test_case(None, "A" ; "no state starts at first")]
    fn test_select_next_in_group(last: Option<&str>, expected: &str) {
        let group = ["A", "B", "C"];
        assert_eq!(select_next_in_group(&group, &state(last)), Some(expected));
    }

    #[test]
    fn test_select_next_in_group_empty_group() {
        let group: [&str; 0] = [];
        assert_eq!(select_next_in_group(&group, &state(Some("A"))), None);
    }

    #[test]
    fn test_select_next_in_group_accepts_owned_strings() {
        let group = vec!["DAC".to_string(), "Mic".to_string()];
        assert_eq!(select_next_in_group(&group, &state(Some("Mic"))), Some("DAC"));
    }
}
