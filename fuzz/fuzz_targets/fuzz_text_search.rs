#![no_main]

use arbitrary::Arbitrary;
use canopy_text::CaseMode;
use canopy_view::{SearchHost, TextSearch};
use libfuzzer_sys::fuzz_target;
use std::borrow::Cow;
use std::time::Duration;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
struct Input {
    labels: Vec<String>,
    selected: Option<u8>,
    keys: Vec<Key>,
    case_sensitive: bool,
}

#[derive(Debug, Arbitrary)]
enum Key {
    Text(String),
    Char(char),
    Backspace,
    Wait(u16),
}

struct Rows {
    labels: Vec<String>,
    selected: Option<usize>,
}

impl SearchHost for Rows {
    fn item_count(&self) -> usize {
        self.labels.len()
    }
    fn display_text(&self, index: usize) -> Option<Cow<'_, str>> {
        self.labels.get(index).map(|s| Cow::Borrowed(s.as_str()))
    }
    fn selected_index(&self) -> Option<usize> {
        self.selected
    }
    fn select(&mut self, index: usize) {
        assert!(index < self.labels.len(), "selected row {index} out of range");
        self.selected = Some(index);
    }
}

fuzz_target!(|input: Input| {
    if input.labels.len() > 64 || input.keys.len() > 64 {
        return;
    }
    let selected = input
        .selected
        .map(|s| s as usize)
        .filter(|&s| s < input.labels.len());
    let mut rows = Rows {
        labels: input.labels,
        selected,
    };
    let mut search = TextSearch::new(
        CaseMode::from_sensitive(input.case_sensitive),
        Duration::from_millis(200),
    );
    let mut now = Instant::now();

    for key in &input.keys {
        match key {
            Key::Text(text) => {
                let matched = search.on_text(&mut rows, text, now);
                if matched {
                    let row = search.last_match().expect("active after a match");
                    assert!(row < rows.labels.len());
                }
            }
            Key::Char(c) => {
                search.on_char(&mut rows, *c, now);
            }
            Key::Backspace => {
                let before = search.prefix().len();
                search.on_backspace(now);
                assert!(search.prefix().len() <= before, "backspace grew the prefix");
            }
            Key::Wait(ms) => now += Duration::from_millis(u64::from(*ms)),
        }
        // The prefix is only ever built from consumed input.
        assert!(search.is_active() || search.prefix().is_empty());
    }
});
