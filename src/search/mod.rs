pub mod debounce;
pub mod highlight;

use std::time::Duration;

use serde::Serialize;

pub use debounce::Debouncer;
pub use highlight::{fold_case, match_spans, Decoration, Highlighted, Segment};

pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(50);
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(300);

/// A searchable record: the visible text segments of one card and their
/// folded projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    segments: Vec<String>,
    searchable: String,
}

impl Item {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let searchable = fold_case(&segments.join("\n"));
        Self {
            segments,
            searchable,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn searchable_text(&self) -> &str {
        &self.searchable
    }

    pub fn display_text(&self) -> String {
        self.segments.join(" ")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    term: String,
    active: bool,
}

impl SearchState {
    pub fn from_raw(raw: &str) -> Self {
        let term = fold_case(raw.trim());
        let active = !term.is_empty();
        Self { term, active }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn active(&self) -> bool {
        self.active
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    Show {
        #[serde(rename = "delay_ms", serialize_with = "serialize_millis")]
        delay: Duration,
    },
    Hide {
        #[serde(rename = "after_ms", serialize_with = "serialize_millis")]
        after: Duration,
    },
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemView {
    pub index: usize,
    pub visible: bool,
    pub transition: Transition,
    /// One entry per item segment, decorated only when highlights apply.
    pub segments: Vec<Highlighted>,
}

impl ItemView {
    pub fn plain_text(&self) -> Vec<String> {
        self.segments.iter().map(Highlighted::plain_text).collect()
    }

    pub fn has_highlights(&self) -> bool {
        self.segments.iter().any(Highlighted::has_highlights)
    }

    pub fn render(&self, decoration: &Decoration) -> Vec<String> {
        self.segments.iter().map(|s| s.render(decoration)).collect()
    }
}

/// Everything a presentation layer needs after one filter pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPass {
    pub term: String,
    pub active: bool,
    pub visible_count: usize,
    pub no_results: bool,
    pub focus_requested: bool,
    pub views: Vec<ItemView>,
}

impl FilterPass {
    pub fn visible(&self) -> impl Iterator<Item = &ItemView> {
        self.views.iter().filter(|v| v.visible)
    }
}

#[derive(Clone, Debug)]
pub struct FilterOptions {
    pub stagger: Duration,
    pub hide_delay: Duration,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            stagger: DEFAULT_STAGGER,
            hide_delay: DEFAULT_HIDE_DELAY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchFilter {
    items: Vec<Item>,
    state: SearchState,
    options: FilterOptions,
    pass: FilterPass,
}

impl SearchFilter {
    pub fn new(items: Vec<Item>, options: FilterOptions) -> Self {
        let mut filter = Self {
            items,
            state: SearchState::default(),
            options,
            pass: FilterPass::default(),
        };
        filter.recompute();
        filter
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn pass(&self) -> &FilterPass {
        &self.pass
    }

    /// Case-insensitive literal containment. The term is never compiled into
    /// a pattern.
    pub fn is_match(item: &Item, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        item.searchable_text().contains(fold_case(term).as_str())
    }

    /// Counts matches for `term`, normalized the same way `set_term` does.
    pub fn visible_count(&self, term: &str) -> usize {
        let state = SearchState::from_raw(term);
        if !state.active() {
            return self.items.len();
        }
        self.items
            .iter()
            .filter(|item| item.searchable_text().contains(state.term()))
            .count()
    }

    pub fn no_results(&self, term: &str) -> bool {
        SearchState::from_raw(term).active() && self.visible_count(term) == 0
    }

    pub fn set_term(&mut self, raw: &str) -> &FilterPass {
        self.state = SearchState::from_raw(raw);
        log::debug!("filter pass for term {:?}", self.state.term());
        self.recompute();
        &self.pass
    }

    pub fn clear(&mut self) -> &FilterPass {
        self.set_term("");
        self.pass.focus_requested = true;
        &self.pass
    }

    /// Replaces the item list and recomputes against the current term.
    pub fn set_items(&mut self, items: Vec<Item>) -> &FilterPass {
        self.items = items;
        self.recompute();
        &self.pass
    }

    /// Rebuilds the decorations of visible items from their original text.
    /// Hidden items, and every item when `term` is empty, are left plain.
    pub fn apply_highlights(&mut self, term: &str) {
        let folded = fold_case(term);
        for view in self.pass.views.iter_mut() {
            let item = &self.items[view.index];
            view.segments = if view.visible && !folded.is_empty() {
                item.segments()
                    .iter()
                    .map(|s| Highlighted::build(s, &folded))
                    .collect()
            } else {
                item.segments().iter().map(|s| Highlighted::plain(s)).collect()
            };
        }
    }

    pub fn revert_highlights(&mut self) {
        for view in self.pass.views.iter_mut() {
            view.segments = self.items[view.index]
                .segments()
                .iter()
                .map(|s| Highlighted::plain(s))
                .collect();
        }
    }

    fn recompute(&mut self) {
        let term = self.state.term().to_string();
        let mut views = Vec::with_capacity(self.items.len());
        let mut visible_count = 0;
        for (index, item) in self.items.iter().enumerate() {
            let visible = Self::is_match(item, &term);
            let transition = if visible {
                visible_count += 1;
                let step = u32::try_from(index).unwrap_or(u32::MAX);
                Transition::Show {
                    delay: self.options.stagger.saturating_mul(step),
                }
            } else {
                Transition::Hide {
                    after: self.options.hide_delay,
                }
            };
            log::trace!("item {index} visible={visible}");
            views.push(ItemView {
                index,
                visible,
                transition,
                segments: item.segments().iter().map(|s| Highlighted::plain(s)).collect(),
            });
        }

        self.pass = FilterPass {
            term: term.clone(),
            active: self.state.active(),
            visible_count,
            no_results: self.state.active() && visible_count == 0,
            focus_requested: false,
            views,
        };

        if self.state.active() && visible_count > 0 {
            self.apply_highlights(&term);
        }
    }
}
