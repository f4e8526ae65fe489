//! Stack of open elements for the locator.

use std::borrow::Cow;

/// Entry for a start tag that is still waiting for its end tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct OpenFrame<'a> {
    pub(crate) tag: Cow<'a, str>,
    pub(crate) id: Cow<'a, str>,
    pub(crate) has_marker: bool,
    /// Offset of the `<` that opened the element.
    pub(crate) start: usize,
}

/// Result of closing the nearest open element with a given name.
#[derive(Debug)]
pub(crate) struct Closed<'a> {
    pub(crate) frame: OpenFrame<'a>,
    /// Frames above the matched one, dropped without being emitted.
    pub(crate) discarded: usize,
    /// How many of the dropped frames carried the marker attribute.
    pub(crate) discarded_marked: usize,
}

/// Innermost-last stack with index-based truncation.
#[derive(Clone, Debug, Default)]
pub(crate) struct OpenElementsStack<'a> {
    items: Vec<OpenFrame<'a>>,
    max_depth: u32,
}

impl<'a> OpenElementsStack<'a> {
    pub(crate) fn push(&mut self, frame: OpenFrame<'a>) {
        self.items.push(frame);
        self.max_depth = self.max_depth.max(saturating_depth(self.items.len()));
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> Option<&OpenFrame<'a>> {
        self.items.last()
    }

    #[cfg(any(test, feature = "debug-stats"))]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[cfg(test)]
    pub(crate) fn iter_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|frame| frame.tag.as_ref())
    }

    /// Removes frames from the top down to and including the nearest frame
    /// named `tag`, and returns the matched frame.
    ///
    /// Returns `None` and leaves the stack untouched when no frame matches.
    pub(crate) fn pop_until_including(&mut self, tag: &str) -> Option<Closed<'a>> {
        let index = self.items.iter().rposition(|frame| frame.tag == tag)?;
        let above = &self.items[index + 1..];
        let discarded = above.len();
        let discarded_marked = above.iter().filter(|frame| frame.has_marker).count();
        self.items.truncate(index + 1);
        let frame = self.items.pop()?;
        Some(Closed {
            frame,
            discarded,
            discarded_marked,
        })
    }

    /// Drops every remaining frame; returns `(frames, marked frames)` dropped.
    pub(crate) fn clear(&mut self) -> (usize, usize) {
        let frames = self.items.len();
        let marked = self.items.iter().filter(|frame| frame.has_marker).count();
        self.items.clear();
        (frames, marked)
    }
}

fn saturating_depth(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
