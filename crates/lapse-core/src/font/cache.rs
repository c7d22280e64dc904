use heapless::Vec;

use super::{FontDescriptor, FontError, GlyphBitmap, GlyphSource};
use crate::gb2312::Gb2312Code;

struct Entry {
    code: Gb2312Code,
    glyph: GlyphBitmap,
    last_used: u32,
}

/// Bounded LRU in front of another glyph source.
///
/// Entries are dropped whenever the inner descriptor or revision changes. Failed loads
/// are never cached.
pub struct CachedGlyphSource<G, const N: usize> {
    inner: G,
    entries: Vec<Entry, N>,
    cached_for: (Option<FontDescriptor>, u32),
    tick: u32,
    hits: u32,
    misses: u32,
}

impl<G, const N: usize> CachedGlyphSource<G, N>
where
    G: GlyphSource,
{
    pub const fn new(inner: G) -> Self {
        Self {
            inner,
            entries: Vec::new(),
            cached_for: (None, 0),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Mutable access to the wrapped source; the cache revalidates on next use.
    pub fn inner_mut(&mut self) -> &mut G {
        &mut self.inner
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u32, u32) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn revalidate(&mut self) {
        let current = (self.inner.descriptor(), self.inner.revision());
        if current != self.cached_for {
            self.entries.clear();
            self.cached_for = current;
        }
    }

    fn insert(&mut self, code: Gb2312Code, glyph: GlyphBitmap) {
        let entry = Entry {
            code,
            glyph,
            last_used: self.tick,
        };

        if self.entries.is_full() {
            let oldest = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(i, _)| i);
            if let Some(i) = oldest {
                self.entries[i] = entry;
            }
        } else {
            let _ = self.entries.push(entry);
        }
    }
}

impl<G, const N: usize> GlyphSource for CachedGlyphSource<G, N>
where
    G: GlyphSource,
{
    fn descriptor(&self) -> Option<FontDescriptor> {
        self.inner.descriptor()
    }

    fn revision(&self) -> u32 {
        self.inner.revision()
    }

    fn load_glyph(&mut self, code: Gb2312Code) -> Result<GlyphBitmap, FontError> {
        self.revalidate();
        self.tick = self.tick.wrapping_add(1);

        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.code == code) {
            entry.last_used = self.tick;
            self.hits = self.hits.saturating_add(1);
            return Ok(entry.glyph.clone());
        }

        self.misses = self.misses.saturating_add(1);
        let glyph = self.inner.load_glyph(code)?;
        if N > 0 {
            self.insert(code, glyph.clone());
        }
        Ok(glyph)
    }
}
