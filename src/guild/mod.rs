//! Per-guild runtime state
//!
//! Features that keep transient state (a paused flag, what is playing next)
//! hold a [`GuildRegistry`] and look their guild up in it, instead of
//! sharing process-wide flags between guilds.

pub mod queue;

pub use queue::PlaybackQueue;

use std::collections::HashMap;

/// Transient state of one guild
#[derive(Debug, Clone)]
pub struct GuildState<T> {
    /// Whether playback is paused
    pub paused: bool,
    /// Items waiting to play, plus the one playing now
    pub queue: PlaybackQueue<T>,
}

impl<T> Default for GuildState<T> {
    fn default() -> Self {
        Self {
            paused: false,
            queue: PlaybackQueue::new(),
        }
    }
}

/// Guild id to state map, owned by whoever dispatches commands
#[derive(Debug, Clone)]
pub struct GuildRegistry<T> {
    guilds: HashMap<u64, GuildState<T>>,
}

impl<T> Default for GuildRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GuildRegistry<T> {
    pub fn new() -> Self {
        Self {
            guilds: HashMap::new(),
        }
    }

    /// State of `gid`, if the guild has any
    pub fn state(&self, gid: u64) -> Option<&GuildState<T>> {
        self.guilds.get(&gid)
    }

    /// State of `gid`, created on first use
    pub fn state_mut(&mut self, gid: u64) -> &mut GuildState<T> {
        self.guilds.entry(gid).or_default()
    }

    pub fn is_paused(&self, gid: u64) -> bool {
        self.state(gid).is_some_and(|s| s.paused)
    }

    /// Forget a guild, e.g. when the bot leaves it
    pub fn remove(&mut self, gid: u64) -> Option<GuildState<T>> {
        self.guilds.remove(&gid)
    }

    pub fn len(&self) -> usize {
        self.guilds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_is_per_guild() {
        let mut registry: GuildRegistry<String> = GuildRegistry::new();
        registry.state_mut(1).paused = true;

        assert!(registry.is_paused(1));
        assert!(!registry.is_paused(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn queues_are_per_guild() {
        let mut registry = GuildRegistry::new();
        registry.state_mut(1).queue.enqueue("a.mp3");
        registry.state_mut(2).queue.enqueue("b.mp3");

        assert_eq!(registry.state_mut(1).queue.advance(), Some(&"a.mp3"));
        assert_eq!(registry.state(2).unwrap().queue.len(), 1);

        assert!(registry.remove(1).is_some());
        assert!(registry.state(1).is_none());
    }
}
