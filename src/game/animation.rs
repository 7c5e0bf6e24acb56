//! Animation playback
//!
//! Actors with bound clips expose the [`AnimatedActor`] capability; actors
//! without clips simply have no [`ClipSet`]. Clips are picked by keyword:
//! the first clip whose name contains the keyword (ignoring case) wins.
//!
//! A clip set keeps one looping clip and, on top of it, at most one
//! one-shot clip that plays through once and holds its last frame.

use crate::game::config::ClipDesc;

/// Keyword-driven clip playback.
pub trait AnimatedActor {
    /// Whether any clip name contains `keyword` (case-insensitive).
    fn has_clip(&self, keyword: &str) -> bool;

    /// Loop the first clip matching `keyword`.
    ///
    /// Returns `true` when a matching clip is playing afterwards, which
    /// includes the case where one already was (it is left running).
    fn play_loop(&mut self, keyword: &str) -> bool;

    /// Play the first clip matching `keyword` once from the start and
    /// clamp on its last frame. No-op without a match.
    fn play_once(&mut self, keyword: &str);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Playback {
    clip: usize,
    time: f32,
}

/// The clips bound to one actor and their playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSet {
    clips: Vec<ClipDesc>,
    looping: Option<Playback>,
    one_shot: Option<Playback>,
}

impl ClipSet {
    /// `None` for an empty clip list: such actors are not animated.
    pub fn new(clips: Vec<ClipDesc>) -> Option<Self> {
        if clips.is_empty() {
            return None;
        }
        Some(Self {
            clips,
            looping: None,
            one_shot: None,
        })
    }

    fn find(&self, keyword: &str) -> Option<usize> {
        let keyword = keyword.to_lowercase();
        self.clips
            .iter()
            .position(|clip| clip.name.to_lowercase().contains(&keyword))
    }

    /// Advance playback time. Loops wrap, one-shots clamp.
    pub fn advance(&mut self, delta: f32) {
        if let Some(playback) = &mut self.looping {
            let duration = self.clips[playback.clip].duration;
            playback.time += delta;
            if duration > 0.0 {
                playback.time %= duration;
            }
        }
        if let Some(playback) = &mut self.one_shot {
            let duration = self.clips[playback.clip].duration;
            playback.time = (playback.time + delta).min(duration.max(0.0));
        }
    }

    /// Name of the looping clip.
    pub fn current(&self) -> Option<&str> {
        self.looping.map(|p| self.clips[p.clip].name.as_str())
    }

    /// Name of the one-shot clip, including one held on its last frame.
    pub fn one_shot(&self) -> Option<&str> {
        self.one_shot.map(|p| self.clips[p.clip].name.as_str())
    }

    /// Whether the one-shot clip has reached its end.
    pub fn one_shot_finished(&self) -> bool {
        self.one_shot
            .is_some_and(|p| p.time >= self.clips[p.clip].duration)
    }

    /// Playback time of the looping clip in seconds.
    pub fn loop_time(&self) -> f32 {
        self.looping.map_or(0.0, |p| p.time)
    }
}

impl AnimatedActor for ClipSet {
    fn has_clip(&self, keyword: &str) -> bool {
        self.find(keyword).is_some()
    }

    fn play_loop(&mut self, keyword: &str) -> bool {
        let keyword_lower = keyword.to_lowercase();
        if self
            .current()
            .is_some_and(|name| name.to_lowercase().contains(&keyword_lower))
        {
            return true;
        }
        match self.find(keyword) {
            Some(clip) => {
                self.looping = Some(Playback { clip, time: 0.0 });
                true
            }
            None => false,
        }
    }

    fn play_once(&mut self, keyword: &str) {
        if let Some(clip) = self.find(keyword) {
            self.one_shot = Some(Playback { clip, time: 0.0 });
        }
    }
}
