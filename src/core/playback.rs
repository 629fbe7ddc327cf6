//! 前端播放迴圈：固定間隔前進一格，循環播放。
//!
//! `Playback` 是純狀態機；`Player` 把它放進獨立的 tokio task，
//! 透過 mpsc 接收指令、透過 watch 發布目前狀態。

use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub current: usize,
    pub frame_count: usize,
    pub playing: bool,
}

impl PlaybackState {
    pub fn progress_percent(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.current + 1) as f64 / self.frame_count as f64 * 100.0
    }

    pub fn label(&self) -> String {
        if self.frame_count == 0 {
            return "No frames".to_string();
        }
        format!("Frame {} of {}", self.current + 1, self.frame_count)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Playback {
    state: PlaybackState,
}

impl Playback {
    pub fn new(frame_count: usize) -> Self {
        let mut playback = Self::default();
        playback.load(frame_count);
        playback
    }

    /// 載入新的序列：回到第一格並開始播放
    pub fn load(&mut self, frame_count: usize) {
        self.state = PlaybackState {
            current: 0,
            frame_count,
            playing: frame_count > 0,
        };
    }

    /// 播放中才前進，回傳前進後的位置
    pub fn tick(&mut self) -> Option<usize> {
        if !self.state.playing || self.state.frame_count == 0 {
            return None;
        }
        self.state.current = (self.state.current + 1) % self.state.frame_count;
        Some(self.state.current)
    }

    pub fn toggle(&mut self) {
        self.state.playing = !self.state.playing && self.state.frame_count > 0;
    }

    pub fn reset(&mut self) {
        self.state.current = 0;
        self.state.playing = false;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.state.current
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Toggle,
    Reset,
}

pub struct Player {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    state: watch::Receiver<PlaybackState>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Player {
    pub fn spawn(frame_count: usize, interval: Duration) -> Self {
        let mut playback = Playback::new(frame_count);
        let (state_tx, state_rx) = watch::channel(playback.state());
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval 的第一次 tick 立即完成，先消耗掉
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if playback.tick().is_some() {
                            let _ = state_tx.send(playback.state());
                        }
                    }
                    cmd = cmd_rx.recv() => match cmd {
                        Some(PlayerCommand::Toggle) => {
                            playback.toggle();
                            let _ = state_tx.send(playback.state());
                        }
                        Some(PlayerCommand::Reset) => {
                            playback.reset();
                            let _ = state_tx.send(playback.state());
                        }
                        None => break,
                    },
                }
            }
            tracing::debug!("Player stopped at frame {}", playback.current());
        });

        Self {
            commands: cmd_tx,
            state: state_rx,
            stop: Some(stop_tx),
            task,
        }
    }

    pub fn toggle(&self) {
        let _ = self.commands.send(PlayerCommand::Toggle);
    }

    pub fn reset(&self) {
        let _ = self.commands.send(PlayerCommand::Reset);
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.clone()
    }

    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!("Player task ended abnormally: {}", e);
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_wraps_around() {
        let mut playback = Playback::new(3);
        assert!(playback.is_playing());
        assert_eq!(playback.tick(), Some(1));
        assert_eq!(playback.tick(), Some(2));
        assert_eq!(playback.tick(), Some(0));
    }

    #[test]
    fn test_paused_playback_does_not_advance() {
        let mut playback = Playback::new(4);
        playback.toggle();
        assert!(!playback.is_playing());
        assert_eq!(playback.tick(), None);
        assert_eq!(playback.current(), 0);

        playback.toggle();
        assert_eq!(playback.tick(), Some(1));
    }

    #[test]
    fn test_reset_returns_to_first_frame_and_pauses() {
        let mut playback = Playback::new(8);
        playback.tick();
        playback.tick();
        playback.reset();
        assert_eq!(playback.current(), 0);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_empty_sequence_never_plays() {
        let mut playback = Playback::new(0);
        assert!(!playback.is_playing());
        playback.toggle();
        assert!(!playback.is_playing());
        assert_eq!(playback.tick(), None);
        assert_eq!(playback.state().label(), "No frames");
    }

    #[test]
    fn test_load_restarts_playback() {
        let mut playback = Playback::new(4);
        playback.tick();
        playback.reset();
        playback.load(6);
        assert_eq!(playback.current(), 0);
        assert!(playback.is_playing());
        assert_eq!(playback.state().frame_count, 6);
    }

    #[test]
    fn test_progress_and_label() {
        let mut playback = Playback::new(4);
        playback.tick();
        let state = playback.state();
        assert_eq!(state.label(), "Frame 2 of 4");
        assert_eq!(state.progress_percent(), 50.0);
    }

    #[tokio::test]
    async fn test_player_advances_and_stops() {
        let player = Player::spawn(4, Duration::from_millis(5));
        let mut rx = player.subscribe();

        rx.changed().await.unwrap();
        assert!(rx.borrow().current > 0);

        player.toggle();
        let paused = loop {
            rx.changed().await.unwrap();
            let state = *rx.borrow();
            if !state.playing {
                break state;
            }
        };
        assert_eq!(player.state().current, paused.current);

        player.stop().await;
    }

    #[tokio::test]
    async fn test_player_reset() {
        let player = Player::spawn(4, Duration::from_millis(5));
        let mut rx = player.subscribe();
        rx.changed().await.unwrap();

        player.reset();
        let state = loop {
            rx.changed().await.unwrap();
            let state = *rx.borrow();
            if !state.playing {
                break state;
            }
        };
        assert_eq!(state.current, 0);
        player.stop().await;
    }
}
