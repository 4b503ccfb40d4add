//! Stream controller coordinating the link, the decoder and the feed
//!
//! The controller is the central loop body that:
//! - Advances the connection manager and executes its actions
//! - Drains transport notifications in arrival order
//! - Decodes relay messages into events
//! - Turns events and link transitions into feed entries
//! - Redraws the feed region once per tick when it changed

use alloc::format;

use streamclock_display::{
    ColorTag, DisplaySurface, FeedEntry, FeedRenderer, FEED_CAPACITY,
};
use streamclock_protocol::{parse, Event};

use crate::config::{ConfigError, StreamConfig};
use crate::link::{ConnectionManager, DisconnectReason, LinkAction, LinkNotice, LinkStep};
use crate::traits::{Clock, Transport, TransportNotice};

/// Username shown on link and relay notices
pub const SYSTEM_USER: &str = "System";

/// Username shown on live room status changes
pub const ROOM_USER: &str = "TikTok Live";

/// Username shown on relay error reports
pub const ERROR_USER: &str = "Error";

/// Content of the entry shown before the first connection
pub const STARTUP_TEXT: &str = "Waiting for Server";

/// Controller owning the link, the transport and the feed
pub struct StreamController<T, S, const N: usize = FEED_CAPACITY> {
    config: StreamConfig,
    link: ConnectionManager,
    transport: T,
    surface: S,
    feed: FeedRenderer<N>,
    /// Last reported viewer count
    viewer_count: Option<u64>,
    /// Messages that failed to decode
    decode_failures: u32,
}

impl<T, S, const N: usize> StreamController<T, S, N>
where
    T: Transport,
    S: DisplaySurface,
{
    /// Create a controller from a validated configuration
    pub fn new(config: StreamConfig, transport: T, surface: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            link: ConnectionManager::new(config.link),
            feed: FeedRenderer::new(config.feed),
            config,
            transport,
            surface,
            viewer_count: None,
            decode_failures: 0,
        })
    }

    /// Draw the feed border and the start-up entry
    pub fn start(&mut self) {
        if let Err(e) = self.feed.draw_frame(&mut self.surface) {
            warn!("Feed frame draw failed: {}", e);
        }
        self.feed
            .insert(FeedEntry::new(SYSTEM_USER, STARTUP_TEXT, ColorTag::Yellow));
        self.redraw();
    }

    /// Run one loop iteration at `now_ms`
    pub fn tick(&mut self, now_ms: u32) {
        if self.link.is_shut_down() {
            return;
        }

        let step = self.link.tick(now_ms);
        self.apply(step, now_ms);

        while let Some(notice) = self.transport.poll() {
            self.handle_transport(notice, now_ms);
        }

        self.redraw();
    }

    /// Run one loop iteration at the clock's current time
    pub fn poll<C: Clock>(&mut self, clock: &C) {
        self.tick(clock.now_ms());
    }

    /// Stop reconnecting and close the transport
    pub fn shutdown(&mut self) {
        let step = self.link.shutdown();
        if step.actions.contains(&LinkAction::Close) || self.transport.is_connected() {
            self.transport.close();
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn link(&self) -> &ConnectionManager {
        &self.link
    }

    pub fn feed(&self) -> &FeedRenderer<N> {
        &self.feed
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Last viewer count reported by the relay
    pub fn viewer_count(&self) -> Option<u64> {
        self.viewer_count
    }

    pub fn decode_failures(&self) -> u32 {
        self.decode_failures
    }

    /// Execute a link step: notices first, then transport actions
    fn apply(&mut self, step: LinkStep, now_ms: u32) {
        for notice in &step.notices {
            self.feed.insert(notice_entry(notice));
        }

        for action in step.actions {
            match action {
                LinkAction::Open => {
                    let server = &self.config.server;
                    if let Err(e) = self.transport.open(&server.host, server.port) {
                        warn!("Transport open failed: {}", e);
                        let follow = self.link.on_disconnected(now_ms);
                        self.apply(follow, now_ms);
                    }
                }
                LinkAction::SendHeartbeat => {
                    if let Err(e) = self.transport.send_heartbeat() {
                        warn!("Heartbeat send failed: {}", e);
                        self.transport.close();
                        let follow = self.link.on_disconnected(now_ms);
                        self.apply(follow, now_ms);
                    }
                }
                LinkAction::Close => self.transport.close(),
            }
        }
    }

    fn handle_transport(&mut self, notice: TransportNotice, now_ms: u32) {
        let step = match notice {
            TransportNotice::Connected => self.link.on_connected(now_ms),
            TransportNotice::Disconnected => self.link.on_disconnected(now_ms),
            TransportNotice::HeartbeatAck => self.link.on_heartbeat_ack(now_ms),
            TransportNotice::Message(raw) => {
                self.handle_message(&raw);
                return;
            }
        };
        self.apply(step, now_ms);
    }

    fn handle_message(&mut self, raw: &[u8]) {
        let event = match parse(raw) {
            Ok(event) => event,
            Err(e) => {
                self.decode_failures = self.decode_failures.saturating_add(1);
                warn!("Dropped relay message ({} bytes): {}", raw.len(), e);
                return;
            }
        };

        if event.is_audience_event() {
            trace!("{} from {}", event.kind(), event.user().unwrap_or_default());
        } else if event.is_status_event() {
            info!("Relay status: {}", event.kind());
        }
        match event {
            Event::ViewerCount { count } => {
                info!("Viewers: {}", count);
                self.viewer_count = Some(count);
            }
            other => {
                if let Some(entry) = feed_entry(&other) {
                    self.feed.insert(entry);
                }
            }
        }
    }

    fn redraw(&mut self) {
        if let Err(e) = self.feed.flush(&mut self.surface) {
            warn!("Feed redraw failed: {}", e);
        }
    }
}

/// Feed entry for a relay event
///
/// Returns `None` for events that are not shown in the feed.
pub fn feed_entry(event: &Event) -> Option<FeedEntry> {
    let entry = match event {
        Event::Chat { user, text } => {
            FeedEntry::new(user.as_str(), format!("Comment: {}", text), ColorTag::White)
        }
        Event::Gift { user, gift_name } => {
            FeedEntry::new(user.as_str(), format!("Gift: {}", gift_name), ColorTag::Magenta)
        }
        Event::Like { user } => FeedEntry::new(user.as_str(), "Like", ColorTag::Cyan),
        Event::Follow { user } => FeedEntry::new(user.as_str(), "Follow", ColorTag::Yellow),
        Event::RoomStatus {
            connected: true, ..
        } => FeedEntry::new(ROOM_USER, "Connected", ColorTag::Green),
        Event::RoomStatus {
            connected: false, ..
        } => FeedEntry::new(ROOM_USER, "Disconnected", ColorTag::Red),
        Event::SystemNotice { text } => {
            FeedEntry::new(SYSTEM_USER, text.as_str(), ColorTag::Yellow)
        }
        Event::Error { text } => FeedEntry::new(ERROR_USER, text.as_str(), ColorTag::Red),
        Event::ViewerCount { .. } => return None,
    };
    Some(entry)
}

/// Feed entry for a link transition
pub fn notice_entry(notice: &LinkNotice) -> FeedEntry {
    match notice {
        LinkNotice::Connecting { attempt, max } => FeedEntry::new(
            SYSTEM_USER,
            format!("Connecting ({}/{})", attempt, max),
            ColorTag::Yellow,
        ),
        LinkNotice::Connected => FeedEntry::new(SYSTEM_USER, "Connected", ColorTag::Green),
        LinkNotice::Disconnected(reason) => {
            let text = match reason {
                DisconnectReason::Dropped => "Disconnected",
                DisconnectReason::HeartbeatTimeout => "Link timeout",
                DisconnectReason::ConnectTimeout => "Connect timeout",
            };
            FeedEntry::new(SYSTEM_USER, text, ColorTag::Red)
        }
        LinkNotice::GivingUp { retry_in_ms } => {
            let text = if *retry_in_ms >= 60_000 {
                format!("Retry in {}min", retry_in_ms.div_ceil(60_000))
            } else {
                format!("Retry in {}s", retry_in_ms.div_ceil(1_000))
            };
            FeedEntry::new(SYSTEM_USER, text, ColorTag::Red)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::ConnectionState;
    use crate::traits::TransportError;
    use alloc::collections::VecDeque;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::cell::Cell;
    use streamclock_display::{DisplayError, Rect};

    /// Transport driven by a script of queued notices
    #[derive(Default)]
    struct ScriptedTransport {
        inbox: VecDeque<TransportNotice>,
        connected: bool,
        opens: Vec<(String, u16)>,
        closes: usize,
        heartbeats: usize,
        fail_open: bool,
    }

    impl ScriptedTransport {
        fn deliver(&mut self, notice: TransportNotice) {
            if notice == TransportNotice::Connected {
                self.connected = true;
            }
            self.inbox.push_back(notice);
        }

        fn message(&mut self, json: &str) {
            self.deliver(TransportNotice::Message(json.as_bytes().to_vec()));
        }
    }

    impl Transport for ScriptedTransport {
        fn open(&mut self, host: &str, port: u16) -> Result<(), TransportError> {
            self.opens.push((host.to_string(), port));
            if self.fail_open {
                Err(TransportError::Unreachable)
            } else {
                Ok(())
            }
        }

        fn close(&mut self) {
            self.connected = false;
            self.closes += 1;
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn send_heartbeat(&mut self) -> Result<(), TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            self.heartbeats += 1;
            Ok(())
        }

        fn poll(&mut self) -> Option<TransportNotice> {
            self.inbox.pop_front()
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        texts: Vec<(String, u16)>,
        frames: usize,
        clears: usize,
        fail: bool,
    }

    impl RecordingSurface {
        /// Text drawn by the most recent redraw
        fn last_frame(&self) -> &[(String, u16)] {
            &self.texts
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn clear_region(&mut self, _area: Rect, _color: u16) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.clears += 1;
            self.texts.clear();
            Ok(())
        }

        fn draw_text(
            &mut self,
            _x: u16,
            _y: u16,
            text: &str,
            color: u16,
            _size: u8,
        ) -> Result<(), DisplayError> {
            self.texts.push((text.to_string(), color));
            Ok(())
        }

        fn draw_rect(&mut self, _area: Rect, _color: u16) -> Result<(), DisplayError> {
            self.frames += 1;
            Ok(())
        }
    }

    type Controller = StreamController<ScriptedTransport, RecordingSurface>;

    fn controller() -> Controller {
        let mut c = StreamController::new(
            StreamConfig::default(),
            ScriptedTransport::default(),
            RecordingSurface::default(),
        )
        .unwrap();
        c.start();
        c
    }

    /// Controller with a live link at t=0
    fn connected() -> Controller {
        let mut c = controller();
        c.tick(0);
        c.transport_mut().deliver(TransportNotice::Connected);
        c.tick(10);
        c
    }

    fn newest(c: &Controller) -> (&str, &str, ColorTag) {
        let entry = c.feed().buffer().newest().unwrap();
        (entry.user.as_str(), entry.content.as_str(), entry.color)
    }

    #[test]
    fn test_start_draws_frame_and_waiting_entry() {
        let c = controller();
        assert_eq!(c.surface().frames, 1);
        assert_eq!(newest(&c), ("System", "Waiting for Server", ColorTag::Yellow));
        assert_eq!(
            c.surface().last_frame(),
            [
                ("System".to_string(), ColorTag::Yellow.rgb565()),
                ("Waiting for Server".to_string(), ColorTag::Yellow.rgb565()),
            ]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = StreamConfig::default();
        config.server.port = 0;
        let result = Controller::new(
            config,
            ScriptedTransport::default(),
            RecordingSurface::default(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn test_first_tick_opens_relay() {
        let mut c = controller();
        c.tick(0);
        assert_eq!(c.transport().opens, [("relay.local".to_string(), 3000)]);
        assert_eq!(newest(&c), ("System", "Connecting (1/5)", ColorTag::Yellow));
        assert_eq!(c.link().state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_connect_pushes_connected_entry() {
        let c = connected();
        assert_eq!(c.link().state(), ConnectionState::Connected);
        assert_eq!(newest(&c), ("System", "Connected", ColorTag::Green));
    }

    #[test]
    fn test_chat_message_is_shown() {
        let mut c = connected();
        c.transport_mut()
            .message(r#"{"type":"chat","username":"alice","message":"hi"}"#);
        c.tick(20);

        assert_eq!(newest(&c), ("alice", "Comment: hi", ColorTag::White));
        let frame = c.surface().last_frame();
        let n = frame.len();
        assert_eq!(frame[n - 2], ("alice".to_string(), ColorTag::Yellow.rgb565()));
        assert_eq!(
            frame[n - 1],
            ("Comment: hi".to_string(), ColorTag::White.rgb565())
        );
    }

    #[test]
    fn test_long_follower_name_is_truncated() {
        let mut c = connected();
        c.transport_mut()
            .message(r#"{"type":"follow","username":"bob_the_very_long_username_12345"}"#);
        c.tick(20);

        assert_eq!(
            newest(&c),
            ("bob_the_very_long_username_12345", "Follow", ColorTag::Yellow)
        );
        let frame = c.surface().last_frame();
        let n = frame.len();
        assert_eq!(frame[n - 2].0, "bob_the_very...");
        assert_eq!(frame[n - 1].0, "Follow");
    }

    #[test]
    fn test_messages_keep_arrival_order() {
        let mut c = connected();
        let t = c.transport_mut();
        t.message(r#"{"type":"gift","username":"g","giftName":"Rose"}"#);
        t.message(r#"{"type":"like","username":"l"}"#);
        t.message(r#"{"type":"tiktok_connected","roomId":"7"}"#);
        c.tick(20);

        let entries: Vec<(&str, &str, ColorTag)> = c
            .feed()
            .buffer()
            .iter()
            .map(|e| (e.user.as_str(), e.content.as_str(), e.color))
            .collect();
        assert_eq!(
            entries,
            [
                ("System", "Connected", ColorTag::Green),
                ("g", "Gift: Rose", ColorTag::Magenta),
                ("l", "Like", ColorTag::Cyan),
                ("TikTok Live", "Connected", ColorTag::Green),
            ]
        );
    }

    #[test]
    fn test_bad_messages_are_counted_not_shown() {
        let mut c = connected();
        let before = c.feed().buffer().newest().cloned();
        c.transport_mut().message("not json");
        c.transport_mut().message(r#"{"type":"superchat"}"#);
        c.tick(20);

        assert_eq!(c.decode_failures(), 2);
        assert_eq!(c.feed().buffer().newest().cloned(), before);
    }

    #[test]
    fn test_viewer_count_is_recorded_not_shown() {
        let mut c = connected();
        let len = c.feed().buffer().len();
        c.transport_mut().message(r#"{"type":"viewers","count":42}"#);
        c.tick(20);

        assert_eq!(c.viewer_count(), Some(42));
        assert_eq!(c.feed().buffer().len(), len);
    }

    #[test]
    fn test_relay_notices() {
        let mut c = connected();
        c.transport_mut().message(r#"{"type":"connection"}"#);
        c.tick(20);
        assert_eq!(newest(&c), ("System", "Server ready", ColorTag::Yellow));

        c.transport_mut()
            .message(r#"{"type":"error","message":"room offline"}"#);
        c.tick(30);
        assert_eq!(newest(&c), ("Error", "room offline", ColorTag::Red));

        c.transport_mut().message(r#"{"type":"tiktok_disconnected"}"#);
        c.tick(40);
        assert_eq!(newest(&c), ("TikTok Live", "Disconnected", ColorTag::Red));
    }

    #[test]
    fn test_drop_schedules_retry_after_backoff() {
        let mut c = connected();
        c.transport_mut().deliver(TransportNotice::Disconnected);
        c.tick(100);
        assert_eq!(newest(&c), ("System", "Disconnected", ColorTag::Red));

        c.tick(5_099);
        assert_eq!(c.transport().opens.len(), 1);
        c.tick(5_100);
        assert_eq!(c.transport().opens.len(), 2);
        assert_eq!(newest(&c), ("System", "Connecting (2/5)", ColorTag::Yellow));
    }

    #[test]
    fn test_open_failures_lead_to_cooldown() {
        let mut c = controller();
        c.transport_mut().fail_open = true;

        let mut now = 0;
        for wait in [5_000, 10_000, 20_000, 40_000] {
            c.tick(now);
            now += wait;
        }
        c.tick(now);

        assert_eq!(c.transport().opens.len(), 5);
        assert_eq!(c.link().state(), ConnectionState::BackingOff);
        assert_eq!(newest(&c), ("System", "Retry in 5min", ColorTag::Red));

        c.transport_mut().fail_open = false;
        c.tick(now + 299_999);
        assert_eq!(c.transport().opens.len(), 5);
        c.tick(now + 300_000);
        assert_eq!(c.transport().opens.len(), 6);
        assert_eq!(newest(&c), ("System", "Connecting (1/5)", ColorTag::Yellow));
    }

    #[test]
    fn test_heartbeat_cycle() {
        let mut c = connected();
        c.tick(30_010);
        assert_eq!(c.transport().heartbeats, 1);

        c.transport_mut().deliver(TransportNotice::HeartbeatAck);
        c.tick(30_020);
        c.tick(45_000);
        assert_eq!(c.link().state(), ConnectionState::Connected);

        c.tick(60_010);
        assert_eq!(c.transport().heartbeats, 2);
        c.tick(70_010);
        assert_eq!(c.link().state(), ConnectionState::Disconnected);
        assert_eq!(c.transport().closes, 1);
        assert_eq!(newest(&c), ("System", "Link timeout", ColorTag::Red));
    }

    #[test]
    fn test_heartbeat_send_failure_counts_as_drop() {
        let mut c = connected();
        // Link died without the transport reporting it yet
        c.transport_mut().connected = false;
        c.tick(30_010);

        assert_eq!(c.transport().heartbeats, 0);
        assert_eq!(c.transport().closes, 1);
        assert_eq!(c.link().state(), ConnectionState::Disconnected);
        assert_eq!(c.link().attempt_count(), 1);
        assert_eq!(newest(&c), ("System", "Disconnected", ColorTag::Red));

        c.tick(35_009);
        assert_eq!(c.transport().opens.len(), 1);
        c.tick(35_010);
        assert_eq!(c.transport().opens.len(), 2);
    }

    #[test]
    fn test_shutdown_closes_and_stops() {
        let mut c = connected();
        c.shutdown();
        assert_eq!(c.transport().closes, 1);
        assert!(!c.transport().is_connected());

        c.transport_mut().message(r#"{"type":"like","username":"late"}"#);
        c.tick(1_000_000);
        assert_eq!(c.transport().opens.len(), 1);
        assert_ne!(newest(&c).0, "late");
    }

    #[test]
    fn test_display_errors_are_not_fatal() {
        let mut c = connected();
        c.surface_mut().fail = true;
        c.transport_mut()
            .message(r#"{"type":"chat","username":"a","message":"b"}"#);
        c.tick(20);
        assert_eq!(newest(&c), ("a", "Comment: b", ColorTag::White));
        assert!(c.feed().is_dirty());

        c.surface_mut().fail = false;
        c.tick(30);
        assert!(!c.feed().is_dirty());
    }

    #[test]
    fn test_poll_reads_clock() {
        let mut c = controller();
        let now = Cell::new(0u32);
        c.poll(&|| now.get());
        assert_eq!(c.transport().opens.len(), 1);

        c.transport_mut().deliver(TransportNotice::Disconnected);
        now.set(100);
        c.poll(&|| now.get());
        now.set(5_100);
        c.poll(&|| now.get());
        assert_eq!(c.transport().opens.len(), 2);
    }

    #[test]
    fn test_notice_text() {
        let entry = notice_entry(&LinkNotice::GivingUp { retry_in_ms: 90_000 });
        assert_eq!(entry.content, "Retry in 2min");
        let entry = notice_entry(&LinkNotice::GivingUp { retry_in_ms: 30_000 });
        assert_eq!(entry.content, "Retry in 30s");
        let entry = notice_entry(&LinkNotice::Disconnected(DisconnectReason::ConnectTimeout));
        assert_eq!(entry.content, "Connect timeout");
    }
}
