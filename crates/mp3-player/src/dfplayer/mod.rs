//! DFPlayer Mini over a serial channel.
//!
//! [`DfPlayerModule`] drives a real module through any [`UartPeripheral`]:
//! commands go out as ten-byte frames, replies and unsolicited status frames
//! come back the same way. With acknowledgements enabled every command
//! waits for the module's ACK (or error) frame; status frames that arrive
//! while waiting are queued and handed out by `available`.

pub mod frame;

use embassy_time::{Duration, Instant, Timer};
use platform::UartPeripheral;

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::event::{EventKind, StatusEvent};
use crate::module::{BeginOptions, Mp3Module};
use crate::types::{TrackIndex, Volume};

use frame::{command, reply, Frame, FrameError, FRAME_LEN, START};

/// How long the module may take to mount its storage after a reset.
pub const HANDSHAKE_TIMEOUT_MS: u64 = 5000;

/// Status frames held while a command waits for its reply.
pub const PENDING_CAPACITY: usize = 8;

/// Delay between checks for a reply.
const REPLY_POLL: Duration = Duration::from_millis(5);

/// Errors produced by [`DfPlayerModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DfPlayerError<E> {
    /// The serial channel failed.
    Uart(E),
    /// No reply before the timeout.
    NoReply,
    /// The module came online without an SD card or USB drive.
    NoMedium,
    /// The module answered with an error frame; value is the error code.
    Rejected(u16),
    /// Too many status frames arrived while waiting for a reply.
    QueueFull,
}

impl<E: core::fmt::Display> core::fmt::Display for DfPlayerError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Uart(e) => write!(f, "serial channel error: {e}"),
            Self::NoReply => f.write_str("module did not reply"),
            Self::NoMedium => f.write_str("module reports no storage"),
            Self::Rejected(code) => write!(f, "module rejected command (error {code})"),
            Self::QueueFull => f.write_str("status queue full"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for DfPlayerError<E> {}

/// The pending status queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

impl<E> From<QueueFull> for DfPlayerError<E> {
    fn from(_: QueueFull) -> Self {
        Self::QueueFull
    }
}

/// DFPlayer Mini speaking its native frame protocol.
pub struct DfPlayerModule {
    feedback: bool,
    timeout: Duration,
    handshake_timeout: Duration,
    pending: heapless::Deque<StatusEvent, PENDING_CAPACITY>,
    latched: StatusEvent,
}

impl DfPlayerModule {
    /// Module with the default reply and handshake timeouts.
    pub fn new() -> Self {
        Self::with_timeouts(
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
            Duration::from_millis(HANDSHAKE_TIMEOUT_MS),
        )
    }

    /// Module with explicit reply and handshake timeouts.
    pub fn with_timeouts(timeout: Duration, handshake_timeout: Duration) -> Self {
        Self {
            feedback: true,
            timeout,
            handshake_timeout,
            pending: heapless::Deque::new(),
            latched: StatusEvent {
                kind: EventKind::TimeOut,
                detail: 0,
            },
        }
    }

    /// Reply timeout currently in force.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Status frames received but not yet handed out.
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    async fn send<U: UartPeripheral>(
        &mut self,
        uart: &mut U,
        command: u8,
        param: u16,
    ) -> Result<(), DfPlayerError<U::Error>> {
        let frame = Frame::new(command, self.feedback, param);
        uart.write(&frame.encode())
            .await
            .map_err(DfPlayerError::Uart)?;
        debug!("dfplayer: sent command {} param {}", command, param);
        if !self.feedback {
            return Ok(());
        }

        let deadline = deadline_after(self.timeout);
        loop {
            let frame = self.next_frame(uart, deadline).await?;
            match frame.command {
                reply::ACK => return Ok(()),
                reply::ERROR => return Err(DfPlayerError::Rejected(frame.param)),
                _ => self.hold(frame.notification())?,
            }
        }
    }

    /// Wait for the next well-formed frame. Malformed frames are queued as
    /// `WrongStack` notifications.
    async fn next_frame<U: UartPeripheral>(
        &mut self,
        uart: &mut U,
        deadline: Instant,
    ) -> Result<Frame, DfPlayerError<U::Error>> {
        loop {
            if uart.read_ready().map_err(DfPlayerError::Uart)? {
                match read_frame(uart).await.map_err(DfPlayerError::Uart)? {
                    Ok(frame) => return Ok(frame),
                    Err(_) => self.hold(Some(wrong_stack()))?,
                }
            } else if Instant::now() >= deadline {
                return Err(DfPlayerError::NoReply);
            } else {
                Timer::after(REPLY_POLL).await;
            }
        }
    }

    fn hold(&mut self, event: Option<StatusEvent>) -> Result<(), QueueFull> {
        match event {
            Some(event) => self.pending.push_back(event).map_err(|_| QueueFull),
            None => Ok(()),
        }
    }

    fn online_pending(&self) -> bool {
        self.pending.iter().any(|event| {
            matches!(
                event.kind,
                EventKind::CardOnline | EventKind::UsbOnline | EventKind::CardUsbOnline
            )
        })
    }
}

impl Default for DfPlayerModule {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UartPeripheral> Mp3Module<U> for DfPlayerModule {
    type Error = DfPlayerError<U::Error>;

    async fn begin(&mut self, uart: &mut U, options: BeginOptions) -> Result<(), Self::Error> {
        self.feedback = options.ack;
        self.pending.clear();
        if !options.reset {
            return Ok(());
        }

        self.send(uart, command::RESET, 0).await?;
        if self.online_pending() {
            return Ok(());
        }

        let deadline = deadline_after(self.handshake_timeout);
        loop {
            let frame = match self.next_frame(uart, deadline).await {
                Ok(frame) => frame,
                // Without acknowledgements a silent module is accepted.
                Err(DfPlayerError::NoReply) if !self.feedback => return Ok(()),
                Err(e) => return Err(e),
            };
            if frame.is_online() {
                let event = frame.notification().ok_or(DfPlayerError::NoMedium)?;
                self.hold(Some(event))?;
                return Ok(());
            }
            if frame.command == reply::ERROR {
                return Err(DfPlayerError::Rejected(frame.param));
            }
            if frame.command != reply::ACK {
                self.hold(frame.notification())?;
            }
        }
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    async fn volume(&mut self, uart: &mut U, volume: Volume) -> Result<(), Self::Error> {
        self.send(uart, command::VOLUME, u16::from(volume.get()))
            .await
    }

    async fn loop_track(&mut self, uart: &mut U, track: TrackIndex) -> Result<(), Self::Error> {
        self.send(uart, command::LOOP_TRACK, track.get()).await
    }

    async fn available(&mut self, uart: &mut U) -> Result<bool, Self::Error> {
        if let Some(event) = self.pending.pop_front() {
            self.latched = event;
            return Ok(true);
        }
        if !uart.read_ready().map_err(DfPlayerError::Uart)? {
            return Ok(false);
        }
        let event = match read_frame(uart).await.map_err(DfPlayerError::Uart)? {
            Ok(frame) => match frame.notification() {
                Some(event) => event,
                None => return Ok(false),
            },
            Err(_) => wrong_stack(),
        };
        self.latched = event;
        Ok(true)
    }

    fn read_type(&self) -> u8 {
        self.latched.kind.code()
    }

    fn read(&self) -> u16 {
        self.latched.detail
    }
}

/// Read one frame, skipping line noise before the start byte.
async fn read_frame<U: UartPeripheral>(
    uart: &mut U,
) -> Result<Result<Frame, FrameError>, U::Error> {
    let mut skipped = 0usize;
    while uart.read_byte().await? != START {
        skipped = skipped.saturating_add(1);
        if skipped >= FRAME_LEN || !uart.read_ready()? {
            return Ok(Err(FrameError::Delimiter));
        }
    }

    let mut bytes = [0u8; FRAME_LEN];
    if let Some((first, rest)) = bytes.split_first_mut() {
        *first = START;
        uart.read(rest).await?;
    }
    Ok(Frame::decode(&bytes))
}

fn deadline_after(timeout: Duration) -> Instant {
    Instant::now().checked_add(timeout).unwrap_or(Instant::MAX)
}

fn wrong_stack() -> StatusEvent {
    StatusEvent {
        kind: EventKind::WrongStack,
        detail: 0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use platform::mocks::MockUart;
    use platform::{UartConfig, UartError};

    fn open_uart() -> MockUart {
        let mut uart = MockUart::new();
        uart.configure(UartConfig::dfplayer()).unwrap();
        uart
    }

    fn module() -> DfPlayerModule {
        DfPlayerModule::with_timeouts(Duration::from_millis(20), Duration::from_millis(40))
    }

    fn incoming(uart: &mut MockUart, command: u8, param: u16) {
        uart.push_incoming(&Frame::new(command, false, param).encode())
            .unwrap();
    }

    fn latched(module: &DfPlayerModule) -> (u8, u16) {
        (
            <DfPlayerModule as Mp3Module<MockUart>>::read_type(module),
            <DfPlayerModule as Mp3Module<MockUart>>::read(module),
        )
    }

    #[tokio::test]
    async fn test_begin_resets_and_waits_for_card() {
        let mut uart = open_uart();
        incoming(&mut uart, reply::ACK, 0);
        incoming(&mut uart, reply::ONLINE, 0x02);
        let mut module = module();

        module.begin(&mut uart, BeginOptions::default()).await.unwrap();

        assert_eq!(uart.written(), Frame::new(command::RESET, true, 0).encode());
        assert!(module.available(&mut uart).await.unwrap());
        assert_eq!(latched(&module), (EventKind::CardOnline.code(), 0));
    }

    #[tokio::test]
    async fn test_begin_accepts_online_before_ack() {
        let mut uart = open_uart();
        incoming(&mut uart, reply::ONLINE, 0x02);
        incoming(&mut uart, reply::ACK, 0);
        let mut module = module();

        module.begin(&mut uart, BeginOptions::default()).await.unwrap();
        assert_eq!(module.pending_events(), 1);
    }

    #[tokio::test]
    async fn test_begin_without_reply_fails() {
        let mut uart = open_uart();
        let mut module = module();
        let result = module.begin(&mut uart, BeginOptions::default()).await;
        assert_eq!(result, Err(DfPlayerError::NoReply));
    }

    #[tokio::test]
    async fn test_begin_without_storage_fails() {
        let mut uart = open_uart();
        incoming(&mut uart, reply::ACK, 0);
        incoming(&mut uart, reply::ONLINE, 0x00);
        let mut module = module();
        let result = module.begin(&mut uart, BeginOptions::default()).await;
        assert_eq!(result, Err(DfPlayerError::NoMedium));
    }

    #[tokio::test]
    async fn test_begin_without_ack_tolerates_silence() {
        let mut uart = open_uart();
        let mut module = module();
        let options = BeginOptions {
            ack: false,
            reset: true,
        };
        module.begin(&mut uart, options).await.unwrap();
        assert_eq!(uart.written(), Frame::new(command::RESET, false, 0).encode());
    }

    #[tokio::test]
    async fn test_begin_without_reset_sends_nothing() {
        let mut uart = open_uart();
        let mut module = module();
        let options = BeginOptions {
            ack: true,
            reset: false,
        };
        module.begin(&mut uart, options).await.unwrap();
        assert!(uart.written().is_empty());
    }

    #[tokio::test]
    async fn test_error_reply_rejects_command() {
        let mut uart = open_uart();
        incoming(&mut uart, reply::ERROR, 5);
        let mut module = module();
        let result = module
            .loop_track(&mut uart, TrackIndex::new(9).unwrap())
            .await;
        assert_eq!(result, Err(DfPlayerError::Rejected(5)));
    }

    #[tokio::test]
    async fn test_status_frames_during_command_are_kept() {
        let mut uart = open_uart();
        incoming(&mut uart, reply::CARD_FINISHED, 3);
        incoming(&mut uart, reply::ACK, 0);
        let mut module = module();

        module.volume(&mut uart, Volume::new(20)).await.unwrap();

        assert!(module.available(&mut uart).await.unwrap());
        assert_eq!(latched(&module), (EventKind::PlayFinished.code(), 3));
        assert!(!module.available(&mut uart).await.unwrap());
    }

    #[tokio::test]
    async fn test_available_reads_one_frame() {
        let mut uart = open_uart();
        let mut module = module();
        assert!(!module.available(&mut uart).await.unwrap());

        incoming(&mut uart, reply::REMOVED, 0x02);
        assert!(module.available(&mut uart).await.unwrap());
        assert_eq!(latched(&module), (EventKind::CardRemoved.code(), 0));
    }

    #[tokio::test]
    async fn test_corrupt_frame_reports_wrong_stack() {
        let mut uart = open_uart();
        let mut raw = Frame::new(reply::CARD_FINISHED, false, 1).encode();
        raw[7] = raw[7].wrapping_add(1);
        uart.push_incoming(&raw).unwrap();
        let mut module = module();

        assert!(module.available(&mut uart).await.unwrap());
        assert_eq!(latched(&module), (EventKind::WrongStack.code(), 0));
    }

    #[tokio::test]
    async fn test_noise_before_start_byte_is_skipped() {
        let mut uart = open_uart();
        uart.push_incoming(&[0x00, 0x13]).unwrap();
        incoming(&mut uart, reply::CARD_FINISHED, 2);
        let mut module = module();

        assert!(module.available(&mut uart).await.unwrap());
        assert_eq!(latched(&module), (EventKind::PlayFinished.code(), 2));
    }

    #[tokio::test]
    async fn test_truncated_frame_is_a_channel_error() {
        let mut uart = open_uart();
        uart.push_incoming(&[START, 0xFF, 0x06]).unwrap();
        let mut module = module();
        let result = module.available(&mut uart).await;
        assert_eq!(result, Err(DfPlayerError::Uart(UartError::Timeout)));
    }
}
